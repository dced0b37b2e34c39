use std::ops::Deref;

use crate::depsat_assert_simple;

/// A chronological record of values, partitioned into decision levels.
///
/// The decision level is the number of limits pushed so far; a limit is the length of the trail
/// at the moment the level was entered.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    /// At index i is the position where the (i + 1)-th decision level starts on the trail
    trail_limits: Vec<usize>,
    trail: Vec<T>,
}

// Implemented by hand to avoid imposing Default on T.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            trail_limits: Default::default(),
            trail: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn increase_decision_level(&mut self) {
        self.trail_limits.push(self.trail.len());
    }

    pub(crate) fn get_decision_level(&self) -> usize {
        self.trail_limits.len()
    }

    /// Removes the limit of the current decision level and returns the trail position at which
    /// that level started. The values themselves are left on the trail for the caller to pop.
    pub(crate) fn pop_decision_level(&mut self) -> usize {
        depsat_assert_simple!(
            self.get_decision_level() > 0,
            "Cannot pop the root decision level"
        );
        self.trail_limits.pop().unwrap_or(0)
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        self.trail.pop()
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}
