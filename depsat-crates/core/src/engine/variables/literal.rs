use std::fmt::Display;
use std::num::NonZeroI32;
use std::ops::Not;

use thiserror::Error;

use super::PropositionalVariable;
use crate::containers::StorageKey;

/// A [`PropositionalVariable`] together with a polarity.
///
/// Externally a literal is a nonzero signed integer: the absolute value is the variable and the
/// sign is the polarity. Internally it is stored as `2 * id + is_positive` so that literals can
/// key the watch lists directly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    code: u32,
}

impl Literal {
    pub fn new(propositional_variable: PropositionalVariable, is_positive: bool) -> Literal {
        Literal {
            code: propositional_variable.id() * 2 + (is_positive as u32),
        }
    }

    pub fn get_propositional_variable(&self) -> PropositionalVariable {
        PropositionalVariable::new(self.code / 2)
    }

    pub fn is_positive(&self) -> bool {
        self.code % 2 == 1
    }

    pub fn is_negative(&self) -> bool {
        !self.is_positive()
    }

    /// The signed integer form of the literal, e.g. `-3` for the negative literal of variable 3.
    pub fn to_signed(&self) -> i32 {
        let id = self.get_propositional_variable().id() as i32;
        if self.is_positive() {
            id
        } else {
            -id
        }
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl std::fmt::Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_signed())
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_signed())
    }
}

impl StorageKey for Literal {
    fn index(&self) -> usize {
        self.code as usize
    }

    fn create_from_index(index: usize) -> Self {
        Literal { code: index as u32 }
    }
}

impl From<NonZeroI32> for Literal {
    fn from(value: NonZeroI32) -> Self {
        Literal::new(
            PropositionalVariable::new(value.get().unsigned_abs()),
            value.get() > 0,
        )
    }
}

impl TryFrom<i32> for Literal {
    type Error = LiteralConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        NonZeroI32::new(value)
            .map(Literal::from)
            .ok_or(LiteralConversionError::ZeroLiteral)
    }
}

/// Errors when converting a signed integer into a [`Literal`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LiteralConversionError {
    #[error("0 does not denote a literal")]
    ZeroLiteral,
}
