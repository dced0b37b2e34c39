//! A heap where the keys range from [0, ..., n - 1] and the values are ordered. The heap can be
//! queried to return the key with the maximum value, and keys can be (temporarily) removed and
//! restored as their variables get assigned and unassigned.

use super::HashSet;
use super::KeyedVec;
use super::StorageKey;
use crate::depsat_assert_moderate;

/// A [max-heap](https://en.wikipedia.org/wiki/Min-max_heap)
/// which allows for generalised `Key`s (required to implement [StorageKey]) and ordered `Value`s.
///
/// Removed keys keep their value, so restoring a key places it back in the same order it had
/// before removal.
#[derive(Debug, Clone)]
pub struct KeyValueHeap<Key, Value> {
    /// Contains the values stored as a heap; the value of key `i` is at index
    /// [`KeyValueHeap::map_key_to_position\[i\]`][KeyValueHeap::map_key_to_position]
    values: Vec<Value>,
    /// `map_key_to_position[i]` is the index of the value of the key `i` in
    /// [`KeyValueHeap::values`]
    map_key_to_position: KeyedVec<Key, usize>,
    /// `map_position_to_key[i]` is the key which is associated with `i` in
    /// [`KeyValueHeap::values`]
    map_position_to_key: Vec<Key>,
    /// Positions `[0, end_position)` hold the keys which are present
    end_position: usize,
}

impl<Key: StorageKey, Value> Default for KeyValueHeap<Key, Value> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Key, Value> KeyValueHeap<Key, Value> {
    pub(crate) const fn new() -> Self {
        Self {
            values: Vec::new(),
            map_key_to_position: KeyedVec::new(),
            map_position_to_key: Vec::new(),
            end_position: 0,
        }
    }
}

impl<Key, Value> KeyValueHeap<Key, Value>
where
    Key: StorageKey + Copy,
    Value: PartialOrd + Copy,
{
    /// Return the key with maximum value from the heap, or None if the heap is empty. Note that
    /// this does not delete the key (see [`KeyValueHeap::pop_max`] to get and delete).
    ///
    /// The time-complexity of this operation is O(1)
    pub fn peek_max(&self) -> Option<(&Key, &Value)> {
        if self.has_no_nonremoved_elements() {
            None
        } else {
            Some((&self.map_position_to_key[0], &self.values[0]))
        }
    }

    /// Deletes the key with maximum value from the heap and returns it, or None if the heap is
    /// empty.
    ///
    ///  The time-complexity of this operation is O(logn).
    pub fn pop_max(&mut self) -> Option<Key> {
        if self.has_no_nonremoved_elements() {
            return None;
        }

        let best_key = self.map_position_to_key[0];
        depsat_assert_moderate!(0 == self.map_key_to_position[best_key]);
        self.delete_key(best_key);
        Some(best_key)
    }

    /// Restores the entry with key 'key' to the heap if the key is not present, otherwise does
    /// nothing. Its value is the value it had before [`KeyValueHeap::delete_key`] was called.
    ///
    ///  The run-time complexity of this operation is O(logn)
    pub fn restore_key(&mut self, key: Key) {
        if !self.is_key_present(key) {
            let position = self.map_key_to_position[key];
            depsat_assert_moderate!(position >= self.end_position);
            self.swap_positions(position, self.end_position);
            self.end_position += 1;
            self.sift_up(self.end_position - 1);
        }
    }

    /// Removes the entry with key 'key' (temporarily) from the heap if the key is present,
    /// otherwise does nothing.
    ///
    /// The run-time complexity of this operation is O(logn)
    pub fn delete_key(&mut self, key: Key) {
        if self.is_key_present(key) {
            let position = self.map_key_to_position[key];
            self.swap_positions(position, self.end_position - 1);
            self.end_position -= 1;
            if position < self.end_position {
                self.sift_down(position);
            }
        }
    }

    /// Returns how many elements are in the heap (including the (temporarily) "removed" values)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn num_nonremoved_elements(&self) -> usize {
        self.end_position
    }

    /// Returns whether there are elements left in the heap (excluding the "removed" values)
    pub fn has_no_nonremoved_elements(&self) -> bool {
        self.num_nonremoved_elements() == 0
    }

    /// Returns whether the key is in the heap and has not been (temporarily) removed
    pub fn is_key_present(&self, key: Key) -> bool {
        key.index() < self.map_key_to_position.len()
            && self.map_key_to_position[key] < self.end_position
    }

    /// Increases the size of the heap by one, adding `key` with `value`.
    ///
    /// Keys have to be added in increasing order of their index, starting from zero.
    pub fn grow(&mut self, key: Key, value: Value) {
        let last_index = self.values.len();
        depsat_assert_moderate!(
            key.index() == last_index,
            "Keys are expected in order, got {} for a heap with {} keys",
            key.index(),
            last_index
        );
        self.values.push(value);
        let _ = self.map_key_to_position.push(last_index);
        self.map_position_to_key.push(key);
        self.swap_positions(self.end_position, last_index);
        self.end_position += 1;
        self.sift_up(self.end_position - 1);
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.map_key_to_position.clear();
        self.map_position_to_key.clear();
        self.end_position = 0;
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        let key_i = self.map_position_to_key[a];
        depsat_assert_moderate!(self.map_key_to_position[key_i] == a);
        let key_j = self.map_position_to_key[b];
        depsat_assert_moderate!(self.map_key_to_position[key_j] == b);

        self.values.swap(a, b);
        self.map_position_to_key.swap(a, b);
        self.map_key_to_position.swap(key_i.index(), key_j.index());

        depsat_assert_moderate!(
            self.map_key_to_position[key_i] == b && self.map_key_to_position[key_j] == a
        );

        depsat_assert_moderate!(
            self.map_key_to_position
                .iter()
                .collect::<HashSet<&usize>>()
                .len()
                == self.map_key_to_position.len()
        )
    }

    fn sift_up(&mut self, position: usize) {
        if position > 0 {
            let parent_position = Self::get_parent_position(position);
            if self.values[parent_position] < self.values[position] {
                self.swap_positions(parent_position, position);
                self.sift_up(parent_position);
            }
        }
    }

    fn sift_down(&mut self, position: usize) {
        depsat_assert_moderate!(position < self.end_position);

        if !self.is_heap_locally(position) {
            let largest_child_position = self.get_largest_child_position(position);
            self.swap_positions(largest_child_position, position);
            self.sift_down(largest_child_position);
        }
    }

    fn is_heap_locally(&self, position: usize) -> bool {
        let left_child_position = Self::get_left_child_position(position);
        let right_child_position = Self::get_right_child_position(position);

        if self.is_leaf(position) {
            return true;
        }

        if right_child_position >= self.end_position {
            return self.values[position] >= self.values[left_child_position];
        }

        self.values[position] >= self.values[left_child_position]
            && self.values[position] >= self.values[right_child_position]
    }

    fn is_leaf(&self, position: usize) -> bool {
        Self::get_left_child_position(position) >= self.end_position
    }

    fn get_largest_child_position(&self, position: usize) -> usize {
        depsat_assert_moderate!(!self.is_leaf(position));

        let left_child_position = Self::get_left_child_position(position);
        let right_child_position = Self::get_right_child_position(position);

        if right_child_position < self.end_position
            && self.values[right_child_position] > self.values[left_child_position]
        {
            right_child_position
        } else {
            left_child_position
        }
    }

    fn get_parent_position(child_position: usize) -> usize {
        depsat_assert_moderate!(child_position > 0, "Root has no parent.");
        (child_position - 1) / 2
    }

    fn get_left_child_position(position: usize) -> usize {
        2 * position + 1
    }

    fn get_right_child_position(position: usize) -> usize {
        2 * position + 2
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Reverse;

    use super::KeyValueHeap;

    fn heap_sort_test_helper(numbers: Vec<usize>) {
        let mut sorted_numbers = numbers.clone();
        sorted_numbers.sort();
        sorted_numbers.reverse();

        let mut heap: KeyValueHeap<usize, usize> = KeyValueHeap::default();
        for (key, value) in numbers.iter().enumerate() {
            heap.grow(key, *value);
        }

        let mut heap_sorted_vector: Vec<usize> = vec![];
        while let Some(index) = heap.pop_max() {
            heap_sorted_vector.push(numbers[index]);
        }

        assert_eq!(heap_sorted_vector, sorted_numbers);
    }

    #[test]
    fn trivial() {
        let mut heap: KeyValueHeap<usize, usize> = KeyValueHeap::default();
        heap.grow(0, 5);
        assert_eq!(heap.pop_max(), Some(0));
        assert!(heap.has_no_nonremoved_elements());
        assert_eq!(heap.pop_max(), None);
    }

    #[test]
    fn pop_after_interleaved_growth() {
        let mut heap: KeyValueHeap<usize, u32> = KeyValueHeap::default();

        heap.grow(0, 7);
        heap.grow(1, 5);

        assert_eq!(heap.pop_max(), Some(0));

        heap.grow(2, 7);
        heap.grow(3, 6);

        assert_eq!(heap.pop_max(), Some(2));
        assert_eq!(heap.pop_max(), Some(3));
        assert_eq!(heap.pop_max(), Some(1));
    }

    #[test]
    fn sorts_with_duplicates() {
        heap_sort_test_helper(vec![2, 2, 1, 1, 3, 3, 3]);
    }

    #[test]
    fn sorts_unordered_input() {
        heap_sort_test_helper(vec![3, 10, 5, 1, 8]);
    }

    #[test]
    fn restored_key_keeps_its_value() {
        let mut heap: KeyValueHeap<usize, Reverse<u32>> = KeyValueHeap::default();
        heap.grow(0, Reverse(3));
        heap.grow(1, Reverse(1));
        heap.grow(2, Reverse(2));

        heap.delete_key(1);
        assert!(!heap.is_key_present(1));
        assert_eq!(heap.peek_max().map(|(key, _)| *key), Some(2));
        assert_eq!(heap.num_nonremoved_elements(), 2);

        heap.restore_key(1);
        assert!(heap.is_key_present(1));
        assert_eq!(heap.peek_max().map(|(key, _)| *key), Some(1));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn deleting_an_absent_key_does_nothing() {
        let mut heap: KeyValueHeap<usize, u32> = KeyValueHeap::default();
        heap.grow(0, 1);
        heap.delete_key(0);
        heap.delete_key(0);

        assert_eq!(heap.num_nonremoved_elements(), 0);
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn cleared_heap_can_be_refilled() {
        let mut heap: KeyValueHeap<usize, u32> = KeyValueHeap::default();
        heap.grow(0, 4);
        heap.grow(1, 9);
        heap.clear();

        assert!(heap.is_empty());
        assert_eq!(heap.pop_max(), None);

        heap.grow(0, 2);
        heap.grow(1, 1);
        assert_eq!(heap.pop_max(), Some(0));
        assert_eq!(heap.pop_max(), Some(1));
    }
}
