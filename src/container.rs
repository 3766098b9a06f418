//! Growable contiguous container with manual capacity management.
//!
//! Elements live in `buf[..len]`; everything past `len` is uninitialized
//! storage. Every growth path goes through `grow_for`, which picks
//! `max(required, 2 * capacity, MIN_CAPACITY)`, so appends are amortized O(1)
//! and capacity never shrinks.

use std::fmt;
use std::mem::{self, MaybeUninit};
use std::ops::{Add, AddAssign, Index, IndexMut};
use std::ptr;
use std::slice;

use itertools::Itertools;

use crate::error::{ContainerError, Result};

/// Smallest capacity allocated once a container needs storage at all.
pub const MIN_CAPACITY: usize = 8;

fn allocate<T>(capacity: usize) -> Box<[MaybeUninit<T>]> {
    std::iter::repeat_with(MaybeUninit::uninit)
        .take(capacity)
        .collect()
}

pub struct Container<T> {
    buf: Box<[MaybeUninit<T>]>,
    len: usize,
}

// =============================================================================
// Milestone 1: Construction and capacity
// =============================================================================

impl<T> Container<T> {
    /// Creates an empty container without allocating.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Container {
            buf: allocate(capacity),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Makes room for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the required capacity overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        self.grow_for(additional);
    }

    fn grow_for(&mut self, additional: usize) {
        let required = self
            .len
            .checked_add(additional)
            .expect("capacity overflow");
        if required <= self.capacity() {
            return;
        }

        let new_capacity = required.max(self.capacity() * 2).max(MIN_CAPACITY);
        let mut buf = allocate(new_capacity);
        // SAFETY: the first `len` slots are initialized and the new buffer is
        // a separate allocation of at least `len` slots. The old buffer only
        // holds `MaybeUninit`, so dropping it does not drop the moved values.
        unsafe {
            ptr::copy_nonoverlapping(self.buf.as_ptr(), buf.as_mut_ptr(), self.len);
        }

        log::trace!(
            "reallocating container: capacity {} -> {}",
            self.capacity(),
            new_capacity
        );
        self.buf = buf;
    }

    /// Drops every element. Capacity is kept.
    pub fn clear(&mut self) {
        let elements: *mut [T] = self.as_mut_slice();
        self.len = 0;
        // SAFETY: the slice covered exactly the initialized elements and
        // `len` is already zero, so they cannot be observed again.
        unsafe {
            ptr::drop_in_place(elements);
        }
    }

    pub fn swap(&mut self, other: &mut Container<T>) {
        mem::swap(self, other);
    }

    // =========================================================================
    // Milestone 2: Insertion and removal
    // =========================================================================

    pub fn push_back(&mut self, value: T) {
        self.grow_for(1);
        self.buf[self.len].write(value);
        self.len += 1;
    }

    pub fn pop_back(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(ContainerError::Empty);
        }
        self.len -= 1;
        // SAFETY: the slot was initialized and is now outside `len`.
        Ok(unsafe { self.buf[self.len].assume_init_read() })
    }

    /// Removes the element at `index`, shifting the following elements
    /// left by one.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(ContainerError::out_of_range(index, self.len));
        }

        // SAFETY: `index < len`, so the read is of an initialized slot, and
        // the shifted range `index + 1..len` is initialized too. The read
        // value is overwritten by the shift, so nothing is dropped twice.
        unsafe {
            let base = self.buf.as_mut_ptr();
            let value = (*base.add(index)).assume_init_read();
            ptr::copy(base.add(index + 1), base.add(index), self.len - index - 1);
            self.len -= 1;
            Ok(value)
        }
    }

    // =========================================================================
    // Milestone 3: Positions and search
    // =========================================================================

    /// Position of the first element.
    pub fn begin(&self) -> usize {
        0
    }

    /// The end position, one past the last element.
    pub fn end(&self) -> usize {
        self.len
    }

    /// Position of the first element equal to `target`, or [`end`](Self::end).
    pub fn find(&self, target: &T) -> usize
    where
        T: PartialEq,
    {
        self.find_from(target, self.begin())
    }

    /// Like [`find`](Self::find) but starts scanning at `from`.
    pub fn find_from(&self, target: &T, from: usize) -> usize
    where
        T: PartialEq,
    {
        if from >= self.len {
            return self.end();
        }
        self.as_slice()[from..]
            .iter()
            .position(|item| item == target)
            .map_or(self.end(), |offset| from + offset)
    }

    pub fn contains(&self, target: &T) -> bool
    where
        T: PartialEq,
    {
        self.find(target) != self.end()
    }

    // =========================================================================
    // Milestone 4: Element access
    // =========================================================================

    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(ContainerError::out_of_range(index, len))
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ContainerError::out_of_range(index, len))
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized.
        unsafe { slice::from_raw_parts(self.buf.as_ptr().cast::<T>(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, with unique access.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr().cast::<T>(), self.len) }
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }
}

impl<T> Drop for Container<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Unchecked access; out-of-range indices panic like slice indexing.
impl<T> Index<usize> for Container<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for Container<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

// =============================================================================
// Milestone 5: Value semantics and concatenation
// =============================================================================

impl<T: Clone> Clone for Container<T> {
    /// Copies into a fresh buffer sized to exactly `len` elements.
    fn clone(&self) -> Self {
        let mut copy = Container::with_capacity(self.len);
        copy.extend(self.iter().cloned());
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend(source.iter().cloned());
    }
}

impl<T: Clone> AddAssign<&Container<T>> for Container<T> {
    fn add_assign(&mut self, other: &Container<T>) {
        self.extend(other.iter().cloned());
    }
}

impl<T: Clone> Add for &Container<T> {
    type Output = Container<T>;

    fn add(self, rhs: &Container<T>) -> Container<T> {
        let mut sum = self.clone();
        sum += rhs;
        sum
    }
}

impl<T> Extend<T> for Container<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for Container<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut container = Container::new();
        container.extend(iter);
        container
    }
}

impl<T> From<Vec<T>> for Container<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T, const N: usize> From<[T; N]> for Container<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: PartialEq> PartialEq for Container<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Container<T> {}

impl<T: fmt::Display> fmt::Display for Container<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().join(","))
    }
}

impl<T: fmt::Debug> fmt::Debug for Container<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Milestone 6: Iterator integration
// =============================================================================

pub struct IntoIter<T> {
    buf: Box<[MaybeUninit<T>]>,
    front: usize,
    back: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: slots in `front..back` are initialized and read once.
        let item = unsafe { self.buf[self.front].assume_init_read() };
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: as in `next`.
        Some(unsafe { self.buf[self.back].assume_init_read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        for slot in &mut self.buf[self.front..self.back] {
            // SAFETY: the remaining slots are initialized and never read again.
            unsafe { slot.assume_init_drop() };
        }
    }
}

impl<T> IntoIterator for Container<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        let back = mem::replace(&mut self.len, 0);
        IntoIter {
            buf: mem::take(&mut self.buf),
            front: 0,
            back,
        }
    }
}

impl<'a, T> IntoIterator for &'a Container<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Container<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::rc::Rc;

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_reserve_overflow_panics() {
        let mut container = Container::from([1u8]);
        container.reserve(usize::MAX);
    }

    #[test]
    fn test_nine_pushes_reallocate_twice() {
        let mut container = Container::new();
        assert_eq!(container.capacity(), 0);

        let mut capacities = vec![container.capacity()];
        for value in 1..=9 {
            container.push_back(value);
            if container.capacity() != *capacities.last().unwrap() {
                capacities.push(container.capacity());
            }
        }

        assert_eq!(capacities, vec![0, 8, 16]);
        assert_eq!(container.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Container::<i32>::new().to_string(), "{}");
        assert_eq!(Container::from([1, 2, 3]).to_string(), "{1,2,3}");
    }

    #[test]
    fn test_at_is_strict() {
        let mut container = Container::from([10, 20, 30]);
        assert_eq!(container.at(2), Ok(&30));
        assert_eq!(container.at(3), Err(ContainerError::out_of_range(3, 3)));
        *container.at_mut(0).unwrap() = 11;
        assert_eq!(container[0], 11);
        assert!(container.at_mut(3).is_err());
    }

    #[test]
    #[should_panic]
    fn test_unchecked_index_panics() {
        let container = Container::from([1]);
        let _ = container[1];
    }

    #[test]
    fn test_erase_shifts_left() {
        let mut container = Container::from([1, 2, 3, 4]);
        assert_eq!(container.erase(1), Ok(2));
        assert_eq!(container.to_string(), "{1,3,4}");
        assert_eq!(container.erase(2), Ok(4));
        assert_eq!(container.erase(2), Err(ContainerError::out_of_range(2, 2)));
        assert_eq!(container.erase(container.end()), Err(ContainerError::out_of_range(2, 2)));
        assert_eq!(container.to_string(), "{1,3}");
    }

    #[test]
    fn test_find() {
        let mut container = Container::from([5, 7, 5, 9]);
        assert_eq!(container.find(&5), 0);
        assert_eq!(container.find_from(&5, 1), 2);
        assert_eq!(container.find(&8), container.end());
        assert_eq!(container.find_from(&5, 10), container.end());

        container.push_back(8);
        assert_eq!(container.find(&8), 4);
        container.erase(container.find(&9)).unwrap();
        assert_eq!(container.find(&9), container.end());
        assert!(!container.contains(&9));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut container: Container<i32> = (0..10).collect();
        let capacity = container.capacity();
        container.clear();
        assert!(container.is_empty());
        assert_eq!(container.capacity(), capacity);
        assert_eq!(container.pop_back(), Err(ContainerError::Empty));
    }

    #[test]
    fn test_concatenation() {
        let a = Container::from([1, 2]);
        let b = Container::from([3, 4, 5]);
        let sum = &a + &b;
        assert_eq!(sum.to_string(), "{1,2,3,4,5}");
        assert_eq!(a.len(), 2);

        let mut c = Container::new();
        c += &a;
        assert_eq!(c.capacity(), MIN_CAPACITY);
        c += &b;
        c += &b;
        assert_eq!(c.len(), 8);
        c += &a;
        assert_eq!(c.capacity(), 16);
        assert_eq!(c.to_string(), "{1,2,3,4,5,3,4,5,1,2}");
    }

    #[test]
    fn test_copy_is_deep() {
        let original = Container::from([1, 2, 3]);
        let mut copy = original.clone();
        assert_eq!(copy, original);
        assert_eq!(copy.capacity(), 3);

        copy.push_back(4);
        copy[0] = 0;
        assert_eq!(original.to_string(), "{1,2,3}");

        let mut target = Container::from([9; 20]);
        target.clone_from(&original);
        assert_eq!(target, original);
    }

    #[test]
    fn test_move_leaves_source_empty() {
        let mut source = Container::from([1, 2, 3]);
        let moved = mem::take(&mut source);
        assert_eq!(source.len(), 0);
        assert_eq!(source.capacity(), 0);
        assert_eq!(moved.to_string(), "{1,2,3}");

        let mut other = Container::from([7]);
        source.swap(&mut other);
        assert_eq!(source.to_string(), "{7}");
        assert!(other.is_empty());
    }

    #[test]
    fn test_elements_are_dropped() {
        let tracker = Rc::new(());
        {
            let mut container = Container::new();
            for _ in 0..10 {
                container.push_back(Rc::clone(&tracker));
            }
            container.erase(3).unwrap();
            let _popped = container.pop_back().unwrap();
            let mut iter = container.into_iter();
            let _first = iter.next();
            assert_eq!(Rc::strong_count(&tracker), 10);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn test_into_iter_both_ends() {
        let mut iter = Container::from(vec![1, 2, 3, 4]).into_iter();
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.collect::<Vec<_>>(), vec![2, 3]);
    }

    proptest! {
        #[test]
        fn prop_push_then_find(values in prop::collection::vec(any::<i32>(), 0..100), extra: i32) {
            let mut container: Container<i32> = values.iter().copied().collect();
            prop_assert!(container.capacity() >= container.len());

            container.push_back(extra);
            let found = container.find(&extra);
            prop_assert!(found < container.end());
            prop_assert_eq!(container[found], extra);
            prop_assert_eq!(&container.as_slice()[..values.len()], values.as_slice());
        }

        #[test]
        fn prop_growth_is_geometric(count in 0..200usize) {
            let mut container = Container::new();
            let mut reallocations = 0;
            for value in 0..count {
                let before = container.capacity();
                container.push_back(value);
                if container.capacity() != before {
                    reallocations += 1;
                    prop_assert!(container.capacity() == MIN_CAPACITY || container.capacity() == before * 2);
                }
            }
            let expected = if count == 0 {
                0
            } else {
                (count.div_ceil(MIN_CAPACITY)).next_power_of_two().trailing_zeros() as usize + 1
            };
            prop_assert_eq!(reallocations, expected);
        }
    }
}
