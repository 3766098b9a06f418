//! Doubly-linked list with bidirectional cursors.
//!
//! Every node is a separate heap allocation owned by the list as a whole.
//! Links in both directions are raw pointers, and a node is only turned back
//! into a `Box` at the moment it is unlinked, so no link ever aliases a
//! unique owner. The list keeps both ends, so every splice at a known
//! position is O(1).
//!
//! Positions are expressed with cursors. A cursor is either on an element or
//! on the end sentinel (one past the last element), and reading or advancing
//! from the sentinel is reported as [`ContainerError::PastTheEnd`] instead of
//! touching a missing node.
//!
//! The unsafe internals are exercised under `cargo +nightly miri test`.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use itertools::Itertools;

use crate::error::{ContainerError, Result};

type Link<T> = Option<NonNull<Node<T>>>;

struct Node<T> {
    data: T,
    prev: Link<T>,
    next: Link<T>,
}

impl<T> Node<T> {
    fn alloc(data: T, prev: Link<T>, next: Link<T>) -> NonNull<Node<T>> {
        NonNull::from(Box::leak(Box::new(Node { data, prev, next })))
    }

    /// SAFETY: `node` must be a live node of a list borrowed by the caller.
    unsafe fn next(node: NonNull<Node<T>>) -> Link<T> {
        (*node.as_ptr()).next
    }

    /// SAFETY: as for [`Node::next`].
    unsafe fn prev(node: NonNull<Node<T>>) -> Link<T> {
        (*node.as_ptr()).prev
    }
}

// =============================================================================
// Milestone 1: The owning list
// =============================================================================

pub struct DList<T> {
    head: Link<T>,
    tail: Link<T>,
    count: usize,
    _owns: PhantomData<Box<Node<T>>>,
}

// SAFETY: the list uniquely owns every node reachable from `head`.
unsafe impl<T: Send> Send for DList<T> {}
unsafe impl<T: Sync> Sync for DList<T> {}

impl<T> DList<T> {
    pub const fn new() -> Self {
        DList {
            head: None,
            tail: None,
            count: 0,
            _owns: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Releases every node iteratively.
    pub fn clear(&mut self) {
        let mut link = self.head.take();
        self.tail = None;
        self.count = 0;
        while let Some(node) = link {
            // SAFETY: each node came from `Node::alloc` and is visited once.
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            link = node.next;
        }
    }

    pub fn swap(&mut self, other: &mut DList<T>) {
        mem::swap(self, other);
    }

    pub fn front(&self) -> Result<&T> {
        match self.head {
            // SAFETY: `head` is owned by `self`, which is borrowed.
            Some(head) => Ok(unsafe { &(*head.as_ptr()).data }),
            None => Err(ContainerError::Empty),
        }
    }

    pub fn front_mut(&mut self) -> Result<&mut T> {
        match self.head {
            // SAFETY: as in `front`, with `self` borrowed mutably.
            Some(head) => Ok(unsafe { &mut (*head.as_ptr()).data }),
            None => Err(ContainerError::Empty),
        }
    }

    pub fn back(&self) -> Result<&T> {
        match self.tail {
            // SAFETY: `tail` is owned by `self`, which is borrowed.
            Some(tail) => Ok(unsafe { &(*tail.as_ptr()).data }),
            None => Err(ContainerError::Empty),
        }
    }

    pub fn back_mut(&mut self) -> Result<&mut T> {
        match self.tail {
            // SAFETY: as in `back`, with `self` borrowed mutably.
            Some(tail) => Ok(unsafe { &mut (*tail.as_ptr()).data }),
            None => Err(ContainerError::Empty),
        }
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|data| data == value)
    }

    // =========================================================================
    // Milestone 2: Splicing primitives
    // =========================================================================

    /// Links a new node immediately before `pos` (`None` means the end
    /// sentinel) and returns it.
    ///
    /// SAFETY: `pos` must be `None` or a live node of `self`.
    unsafe fn link_before(&mut self, pos: Link<T>, data: T) -> NonNull<Node<T>> {
        let prev = match pos {
            Some(next) => Node::prev(next),
            None => self.tail,
        };
        let node = Node::alloc(data, prev, pos);

        match prev {
            Some(prev) => (*prev.as_ptr()).next = Some(node),
            None => self.head = Some(node),
        }
        match pos {
            Some(next) => (*next.as_ptr()).prev = Some(node),
            None => self.tail = Some(node),
        }
        self.count += 1;

        log::trace!("linked node, list length {}", self.count);
        node
    }

    /// Unlinks and frees `node`, returning its value and the node that
    /// followed it.
    ///
    /// SAFETY: `node` must be a live node of `self`.
    unsafe fn unlink(&mut self, node: NonNull<Node<T>>) -> (T, Link<T>) {
        let Node { data, prev, next } = *Box::from_raw(node.as_ptr());

        match prev {
            Some(prev) => (*prev.as_ptr()).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => (*next.as_ptr()).prev = prev,
            None => self.tail = prev,
        }
        self.count -= 1;

        log::trace!("unlinked node, list length {}", self.count);
        (data, next)
    }

    fn node_at(&self, index: usize) -> Link<T> {
        let mut current = self.head;
        for _ in 0..index {
            // SAFETY: every visited node belongs to `self`.
            current = current.and_then(|node| unsafe { Node::next(node) });
        }
        current
    }

    // =========================================================================
    // Milestone 3: End operations
    // =========================================================================

    pub fn push_front(&mut self, value: T) {
        // SAFETY: `head` is `None` or the live first node.
        unsafe {
            self.link_before(self.head, value);
        }
    }

    pub fn push_back(&mut self, value: T) {
        // SAFETY: the end sentinel is always a valid position.
        unsafe {
            self.link_before(None, value);
        }
    }

    pub fn pop_front(&mut self) -> Result<T> {
        let head = self.head.ok_or(ContainerError::Empty)?;
        // SAFETY: `head` is the live first node.
        Ok(unsafe { self.unlink(head).0 })
    }

    pub fn pop_back(&mut self) -> Result<T> {
        let tail = self.tail.ok_or(ContainerError::Empty)?;
        // SAFETY: `tail` is the live last node.
        Ok(unsafe { self.unlink(tail).0 })
    }

    // =========================================================================
    // Milestone 4: Cursors
    // =========================================================================

    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor {
            current: self.head,
            index: 0,
            list: self,
        }
    }

    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor {
            current: None,
            index: self.count,
            list: self,
        }
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut {
            current: self.head,
            index: 0,
            list: self,
        }
    }

    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut {
            current: None,
            index: self.count,
            list: self,
        }
    }

    /// A mutable cursor on element `index`, or on the end sentinel when
    /// `index == len()`.
    pub fn cursor_at_mut(&mut self, index: usize) -> Result<CursorMut<'_, T>> {
        if index > self.count {
            return Err(ContainerError::out_of_range(index, self.count));
        }
        let current = self.node_at(index);
        Ok(CursorMut {
            current,
            index,
            list: self,
        })
    }

    /// Inserts `value` so that it ends up at position `index`.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<()> {
        self.cursor_at_mut(index)?.insert(value);
        Ok(())
    }

    pub fn erase_at(&mut self, index: usize) -> Result<T> {
        if index >= self.count {
            return Err(ContainerError::out_of_range(index, self.count));
        }
        self.cursor_at_mut(index)?.erase()
    }

    // =========================================================================
    // Milestone 5: Iteration
    // =========================================================================

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            front: self.head,
            back: self.tail,
            remaining: self.count,
            _marker: PhantomData,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            front: self.head,
            back: self.tail,
            remaining: self.count,
            _marker: PhantomData,
        }
    }
}

// =============================================================================
// Cursor types
// =============================================================================

/// Read-only position in a [`DList`].
pub struct Cursor<'a, T> {
    current: Link<T>,
    index: usize,
    list: &'a DList<T>,
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("index", &self.index()).finish()
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.list, other.list) && self.current == other.current
    }
}

impl<'a, T> Cursor<'a, T> {
    pub fn current(&self) -> Result<&'a T> {
        match self.current {
            // SAFETY: the node is owned by `list`, borrowed for `'a`.
            Some(node) => Ok(unsafe { &(*node.as_ptr()).data }),
            None => Err(ContainerError::PastTheEnd),
        }
    }

    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Index of the current element; `None` on the end sentinel.
    pub fn index(&self) -> Option<usize> {
        self.current.map(|_| self.index)
    }

    pub fn move_next(&mut self) -> Result<()> {
        let node = self.current.ok_or(ContainerError::PastTheEnd)?;
        // SAFETY: `node` is owned by `list`.
        self.current = unsafe { Node::next(node) };
        self.index += 1;
        Ok(())
    }

    /// Steps back one element. From the end sentinel this lands on the last
    /// element.
    pub fn move_prev(&mut self) -> Result<()> {
        let prev = match self.current {
            // SAFETY: `node` is owned by `list`.
            Some(node) => unsafe { Node::prev(node) },
            None => self.list.tail,
        };
        self.current = Some(prev.ok_or(ContainerError::BeforeBegin)?);
        self.index -= 1;
        Ok(())
    }
}

/// Position in a [`DList`] that can insert and erase.
pub struct CursorMut<'a, T> {
    current: Link<T>,
    index: usize,
    list: &'a mut DList<T>,
}

impl<'a, T> CursorMut<'a, T> {
    pub fn current(&self) -> Result<&T> {
        match self.current {
            // SAFETY: the node is owned by `list`.
            Some(node) => Ok(unsafe { &(*node.as_ptr()).data }),
            None => Err(ContainerError::PastTheEnd),
        }
    }

    pub fn current_mut(&mut self) -> Result<&mut T> {
        match self.current {
            // SAFETY: the node is owned by `list`, which we borrow mutably.
            Some(node) => Ok(unsafe { &mut (*node.as_ptr()).data }),
            None => Err(ContainerError::PastTheEnd),
        }
    }

    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    pub fn index(&self) -> Option<usize> {
        self.current.map(|_| self.index)
    }

    pub fn move_next(&mut self) -> Result<()> {
        let node = self.current.ok_or(ContainerError::PastTheEnd)?;
        // SAFETY: `node` is owned by `list`.
        self.current = unsafe { Node::next(node) };
        self.index += 1;
        Ok(())
    }

    pub fn move_prev(&mut self) -> Result<()> {
        let prev = match self.current {
            // SAFETY: `node` is owned by `list`.
            Some(node) => unsafe { Node::prev(node) },
            None => self.list.tail,
        };
        self.current = Some(prev.ok_or(ContainerError::BeforeBegin)?);
        self.index -= 1;
        Ok(())
    }

    /// Inserts `value` immediately before the cursor and moves the cursor
    /// onto the new element.
    pub fn insert(&mut self, value: T) {
        // SAFETY: `current` is `None` or a live node of `list`.
        let node = unsafe { self.list.link_before(self.current, value) };
        self.current = Some(node);
    }

    /// Removes the current element and moves the cursor onto the element
    /// that followed it, or onto the end sentinel.
    pub fn erase(&mut self) -> Result<T> {
        let node = self.current.ok_or(ContainerError::PastTheEnd)?;
        // SAFETY: `node` is a live node of `list`.
        let (data, following) = unsafe { self.list.unlink(node) };
        self.current = following;
        Ok(data)
    }

    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor {
            current: self.current,
            index: self.index,
            list: &*self.list,
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

pub struct Iter<'a, T> {
    front: Link<T>,
    back: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.front.map(|node| {
            self.remaining -= 1;
            // SAFETY: `remaining` keeps us inside the borrowed list.
            unsafe {
                self.front = Node::next(node);
                &(*node.as_ptr()).data
            }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back.map(|node| {
            self.remaining -= 1;
            // SAFETY: as in `next`.
            unsafe {
                self.back = Node::prev(node);
                &(*node.as_ptr()).data
            }
        })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

pub struct IterMut<'a, T> {
    front: Link<T>,
    back: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.front.map(|node| {
            self.remaining -= 1;
            // SAFETY: each node is yielded once and only its `data` field is
            // borrowed, so reading the links stays sound.
            unsafe {
                self.front = Node::next(node);
                &mut (*node.as_ptr()).data
            }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back.map(|node| {
            self.remaining -= 1;
            // SAFETY: as in `next`.
            unsafe {
                self.back = Node::prev(node);
                &mut (*node.as_ptr()).data
            }
        })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

pub struct IntoIter<T> {
    list: DList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for DList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a DList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// =============================================================================
// Value semantics
// =============================================================================

impl<T> Drop for DList<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for DList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend(source.iter().cloned());
    }
}

impl<T> Extend<T> for DList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for DList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = DList::new();
        list.extend(iter);
        list
    }
}

impl<T, const N: usize> From<[T; N]> for DList<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: PartialEq> PartialEq for DList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DList<T> {}

impl<T: fmt::Display> fmt::Display for DList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().join(","))
    }
}

impl<T: fmt::Debug> fmt::Debug for DList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
