//! A bare singly-linked list driven by free functions.
//!
//! There is no container type with methods here: a list is just its pair of
//! ends, `first` and `last`, and every operation takes that pair by
//! reference. Nodes are heap allocations owned by the list as a whole and
//! reached through raw links, so `last` never aliases a `Box`.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use itertools::Itertools;

use crate::error::{ContainerError, Result};

// =============================================================================
// Milestone 1: Nodes and list boundaries
// =============================================================================

type Link<T> = Option<NonNull<Node<T>>>;

pub struct Node<T> {
    pub info: T,
    link: Link<T>,
}

impl<T> Node<T> {
    fn alloc(info: T, link: Link<T>) -> NonNull<Node<T>> {
        NonNull::from(Box::leak(Box::new(Node { info, link })))
    }

    pub fn link(&self) -> Option<&Node<T>> {
        // SAFETY: a node is only reachable through a borrowed list, which
        // owns its successor for at least as long.
        self.link.map(|next| unsafe { &*next.as_ptr() })
    }
}

/// The `(first, last)` pair describing one list.
///
/// `first` is `None` iff the list is empty. When it is not, `last` points at
/// the only node whose link is `None`.
pub struct SimpleList<T> {
    first: Link<T>,
    last: Link<T>,
    _owns: PhantomData<Box<Node<T>>>,
}

// SAFETY: the list uniquely owns every node reachable from `first`.
unsafe impl<T: Send> Send for SimpleList<T> {}
unsafe impl<T: Sync> Sync for SimpleList<T> {}

impl<T> SimpleList<T> {
    pub const fn new() -> Self {
        SimpleList {
            first: None,
            last: None,
            _owns: PhantomData,
        }
    }

    pub fn first(&self) -> Option<&Node<T>> {
        // SAFETY: `first` is owned by `self`, which is borrowed.
        self.first.map(|node| unsafe { &*node.as_ptr() })
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { next: self.first() }
    }
}

impl<T> Default for SimpleList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for SimpleList<T> {
    fn drop(&mut self) {
        list_destroy(self);
    }
}

// =============================================================================
// Milestone 2: Inspection
// =============================================================================

/// Releases every node and leaves the list empty.
pub fn list_init<T>(list: &mut SimpleList<T>) {
    list_destroy(list);
}

pub fn list_is_empty<T>(list: &SimpleList<T>) -> bool {
    list.first.is_none()
}

pub fn list_size<T>(list: &SimpleList<T>) -> usize {
    list.iter().count()
}

/// Prints the list as `{1,2,3}` followed by a newline.
pub fn list_print<T: fmt::Display>(list: &SimpleList<T>) {
    println!("{list}");
}

/// Releases every node one at a time so long lists never recurse in `Drop`.
pub fn list_destroy<T>(list: &mut SimpleList<T>) {
    let mut link = list.first.take();
    list.last = None;
    while let Some(node) = link {
        // SAFETY: each node came from `Node::alloc` and is visited once.
        let node = unsafe { Box::from_raw(node.as_ptr()) };
        link = node.link;
    }
}

pub fn list_front<T>(list: &SimpleList<T>) -> Result<&T> {
    list.first()
        .map(|node| &node.info)
        .ok_or(ContainerError::Empty)
}

pub fn list_back<T>(list: &SimpleList<T>) -> Result<&T> {
    match list.last {
        // SAFETY: `last` is owned by `list`, which stays borrowed for as long
        // as the returned reference lives.
        Some(last) => Ok(unsafe { &(*last.as_ptr()).info }),
        None => Err(ContainerError::Empty),
    }
}

pub fn list_search<T: PartialEq>(list: &SimpleList<T>, item: &T) -> bool {
    list.iter().any(|info| info == item)
}

// =============================================================================
// Milestone 3: Insertion and deletion at both ends
// =============================================================================

pub fn list_insert_first<T>(list: &mut SimpleList<T>, item: T) {
    let node = Node::alloc(item, list.first);
    list.first = Some(node);

    if list.last.is_none() {
        list.last = Some(node);
    }
}

pub fn list_insert_last<T>(list: &mut SimpleList<T>, item: T) {
    let node = Node::alloc(item, None);

    match list.last {
        // SAFETY: `last` is a live node of `list`, borrowed mutably.
        Some(last) => unsafe { (*last.as_ptr()).link = Some(node) },
        None => list.first = Some(node),
    }
    list.last = Some(node);
}

pub fn list_delete_first<T>(list: &mut SimpleList<T>) -> Result<T> {
    let first = list.first.ok_or(ContainerError::Empty)?;
    // SAFETY: `first` came from `Node::alloc` and is unlinked right here.
    let Node { info, link } = *unsafe { Box::from_raw(first.as_ptr()) };

    list.first = link;
    if list.first.is_none() {
        list.last = None;
    }
    Ok(info)
}

/// Walks from `first` to the node before `last`, since nodes carry no
/// back-reference.
pub fn list_delete_last<T>(list: &mut SimpleList<T>) -> Result<T> {
    let last = list.last.ok_or(ContainerError::Empty)?;

    let mut before = None;
    let mut current = list.first;
    // SAFETY: every node visited is owned by `list`, borrowed mutably, and
    // `last` is unlinked before it is freed.
    unsafe {
        while let Some(node) = current {
            if node == last {
                break;
            }
            before = Some(node);
            current = (*node.as_ptr()).link;
        }

        match before {
            Some(node) => (*node.as_ptr()).link = None,
            None => list.first = None,
        }
        list.last = before;

        let Node { info, .. } = *Box::from_raw(last.as_ptr());
        Ok(info)
    }
}

// =============================================================================
// Milestone 4: Copy and merge
// =============================================================================

/// Replaces `dest` with a node-by-node copy of `src`, preserving order.
pub fn list_copy<T: Clone>(src: &SimpleList<T>, dest: &mut SimpleList<T>) {
    list_destroy(dest);
    for info in src.iter() {
        list_insert_last(dest, info.clone());
    }
}

/// Merges two ascending lists into a new ascending list of unique values.
///
/// A value is appended only when it differs from the value appended just
/// before it. For ascending inputs that makes every value unique, no matter
/// where duplicates sit in either input.
pub fn merge_lists<T: Ord + Clone>(a: &SimpleList<T>, b: &SimpleList<T>) -> SimpleList<T> {
    let mut merged = SimpleList::new();
    for info in a.iter().merge(b.iter()).dedup() {
        list_insert_last(&mut merged, info.clone());
    }
    log::trace!("merged {} + {} nodes into {}", list_size(a), list_size(b), list_size(&merged));
    merged
}

// =============================================================================
// Milestone 5: Iteration and trait integration
// =============================================================================

pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.link();
            &node.info
        })
    }
}

impl<'a, T> IntoIterator for &'a SimpleList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Extend<T> for SimpleList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            list_insert_last(self, item);
        }
    }
}

impl<T> FromIterator<T> for SimpleList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SimpleList::new();
        list.extend(iter);
        list
    }
}

impl<T: Clone> Clone for SimpleList<T> {
    fn clone(&self) -> Self {
        let mut copy = SimpleList::new();
        list_copy(self, &mut copy);
        copy
    }
}

impl<T: PartialEq> PartialEq for SimpleList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SimpleList<T> {}

impl<T: fmt::Display> fmt::Display for SimpleList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().join(","))
    }
}

impl<T: fmt::Debug> fmt::Debug for SimpleList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
