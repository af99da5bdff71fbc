//! Circular doubly-linked rings addressed by arena keys.
//!
//! The links of a ring live inside whatever storage owns the elements (a slot
//! map, a `Vec`, ...). Elements refer to each other by key rather than by
//! pointer, so a ring never owns its members and a stale key can be detected
//! by the storage instead of being dereferenced.
//!
//! # Circular vs Linear Lists
//!
//! In a circular ring:
//! - A single element is its own `next` and `prev`
//! - There is no head or tail, any member can be the entry point
//! - Splicing two rings together is O(1)
//! - Iteration wraps around, so it stops when it returns to the start
//!
//! This is the shape Fibonacci heaps need: the root list and every child list
//! are rings, and both are joined by splicing.
//!
//! # Example
//!
//! ```rust
//! use index_ring::{Link, RingOps, RingStorage};
//!
//! struct Slots(Vec<Link<usize>>);
//!
//! impl RingStorage<usize> for Slots {
//!     fn link(&self, at: usize) -> &Link<usize> {
//!         &self.0[at]
//!     }
//!
//!     fn link_mut(&mut self, at: usize) -> &mut Link<usize> {
//!         &mut self.0[at]
//!     }
//! }
//!
//! let mut slots = Slots((0..3).map(Link::singleton).collect());
//! let ops = RingOps;
//!
//! let ring = ops.splice(&mut slots, Some(0), Some(1));
//! let ring = ops.splice(&mut slots, ring, Some(2));
//! assert_eq!(ring, Some(0));
//! assert_eq!(ops.count(&slots, 0), 3);
//!
//! // Detaching leaves the element as a singleton and returns a survivor
//! assert_eq!(ops.detach(&mut slots, 1), Some(2));
//! assert!(ops.is_singleton(&slots, 1));
//! assert_eq!(ops.iter(&slots, 0).collect::<Vec<_>>(), vec![0, 2]);
//! ```

#![no_std]

use core::fmt;

// =============================================================================
// Link
// =============================================================================

/// The pair of sibling keys stored alongside each ring element.
///
/// A link always belongs to exactly one ring. A fresh link is a singleton
/// ring whose `next` and `prev` are its own key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link<K> {
    next: K,
    prev: K,
}

impl<K: Copy> Link<K> {
    /// Creates the link of a one-element ring containing `at`.
    #[inline]
    pub const fn singleton(at: K) -> Self {
        Link { next: at, prev: at }
    }

    /// The key of the following element.
    #[inline]
    pub fn next(&self) -> K {
        self.next
    }

    /// The key of the preceding element.
    #[inline]
    pub fn prev(&self) -> K {
        self.prev
    }
}

impl<K: fmt::Debug> fmt::Debug for Link<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}

// =============================================================================
// RingStorage
// =============================================================================

/// Storage that owns ring elements and exposes their links by key.
///
/// Implementations may panic when handed a key that is not live; ring
/// operations only ever follow keys that the storage itself handed out.
pub trait RingStorage<K: Copy + Eq> {
    /// Returns the link of the element at `at`.
    fn link(&self, at: K) -> &Link<K>;

    /// Returns the link of the element at `at` mutably.
    fn link_mut(&mut self, at: K) -> &mut Link<K>;
}

// =============================================================================
// RingOps
// =============================================================================

/// Operations for manipulating rings held in a [`RingStorage`].
///
/// Every operation is O(1) except [`count`](RingOps::count) and iteration.
#[derive(Clone, Copy, Default, Debug)]
pub struct RingOps;

impl RingOps {
    /// Checks whether `at` is alone in its ring.
    #[inline]
    pub fn is_singleton<K, S>(&self, storage: &S, at: K) -> bool
    where
        K: Copy + Eq,
        S: RingStorage<K> + ?Sized,
    {
        storage.link(at).next == at
    }

    /// Splices two rings together.
    ///
    /// Each ring is named by any one of its members, or `None` for an empty
    /// ring. Returns an entry point into the joined ring: `a` when both are
    /// present, otherwise whichever is present. Neither ring is traversed.
    ///
    /// `a` and `b` must not already be members of the same ring.
    #[inline]
    pub fn splice<K, S>(&self, storage: &mut S, a: Option<K>, b: Option<K>) -> Option<K>
    where
        K: Copy + Eq,
        S: RingStorage<K> + ?Sized,
    {
        match (a, b) {
            (None, None) => None,
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (Some(a), Some(b)) => {
                // Before:
                //   Ring A: ... <-> a_prev <-> a <-> ...
                //   Ring B: ... <-> b_prev <-> b <-> ...
                //
                // After:
                //   ... <-> a_prev <-> b <-> ... <-> b_prev <-> a <-> ...
                let a_prev = storage.link(a).prev;
                let b_prev = storage.link(b).prev;

                storage.link_mut(a_prev).next = b;
                storage.link_mut(b).prev = a_prev;

                storage.link_mut(b_prev).next = a;
                storage.link_mut(a).prev = b_prev;

                Some(a)
            }
        }
    }

    /// Removes `at` from its ring, leaving it as a singleton.
    ///
    /// Returns a surviving member of the old ring, or `None` if `at` was its
    /// only member.
    #[inline]
    pub fn detach<K, S>(&self, storage: &mut S, at: K) -> Option<K>
    where
        K: Copy + Eq,
        S: RingStorage<K> + ?Sized,
    {
        let Link { next, prev } = *storage.link(at);
        if next == at {
            return None;
        }

        storage.link_mut(prev).next = next;
        storage.link_mut(next).prev = prev;
        *storage.link_mut(at) = Link::singleton(at);

        Some(next)
    }

    /// Counts the members of the ring containing `start`.
    ///
    /// This is O(n) - use sparingly.
    pub fn count<K, S>(&self, storage: &S, start: K) -> usize
    where
        K: Copy + Eq,
        S: RingStorage<K> + ?Sized,
    {
        self.iter(storage, start).count()
    }

    /// Iterates over the ring starting at `start`, following `next` links.
    ///
    /// The storage is borrowed for the whole iteration; collect the keys
    /// first when the ring is about to be restructured.
    #[inline]
    pub fn iter<'a, K, S>(&self, storage: &'a S, start: K) -> Iter<'a, K, S>
    where
        K: Copy + Eq,
        S: RingStorage<K> + ?Sized,
    {
        Iter {
            storage,
            start,
            next: Some(start),
        }
    }
}

/// Iterator over the keys of one ring. See [`RingOps::iter`].
pub struct Iter<'a, K, S: ?Sized> {
    storage: &'a S,
    start: K,
    next: Option<K>,
}

impl<'a, K, S> Iterator for Iter<'a, K, S>
where
    K: Copy + Eq,
    S: RingStorage<K> + ?Sized,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.next?;
        let following = self.storage.link(current).next;
        self.next = (following != self.start).then_some(following);
        Some(current)
    }
}

// =============================================================================
// Tests
// =============================================================================
