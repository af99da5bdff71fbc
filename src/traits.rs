//! Common traits for addressable heaps
//!
//! - [`Priority`]: the key domain, including the two reserved bounds
//! - [`Handle`]: marker for the opaque references returned by `insert`
//! - [`AddressableHeap`]: insert, find-min, extract-min, decrease-key, delete
//!   and merge, the surface a shortest-path loop needs
//!
//! Heaps store (priority, item) pairs so the ordering key is kept apart from
//! the payload, which is carried along but never compared.

use crate::error::HeapError;

/// A totally ordered key with a reserved floor and a conventional ceiling.
///
/// - `FLOOR` must be strictly less than every other value. Heaps use it as
///   the sentinel that forces an element to the top during `delete`, so it is
///   rejected as a real key.
/// - `CEILING` is an ordinary legal key. Shortest-path code uses it as the
///   "not reached yet" distance.
///
/// Implemented for the signed integers. Unsigned integers are left out on
/// purpose: their minimum is `0`, which is the distance of every source
/// vertex.
pub trait Priority: Ord + Sized {
    /// The deletion sentinel, strictly below every legal key
    const FLOOR: Self;
    /// The largest key, used as an infinite distance
    const CEILING: Self;
}

macro_rules! impl_signed_priority {
    ($($t:ty),* $(,)?) => {
        $(
            impl Priority for $t {
                const FLOOR: Self = <$t>::MIN;
                const CEILING: Self = <$t>::MAX;
            }
        )*
    };
}

impl_signed_priority!(i8, i16, i32, i64, i128, isize);

/// A handle to an element in the heap, used for `decrease_key` and `delete`
///
/// This is an opaque type that identifies a specific element in the heap.
/// Handles stay cheap to copy; a heap detects a handle whose element is gone
/// and reports [`HeapError::StaleHandle`] instead of touching other elements.
pub trait Handle: Copy + Eq {}

/// Heap with handle-based `decrease_key` and `delete`
///
/// # Example
///
/// ```rust
/// use fib_sssp::{AddressableHeap, FibonacciHeap, HeapError};
///
/// let mut heap = FibonacciHeap::new();
/// let a = heap.insert(10, "a").unwrap();
/// heap.insert(20, "b").unwrap();
///
/// heap.decrease_key(&a, 5).unwrap();
/// assert_eq!(heap.find_min(), Ok((&5, &"a")));
/// assert_eq!(heap.decrease_key(&a, 7), Err(HeapError::InvalidDecrease));
///
/// assert_eq!(heap.extract_min(), Ok((5, "a")));
/// assert_eq!(heap.decrease_key(&a, 1), Err(HeapError::StaleHandle));
/// ```
pub trait AddressableHeap<T, P: Priority> {
    /// The handle type returned by `insert`
    type Handle: Handle;

    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority, returning its handle
    ///
    /// # Errors
    /// Returns `HeapError::ReservedKey` if `priority` is `P::FLOOR`.
    fn insert(&mut self, priority: P, item: T) -> Result<Self::Handle, HeapError>;

    /// Returns the minimum priority and associated item without removing it
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if there are no elements.
    fn find_min(&self) -> Result<(&P, &T), HeapError>;

    /// Removes and returns the minimum priority and associated item
    ///
    /// The handle of the removed element becomes stale.
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if there are no elements.
    fn extract_min(&mut self) -> Result<(P, T), HeapError>;

    /// Lowers the priority of the element identified by `handle`
    ///
    /// An equal priority is accepted and leaves the heap order unchanged.
    ///
    /// # Errors
    /// - `HeapError::StaleHandle` if the element is no longer in the heap
    /// - `HeapError::ReservedKey` if `new_priority` is `P::FLOOR`
    /// - `HeapError::InvalidDecrease` if `new_priority` is greater than the
    ///   current priority
    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError>;

    /// Removes the element identified by `handle`, returning its priority and item
    ///
    /// # Errors
    /// Returns `HeapError::StaleHandle` if the element is no longer in the heap.
    fn delete(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);

    /// Like [`find_min`](AddressableHeap::find_min), with emptiness as `None`
    fn peek(&self) -> Option<(&P, &T)> {
        self.find_min().ok()
    }

    /// Like [`extract_min`](AddressableHeap::extract_min), with emptiness as `None`
    fn pop(&mut self) -> Option<(P, T)> {
        self.extract_min().ok()
    }
}
