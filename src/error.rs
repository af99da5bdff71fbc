//! Error type for heap operations

use thiserror::Error;

/// Error type for heap operations
///
/// Every failing operation reports its error before touching the heap, so a
/// heap that returned an error is exactly as it was before the call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapError {
    /// `find_min` or `extract_min` on a heap with no elements
    #[error("heap is empty")]
    EmptyHeap,
    /// The new priority is greater than the current priority
    #[error("new priority is greater than the current priority")]
    InvalidDecrease,
    /// The handle is no longer valid (element was removed, or never belonged to this heap)
    #[error("handle is no longer valid (element was removed)")]
    StaleHandle,
    /// The priority is the reserved floor value used internally by `delete`
    #[error("priority is reserved as the deletion sentinel")]
    ReservedKey,
}
