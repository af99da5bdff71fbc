//! Arena-backed Fibonacci heap for shortest-path workloads
//!
//! This crate provides a mergeable, addressable min-heap whose `decrease_key`
//! runs in O(1) amortized time, plus a Dijkstra consumer built on it.
//!
//! # Features
//!
//! - **Fibonacci Heap**: O(1) insert and find_min; O(1) amortized
//!   decrease_key; O(log n) amortized extract_min and delete; merge splices
//!   root lists in O(1) and joins node storage by moving the smaller segment
//!   set into the larger, so each segment moves at most O(log s) times
//! - **Checked handles**: handles carry generational keys, so using one after
//!   its element left the heap is reported as [`HeapError::StaleHandle`]
//!   instead of touching another element
//! - **Shortest paths**: [`shortest_path::shortest_distances`] over a simple
//!   adjacency-list [`shortest_path::Graph`]
//!
//! # Example
//!
//! ```rust
//! use fib_sssp::{FibonacciHeap, HeapError};
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(5, "item1").unwrap();
//! heap.insert(3, "item2").unwrap();
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.find_min(), Ok((&1, &"item1")));
//!
//! assert_eq!(heap.extract_min(), Ok((1, "item1")));
//! assert_eq!(heap.delete(&handle1), Err(HeapError::StaleHandle));
//! ```

mod arena;
pub mod error;
pub mod fibonacci;
pub mod shortest_path;
pub mod traits;

pub use error::HeapError;
pub use fibonacci::{FibonacciHandle, FibonacciHeap};
pub use traits::{AddressableHeap, Handle, Priority};
