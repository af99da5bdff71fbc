//! Single-source shortest paths over an addressable heap
//!
//! The classic Dijkstra loop: every vertex goes into the heap up front, the
//! source at distance zero and everything else at [`Priority::CEILING`].
//! Extracting a vertex fixes its distance; relaxing an edge lowers the
//! neighbour's key in place with `decrease_key`, which is where a Fibonacci
//! heap earns its O(1) amortized bound.
//!
//! # Example
//!
//! ```rust
//! use fib_sssp::shortest_path::{shortest_distances, Graph};
//!
//! let mut graph = Graph::new(4);
//! graph.add_edge(0, 1, 4).unwrap();
//! graph.add_edge(0, 2, 1).unwrap();
//! graph.add_edge(2, 1, 2).unwrap();
//! graph.add_edge(1, 3, 1).unwrap();
//! graph.add_edge(2, 3, 5).unwrap();
//!
//! let distances = shortest_distances(&graph, 0).unwrap();
//! assert_eq!(distances, vec![Some(0), Some(3), Some(1), Some(4)]);
//! ```

use crate::error::HeapError;
use crate::fibonacci::FibonacciHeap;
use crate::traits::{AddressableHeap, Priority};
use log::{debug, trace};
use thiserror::Error;

/// Edge weight and path length type.
///
/// Requires a zero (`Default`), overflow-checked addition, and the
/// [`Priority`] bounds so distances can be heap keys.
pub trait Distance: Priority + Copy + Default {
    /// Adds two distances, returning `None` on overflow
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_distance {
    ($($t:ty),* $(,)?) => {
        $(
            impl Distance for $t {
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }
            }
        )*
    };
}

impl_distance!(i8, i16, i32, i64, i128, isize);

/// Errors from building a graph or running a search over it
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A vertex index is not below the vertex count
    #[error("vertex {vertex} is out of range for a graph with {count} vertices")]
    VertexOutOfRange { vertex: usize, count: usize },
    /// The adjacency table for this many vertices cannot be allocated
    #[error("cannot allocate a graph with {count} vertices")]
    TooManyVertices { count: usize },
    /// Edge weights must be non-negative for Dijkstra's algorithm
    #[error("edge {from} -> {to} has a negative weight")]
    NegativeWeight { from: usize, to: usize },
    /// The heap rejected an operation
    #[error(transparent)]
    Heap(#[from] HeapError),
}

/// Directed graph stored as adjacency lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph<W> {
    adjacency: Vec<Vec<(usize, W)>>,
    edges: usize,
}

impl<W: Distance> Graph<W> {
    /// Creates a graph with `vertex_count` vertices and no edges
    ///
    /// # Panics
    /// Panics if the adjacency table cannot be allocated. Use
    /// [`Graph::try_new`] when the count comes from untrusted input.
    pub fn new(vertex_count: usize) -> Self {
        Graph {
            adjacency: vec![Vec::new(); vertex_count],
            edges: 0,
        }
    }

    /// Like [`Graph::new`], reporting an allocation failure as
    /// [`GraphError::TooManyVertices`] instead of aborting
    pub fn try_new(vertex_count: usize) -> Result<Self, GraphError> {
        let mut adjacency = Vec::new();
        adjacency
            .try_reserve_exact(vertex_count)
            .map_err(|_| GraphError::TooManyVertices {
                count: vertex_count,
            })?;
        adjacency.resize_with(vertex_count, Vec::new);
        Ok(Graph {
            adjacency,
            edges: 0,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Adds a directed edge `from -> to`
    ///
    /// Parallel edges are kept; the search simply uses the cheapest one.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: W) -> Result<(), GraphError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if weight < W::default() {
            return Err(GraphError::NegativeWeight { from, to });
        }

        self.adjacency[from].push((to, weight));
        self.edges += 1;
        Ok(())
    }

    /// Outgoing edges of `vertex` as `(target, weight)` pairs
    pub fn neighbors(&self, vertex: usize) -> &[(usize, W)] {
        self.adjacency
            .get(vertex)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), GraphError> {
        if vertex < self.vertex_count() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                count: self.vertex_count(),
            })
        }
    }
}

/// Computes the distance from `source` to every vertex using a [`FibonacciHeap`].
///
/// Returns `None` for vertices that cannot be reached. A path whose length
/// would overflow `W` is treated as unreachable, and so is a path whose length
/// is exactly `W::CEILING`.
pub fn shortest_distances<W: Distance>(
    graph: &Graph<W>,
    source: usize,
) -> Result<Vec<Option<W>>, GraphError> {
    shortest_distances_with::<W, FibonacciHeap<usize, W>>(graph, source)
}

/// Like [`shortest_distances`], with the heap implementation chosen by the caller.
pub fn shortest_distances_with<W, H>(
    graph: &Graph<W>,
    source: usize,
) -> Result<Vec<Option<W>>, GraphError>
where
    W: Distance,
    H: AddressableHeap<usize, W>,
{
    graph.check_vertex(source)?;

    let n = graph.vertex_count();
    let mut distances = vec![W::CEILING; n];
    distances[source] = W::default();

    let mut heap = H::new();
    let mut handles = Vec::with_capacity(n);
    for (vertex, &distance) in distances.iter().enumerate() {
        handles.push(Some(heap.insert(distance, vertex)?));
    }

    let mut settled = 0usize;
    while let Some((distance, vertex)) = heap.pop() {
        if distance == W::CEILING {
            debug!("{} vertices unreachable from {source}", heap.len() + 1);
            break;
        }
        handles[vertex] = None;
        settled += 1;

        for &(target, weight) in graph.neighbors(vertex) {
            let Some(candidate) = distance.checked_add(weight) else {
                continue;
            };
            if candidate >= distances[target] {
                continue;
            }
            if let Some(handle) = &handles[target] {
                heap.decrease_key(handle, candidate)?;
                distances[target] = candidate;
                trace!("relaxed {vertex} -> {target}");
            }
        }
    }

    debug!("settled {settled} of {n} vertices from {source}");
    Ok(distances
        .into_iter()
        .map(|d| (d != W::CEILING).then_some(d))
        .collect())
}
