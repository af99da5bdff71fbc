//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) insert and find_min
//! - merge that never copies nodes; see [`FibonacciHeap::append`] for its cost
//! - O(1) amortized decrease_key
//! - O(log n) amortized extract_min and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are
//! linked in a circular doubly linked list, and so are the children of every
//! node. The heap maintains a reference to the minimum root.
//!
//! Nodes are owned by an [`Arena`] and linked by index, never by pointer.
//! Parent references are plain back-references with no ownership. Handles
//! carry the node's generational key, so a handle whose element has been
//! extracted or deleted is rejected with [`HeapError::StaleHandle`].
//!
//! # Ties
//!
//! When consolidation links two roots with equal priorities either may become
//! the parent, so the order in which equal priorities are extracted is
//! unspecified.

use crate::arena::{Arena, NodeRef};
use crate::error::HeapError;
use crate::traits::{AddressableHeap, Handle, Priority};
use index_ring::{Link, RingOps, RingStorage};
use log::{debug, trace};
use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Golden ratio; the largest degree in an n-node heap is at most log_φ(n).
const PHI: f64 = 1.618_033_988_749_895;

/// Handle to an element in a Fibonacci heap
///
/// Handles survive merges: after `a.merge(b)`, handles obtained from `b` are
/// valid for `a`. Once the element leaves the heap every operation taking the
/// handle fails with [`HeapError::StaleHandle`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle {
    node: NodeRef,
}

impl Handle for FibonacciHandle {}

struct Node<T, P> {
    priority: P,
    item: T,
    parent: Option<NodeRef>,
    child: Option<NodeRef>,
    link: Link<NodeRef>,
    degree: usize,
    marked: bool,
}

impl<T, P> RingStorage<NodeRef> for Arena<Node<T, P>> {
    fn link(&self, at: NodeRef) -> &Link<NodeRef> {
        &self[at].link
    }

    fn link_mut(&mut self, at: NodeRef) -> &mut Link<NodeRef> {
        &mut self[at].link
    }
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use fib_sssp::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item").unwrap();
/// heap.insert(3, "other").unwrap();
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Ok((&1, &"item")));
/// ```
pub struct FibonacciHeap<T, P: Priority> {
    arena: Arena<Node<T, P>>,
    min: Option<NodeRef>,
    len: usize,
}

impl<T, P: Priority> Default for FibonacciHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Priority + fmt::Debug> fmt::Debug for FibonacciHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("min", &self.find_min().ok().map(|(p, _)| p))
            .field("segments", &self.arena.segment_count())
            .finish()
    }
}

impl<T, P: Priority> FibonacciHeap<T, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        FibonacciHeap {
            arena: Arena::new(),
            min: None,
            len: 0,
        }
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Inserts `item` with the given priority as a new singleton root
    ///
    /// # Errors
    /// Returns `HeapError::ReservedKey` if `priority` is `P::FLOOR`.
    pub fn insert(&mut self, priority: P, item: T) -> Result<FibonacciHandle, HeapError> {
        if priority == P::FLOOR {
            return Err(HeapError::ReservedKey);
        }

        let node = self.arena.insert_with(|at| Node {
            priority,
            item,
            parent: None,
            child: None,
            link: Link::singleton(at),
            degree: 0,
            marked: false,
        });

        self.min = self.splice(self.min, Some(node));
        self.len += 1;
        Ok(FibonacciHandle { node })
    }

    /// Returns the minimum priority and its item without removing it
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if there are no elements.
    pub fn find_min(&self) -> Result<(&P, &T), HeapError> {
        let min = self.min.ok_or(HeapError::EmptyHeap)?;
        let node = &self.arena[min];
        Ok((&node.priority, &node.item))
    }

    /// Returns true if `handle` still refers to an element of this heap
    pub fn contains(&self, handle: &FibonacciHandle) -> bool {
        self.arena.contains(handle.node)
    }

    /// Returns the current priority and item behind `handle`
    pub fn get(&self, handle: &FibonacciHandle) -> Option<(&P, &T)> {
        self.arena
            .get(handle.node)
            .map(|node| (&node.priority, &node.item))
    }

    /// Removes and returns the minimum priority and its item
    ///
    /// The children of the minimum are promoted to roots, then the root list
    /// is consolidated so that no two roots share a degree.
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if there are no elements.
    pub fn extract_min(&mut self) -> Result<(P, T), HeapError> {
        let min = self.min.ok_or(HeapError::EmptyHeap)?;

        if let Some(child) = self.arena[min].child.take() {
            let mut current = child;
            loop {
                let node = &mut self.arena[current];
                node.parent = None;
                node.marked = false;
                current = node.link.next();
                if current == child {
                    break;
                }
            }
            RingOps.splice(&mut self.arena, Some(min), Some(child));
        }

        let rest = RingOps.detach(&mut self.arena, min);
        let Some(node) = self.arena.remove(min) else {
            unreachable!("minimum root {min:?} is not in the arena");
        };
        self.len -= 1;

        match rest {
            None => self.min = None,
            Some(start) => self.consolidate(start),
        }

        Ok((node.priority, node.item))
    }

    /// Lowers the priority of the element behind `handle`
    ///
    /// If the element now beats its parent it is cut to the root list, and
    /// any marked ancestors are cut after it.
    ///
    /// # Errors
    /// - `HeapError::StaleHandle` if the element is no longer in the heap
    /// - `HeapError::ReservedKey` if `new_priority` is `P::FLOOR`
    /// - `HeapError::InvalidDecrease` if `new_priority` is greater than the
    ///   current priority
    pub fn decrease_key(
        &mut self,
        handle: &FibonacciHandle,
        new_priority: P,
    ) -> Result<(), HeapError> {
        let node = self
            .arena
            .get_mut(handle.node)
            .ok_or(HeapError::StaleHandle)?;

        if new_priority == P::FLOOR {
            return Err(HeapError::ReservedKey);
        }
        if new_priority > node.priority {
            return Err(HeapError::InvalidDecrease);
        }

        node.priority = new_priority;
        self.restore_order(handle.node);
        Ok(())
    }

    /// Removes the element behind `handle`, returning its priority and item
    ///
    /// The element is first decreased to `P::FLOOR`, which makes it the
    /// minimum, and is then extracted.
    ///
    /// # Errors
    /// Returns `HeapError::StaleHandle` if the element is no longer in the heap.
    pub fn delete(&mut self, handle: &FibonacciHandle) -> Result<(P, T), HeapError> {
        let node = self
            .arena
            .get_mut(handle.node)
            .ok_or(HeapError::StaleHandle)?;

        let priority = std::mem::replace(&mut node.priority, P::FLOOR);
        self.restore_order(handle.node);
        debug_assert_eq!(self.min, Some(handle.node));

        let (_, item) = self.extract_min()?;
        Ok((priority, item))
    }

    /// Moves every element of `other` into this heap, leaving `other` empty
    ///
    /// Handles obtained from `other` remain valid for `self`. No element is
    /// copied: the root lists are spliced and the arenas are joined by moving
    /// whole segments.
    ///
    /// Splicing the root lists is O(1). Joining the arenas costs one step per
    /// segment of whichever heap has fewer segments, and that smaller set is
    /// always the one that moves, so a moved segment lands in a set at least
    /// twice its old one. A segment therefore moves at most log2(s) times,
    /// where `s` is the number of segments ever created. Absorbing a heap that
    /// has a single segment is O(1).
    pub fn append(&mut self, other: &mut Self) {
        if other.is_empty() {
            return;
        }

        self.arena.absorb(&mut other.arena);
        self.min = self.splice(self.min, other.min.take());
        self.len += std::mem::take(&mut other.len);
    }

    /// Merges another heap into this one, consuming the other heap
    pub fn merge(&mut self, mut other: Self) {
        self.append(&mut other);
    }

    /// Removes every element, returning how many were freed
    ///
    /// Walks the root list and every child list with an explicit work list,
    /// so the depth of the trees never reaches the call stack. All handles
    /// become stale.
    pub fn clear(&mut self) -> usize {
        let mut freed = 0;
        let mut pending: Vec<NodeRef> = self.min.take().into_iter().collect();

        while let Some(start) = pending.pop() {
            let ring: SmallVec<[NodeRef; 16]> = RingOps.iter(&self.arena, start).collect();
            for at in ring {
                if let Some(node) = self.arena.remove(at) {
                    pending.extend(node.child);
                    freed += 1;
                }
            }
        }

        debug_assert_eq!(freed, self.len);
        self.len = 0;
        freed
    }

    /// Checks every structural invariant of the heap
    ///
    /// - every sibling ring is consistently doubly linked
    /// - roots have no parent and no mark
    /// - children point back at their parent and are not smaller than it
    /// - each degree equals the length of the child ring
    /// - the minimum reference is a root with the smallest priority
    /// - every live node is reached exactly once and `len` matches
    ///
    /// Returns false (and logs the first violation at debug level) when the
    /// heap is broken. Intended for tests and debugging; it is O(n).
    pub fn verify_structure(&self) -> bool {
        match self.check_structure() {
            Ok(()) => true,
            Err(violation) => {
                debug!("fibonacci heap invariant violated: {violation}");
                false
            }
        }
    }

    fn check_structure(&self) -> Result<(), String> {
        let Some(min) = self.min else {
            return match (self.len, self.arena.len()) {
                (0, 0) => Ok(()),
                (len, live) => Err(format!("empty heap with len {len} and {live} live nodes")),
            };
        };

        let mut seen: FxHashSet<NodeRef> = FxHashSet::default();
        let mut pending: Vec<(NodeRef, Option<NodeRef>)> = vec![(min, None)];
        let mut min_is_root = false;

        while let Some((start, parent)) = pending.pop() {
            for at in RingOps.iter(&self.arena, start) {
                let node = self
                    .arena
                    .get(at)
                    .ok_or_else(|| format!("ring reaches dangling node {at:?}"))?;
                if !seen.insert(at) {
                    return Err(format!("node {at:?} reached twice"));
                }

                if self.arena[node.link.next()].link.prev() != at {
                    return Err(format!("broken back link after {at:?}"));
                }
                if node.parent != parent {
                    return Err(format!("node {at:?} has the wrong parent"));
                }

                match parent {
                    None => {
                        if node.marked {
                            return Err(format!("root {at:?} is marked"));
                        }
                        if node.priority < self.arena[min].priority {
                            return Err(format!("root {at:?} is below the minimum"));
                        }
                        min_is_root |= at == min;
                    }
                    Some(parent) => {
                        if node.priority < self.arena[parent].priority {
                            return Err(format!("child {at:?} is below its parent"));
                        }
                    }
                }

                match node.child {
                    None if node.degree != 0 => {
                        return Err(format!("node {at:?} has degree {} but no child", node.degree));
                    }
                    None => {}
                    Some(child) => pending.push((child, Some(at))),
                }
            }

            if let Some(parent) = parent {
                let degree = self.arena[parent].degree;
                let ring_len = RingOps.count(&self.arena, start);
                if degree != ring_len {
                    return Err(format!(
                        "node {parent:?} has degree {degree} but {ring_len} children"
                    ));
                }
            }
        }

        if !min_is_root {
            return Err(format!("minimum {min:?} is not in the root list"));
        }
        if seen.len() != self.len || self.arena.len() != self.len {
            return Err(format!(
                "len {} but {} reachable and {} live nodes",
                self.len,
                seen.len(),
                self.arena.len()
            ));
        }
        Ok(())
    }

    /// Joins two rings and returns whichever entry point has the smaller priority
    fn splice(&mut self, a: Option<NodeRef>, b: Option<NodeRef>) -> Option<NodeRef> {
        let joined = RingOps.splice(&mut self.arena, a, b);
        match (a, b) {
            (Some(a), Some(b)) if self.arena[b].priority < self.arena[a].priority => Some(b),
            _ => joined,
        }
    }

    /// Re-establishes heap order around a node whose priority just went down
    fn restore_order(&mut self, node: NodeRef) {
        if let Some(parent) = self.arena[node].parent {
            if self.arena[node].priority < self.arena[parent].priority {
                self.cut(node, parent);
                self.cascading_cut(parent);
            }
        }

        if let Some(min) = self.min {
            if self.arena[node].priority < self.arena[min].priority {
                self.min = Some(node);
            }
        }
    }

    /// Links roots of equal degree until every root degree is unique, then
    /// recomputes the minimum
    fn consolidate(&mut self, start: NodeRef) {
        let roots: SmallVec<[NodeRef; 32]> = RingOps.iter(&self.arena, start).collect();
        let root_count = roots.len();
        let mut by_degree: SmallVec<[Option<NodeRef>; 32]> =
            smallvec![None; max_degree(self.len) + 1];

        for root in roots {
            let mut x = root;
            let mut d = self.arena[x].degree;

            loop {
                if d >= by_degree.len() {
                    by_degree.resize(d + 1, None);
                }
                let Some(mut y) = by_degree[d].take() else {
                    break;
                };

                // Ensure x has the smaller priority
                if self.arena[y].priority < self.arena[x].priority {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                d += 1;
            }

            by_degree[d] = Some(x);
        }

        let survivor = by_degree.iter().flatten().copied().next();
        self.min = survivor.map(|first| {
            RingOps.iter(&self.arena, first).fold(first, |best, at| {
                if self.arena[at].priority < self.arena[best].priority {
                    at
                } else {
                    best
                }
            })
        });

        debug!(
            "consolidated {} roots into {} (len {})",
            root_count,
            by_degree.iter().flatten().count(),
            self.len
        );
    }

    /// Makes root `y` a child of root `x`
    fn link(&mut self, y: NodeRef, x: NodeRef) {
        RingOps.detach(&mut self.arena, y);
        debug_assert!(RingOps.is_singleton(&self.arena, y));

        let node = &mut self.arena[y];
        node.parent = Some(x);
        node.marked = false;

        let child = self.arena[x].child;
        let child = self.splice(child, Some(y));
        let parent = &mut self.arena[x];
        parent.child = child;
        parent.degree += 1;

        trace!("linked {y:?} under {x:?}");
    }

    /// Moves `x` from the child list of `y` to the root list
    fn cut(&mut self, x: NodeRef, y: NodeRef) {
        let rest = RingOps.detach(&mut self.arena, x);

        let parent = &mut self.arena[y];
        if parent.child == Some(x) {
            parent.child = rest;
        }
        parent.degree -= 1;

        let node = &mut self.arena[x];
        node.parent = None;
        node.marked = false;

        self.min = self.splice(self.min, Some(x));
        trace!("cut {x:?} from {y:?}");
    }

    /// Walks up from `y`, cutting every marked ancestor and marking the first
    /// unmarked one
    fn cascading_cut(&mut self, mut y: NodeRef) {
        while let Some(parent) = self.arena[y].parent {
            let node = &mut self.arena[y];
            if !node.marked {
                node.marked = true;
                return;
            }

            trace!("cascading cut reached marked {y:?}");
            self.cut(y, parent);
            y = parent;
        }
    }
}

/// Upper bound on the degree of any root in a heap of `n` nodes: ⌊log_φ n⌋ + 1
fn max_degree(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    ((n as f64).ln() / PHI.ln()).floor() as usize + 1
}

impl<T, P: Priority> AddressableHeap<T, P> for FibonacciHeap<T, P> {
    type Handle = FibonacciHandle;

    fn new() -> Self {
        FibonacciHeap::new()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn insert(&mut self, priority: P, item: T) -> Result<Self::Handle, HeapError> {
        self.insert(priority, item)
    }

    fn find_min(&self) -> Result<(&P, &T), HeapError> {
        self.find_min()
    }

    fn extract_min(&mut self) -> Result<(P, T), HeapError> {
        self.extract_min()
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError> {
        self.decrease_key(handle, new_priority)
    }

    fn delete(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError> {
        self.delete(handle)
    }

    fn merge(&mut self, other: Self) {
        self.merge(other)
    }
}
