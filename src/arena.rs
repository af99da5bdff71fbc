//! Owning node storage for the heaps in this crate
//!
//! Nodes live in [`slotmap::SlotMap`]s and refer to each other by
//! [`NodeRef`], never by pointer. Slot map keys are generational, so a
//! reference to a removed node fails to resolve instead of aliasing whatever
//! reused its slot.
//!
//! # Segments
//!
//! An arena is a set of segments, each a slot map tagged with a process-wide
//! unique [`SegmentId`]. New nodes always go into the arena's home segment.
//! Absorbing another arena moves its segments over wholesale (the smaller set
//! into the larger), so node references, and the handles built from them,
//! stay valid across a merge and no node is ever copied.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    /// Slot key within one segment
    pub(crate) struct SlotKey;
}

static NEXT_SEGMENT: AtomicU64 = AtomicU64::new(0);

/// Process-wide unique name of one segment
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct SegmentId(u64);

impl SegmentId {
    fn fresh() -> Self {
        SegmentId(NEXT_SEGMENT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Reference to a node: the segment it lives in plus its generational slot key
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeRef {
    segment: SegmentId,
    slot: SlotKey,
}

/// Segmented slot-map arena
#[derive(Debug)]
pub(crate) struct Arena<N> {
    home: SegmentId,
    segments: FxHashMap<SegmentId, SlotMap<SlotKey, N>>,
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Arena<N> {
    pub(crate) fn new() -> Self {
        Arena {
            home: SegmentId::fresh(),
            segments: FxHashMap::default(),
        }
    }

    /// Inserts the node built by `f`, which receives the node's own reference
    pub(crate) fn insert_with(&mut self, f: impl FnOnce(NodeRef) -> N) -> NodeRef {
        let segment = self.home;
        let slot = self
            .segments
            .entry(segment)
            .or_default()
            .insert_with_key(|slot| f(NodeRef { segment, slot }));
        NodeRef { segment, slot }
    }

    pub(crate) fn get(&self, at: NodeRef) -> Option<&N> {
        self.segments.get(&at.segment)?.get(at.slot)
    }

    pub(crate) fn get_mut(&mut self, at: NodeRef) -> Option<&mut N> {
        self.segments.get_mut(&at.segment)?.get_mut(at.slot)
    }

    pub(crate) fn contains(&self, at: NodeRef) -> bool {
        self.get(at).is_some()
    }

    /// Removes a node, dropping its segment if that leaves a foreign segment empty
    pub(crate) fn remove(&mut self, at: NodeRef) -> Option<N> {
        let segment = self.segments.get_mut(&at.segment)?;
        let node = segment.remove(at.slot)?;
        if segment.is_empty() && at.segment != self.home {
            self.segments.remove(&at.segment);
        }
        Some(node)
    }

    /// Total number of live nodes across all segments
    pub(crate) fn len(&self) -> usize {
        self.segments.values().map(SlotMap::len).sum()
    }

    pub(crate) fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Moves every node of `other` into this arena without copying any of them
    ///
    /// `other` is left empty with a fresh home segment, so nodes it creates
    /// later can never be confused with the ones that moved here.
    ///
    /// Costs O(min(segment counts)): the smaller segment set is always the
    /// one that moves.
    pub(crate) fn absorb(&mut self, other: &mut Arena<N>) {
        let mut incoming = std::mem::take(&mut other.segments);
        if incoming.len() > self.segments.len() {
            std::mem::swap(&mut self.segments, &mut incoming);
        }
        self.segments
            .extend(incoming.into_iter().filter(|(_, nodes)| !nodes.is_empty()));
        other.home = SegmentId::fresh();
    }
}

impl<N> Index<NodeRef> for Arena<N> {
    type Output = N;

    fn index(&self, at: NodeRef) -> &N {
        match self.get(at) {
            Some(node) => node,
            None => panic!("dangling node reference {at:?}"),
        }
    }
}

impl<N> IndexMut<NodeRef> for Arena<N> {
    fn index_mut(&mut self, at: NodeRef) -> &mut N {
        match self.get_mut(at) {
            Some(node) => node,
            None => panic!("dangling node reference {at:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_basic() {
        let mut arena: Arena<i32> = Arena::new();

        let at = arena.insert_with(|_| 42);
        assert_eq!(arena[at], 42);

        arena[at] = 100;
        assert_eq!(arena.get(at), Some(&100));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_insert_with_sees_own_ref() {
        let mut arena: Arena<Option<NodeRef>> = Arena::new();
        let at = arena.insert_with(Some);
        assert_eq!(arena[at], Some(at));
    }

    #[test]
    fn test_removed_ref_becomes_invalid() {
        let mut arena: Arena<i32> = Arena::new();

        let at = arena.insert_with(|_| 42);
        assert!(arena.contains(at));

        assert_eq!(arena.remove(at), Some(42));
        assert!(!arena.contains(at));
        assert_eq!(arena.remove(at), None);

        // The slot is reused but the old reference must not see the new node
        let reused = arena.insert_with(|_| 7);
        assert!(!arena.contains(at));
        assert_eq!(arena[reused], 7);
    }

    #[test]
    fn test_refs_from_other_arena_do_not_resolve() {
        let mut a: Arena<i32> = Arena::new();
        let mut b: Arena<i32> = Arena::new();

        let in_a = a.insert_with(|_| 1);
        let in_b = b.insert_with(|_| 2);

        assert!(!a.contains(in_b));
        assert!(!b.contains(in_a));
    }

    #[test]
    fn test_absorb_keeps_refs_valid() {
        let mut a: Arena<i32> = Arena::new();
        let mut b: Arena<i32> = Arena::new();

        let in_a = a.insert_with(|_| 1);
        let in_b = b.insert_with(|_| 2);

        a.absorb(&mut b);

        assert_eq!(a[in_a], 1);
        assert_eq!(a[in_b], 2);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 0);
        assert!(!b.contains(in_b));

        // b keeps working, in a segment nobody else knows about
        let again = b.insert_with(|_| 3);
        assert!(!a.contains(again));
        assert_eq!(b[again], 3);
    }

    #[test]
    fn test_absorb_moves_smaller_segment_set() {
        let mut big: Arena<i32> = Arena::new();
        for i in 0..3 {
            let mut part: Arena<i32> = Arena::new();
            part.insert_with(|_| i);
            big.absorb(&mut part);
        }
        big.insert_with(|_| 99);
        assert_eq!(big.segment_count(), 4);

        let mut small: Arena<i32> = Arena::new();
        let only = small.insert_with(|_| -1);

        // Absorbing into the smaller arena swaps the maps first
        small.absorb(&mut big);
        assert_eq!(small.len(), 5);
        assert_eq!(small[only], -1);
        assert_eq!(small.segment_count(), 5);
    }

    #[test]
    fn test_emptied_foreign_segment_is_dropped() {
        let mut a: Arena<i32> = Arena::new();
        let mut b: Arena<i32> = Arena::new();
        a.insert_with(|_| 1);
        let in_b = b.insert_with(|_| 2);

        a.absorb(&mut b);
        assert_eq!(a.segment_count(), 2);

        a.remove(in_b);
        assert_eq!(a.segment_count(), 1);
    }

    #[test]
    #[should_panic(expected = "dangling node reference")]
    fn test_index_dangling_panics() {
        let mut arena: Arena<i32> = Arena::new();
        let at = arena.insert_with(|_| 1);
        arena.remove(at);
        let _ = arena[at];
    }
}
