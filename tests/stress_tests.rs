//! Stress tests that push the Fibonacci heap through long operation sequences
//!
//! These tests perform large numbers of operations in various patterns
//! to catch edge cases and verify correctness under load.

use fib_sssp::{AddressableHeap, FibonacciHeap, HeapError};

/// Test massive numbers of inserts and pops
fn test_massive_operations<H: AddressableHeap<i32, i32>>() {
    let mut heap = H::new();

    for i in (0..5000).rev() {
        heap.insert(i, i).unwrap();
    }
    assert_eq!(heap.len(), 5000);

    for i in 0..5000 {
        assert_eq!(heap.pop(), Some((i, i)));
    }
    assert!(heap.is_empty());
}

/// Test many decrease_key operations
fn test_many_decrease_keys<H: AddressableHeap<i32, i32>>() {
    let mut heap = H::new();
    let mut handles = Vec::new();

    for i in 0..500 {
        handles.push(heap.insert(10000 + i, i).unwrap());
    }

    for (i, handle) in handles.iter().enumerate() {
        assert!(heap.decrease_key(handle, i as i32).is_ok());
    }

    for i in 0..500 {
        assert_eq!(heap.pop(), Some((i, i)));
    }
}

/// Test alternating insert and pop
fn test_alternating_ops<H: AddressableHeap<i32, i32>>() {
    let mut heap = H::new();

    for i in 0..200 {
        heap.insert(i * 2, i).unwrap();
        heap.insert(i * 2 + 1, i + 1000).unwrap();
        assert!(heap.pop().is_some());
    }
    assert_eq!(heap.len(), 200);

    let mut last = i32::MIN;
    while let Some((priority, _)) = heap.pop() {
        assert!(priority >= last);
        last = priority;
    }
}

/// Test merge with large heaps
fn test_large_merge<H: AddressableHeap<i32, i32>>() {
    let mut heap1 = H::new();
    let mut heap2 = H::new();

    for i in 0..500 {
        heap1.insert(i * 2, i).unwrap();
        heap2.insert(i * 2 + 1, i + 1000).unwrap();
    }

    heap1.merge(heap2);
    assert_eq!(heap1.len(), 1000);

    for expected in 0..1000 {
        assert_eq!(heap1.pop().map(|(p, _)| p), Some(expected));
    }
}

#[test]
fn test_fibonacci_massive() {
    test_massive_operations::<FibonacciHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_many_decrease_keys() {
    test_many_decrease_keys::<FibonacciHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_alternating() {
    test_alternating_ops::<FibonacciHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_large_merge() {
    test_large_merge::<FibonacciHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_decrease_after_partial_drain() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (0..300).map(|i| heap.insert(i * 10, i).unwrap()).collect();

    for _ in 0..100 {
        heap.extract_min().unwrap();
    }

    // Each remaining element in turn becomes the new minimum
    for handle in handles.iter().skip(100) {
        let current = *heap.find_min().unwrap().0;
        heap.decrease_key(handle, current - 1).unwrap();
        assert_eq!(heap.find_min().unwrap().0, &(current - 1));
    }
    assert!(heap.verify_structure());

    // Handles of drained elements are stale
    for handle in handles.iter().take(100) {
        assert_eq!(heap.decrease_key(handle, -1_000_000), Err(HeapError::StaleHandle));
    }
    assert_eq!(heap.len(), 200);
}

#[test]
fn test_fibonacci_large_priorities() {
    let mut heap = FibonacciHeap::new();

    heap.insert(i64::MAX, 4).unwrap();
    heap.insert(1_000_000_000_000, 1).unwrap();
    heap.insert(i64::MIN + 1, 2).unwrap();
    heap.insert(2_000_000_000_000, 3).unwrap();
    assert_eq!(heap.insert(i64::MIN, 5), Err(HeapError::ReservedKey));

    assert_eq!(heap.extract_min(), Ok((i64::MIN + 1, 2)));
    assert_eq!(heap.extract_min(), Ok((1_000_000_000_000, 1)));
    assert_eq!(heap.extract_min(), Ok((2_000_000_000_000, 3)));
    assert_eq!(heap.extract_min(), Ok((i64::MAX, 4)));
}

#[test]
fn test_fibonacci_interleaved_deletes() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (0..2000).map(|i| heap.insert(i, i).unwrap()).collect();

    // Build deep trees, then delete every third element from the middle of them
    heap.extract_min().unwrap();
    for handle in handles.iter().skip(1).step_by(3) {
        heap.delete(handle).unwrap();
    }
    assert!(heap.verify_structure());

    let mut last = i32::MIN;
    let mut count = 0;
    while let Ok((priority, item)) = heap.extract_min() {
        assert_eq!(priority, item);
        assert_ne!((item - 1) % 3, 0);
        assert!(priority > last);
        last = priority;
        count += 1;
    }
    assert_eq!(count, 2000 - 1 - 667);
}

#[test]
fn test_fibonacci_repeated_merges() {
    let mut heap = FibonacciHeap::new();
    let mut handles = Vec::new();

    for round in 0..100 {
        let mut part = FibonacciHeap::new();
        for i in 0..10 {
            handles.push(part.insert(round * 10 + i, (round, i)).unwrap());
        }
        heap.merge(part);
        if round % 7 == 0 {
            heap.extract_min().unwrap();
        }
    }
    assert!(heap.verify_structure());

    // Handles from every merged part still reach their elements
    let live: Vec<_> = handles.iter().filter(|h| heap.contains(h)).collect();
    assert_eq!(live.len(), heap.len());
    for handle in live {
        let priority = *heap.get(handle).unwrap().0;
        heap.decrease_key(handle, priority - 5000).unwrap();
    }
    assert!(heap.verify_structure());
    assert_eq!(heap.len(), 1000 - 15);
}

#[test]
fn test_fibonacci_large_clear_and_drop() {
    let mut heap = FibonacciHeap::new();
    for i in 0..100_000 {
        heap.insert(i, vec![i; 2]).unwrap();
    }
    heap.extract_min().unwrap();
    assert_eq!(heap.clear(), 99_999);
    assert!(heap.is_empty());

    // Dropping a large consolidated heap must not recurse per level
    let mut heap = FibonacciHeap::new();
    for i in 0..100_000 {
        heap.insert(i, i).unwrap();
    }
    heap.extract_min().unwrap();
    drop(heap);
}
