//! Heap sort for painter's-algorithm ordering.
//!
//! An explicit binary max-heap is built in place over the working array and
//! then repeatedly extracted. O(n log n) in the worst case with no extra
//! allocation. Not stable: equal keys come out in no particular order.

use std::cmp::Ordering;

/// Sorts `items` in place so that `compare` yields `Less` or `Equal` for
/// every adjacent pair.
pub fn heap_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    if len < 2 {
        return;
    }

    for start in (0..len / 2).rev() {
        sift_down(items, start, len, &mut compare);
    }
    for end in (1..len).rev() {
        items.swap(0, end);
        sift_down(items, 0, end, &mut compare);
    }
}

/// Sorts by a float key, largest key first (farthest first for depth keys).
/// NaN keys compare equal to everything.
pub fn heap_sort_by_key_descending<T, F>(items: &mut [T], mut key: F)
where
    F: FnMut(&T) -> f32,
{
    heap_sort_by(items, |a, b| {
        key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal)
    });
}

fn sift_down<T, F>(items: &mut [T], mut root: usize, end: usize, compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            break;
        }
        if child + 1 < end && compare(&items[child], &items[child + 1]) == Ordering::Less {
            child += 1;
        }
        if compare(&items[root], &items[child]) != Ordering::Less {
            break;
        }
        items.swap(root, child);
        root = child;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_ascending() {
        let mut values = [5, 3, 9, 1, 1, 8, 0, 7, 2];
        heap_sort_by(&mut values, |a, b| a.cmp(b));
        assert_eq!(values, [0, 1, 1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn descending_key_puts_farthest_first() {
        let mut depths = [10.0f32, 5.0, 20.0];
        heap_sort_by_key_descending(&mut depths, |d| *d);
        assert_eq!(depths, [20.0, 10.0, 5.0]);
    }

    #[test]
    fn handles_trivial_inputs() {
        let mut empty: [i32; 0] = [];
        heap_sort_by(&mut empty, |a, b| a.cmp(b));
        let mut one = [4];
        heap_sort_by(&mut one, |a, b| a.cmp(b));
        assert_eq!(one, [4]);
    }

    #[test]
    fn larger_input_matches_std_sort() {
        let mut values: Vec<u32> = (0..500u32).map(|i| (i * 7919) % 613).collect();
        let mut expected = values.clone();
        expected.sort();
        heap_sort_by(&mut values, |a, b| a.cmp(b));
        assert_eq!(values, expected);
    }
}
