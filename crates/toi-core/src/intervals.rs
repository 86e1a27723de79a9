//! Binary search over items sorted by start time.
//!
//! Shift lists, timeline breakpoints and the overlap sweep all go through
//! these two functions. Callers must keep their slices sorted ascending by
//! [`StartsAt::starts_at`].

use std::ops::Range;

/// Something anchored at a second within a period.
pub trait StartsAt {
    fn starts_at(&self) -> u32;
}

/// Index of the last item starting at or before `t`.
///
/// `None` when every item starts after `t`.
pub fn last_starting_at_or_before<T: StartsAt>(items: &[T], t: u32) -> Option<usize> {
    items
        .partition_point(|item| item.starts_at() <= t)
        .checked_sub(1)
}

/// Indices of items starting in the half-open window `(after, until]`.
pub fn starting_within<T: StartsAt>(items: &[T], after: u32, until: u32) -> Range<usize> {
    let lo = items.partition_point(|item| item.starts_at() <= after);
    let hi = items.partition_point(|item| item.starts_at() <= until);
    lo..hi.max(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct At(u32);

    impl StartsAt for At {
        fn starts_at(&self) -> u32 {
            self.0
        }
    }

    fn items(starts: &[u32]) -> Vec<At> {
        starts.iter().copied().map(At).collect()
    }

    #[test]
    fn finds_last_start_at_or_before() {
        let list = items(&[0, 10, 40, 90]);
        assert_eq!(last_starting_at_or_before(&list, 0), Some(0));
        assert_eq!(last_starting_at_or_before(&list, 9), Some(0));
        assert_eq!(last_starting_at_or_before(&list, 10), Some(1));
        assert_eq!(last_starting_at_or_before(&list, 89), Some(2));
        assert_eq!(last_starting_at_or_before(&list, 1000), Some(3));
    }

    #[test]
    fn none_before_first_start() {
        let list = items(&[30, 60]);
        assert_eq!(last_starting_at_or_before(&list, 29), None);
        assert_eq!(last_starting_at_or_before(&items(&[]), 29), None);
    }

    #[test]
    fn equal_starts_resolve_to_the_last() {
        let list = items(&[10, 10, 20]);
        assert_eq!(last_starting_at_or_before(&list, 10), Some(1));
    }

    #[test]
    fn window_excludes_lower_bound_and_includes_upper() {
        let list = items(&[0, 20, 40, 45, 60]);
        assert_eq!(starting_within(&list, 20, 45), 2..4);
        assert_eq!(starting_within(&list, 19, 20), 1..2);
        assert_eq!(starting_within(&list, 61, 90), 5..5);
    }

    #[test]
    fn inverted_window_is_empty() {
        let list = items(&[0, 20, 40]);
        assert!(starting_within(&list, 40, 10).is_empty());
    }
}
