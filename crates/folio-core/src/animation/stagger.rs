#![forbid(unsafe_code)]

//! Stagger utilities: delay offsets for cascading entrance animations.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` returns an empty vec.
//! 2. The first offset is always `Duration::ZERO`.
//! 3. offset[i] = i * delay, saturating.

use std::time::Duration;

/// Delay offsets for `count` items spaced `delay` apart.
#[must_use]
pub fn stagger_offsets(count: usize, delay: Duration) -> Vec<Duration> {
    // Integer arithmetic avoids float drift.
    (0..count)
        .map(|i| delay.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn empty_and_single() {
        assert!(stagger_offsets(0, MS_100).is_empty());
        assert_eq!(stagger_offsets(1, MS_100), vec![Duration::ZERO]);
    }

    #[test]
    fn equal_spacing() {
        let offsets = stagger_offsets(4, MS_100);
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(300)
            ]
        );
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let offsets = stagger_offsets(3, Duration::MAX);
        assert_eq!(offsets, vec![Duration::ZERO, Duration::MAX, Duration::MAX]);
    }
}
