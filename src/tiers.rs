//! Seed tier classification
//!
//! Raw bracket seeds are too fine-grained to compare across bracket sizes, so
//! they are bucketed into ordinal tiers. The ladder below holds the lowest
//! seed of each tier; a seed's tier is the index of the greatest floor not
//! exceeding it. Tiers widen as seeds grow: seeds 5 and 6 share tier 4, while
//! seeds 2049..=3072 all share tier 22.

/// Lowest seed number of each tier, in ascending order.
pub const SEED_FLOORS: [u32; 24] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073,
];

/// Returns the ordinal tier for a raw seed number.
///
/// Scans the ladder from the smallest floor upward and returns the index of
/// the greatest floor that does not exceed the seed. Seeds below 1 and seeds
/// beyond the largest floor have no tier and yield `None`; very large
/// brackets legitimately produce seeds past the end of the ladder, so this
/// is an expected condition rather than an error.
pub fn tier_of(seed: u32) -> Option<usize> {
    if seed < 1 {
        return None;
    }
    for (i, &floor) in SEED_FLOORS.iter().enumerate() {
        if floor == seed {
            return Some(i);
        }
        if floor > seed {
            return Some(i - 1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_of_floor_values() {
        // Each floor maps to its own index
        for (i, &floor) in SEED_FLOORS.iter().enumerate() {
            assert_eq!(tier_of(floor), Some(i), "floor {floor} should be tier {i}");
        }
    }

    #[test]
    fn test_tier_of_first_and_last() {
        assert_eq!(tier_of(1), Some(0));
        assert_eq!(tier_of(3073), Some(23));
    }

    #[test]
    fn test_tier_of_between_floors() {
        assert_eq!(tier_of(6), Some(4)); // 5 is the greatest floor <= 6
        assert_eq!(tier_of(40), Some(10)); // 33 is the greatest floor <= 40
        assert_eq!(tier_of(100), Some(13)); // 97 is the greatest floor <= 100
        assert_eq!(tier_of(3072), Some(22));
    }

    #[test]
    fn test_tier_of_out_of_range_is_none() {
        assert_eq!(tier_of(0), None);
        assert_eq!(tier_of(3074), None);
        assert_eq!(tier_of(4000), None);
        assert_eq!(tier_of(u32::MAX), None);
    }

    #[test]
    fn test_tier_of_monotonic() {
        let mut previous = 0usize;
        for seed in 1..=3073u32 {
            let tier = tier_of(seed).expect("seeds in ladder range must classify");
            assert!(
                tier >= previous,
                "tier_of must be non-decreasing: seed {seed} gave tier {tier} after {previous}"
            );
            previous = tier;
        }
    }
}
