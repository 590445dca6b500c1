//! Seed arithmetic for scanning
//!
//! Masking into the 48-bit placement space and deterministic derivation of
//! per-position sub-seeds for the heuristic estimators.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::types::{Position, Seed};

/// Number of low seed bits that determine structure placement.
pub const PLACEMENT_BITS: u32 = 48;

/// `2^48 - 1`
pub const SEED_MASK_48: Seed = (1 << PLACEMENT_BITS) - 1;

/// Reduce a seed to the bits that drive structure placement.
///
/// The result is always in `[0, 2^48)`, including for negative seeds,
/// and masking twice changes nothing.
pub fn mask_48(seed: Seed) -> Seed {
    seed & SEED_MASK_48
}

/// Derive a sub-seed for one estimator at one structure position.
/// Same inputs always give the same sub-seed.
pub fn derive_position_seed(seed: Seed, position: Position, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    position.x.hash(&mut hasher);
    position.z.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 0)]
    #[test_case(12345, 12345)]
    #[test_case(1 << 48, 0)]
    #[test_case((1 << 48) + 7, 7)]
    #[test_case(-1, SEED_MASK_48)]
    #[test_case(i64::MIN, 0)]
    #[test_case(i64::MAX, SEED_MASK_48)]
    fn test_mask_48(seed: Seed, expected: Seed) {
        assert_eq!(mask_48(seed), expected);
    }

    #[test_case(-987_654_321_012)]
    #[test_case(0x7FFF_1234_5678_9ABC)]
    #[test_case(42)]
    fn test_mask_is_idempotent(seed: Seed) {
        let once = mask_48(seed);
        assert_eq!(mask_48(once), once);
        assert!((0..=SEED_MASK_48).contains(&once));
    }

    #[test]
    fn test_deterministic_derivation() {
        let pos = Position::new(100, -200);
        assert_eq!(
            derive_position_seed(99, pos, "houses"),
            derive_position_seed(99, pos, "houses")
        );
    }

    #[test]
    fn test_different_inputs_get_different_seeds() {
        let pos = Position::new(100, -200);
        let base = derive_position_seed(99, pos, "houses");
        assert_ne!(base, derive_position_seed(100, pos, "houses"));
        assert_ne!(base, derive_position_seed(99, Position::new(-200, 100), "houses"));
        assert_ne!(base, derive_position_seed(99, pos, "other"));
    }
}
