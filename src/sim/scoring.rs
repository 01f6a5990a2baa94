//! Scoring policy with the same-color adjacency bonus

use super::bubble::Variant;
use crate::consts::{BONUS_DENOMINATOR, BONUS_NUMERATOR};

/// Points for popping `variant` right after `previous`.
///
/// Consecutive pops of the same variant earn 1.5x, rounded half-up. The
/// caller records `variant` as the new previous pop.
pub fn score(variant: Variant, previous: Option<Variant>) -> u32 {
    let base = variant.point_value();
    if previous == Some(variant) {
        // round(base * 3 / 2) with halves rounded up
        (base * BONUS_NUMERATOR + BONUS_DENOMINATOR / 2) / BONUS_DENOMINATOR
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_variant_bonus() {
        assert_eq!(score(Variant::Red, Some(Variant::Red)), 2); // 1.5 -> 2
        assert_eq!(score(Variant::Pink, Some(Variant::Pink)), 3);
        assert_eq!(score(Variant::Green, Some(Variant::Green)), 8); // 7.5 -> 8
        assert_eq!(score(Variant::Blue, Some(Variant::Blue)), 12);
        assert_eq!(score(Variant::Black, Some(Variant::Black)), 15);
    }

    #[test]
    fn test_no_bonus() {
        for variant in Variant::ALL {
            assert_eq!(score(variant, None), variant.point_value());
            for other in Variant::ALL.into_iter().filter(|o| *o != variant) {
                assert_eq!(score(variant, Some(other)), variant.point_value());
            }
        }
    }

    #[test]
    fn test_bonus_matches_rounded_float() {
        for variant in Variant::ALL {
            let expected = (f64::from(variant.point_value()) * 1.5).round() as u32;
            assert_eq!(score(variant, Some(variant)), expected);
        }
    }
}
