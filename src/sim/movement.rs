//! Movement policy for falling bubbles (expert mode)

use super::bubble::{Bubble, BubbleId};
use crate::consts::{VELOCITY_RAMP_SECS, VELOCITY_STEP};

/// Move every bubble down by `increment` and return the IDs whose bottom
/// edge reached the floor (`area_max_y - y <= size`).
///
/// Exited bubbles are left in place; the caller removes them.
pub fn advance<'a, I>(bubbles: I, increment: i32, area_max_y: i32) -> Vec<BubbleId>
where
    I: IntoIterator<Item = &'a mut Bubble>,
{
    let mut exited = Vec::new();
    for bubble in bubbles {
        bubble.pos.y += increment;
        if area_max_y - bubble.pos.y <= bubble.size() {
            exited.push(bubble.id);
        }
    }
    exited
}

/// Velocity after a 1 Hz running tick that left `remaining_secs` on the clock.
///
/// Steps up every `VELOCITY_RAMP_SECS` seconds and never exceeds `max`.
pub fn ramp_velocity(current: i32, remaining_secs: u32, max: i32) -> i32 {
    if remaining_secs % VELOCITY_RAMP_SECS == 0 {
        (current + VELOCITY_STEP).min(max)
    } else {
        current.min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Variant;
    use glam::IVec2;
    use proptest::prelude::*;

    fn bubble(id: BubbleId, y: i32) -> Bubble {
        Bubble {
            id,
            variant: Variant::Red,
            pos: IVec2::new(id as i32 * 60, y),
        }
    }

    #[test]
    fn test_exit_at_floor() {
        let max_y = 600;
        let size = Variant::Red.size();
        let mut bubbles = vec![bubble(0, max_y - size - 1), bubble(1, 0)];
        let exited = advance(bubbles.iter_mut(), 2, max_y);
        assert_eq!(exited, vec![0]);
        assert_eq!(bubbles[0].pos.y, max_y - size + 1);
        assert_eq!(bubbles[1].pos.y, 2);
    }

    #[test]
    fn test_exact_touch_counts_as_exit() {
        let max_y = 600;
        let mut bubbles = vec![bubble(0, max_y - 50 - 3)];
        assert_eq!(advance(bubbles.iter_mut(), 3, max_y), vec![0]);
    }

    #[test]
    fn test_no_bubbles() {
        let mut bubbles: Vec<Bubble> = Vec::new();
        assert!(advance(bubbles.iter_mut(), 5, 600).is_empty());
    }

    #[test]
    fn test_ramp_every_ten_seconds() {
        assert_eq!(ramp_velocity(1, 59, 5), 1);
        assert_eq!(ramp_velocity(1, 50, 5), 2);
        assert_eq!(ramp_velocity(5, 40, 5), 5);
        assert_eq!(ramp_velocity(2, 0, 5), 3);
    }

    proptest! {
        #[test]
        fn prop_velocity_never_exceeds_max(max in 1i32..20, secs in 1u32..600) {
            let mut velocity = 1;
            for remaining in (0..secs).rev() {
                velocity = ramp_velocity(velocity, remaining, max);
                prop_assert!(velocity <= max);
            }
        }
    }
}
