//! Placement engine: random non-overlapping positions inside the play area
//!
//! Bubbles are axis-aligned squares. Overlap uses closed intervals, so two
//! squares that only share an edge still count as intersecting.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::GameMode;
use crate::consts::MAX_PLACEMENT_ATTEMPTS;

/// Axis-aligned rectangle in play-area units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: IVec2,
    pub max: IVec2,
}

impl Rect {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min: IVec2::new(min_x, min_y),
            max: IVec2::new(max_x, max_y),
        }
    }

    /// Square with its top-left corner at `origin`
    pub fn square(origin: IVec2, size: i32) -> Self {
        Self {
            min: origin,
            max: origin + IVec2::splat(size),
        }
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Closed-interval overlap on both axes (touching edges intersect)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("no free space available for a new bubble")]
    NoSpaceAvailable,
}

/// How a new bubble's position is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementStrategy {
    /// Anywhere in the area
    Static,
    /// Random column, pinned to the top edge
    Falling,
}

impl PlacementStrategy {
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Classic => PlacementStrategy::Static,
            GameMode::Expert => PlacementStrategy::Falling,
        }
    }
}

/// Find a position for a bubble of `size` that intersects none of `existing`.
///
/// Tries at most `MAX_PLACEMENT_ATTEMPTS` candidates.
pub fn place<R: Rng + ?Sized>(
    strategy: PlacementStrategy,
    size: i32,
    area: &Rect,
    existing: &[Rect],
    rng: &mut R,
) -> Result<IVec2, PlacementError> {
    let max_x = area.max.x - size;
    let max_y = area.max.y - size;
    if max_x < area.min.x || max_y < area.min.y {
        return Err(PlacementError::NoSpaceAvailable);
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let x = rng.random_range(area.min.x..=max_x);
        let y = match strategy {
            PlacementStrategy::Static => rng.random_range(area.min.y..=max_y),
            PlacementStrategy::Falling => area.min.y,
        };
        let candidate = IVec2::new(x, y);
        let square = Rect::square(candidate, size);
        if !existing.iter().any(|r| r.intersects(&square)) {
            return Ok(candidate);
        }
    }

    Err(PlacementError::NoSpaceAvailable)
}
