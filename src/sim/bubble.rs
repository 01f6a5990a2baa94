//! Bubble variants and the live bubble entity

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::placement::Rect;
use crate::consts::BUBBLE_SIZE;

/// Stable identifier of a bubble within one session
pub type BubbleId = u32;

/// Bubble kinds. Declaration order is the fixed tie-break order for spawn weights.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Red,
    Pink,
    Green,
    Blue,
    Black,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::Red,
        Variant::Pink,
        Variant::Green,
        Variant::Blue,
        Variant::Black,
    ];

    /// Base points awarded for popping this variant
    pub fn point_value(&self) -> u32 {
        match self {
            Variant::Red => 1,
            Variant::Pink => 2,
            Variant::Green => 5,
            Variant::Blue => 8,
            Variant::Black => 10,
        }
    }

    /// Display color as 0xRRGGBB
    pub fn display_color(&self) -> u32 {
        match self {
            Variant::Red => 0xFF0000,
            Variant::Pink => 0xFABFE6,
            Variant::Green => 0x00FF00,
            Variant::Blue => 0x0000FF,
            Variant::Black => 0x000000,
        }
    }

    /// Diameter in play-area units
    pub fn size(&self) -> i32 {
        BUBBLE_SIZE
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Red => "red",
            Variant::Pink => "pink",
            Variant::Green => "green",
            Variant::Blue => "blue",
            Variant::Black => "black",
        }
    }
}

/// A live, poppable bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    pub variant: Variant,
    /// Top-left corner of the bounding square
    pub pos: IVec2,
}

impl Bubble {
    pub fn size(&self) -> i32 {
        self.variant.size()
    }

    /// Bounding square at the current position
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size())
    }
}
