//! Bubble registry: owns every live bubble of a session
//!
//! IDs start at 0 and increase monotonically; they are never reused within a
//! session. Storage is keyed by ID so iteration order is deterministic.

use std::collections::BTreeMap;

use glam::IVec2;
use rand::Rng;

use super::bubble::{Bubble, BubbleId, Variant};
use super::placement::Rect;

#[derive(Debug, Clone, Default)]
pub struct BubbleRegistry {
    bubbles: BTreeMap<BubbleId, Bubble>,
    next_id: BubbleId,
}

impl BubbleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new bubble and return its freshly assigned ID
    pub fn insert(&mut self, variant: Variant, pos: IVec2) -> BubbleId {
        let id = self.next_id;
        self.next_id += 1;
        self.bubbles.insert(id, Bubble { id, variant, pos });
        id
    }

    /// Remove a bubble. Removing an absent ID is a no-op returning `None`.
    pub fn remove(&mut self, id: BubbleId) -> Option<Bubble> {
        self.bubbles.remove(&id)
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.get(&id)
    }

    /// Uniformly chosen live bubble
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Bubble> {
        if self.bubbles.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.bubbles.len());
        self.bubbles.values().nth(index)
    }

    /// Live bubbles in ID order
    pub fn all_live(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.values()
    }

    pub fn all_live_mut(&mut self) -> impl Iterator<Item = &mut Bubble> {
        self.bubbles.values_mut()
    }

    /// Bounding squares of every live bubble
    pub fn rects(&self) -> Vec<Rect> {
        self.bubbles.values().map(Bubble::rect).collect()
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Remove and return every live bubble
    pub fn drain(&mut self) -> Vec<Bubble> {
        std::mem::take(&mut self.bubbles).into_values().collect()
    }

    /// ID the next insert will receive
    pub fn next_id(&self) -> BubbleId {
        self.next_id
    }
}
