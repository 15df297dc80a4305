use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::card::CardId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropZoneConfig {
    pub center: Vec2,
    pub size: Vec2,
    /// Horizontal distance between neighbouring committed cards.
    pub spacing: f32,
}

impl Default for DropZoneConfig {
    fn default() -> Self {
        Self {
            center: Vec2::new(0.0, -130.0),
            size: Vec2::new(430.0, 260.0),
            spacing: 120.0,
        }
    }
}

/// The committed-card row. Cards dropped here belong to the zone for good.
#[derive(Debug, Clone)]
pub struct DropZone {
    config: DropZoneConfig,
    cards: Vec<CardId>,
}

impl DropZone {
    pub fn new(config: DropZoneConfig) -> Self {
        Self {
            config,
            cards: Vec::new(),
        }
    }

    pub fn config(&self) -> &DropZoneConfig {
        &self.config
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// True when `point` lies within the zone's half-extents on both axes.
    pub fn accepts(&self, point: Vec2) -> bool {
        let offset = point - self.config.center;
        offset.x.abs() <= self.config.size.x / 2.0 && offset.y.abs() <= self.config.size.y / 2.0
    }

    pub fn push(&mut self, id: CardId) {
        self.cards.push(id);
    }

    /// Slot for card `index` of `count`: one centered horizontal row with
    /// `spacing` between neighbours.
    pub fn slot_position(&self, index: usize, count: usize) -> Vec2 {
        let start = -(count.saturating_sub(1) as f32 / 2.0) * self.config.spacing;
        Vec2::new(
            self.config.center.x + start + index as f32 * self.config.spacing,
            self.config.center.y,
        )
    }
}
