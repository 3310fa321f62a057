//! Slicable objects

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Stable identifier of a live object (unique within a registry's lifetime)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Packed 0xRRGGBB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// Normalized RGBA for the GPU
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        [r, g, b, alpha]
    }
}

const NORMAL_PALETTE: [Color; 4] = [
    Color(0x67d7f0),
    Color(0xa6e02c),
    Color(0xfa2473),
    Color(0xfe9522),
];

const SPECIAL_PALETTE: [Color; 2] = [Color(0xffcc00), Color(0xff33cc)];

/// Object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectKind {
    #[default]
    Normal,
    /// Rarer kind that triggers slow motion when sliced
    Special,
}

impl ObjectKind {
    /// Points awarded for slicing this kind
    pub fn points(self, tuning: &Tuning) -> u64 {
        match self {
            ObjectKind::Normal => tuning.normal_points,
            ObjectKind::Special => tuning.special_points,
        }
    }

    /// Colours this kind is drawn with
    pub fn palette(self) -> &'static [Color] {
        match self {
            ObjectKind::Normal => &NORMAL_PALETTE,
            ObjectKind::Special => &SPECIAL_PALETTE,
        }
    }

    /// Whether slicing this kind opens the slow-motion window
    pub fn grants_powerup(self) -> bool {
        matches!(self, ObjectKind::Special)
    }
}

/// A circular target rising through the play field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceObject {
    pub id: ObjectId,
    /// Centre in canvas pixels (y grows downward)
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per frame before the global multiplier
    pub speed: f32,
    pub kind: ObjectKind,
    pub color: Color,
}

impl SliceObject {
    /// Move toward the top edge
    pub fn advance(&mut self, dt: f32, speed_multiplier: f32) {
        self.pos.y -= self.speed * speed_multiplier * dt;
    }

    /// Fully above the top edge
    pub fn has_escaped(&self) -> bool {
        self.pos.y + self.radius < 0.0
    }

    /// Point lies within the circle grown by `slack`
    pub fn contains(&self, point: Vec2, slack: f32) -> bool {
        self.pos.distance(point) < self.radius + slack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_at(x: f32, y: f32, radius: f32) -> SliceObject {
        SliceObject {
            id: ObjectId(1),
            pos: Vec2::new(x, y),
            radius,
            speed: 2.0,
            kind: ObjectKind::Normal,
            color: NORMAL_PALETTE[0],
        }
    }

    #[test]
    fn test_color_conversion() {
        let c = Color(0xff3300);
        assert_eq!(c.to_rgba(1.0), [1.0, 0.2, 0.0, 1.0]);
        assert_eq!(Color(0x00000f).to_rgba(0.5), [0.0, 0.0, 15.0 / 255.0, 0.5]);
    }

    #[test]
    fn test_kind_tables() {
        let tuning = Tuning::default();
        assert_eq!(ObjectKind::Normal.points(&tuning), 10);
        assert_eq!(ObjectKind::Special.points(&tuning), 15);
        assert!(ObjectKind::Special.grants_powerup());
        assert!(!ObjectKind::Normal.grants_powerup());
        assert_eq!(ObjectKind::Normal.palette().len(), 4);
        assert_eq!(ObjectKind::Special.palette().len(), 2);
    }

    #[test]
    fn test_advance_moves_up() {
        let mut obj = object_at(100.0, 500.0, 30.0);
        obj.advance(1.0, 1.5);
        assert_eq!(obj.pos.y, 497.0);
        assert_eq!(obj.pos.x, 100.0);
    }

    #[test]
    fn test_escape_boundary() {
        // Bottom edge of the circle exactly on the top edge is still visible
        let obj = object_at(100.0, -30.0, 30.0);
        assert!(!obj.has_escaped());
        let obj = object_at(100.0, -30.5, 30.0);
        assert!(obj.has_escaped());
    }

    #[test]
    fn test_contains_is_strict() {
        let obj = object_at(0.0, 0.0, 10.0);
        assert!(obj.contains(Vec2::new(9.9, 0.0), 0.0));
        assert!(!obj.contains(Vec2::new(10.0, 0.0), 0.0));
        assert!(obj.contains(Vec2::new(10.0, 0.0), 1.0));
    }
}
