//! Object registry: sole owner of the live object set
//!
//! Iteration is always in insertion order so rendering and hit priority are
//! deterministic.

use glam::Vec2;
use rand::Rng;
use thiserror::Error;

use super::object::{Color, ObjectId, ObjectKind, SliceObject};
use super::state::PlayField;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    #[error("play field {width}x{height} has no area")]
    InvalidField { width: f32, height: f32 },
    #[error("object radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("object speed must be non-negative and finite, got {0}")]
    InvalidSpeed(f32),
    #[error("object position is not finite")]
    InvalidPosition,
}

/// Everything needed to create one object
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSpec {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub kind: ObjectKind,
    pub color: Color,
}

impl SpawnSpec {
    /// Draw a new object on the entry edge (just below the bottom of the field)
    pub fn random<R: Rng>(field: PlayField, tuning: &Tuning, rng: &mut R) -> Result<Self, SpawnError> {
        if !field.is_valid() {
            return Err(SpawnError::InvalidField {
                width: field.width,
                height: field.height,
            });
        }

        let radius = if tuning.radius_max > tuning.radius_min {
            rng.random_range(tuning.radius_min..tuning.radius_max)
        } else {
            tuning.radius_min
        };
        let x = rng.random_range(0.0..field.width);
        let kind = if rng.random_bool(f64::from(tuning.special_chance.clamp(0.0, 1.0))) {
            ObjectKind::Special
        } else {
            ObjectKind::Normal
        };
        let palette = kind.palette();
        let color = palette[rng.random_range(0..palette.len())];
        let jitter = if tuning.speed_jitter > 0.0 {
            rng.random_range(0.0..tuning.speed_jitter)
        } else {
            0.0
        };

        Ok(Self {
            pos: Vec2::new(x, field.height + radius),
            radius,
            speed: tuning.base_speed + jitter,
            kind,
            color,
        })
    }

    fn validate(&self) -> Result<(), SpawnError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SpawnError::InvalidRadius(self.radius));
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(SpawnError::InvalidSpeed(self.speed));
        }
        if !self.pos.is_finite() {
            return Err(SpawnError::InvalidPosition);
        }
        Ok(())
    }
}

/// Ordered collection of live objects
#[derive(Debug, Clone)]
pub struct ObjectRegistry {
    objects: Vec<SliceObject>,
    next_id: u64,
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a new object; invalid geometry creates nothing
    pub fn spawn(&mut self, spec: SpawnSpec) -> Result<ObjectId, SpawnError> {
        spec.validate()?;

        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(SliceObject {
            id,
            pos: spec.pos,
            radius: spec.radius,
            speed: spec.speed,
            kind: spec.kind,
            color: spec.color,
        });
        Ok(id)
    }

    /// Move every object and report the ones now past the top edge.
    ///
    /// Escaped objects stay live; the caller decides when to remove them.
    pub fn advance(&mut self, dt: f32, speed_multiplier: f32) -> Vec<ObjectId> {
        let mut escaped = Vec::new();
        for obj in &mut self.objects {
            obj.advance(dt, speed_multiplier);
            if obj.has_escaped() {
                escaped.push(obj.id);
            }
        }
        escaped
    }

    /// Remove an object; unknown ids are ignored
    pub fn remove(&mut self, id: ObjectId) -> Option<SliceObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Live objects in insertion order
    pub fn all(&self) -> &[SliceObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&SliceObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Drop every live object (ids keep increasing)
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
