//! Scene tessellation
//!
//! Turns a read-only view of the game into a triangle list in canvas pixels.

use super::shapes::{circle, ring, segments_for_radius};
use super::vertex::{Vertex, colors};
use crate::sim::{GameState, ObjectKind};

/// Outline width around special objects
const SPECIAL_RING_WIDTH: f32 = 3.0;

/// Clear colour for the current frame
pub fn background(state: &GameState) -> [f32; 4] {
    if state.powerup_active() {
        colors::SLOWMO_BACKGROUND
    } else {
        colors::BACKGROUND
    }
}

/// Every live object, in insertion order (later objects draw on top)
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for obj in state.objects() {
        let segments = segments_for_radius(obj.radius);
        vertices.extend(circle(obj.pos, obj.radius, obj.color.to_rgba(1.0), segments));
        if obj.kind == ObjectKind::Special {
            vertices.extend(ring(
                obj.pos,
                obj.radius,
                obj.radius + SPECIAL_RING_WIDTH,
                colors::SPECIAL_RING,
                segments,
            ));
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PlayField, TickInput, tick};
    use crate::tuning::Tuning;

    fn running(special_chance: f32) -> GameState {
        let tuning = Tuning {
            special_chance,
            ..Tuning::steady()
        };
        let mut state = GameState::new(5, tuning, PlayField::new(400.0, 4000.0), 0);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start);
        state
    }

    #[test]
    fn test_idle_scene_is_empty() {
        let state = GameState::new(5, Tuning::default(), PlayField::new(400.0, 300.0), 0);
        assert!(build_scene(&state).is_empty());
        assert_eq!(background(&state), colors::BACKGROUND);
    }

    #[test]
    fn test_normal_object_is_filled_disc() {
        let state = running(0.0);
        let obj = &state.objects()[0];
        let verts = build_scene(&state);
        assert_eq!(verts.len(), segments_for_radius(obj.radius) as usize * 3);
        assert!(verts.iter().all(|v| v.color == obj.color.to_rgba(1.0)));
    }

    #[test]
    fn test_special_object_gets_outline() {
        let state = running(1.0);
        let obj = &state.objects()[0];
        let verts = build_scene(&state);
        assert_eq!(verts.len(), segments_for_radius(obj.radius) as usize * 9);
        assert!(verts.iter().any(|v| v.color == colors::SPECIAL_RING));
    }

    #[test]
    fn test_slow_motion_tints_background() {
        let mut state = running(0.0);
        state.on_hit(ObjectKind::Special);
        assert_eq!(background(&state), colors::SLOWMO_BACKGROUND);
    }
}
