//! Pointer hit-testing against live objects
//!
//! The first object in insertion order whose circle contains the pointer
//! wins, even when a later object's centre is closer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::object::{ObjectId, ObjectKind, SliceObject};
use super::registry::ObjectRegistry;
use crate::tuning::Tuning;

/// Where a pointer-down came from (touch gets a wider hit area)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

impl PointerSource {
    /// Extra hit radius for this source
    pub fn slack(self, tuning: &Tuning) -> f32 {
        match self {
            PointerSource::Mouse => tuning.hit_slack,
            PointerSource::Touch => tuning.touch_hit_slack,
        }
    }
}

/// A pointer-down in canvas-local pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerDown {
    pub pos: Vec2,
    pub source: PointerSource,
}

impl PointerDown {
    pub fn mouse(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            source: PointerSource::Mouse,
        }
    }

    pub fn touch(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            source: PointerSource::Touch,
        }
    }
}

/// A successful slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub id: ObjectId,
    pub kind: ObjectKind,
}

/// Find the first object under `point`
pub fn hit_test(objects: &[SliceObject], point: Vec2, slack: f32) -> Option<ObjectId> {
    objects
        .iter()
        .find(|obj| obj.contains(point, slack))
        .map(|obj| obj.id)
}

/// Hit-test and remove the struck object from the registry
pub fn resolve_hit(registry: &mut ObjectRegistry, point: Vec2, slack: f32) -> Option<Strike> {
    let id = hit_test(registry.all(), point, slack)?;
    let obj = registry.remove(id)?;
    Some(Strike {
        id: obj.id,
        kind: obj.kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::object::Color;
    use crate::sim::registry::SpawnSpec;
    use proptest::prelude::*;

    fn spawn(registry: &mut ObjectRegistry, x: f32, y: f32, radius: f32, kind: ObjectKind) -> ObjectId {
        registry
            .spawn(SpawnSpec {
                pos: Vec2::new(x, y),
                radius,
                speed: 1.0,
                kind,
                color: Color(0xffffff),
            })
            .unwrap()
    }

    #[test]
    fn test_miss_changes_nothing() {
        let mut registry = ObjectRegistry::new();
        spawn(&mut registry, 100.0, 100.0, 20.0, ObjectKind::Normal);
        assert_eq!(resolve_hit(&mut registry, Vec2::new(300.0, 300.0), 0.0), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_match_not_nearest() {
        let mut registry = ObjectRegistry::new();
        let first = spawn(&mut registry, 100.0, 100.0, 30.0, ObjectKind::Normal);
        let nearer = spawn(&mut registry, 120.0, 100.0, 30.0, ObjectKind::Special);

        // Pointer sits on the second object's centre but inside the first too
        let strike = resolve_hit(&mut registry, Vec2::new(120.0, 100.0), 0.0).unwrap();
        assert_eq!(strike.id, first);
        assert_eq!(strike.kind, ObjectKind::Normal);
        assert!(registry.contains(nearer));

        // The next click at the same spot now hits the remaining object
        let strike = resolve_hit(&mut registry, Vec2::new(120.0, 100.0), 0.0).unwrap();
        assert_eq!(strike.id, nearer);
        assert_eq!(strike.kind, ObjectKind::Special);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_pointer_source_slack() {
        let tuning = Tuning::default();
        assert_eq!(PointerSource::Mouse.slack(&tuning), tuning.hit_slack);
        assert_eq!(PointerSource::Touch.slack(&tuning), tuning.touch_hit_slack);
        assert_eq!(PointerDown::touch(1.0, 2.0).source, PointerSource::Touch);
    }

    #[test]
    fn test_slack_widens_hit_area() {
        let mut registry = ObjectRegistry::new();
        spawn(&mut registry, 0.0, 0.0, 10.0, ObjectKind::Normal);
        assert_eq!(hit_test(registry.all(), Vec2::new(15.0, 0.0), 0.0), None);
        assert!(hit_test(registry.all(), Vec2::new(15.0, 0.0), 8.0).is_some());
    }

    proptest! {
        #[test]
        fn prop_centre_hit_removes_and_reports_kind(
            positions in proptest::collection::vec((0.0f32..800.0, 0.0f32..600.0, 5.0f32..40.0, any::<bool>()), 1..10),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut registry = ObjectRegistry::new();
            for (x, y, r, special) in &positions {
                let kind = if *special { ObjectKind::Special } else { ObjectKind::Normal };
                spawn(&mut registry, *x, *y, *r, kind);
            }
            let target = registry.all()[pick.index(registry.len())].clone();
            let expected = hit_test(registry.all(), target.pos, 0.0).unwrap();
            let struck = registry.get(expected).unwrap().kind;

            let strike = resolve_hit(&mut registry, target.pos, 0.0).unwrap();
            prop_assert_eq!(strike.id, expected);
            prop_assert_eq!(strike.kind, struck);
            prop_assert!(!registry.contains(expected));
            prop_assert_eq!(registry.len(), positions.len() - 1);
        }

        #[test]
        fn prop_lone_object_centre_always_hits(
            x in -100.0f32..900.0,
            y in -100.0f32..900.0,
            r in 0.5f32..60.0,
            special in any::<bool>(),
        ) {
            let mut registry = ObjectRegistry::new();
            let kind = if special { ObjectKind::Special } else { ObjectKind::Normal };
            let id = spawn(&mut registry, x, y, r, kind);
            let strike = resolve_hit(&mut registry, Vec2::new(x, y), 0.0);
            prop_assert_eq!(strike, Some(Strike { id, kind }));
            prop_assert!(registry.is_empty());
        }
    }
}
