//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by insertion)
//! - No rendering or platform dependencies

pub mod clock;
pub mod difficulty;
pub mod hit;
pub mod object;
pub mod registry;
pub mod state;
pub mod tick;
pub mod timers;

pub use clock::{FixedTimestep, TickStatus};
pub use difficulty::{Difficulty, LevelChange, PowerupWindow};
pub use hit::{PointerDown, PointerSource, Strike, hit_test, resolve_hit};
pub use object::{Color, ObjectId, ObjectKind, SliceObject};
pub use registry::{ObjectRegistry, SpawnError, SpawnSpec};
pub use state::{GameEvent, GamePhase, GameState, PlayField};
pub use tick::{TickInput, tick};
pub use timers::{Scheduler, TimerEvent};
