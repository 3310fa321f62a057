//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (client to canvas coordinates)
//! - Storage (LocalStorage on web)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod storage;

pub use input::{PointerDown, PointerSource, canvas_local};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
