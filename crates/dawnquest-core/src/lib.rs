//! DawnQuest engine.
//!
//! Owns the mutable game-state document and everything around it: the
//! command reducer (whole-state replacement, never in-place edits), the
//! memoized derived views, snapshot persistence with a local/remote
//! reconciler, the async write-behind outbox, and the persisted player
//! identity. All game rules live in `dawnquest-logic`; this crate only
//! moves state around.

pub mod command;
pub mod config;
pub mod engine;
pub mod identity;
pub mod outbox;
pub mod persistence;
pub mod reconcile;
pub mod state;

pub use command::{Command, CommandError};
pub use engine::GameEngine;
pub use identity::PlayerId;
pub use persistence::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore, StoreError};
pub use reconcile::LoadSource;
pub use state::GameState;
