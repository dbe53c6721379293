//! Persistence: the project file, snapshot version history, rollback.
//!
//! # Invariants
//! - Version numbers strictly increase; the next one is always `max + 1`.
//! - A written version is immutable; it is only ever deleted by retention pruning.
//! - Recording a snapshot identical to the latest version is a no-op unless forced.
//! - Rollback only reads; committing the restored state is a separate write.

pub mod campaign;
pub mod project_file;
pub mod snapshot;
pub mod store;

pub use campaign::Campaign;
pub use project_file::{PROJECT_FILE, load_project, save_project, write_project_json};
pub use snapshot::Snapshot;
pub use store::{StoreConfig, StoreError, Version, VersionStore};
