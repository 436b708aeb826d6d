//! Scene Manipulator Editor
//!
//! Host-facing layer over `manip-core`:
//! - Command: serializable descriptions of every manipulation
//! - Preview: live, cancellable previews that never reach undo history
//! - Commit: undoable execution through the host's recorder
//! - History: an in-memory undo recorder
//! - Engine: the per-surface entry point tying these together
//! - Config: persisted defaults for command parameters

pub mod command;
pub mod commit;
pub mod config;
pub mod engine;
pub mod history;
pub mod preview;

pub use command::Command;
pub use commit::{CommitOutcome, commit};
pub use config::{ConfigError, ConfigManager, ManipulatorConfig, SharedConfig, create_shared_config};
pub use engine::Manipulator;
pub use history::{HistoryEntry, MemoryHistory};
pub use preview::PreviewSession;
