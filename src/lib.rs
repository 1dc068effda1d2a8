// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. asset::AssetId)
    clippy::module_name_repetitions
)]

//! # asset-notes
//!
//! Attach a free-text note to any asset in a project, from the terminal.
//!
//! Each note is a plain UTF-8 file named after the asset's stable
//! identifier, written as you type and removed once it is blank. The note
//! pane has a view mode with clickable links and an edit mode with
//! snapshot-based undo/redo that resets whenever the selection changes.
//!
//! ## Architecture
//!
//! The terminal front end uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`asset`]: Asset identifiers and the asset tree
//! - [`store`]: Identifier-keyed note files
//! - [`history`]: Bounded undo/redo snapshots
//! - [`editor`]: Note text buffer
//! - [`links`]: Hyperlinks in a note
//! - [`session`]: Selection, note text, history and mode
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: Note file watching
//! - [`commands`]: Non-interactive subcommands
//! - [`config`]: Saved default flags

pub mod app;
pub mod asset;
pub mod commands;
pub mod config;
pub mod editor;
pub mod history;
pub mod links;
pub mod session;
pub mod store;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::asset::{AssetId, Project};
    pub use crate::session::{Mode, NoteSession};
    pub use crate::store::NoteStore;
    pub use crate::ui::viewport::Viewport;
}
