//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Disk access (loading, saving and deleting notes) happens in the side
//! effect handler that runs after each `update`.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Focus, Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::asset::Project;
use crate::history::DEFAULT_HISTORY_LIMIT;

/// Main application struct that owns the startup options and runs the
/// event loop.
pub struct App {
    project: Project,
    initial_selection: Option<PathBuf>,
    watch_enabled: bool,
    start_in_edit: bool,
    history_limit: usize,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application browsing the given project.
    pub const fn new(project: Project) -> Self {
        Self {
            project,
            initial_selection: None,
            watch_enabled: false,
            start_in_edit: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Enable or disable watching the selected note.
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Start in edit mode instead of view mode.
    pub const fn with_edit_mode(mut self, enabled: bool) -> Self {
        self.start_in_edit = enabled;
        self
    }

    /// Number of undo steps kept per selection. Zero disables undo.
    pub const fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Asset to select on startup.
    pub fn with_initial_selection(mut self, path: Option<PathBuf>) -> Self {
        self.initial_selection = path;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
