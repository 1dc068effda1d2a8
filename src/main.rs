//! asset-notes - attach free-text notes to project assets.
//!
//! # Usage
//!
//! ```bash
//! asset-notes --project ~/games/dungeon
//! asset-notes --watch --select Assets/hero.png
//! asset-notes id Assets/hero.png
//! asset-notes set Assets/hero.png "rig needs a root bone"
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;

use asset_notes::app::App;
use asset_notes::asset::Project;
use asset_notes::commands::{self, Command};
use asset_notes::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use asset_notes::history::DEFAULT_HISTORY_LIMIT;

/// Attach free-text notes to project assets
#[derive(Parser, Debug)]
#[command(name = "asset-notes", version, about, long_about = None)]
struct Cli {
    /// Project directory (its Assets/ folder is browsed when present)
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    project: PathBuf,

    /// Asset to select on startup
    #[arg(short, long, value_name = "ASSET")]
    select: Option<PathBuf>,

    /// Reload the selected note when it changes on disk
    #[arg(short, long)]
    watch: bool,

    /// Start in edit mode
    #[arg(short, long)]
    edit: bool,

    /// Undo steps kept per selected asset (0 disables undo)
    #[arg(long, value_name = "N")]
    history_limit: Option<usize>,

    /// Directory holding note files (default: <project>/Notes)
    #[arg(long, value_name = "PATH")]
    notes_dir: Option<PathBuf>,

    /// Write log output to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Set up tracing. The terminal UI owns the screen, so without a log file
/// its output is discarded; subcommands log to stderr.
fn init_logging(debug_log: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match debug_log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if interactive => builder.with_writer(std::io::sink).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let debug_log = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("ASSET_NOTES_DEBUG_LOG").map(PathBuf::from));
    init_logging(debug_log.as_deref(), cli.command.is_none())?;

    let project = Project::open(&cli.project, effective.notes_dir.as_deref())
        .with_context(|| format!("Cannot open project {}", cli.project.display()))?;

    if let Some(command) = &cli.command {
        let stdout = std::io::stdout();
        return commands::run(&project, command, &mut stdout.lock());
    }

    let initial_selection = match cli.select {
        Some(path) if path.exists() => Some(path),
        Some(path) => Some(
            project
                .resolve(&path.to_string_lossy())
                .with_context(|| format!("Asset not found: {}", path.display()))?,
        ),
        None => None,
    };

    let mut app = App::new(project)
        .with_watch(effective.watch)
        .with_edit_mode(effective.edit)
        .with_history_limit(effective.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
        .with_initial_selection(initial_selection)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
