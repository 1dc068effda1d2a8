//! Non-interactive subcommands.
//!
//! These work on the same note files as the terminal UI, which makes notes
//! scriptable: print an identifier, read or replace a note, list what is
//! annotated.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Subcommand;

use crate::asset::{AssetId, Project, list_directory};
use crate::store::{NoteStore, SaveOutcome};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print an asset's identifier
    Id {
        /// Asset path (relative to the working directory or the project)
        asset: PathBuf,
    },
    /// Print an asset's note
    Show { asset: PathBuf },
    /// Replace an asset's note; blank text deletes it
    Set {
        asset: PathBuf,
        /// Note text; words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Delete an asset's note
    Clear { asset: PathBuf },
    /// List identifiers that have notes
    List,
}

/// Run a subcommand against `project`, writing output to `out`.
///
/// # Errors
///
/// Returns an error when the asset cannot be found or identified, or the
/// note cannot be read or written.
pub fn run(project: &Project, command: &Command, out: &mut impl Write) -> Result<()> {
    let store = NoteStore::new(project.notes_dir());
    match command {
        Command::Id { asset } => {
            let (_, id) = identify(project, asset)?;
            writeln!(out, "{id}")?;
        }
        Command::Show { asset } => {
            let (_, id) = identify(project, asset)?;
            let text = store.load(&id)?;
            if !text.is_empty() {
                write!(out, "{text}")?;
                if !text.ends_with('\n') {
                    writeln!(out)?;
                }
            }
        }
        Command::Set { asset, text } => {
            let (path, id) = identify(project, asset)?;
            let outcome = store.save_or_delete(&id, &text.join(" "))?;
            report(out, &store, &id, &path, outcome)?;
        }
        Command::Clear { asset } => {
            let (path, id) = identify(project, asset)?;
            let outcome = store.save_or_delete(&id, "")?;
            report(out, &store, &id, &path, outcome)?;
        }
        Command::List => {
            let ids = store.list()?;
            let paths = if ids.is_empty() {
                HashMap::new()
            } else {
                asset_index(project)?
            };
            for id in ids {
                match paths.get(&id) {
                    Some(relative) => writeln!(out, "{id}  {relative}")?,
                    None => writeln!(out, "{id}  (asset not found)")?,
                }
            }
        }
    }
    Ok(())
}

fn report(
    out: &mut impl Write,
    store: &NoteStore,
    id: &AssetId,
    asset: &Path,
    outcome: SaveOutcome,
) -> Result<()> {
    let note = store.path_for(id);
    match outcome {
        SaveOutcome::Written => writeln!(out, "wrote {}", note.display())?,
        SaveOutcome::Deleted => writeln!(out, "deleted {}", note.display())?,
        SaveOutcome::Unchanged => writeln!(out, "no note for {}", asset.display())?,
    }
    Ok(())
}

/// Find an asset given on the command line and identify it.
///
/// A path that exists as given is used directly; otherwise it is taken as
/// relative to the project root.
fn identify(project: &Project, asset: &Path) -> Result<(PathBuf, AssetId)> {
    let path = if asset.exists() {
        asset
            .canonicalize()
            .with_context(|| format!("Cannot resolve {}", asset.display()))?
    } else {
        project
            .resolve(&asset.to_string_lossy())
            .with_context(|| format!("No asset at {}", asset.display()))?
    };
    if project.is_notes_dir(&path) || path.starts_with(project.notes_dir()) {
        bail!("{} is in the notes directory", path.display());
    }
    let id = project
        .identify(&path)
        .with_context(|| format!("Cannot identify {}", path.display()))?;
    Ok((path, id))
}

/// Identifier to project-relative path for every asset in the tree.
fn asset_index(project: &Project) -> Result<HashMap<AssetId, String>> {
    let mut index = HashMap::new();
    let mut pending = vec![project.asset_root().to_path_buf()];
    if let Ok(id) = project.identify(project.asset_root()) {
        index.insert(id, project.relative(project.asset_root())?);
    }
    while let Some(dir) = pending.pop() {
        for entry in list_directory(project, &dir)? {
            if entry.is_parent {
                continue;
            }
            let id = project.identify(&entry.path)?;
            index.entry(id).or_insert(project.relative(&entry.path)?);
            if entry.is_dir {
                pending.push(entry.path);
            }
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    fn create_project() -> (TempDir, Project) {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Assets/Audio")).unwrap();
        std::fs::write(dir.path().join("Assets/Audio/step.wav"), b"").unwrap();
        std::fs::write(dir.path().join("Assets/Audio/step.wav.meta"), "guid: 4b1d\n").unwrap();
        let project = Project::open(dir.path(), None).unwrap();
        (dir, project)
    }

    fn run_to_string(project: &Project, command: Command) -> String {
        let mut out = Vec::new();
        run(project, &command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_id_prints_meta_guid() {
        let (_dir, project) = create_project();
        let out = run_to_string(
            &project,
            Command::Id {
                asset: PathBuf::from("Assets/Audio/step.wav"),
            },
        );
        assert_eq!(out, "4b1d\n");
    }

    #[test]
    fn test_set_show_and_clear() {
        let (_dir, project) = create_project();
        let asset = PathBuf::from("Assets/Audio/step.wav");

        let out = run_to_string(
            &project,
            Command::Set {
                asset: asset.clone(),
                text: vec!["too".to_string(), "loud".to_string()],
            },
        );
        assert!(out.starts_with("wrote "));
        assert_eq!(
            std::fs::read_to_string(project.notes_dir().join("4b1d.txt")).unwrap(),
            "too loud"
        );

        let out = run_to_string(&project, Command::Show { asset: asset.clone() });
        assert_eq!(out, "too loud\n");

        let out = run_to_string(&project, Command::Clear { asset: asset.clone() });
        assert!(out.starts_with("deleted "));
        assert!(!project.notes_dir().join("4b1d.txt").exists());

        let out = run_to_string(&project, Command::Show { asset });
        assert_eq!(out, "");
    }

    #[test]
    fn test_list_names_assets_and_orphans() {
        let (_dir, project) = create_project();
        let store = NoteStore::new(project.notes_dir());
        store
            .save_or_delete(&AssetId::parse("4b1d").unwrap(), "note")
            .unwrap();
        store
            .save_or_delete(&AssetId::parse("dead").unwrap(), "orphan")
            .unwrap();

        let out = run_to_string(&project, Command::List);
        assert_eq!(
            out,
            "4b1d  Assets/Audio/step.wav\ndead  (asset not found)\n"
        );
    }

    #[test]
    fn test_unknown_asset_is_an_error() {
        let (_dir, project) = create_project();
        let mut out = Vec::new();
        let err = run(
            &project,
            &Command::Id {
                asset: PathBuf::from("Assets/missing.png"),
            },
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("No asset at"));
    }
}
