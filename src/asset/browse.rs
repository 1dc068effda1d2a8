use std::path::{Path, PathBuf};

use super::{AssetError, META_EXTENSION, Project};

/// One row of the asset browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Display name (file name or "..")
    pub name: String,
    /// Full path to the entry
    pub path: PathBuf,
    /// Whether this entry is a directory
    pub is_dir: bool,
    /// Whether this is the synthetic parent-directory row
    pub is_parent: bool,
}

impl AssetEntry {
    /// Whether selecting this row selects an asset (the ".." row does not).
    pub const fn is_asset(&self) -> bool {
        !self.is_parent
    }
}

/// List one level of the asset tree.
///
/// The ".." row comes first unless `dir` is the asset root. Directories
/// precede files and each group is sorted case-insensitively. Hidden
/// entries, `.meta` sidecars and the notes directory are skipped.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or lies outside the
/// project.
pub fn list_directory(project: &Project, dir: &Path) -> Result<Vec<AssetEntry>, AssetError> {
    let io_err = |source| AssetError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let dir = dir.canonicalize().map_err(io_err)?;
    if !dir.starts_with(project.root()) {
        return Err(AssetError::OutsideProject(dir));
    }

    let mut entries = Vec::new();
    if dir != project.asset_root()
        && let Some(parent) = dir.parent().filter(|p| p.starts_with(project.root()))
    {
        entries.push(AssetEntry {
            name: "..".to_string(),
            path: parent.to_path_buf(),
            is_dir: true,
            is_parent: true,
        });
    }

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in std::fs::read_dir(&dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(META_EXTENSION))
        {
            continue;
        }
        let is_dir = entry.file_type().map_err(io_err)?.is_dir();
        if is_dir && project.is_notes_dir(&path) {
            continue;
        }
        let row = AssetEntry {
            name,
            path,
            is_dir,
            is_parent: false,
        };
        if is_dir {
            dirs.push(row);
        } else {
            files.push(row);
        }
    }

    dirs.sort_by_key(|e| e.name.to_lowercase());
    files.sort_by_key(|e| e.name.to_lowercase());

    entries.extend(dirs);
    entries.extend(files);
    Ok(entries)
}
