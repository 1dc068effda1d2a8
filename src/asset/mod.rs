//! Asset identifiers and the project asset tree.
//!
//! An asset is any file or directory under the project's asset root. Its
//! identifier comes from the host engine's `.meta` sidecar when one exists
//! (the `guid:` line), and otherwise from a name-based UUID of the asset's
//! project-relative path. Either way the identifier is stable across runs,
//! which is what lets a note file be keyed by it.

mod browse;

pub use browse::{AssetEntry, list_directory};

use std::ffi::OsString;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Directory name holding assets inside a project, when present.
pub const ASSET_DIR_NAME: &str = "Assets";
/// Default note directory name, created next to the asset directory.
pub const NOTES_DIR_NAME: &str = "Notes";
/// Extension of the host engine's per-asset sidecar.
pub const META_EXTENSION: &str = "meta";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid asset identifier {0:?}")]
    InvalidId(String),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("{} is outside the project", .0.display())]
    OutsideProject(PathBuf),
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Stable key naming an asset's note file.
///
/// Only ASCII alphanumerics, `-` and `_` are allowed so the identifier can
/// be used verbatim as a file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(String);

impl AssetId {
    /// Validate and wrap an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::InvalidId`] for empty strings or strings with
    /// characters that are not safe in a file name.
    pub fn parse(raw: &str) -> Result<Self, AssetError> {
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(AssetError::InvalidId(raw.to_string()))
        }
    }

    /// Derive an identifier from a project-relative path.
    pub fn from_relative_path(relative: &str) -> Self {
        let uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, relative.as_bytes());
        Self(uuid.simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A project directory: where assets live and where their notes go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    asset_root: PathBuf,
    notes_dir: PathBuf,
}

impl Project {
    /// Open a project rooted at `root`.
    ///
    /// The asset root is `<root>/Assets` when that directory exists, else the
    /// project root itself. Notes default to `<root>/Notes`; a relative
    /// override is resolved against the project root.
    ///
    /// # Errors
    ///
    /// Returns an error when `root` is not an existing directory.
    pub fn open(root: &Path, notes_dir: Option<&Path>) -> Result<Self, AssetError> {
        if !root.is_dir() {
            return Err(AssetError::NotADirectory(root.to_path_buf()));
        }
        let root = root.canonicalize().map_err(|source| AssetError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let assets = root.join(ASSET_DIR_NAME);
        let asset_root = if assets.is_dir() { assets } else { root.clone() };
        let notes_dir = match notes_dir {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => root.join(dir),
            None => root.join(NOTES_DIR_NAME),
        };
        Ok(Self {
            root,
            asset_root,
            notes_dir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Project-relative path of `path` using `/` separators.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::OutsideProject`] when `path` is not under the
    /// project root.
    pub fn relative(&self, path: &Path) -> Result<String, AssetError> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let absolute = absolute.canonicalize().unwrap_or(absolute);
        let rel = absolute
            .strip_prefix(&self.root)
            .map_err(|_| AssetError::OutsideProject(path.to_path_buf()))?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(parts.join("/"))
    }

    /// Resolve a project-relative asset path to an existing file or directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the path escapes the project or does not exist.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, AssetError> {
        let rel = Path::new(relative.trim_start_matches('/'));
        if rel
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(AssetError::OutsideProject(rel.to_path_buf()));
        }
        let path = self.root.join(rel);
        if path.exists() {
            Ok(path)
        } else {
            Err(AssetError::NotFound(relative.to_string()))
        }
    }

    /// Identify an asset.
    ///
    /// Uses the GUID from the asset's `.meta` sidecar when available and
    /// falls back to a UUID derived from the project-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::OutsideProject`] for paths outside the project.
    pub fn identify(&self, path: &Path) -> Result<AssetId, AssetError> {
        let relative = self.relative(path)?;
        if let Some(id) = read_meta_guid(&self.root.join(&relative)) {
            return Ok(id);
        }
        Ok(AssetId::from_relative_path(&relative))
    }

    /// Whether `path` is the notes directory (which is never browsable).
    pub fn is_notes_dir(&self, path: &Path) -> bool {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        canonical == self.notes_dir
            || self
                .notes_dir
                .canonicalize()
                .is_ok_and(|notes| notes == canonical)
    }
}

/// Path of the `.meta` sidecar for an asset.
pub fn meta_path(asset: &Path) -> PathBuf {
    let mut name: OsString = asset.as_os_str().to_os_string();
    name.push(".");
    name.push(META_EXTENSION);
    PathBuf::from(name)
}

fn read_meta_guid(asset: &Path) -> Option<AssetId> {
    let content = std::fs::read_to_string(meta_path(asset)).ok()?;
    content.lines().find_map(|line| {
        let value = line.trim().strip_prefix("guid:")?;
        AssetId::parse(value.trim()).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_rejects_path_characters() {
        assert!(AssetId::parse("abc123").is_ok());
        assert!(AssetId::parse("a-b_c").is_ok());
        assert!(AssetId::parse("").is_err());
        assert!(AssetId::parse("../etc").is_err());
        assert!(AssetId::parse("a b").is_err());
        assert!(AssetId::parse("a/b").is_err());
    }

    #[test]
    fn test_path_derived_id_is_stable_hex() {
        let a = AssetId::from_relative_path("Assets/Textures/hero.png");
        let b = AssetId::from_relative_path("Assets/Textures/hero.png");
        let c = AssetId::from_relative_path("Assets/Textures/villain.png");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_open_prefers_assets_subdirectory() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Assets")).unwrap();
        let project = Project::open(dir.path(), None).unwrap();
        assert!(project.asset_root().ends_with("Assets"));
        assert!(project.notes_dir().ends_with("Notes"));
        assert_eq!(project.notes_dir().parent(), Some(project.root()));
    }

    #[test]
    fn test_open_without_assets_uses_root() {
        let dir = tempdir().unwrap();
        let project = Project::open(dir.path(), Some(Path::new(".notes"))).unwrap();
        assert_eq!(project.asset_root(), project.root());
        assert_eq!(project.notes_dir(), project.root().join(".notes"));
    }

    #[test]
    fn test_open_rejects_missing_root() {
        let dir = tempdir().unwrap();
        let err = Project::open(&dir.path().join("nope"), None).unwrap_err();
        assert!(matches!(err, AssetError::NotADirectory(_)));
    }

    #[test]
    fn test_identify_reads_meta_guid() {
        let dir = tempdir().unwrap();
        let asset = dir.path().join("hero.png");
        std::fs::write(&asset, b"png").unwrap();
        std::fs::write(
            meta_path(&asset),
            "fileFormatVersion: 2\nguid: 4f1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e\n",
        )
        .unwrap();
        let project = Project::open(dir.path(), None).unwrap();
        let id = project.identify(&asset).unwrap();
        assert_eq!(id.as_str(), "4f1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e");
    }

    #[test]
    fn test_identify_falls_back_when_meta_has_no_guid() {
        let dir = tempdir().unwrap();
        let asset = dir.path().join("hero.png");
        std::fs::write(&asset, b"png").unwrap();
        std::fs::write(meta_path(&asset), "fileFormatVersion: 2\n").unwrap();
        let project = Project::open(dir.path(), None).unwrap();
        let id = project.identify(&asset).unwrap();
        assert_eq!(id, AssetId::from_relative_path("hero.png"));
    }

    #[test]
    fn test_identify_accepts_relative_paths() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Assets/Audio")).unwrap();
        std::fs::write(dir.path().join("Assets/Audio/step.wav"), b"").unwrap();
        let project = Project::open(dir.path(), None).unwrap();
        let by_rel = project.identify(Path::new("Assets/Audio/step.wav")).unwrap();
        let by_abs = project
            .identify(&project.root().join("Assets/Audio/step.wav"))
            .unwrap();
        assert_eq!(by_rel, by_abs);
        assert_eq!(by_rel, AssetId::from_relative_path("Assets/Audio/step.wav"));
    }

    #[test]
    fn test_identify_rejects_outside_paths() {
        let project_dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        let stray = other.path().join("stray.txt");
        std::fs::write(&stray, "x").unwrap();
        let project = Project::open(project_dir.path(), None).unwrap();
        assert!(matches!(
            project.identify(&stray),
            Err(AssetError::OutsideProject(_))
        ));
    }

    #[test]
    fn test_resolve_refuses_parent_components() {
        let dir = tempdir().unwrap();
        let project = Project::open(dir.path(), None).unwrap();
        assert!(matches!(
            project.resolve("../secret"),
            Err(AssetError::OutsideProject(_))
        ));
        assert!(matches!(
            project.resolve("missing.png"),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn test_meta_path_appends_extension() {
        assert_eq!(
            meta_path(Path::new("Assets/Foo")),
            PathBuf::from("Assets/Foo.meta")
        );
        assert_eq!(
            meta_path(Path::new("a/b.png")),
            PathBuf::from("a/b.png.meta")
        );
    }
}
