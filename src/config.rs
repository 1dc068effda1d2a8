//! Saved default flags.
//!
//! A config file is a list of command-line flags, one or more per line, with
//! `#` comments. The global file lives in the platform config directory and a
//! `.assetnotesrc` in the working directory overrides it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const APP_DIR: &str = "asset-notes";
const LOCAL_FILE: &str = ".assetnotesrc";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub edit: bool,
    pub history_limit: Option<usize>,
    pub notes_dir: Option<PathBuf>,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; `other` wins for valued options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            edit: self.edit || other.edit,
            history_limit: other.history_limit.or(self.history_limit),
            notes_dir: other.notes_dir.clone().or_else(|| self.notes_dir.clone()),
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join(APP_DIR).join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR)
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR).join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join(APP_DIR)
                .join("config");
        }
    }

    PathBuf::from(LOCAL_FILE)
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE)
}

/// Read flags from a config file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write flags as a config file, creating its directory.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# asset-notes defaults (saved with --save)".to_string()];
    if flags.watch {
        lines.push("--watch".to_string());
    }
    if flags.edit {
        lines.push("--edit".to_string());
    }
    if let Some(limit) = flags.history_limit {
        lines.push(format!("--history-limit {limit}"));
    }
    if let Some(dir) = &flags.notes_dir {
        lines.push(format!("--notes-dir {}", dir.display()));
    }
    if let Some(log) = &flags.debug_log {
        lines.push(format!("--debug-log {}", log.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a config file if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of an argument list. Unknown tokens, subcommands and
/// malformed values are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        match name {
            "--watch" | "-w" => flags.watch = true,
            "--edit" | "-e" => flags.edit = true,
            "--history-limit" | "--notes-dir" | "--debug-log" => {
                let value = if let Some(value) = inline {
                    Some(value)
                } else {
                    i += 1;
                    tokens.get(i).map(String::as_str)
                };
                if let Some(value) = value {
                    match name {
                        "--history-limit" => {
                            if let Ok(limit) = value.parse() {
                                flags.history_limit = Some(limit);
                            }
                        }
                        "--notes-dir" => flags.notes_dir = Some(PathBuf::from(value)),
                        _ => flags.debug_log = Some(PathBuf::from(value)),
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "asset-notes",
            "--watch",
            "--edit",
            "--history-limit",
            "25",
            "--notes-dir=Docs/Notes",
            "--debug-log",
            "notes.log",
            "--select",
            "Assets/hero.png",
        ]));
        assert!(flags.watch);
        assert!(flags.edit);
        assert_eq!(flags.history_limit, Some(25));
        assert_eq!(flags.notes_dir, Some(PathBuf::from("Docs/Notes")));
        assert_eq!(flags.debug_log, Some(PathBuf::from("notes.log")));
    }

    #[test]
    fn test_bad_history_limit_is_ignored() {
        let flags = parse_flag_tokens(&args(&["--history-limit", "lots", "--watch"]));
        assert_eq!(flags.history_limit, None);
        assert!(flags.watch);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            watch: true,
            history_limit: Some(10),
            notes_dir: Some(PathBuf::from("Notes")),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            edit: true,
            history_limit: Some(50),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.watch);
        assert!(merged.edit);
        assert_eq!(merged.history_limit, Some(50));
        assert_eq!(merged.notes_dir, Some(PathBuf::from("Notes")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            watch: true,
            edit: true,
            history_limit: Some(0),
            notes_dir: Some(PathBuf::from("Docs/Notes")),
            debug_log: Some(PathBuf::from("notes.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
