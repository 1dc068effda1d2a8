use std::path::PathBuf;

use asset_notes::config::{load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".assetnotesrc");
    let content = r#"
# comment
--watch

--history-limit 40

--notes-dir=Design/Notes
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.watch);
    assert!(!flags.edit);
    assert_eq!(flags.history_limit, Some(40));
    assert_eq!(flags.notes_dir, Some(PathBuf::from("Design/Notes")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".assetnotesrc");
    let content = "--watch\n--history-limit 40\n--debug-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "asset-notes".to_string(),
        "--history-limit".to_string(),
        "5".to_string(),
        "--edit".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.watch, "file flags should remain enabled");
    assert!(effective.edit, "cli flags should be applied");
    assert_eq!(effective.history_limit, Some(5), "cli should override limit");
    assert_eq!(
        effective.debug_log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}
