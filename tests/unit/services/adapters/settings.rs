use super::*;
use tempfile::tempdir;

fn write_folder_settings(folder: &Path, json: &str) {
    let path = folder_settings_path(folder);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, json).unwrap();
}

#[test]
fn test_load_settings_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("setting.json");
    std::fs::write(
        &path,
        r#"{ "search": { "useRipgrep": false }, "statusMessageTimeoutMs": 2500 }"#,
    )
    .unwrap();

    let settings = load_settings_from(&path).unwrap();
    assert!(!settings.search.use_ripgrep);
    assert!(settings.search.follow_symlinks);
    assert_eq!(settings.status_message_timeout_ms, 2500);
}

#[test]
fn test_load_settings_missing_or_invalid() {
    let dir = tempdir().unwrap();
    assert!(load_settings_from(&dir.path().join("nope.json")).is_none());

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ search: ").unwrap();
    assert!(load_settings_from(&path).is_none());
}

#[test]
fn test_ensure_settings_file_writes_defaults_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".zcode").join("setting.json");

    assert!(ensure_settings_file_at(&path).unwrap());
    assert_eq!(load_settings_from(&path), Some(Settings::default()));

    std::fs::write(&path, r#"{ "statusMessageTimeoutMs": 1 }"#).unwrap();
    assert!(!ensure_settings_file_at(&path).unwrap());
    assert_eq!(load_settings_from(&path).unwrap().status_message_timeout_ms, 1);
}

#[test]
fn test_folder_settings_path_layout() {
    let path = folder_settings_path(Path::new("/w/a"));
    assert_eq!(path, PathBuf::from("/w/a/.zcode/setting.json"));
}

#[test]
fn test_folder_without_settings_uses_user_settings() {
    let dir = tempdir().unwrap();
    let mut user = Settings::default();
    user.search.follow_symlinks = false;

    let provider = FolderSettingsProvider::new(user);
    let settings = provider.search_settings(dir.path());
    assert!(!settings.follow_symlinks);
    assert!(settings.use_ripgrep);
}

#[test]
fn test_folder_override_and_invalidate() {
    let dir = tempdir().unwrap();
    write_folder_settings(dir.path(), r#"{ "search": { "followSymlinks": false } }"#);

    let provider = FolderSettingsProvider::new(Settings::default());
    assert!(!provider.search_settings(dir.path()).follow_symlinks);

    // cached until invalidated
    write_folder_settings(dir.path(), r#"{ "search": { "useRipgrep": false } }"#);
    let cached = provider.search_settings(dir.path());
    assert!(!cached.follow_symlinks);
    assert!(cached.use_ripgrep);

    provider.invalidate();
    let fresh = provider.search_settings(dir.path());
    assert!(fresh.follow_symlinks);
    assert!(!fresh.use_ripgrep);
}

#[test]
fn test_folder_file_overrides_only_keys_it_sets() {
    let dir = tempdir().unwrap();
    write_folder_settings(dir.path(), r#"{ "search": { "useRipgrep": false } }"#);

    let mut user = Settings::default();
    user.search.follow_symlinks = false;
    let provider = FolderSettingsProvider::new(user);

    let settings = provider.search_settings(dir.path());
    assert!(!settings.follow_symlinks);
    assert!(!settings.use_ripgrep);
}

#[test]
fn test_folder_file_without_search_block_keeps_user_settings() {
    let dir = tempdir().unwrap();
    write_folder_settings(dir.path(), r#"{ "statusMessageTimeoutMs": 5 }"#);

    let mut user = Settings::default();
    user.search.use_ripgrep = false;
    let provider = FolderSettingsProvider::new(user);

    let settings = provider.search_settings(dir.path());
    assert!(settings.follow_symlinks);
    assert!(!settings.use_ripgrep);
}
