use super::paths::get_cache_dir;
use crate::services::ports::settings::{ConfigurationProvider, SearchSettings, Settings};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const SETTINGS_DIR: &str = ".zcode";
const SETTINGS_FILE: &str = "setting.json";

pub fn get_settings_path() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// `<folder>/.zcode/setting.json`
pub fn folder_settings_path(folder: &Path) -> PathBuf {
    folder.join(SETTINGS_DIR).join(SETTINGS_FILE)
}

pub fn ensure_settings_file() -> io::Result<PathBuf> {
    let path = get_settings_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Cannot determine settings directory"))?;
    ensure_settings_file_at(&path)?;
    Ok(path)
}

/// Writes a default settings file unless one already exists. Returns whether
/// a file was created.
pub fn ensure_settings_file_at(path: &Path) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            let content = serde_json::to_vec_pretty(&Settings::default())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            file.write_all(&content)?;
            tracing::info!(path = %path.display(), "created default settings file");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn load_settings() -> Option<Settings> {
    load_settings_from(&get_settings_path()?)
}

pub fn load_settings_from(path: &Path) -> Option<Settings> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid settings file");
            None
        }
    }
}

// Folder files only override the keys they actually set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchOverrides {
    follow_symlinks: Option<bool>,
    use_ripgrep: Option<bool>,
}

impl SearchOverrides {
    fn apply(self, base: SearchSettings) -> SearchSettings {
        SearchSettings {
            follow_symlinks: self.follow_symlinks.unwrap_or(base.follow_symlinks),
            use_ripgrep: self.use_ripgrep.unwrap_or(base.use_ripgrep),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FolderSettingsFile {
    #[serde(default)]
    search: SearchOverrides,
}

fn load_folder_overrides(path: &Path) -> Option<SearchOverrides> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<FolderSettingsFile>(&data) {
        Ok(file) => Some(file.search),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid folder settings file");
            None
        }
    }
}

/// Folder settings from `<folder>/.zcode/setting.json`, falling back to the
/// user settings. Lookups are cached per folder until [`invalidate`].
///
/// [`invalidate`]: FolderSettingsProvider::invalidate
pub struct FolderSettingsProvider {
    user: Settings,
    cache: RwLock<FxHashMap<PathBuf, SearchSettings>>,
}

impl FolderSettingsProvider {
    pub fn new(user: Settings) -> Self {
        Self {
            user,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }
}

impl ConfigurationProvider for FolderSettingsProvider {
    fn search_settings(&self, folder: &Path) -> SearchSettings {
        if let Some(hit) = self.cache.read().ok().and_then(|c| c.get(folder).copied()) {
            return hit;
        }

        let settings = load_folder_overrides(&folder_settings_path(folder))
            .map(|o| o.apply(self.user.search))
            .unwrap_or(self.user.search);

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(folder.to_path_buf(), settings);
        }
        settings
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/services/adapters/settings.rs"]
mod tests;
