//! 应用目录
//!
//! - 日志：<数据目录>/zcode/logs
//!   （~/Library/Application Support、$XDG_DATA_HOME 或 ~/.local/share、%APPDATA%）
//! - 用户设置：<缓存目录>/.zcode/setting.json
//!   （~/Library/Caches、$XDG_CACHE_HOME 或 ~/.cache、%LOCALAPPDATA%）

use std::io;
use std::path::PathBuf;

const APP_NAME: &str = "zcode";
const LOG_DIR: &str = "logs";

fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn under_home(rel: &str) -> Option<PathBuf> {
    env_dir("HOME").map(|home| home.join(rel))
}

fn data_home() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        under_home("Library/Application Support")
    } else if cfg!(windows) {
        env_dir("APPDATA")
    } else if cfg!(unix) {
        env_dir("XDG_DATA_HOME").or_else(|| under_home(".local/share"))
    } else {
        None
    }
}

pub(crate) fn get_cache_dir() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        under_home("Library/Caches")
    } else if cfg!(windows) {
        env_dir("LOCALAPPDATA").or_else(|| env_dir("APPDATA"))
    } else if cfg!(unix) {
        env_dir("XDG_CACHE_HOME").or_else(|| under_home(".cache"))
    } else {
        None
    }
}

pub fn get_log_dir() -> Option<PathBuf> {
    data_home().map(|dir| dir.join(APP_NAME).join(LOG_DIR))
}

/// 确保日志目录存在
pub fn ensure_log_dir() -> io::Result<PathBuf> {
    let dir = get_log_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Cannot determine log directory"))?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
