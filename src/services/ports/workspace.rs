use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::runtime::BoxFuture;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFolder {
    pub uri: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl WorkspaceFolder {
    pub fn new(uri: impl Into<PathBuf>) -> Self {
        Self {
            uri: uri.into(),
            name: None,
        }
    }

    pub fn named(uri: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: Some(name.into()),
        }
    }

    /// Display name; falls back to the last path component.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.uri
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.uri.display().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkbenchState {
    Empty,
    Folder,
    Workspace,
}

pub trait WorkspaceContext: Send + Sync {
    fn folders(&self) -> Vec<WorkspaceFolder>;

    fn state(&self) -> WorkbenchState {
        match self.folders().len() {
            0 => WorkbenchState::Empty,
            1 => WorkbenchState::Folder,
            _ => WorkbenchState::Workspace,
        }
    }
}

pub trait WorkspaceEditingService: Send + Sync {
    fn update_folders(
        &self,
        index: usize,
        delete_count: usize,
        folders_to_add: Vec<WorkspaceFolder>,
        donot_notify_error: bool,
    ) -> BoxFuture<anyhow::Result<()>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAllResult {
    pub results: Vec<SaveResult>,
}

pub trait TextFileService: Send + Sync {
    fn save_all(&self, include_untitled: bool) -> BoxFuture<SaveAllResult>;
}

pub trait StatusBar: Send + Sync {
    fn set_status_message(&self, message: String, timeout: Duration);
}
