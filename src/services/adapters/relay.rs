//! 工作区编辑转发：文件夹增删 + 状态栏提示、全部保存

use crate::nls::localize;
use crate::services::ports::{
    StatusBar, TextFileService, WorkspaceContext, WorkspaceEditingService, WorkspaceFolder,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("update workspace folders failed: {0}")]
    UpdateFolders(#[source] anyhow::Error),
}

pub struct WorkspaceRelay {
    workspace: Arc<dyn WorkspaceContext>,
    editing: Arc<dyn WorkspaceEditingService>,
    text_files: Arc<dyn TextFileService>,
    status_bar: Arc<dyn StatusBar>,
    status_timeout: Duration,
}

impl WorkspaceRelay {
    pub fn new(
        workspace: Arc<dyn WorkspaceContext>,
        editing: Arc<dyn WorkspaceEditingService>,
        text_files: Arc<dyn TextFileService>,
        status_bar: Arc<dyn StatusBar>,
        status_timeout: Duration,
    ) -> Self {
        Self {
            workspace,
            editing,
            text_files,
            status_bar,
            status_timeout,
        }
    }

    pub async fn update_folders(
        &self,
        extension_name: &str,
        index: usize,
        delete_count: usize,
        folders_to_add: Vec<WorkspaceFolder>,
    ) -> Result<(), RelayError> {
        let message = folder_status_message(extension_name, folders_to_add.len(), delete_count);
        self.status_bar.set_status_message(message, self.status_timeout);

        tracing::info!(
            extension = extension_name,
            index,
            delete_count,
            added = ?folders_to_add
                .iter()
                .map(WorkspaceFolder::display_name)
                .collect::<Vec<_>>(),
            "update workspace folders"
        );

        self.editing
            .update_folders(index, delete_count, folders_to_add, true)
            .await
            .map_err(RelayError::UpdateFolders)
    }

    /// True iff every file saved.
    pub async fn save_all(&self, include_untitled: bool) -> bool {
        let result = self.text_files.save_all(include_untitled).await;
        let ok = result.results.iter().all(|r| r.success);
        if !ok {
            let failed = result.results.iter().filter(|r| !r.success).count();
            tracing::warn!(failed, total = result.results.len(), "save all incomplete");
        }
        ok
    }

    pub fn workspace_data(&self) -> Vec<WorkspaceFolder> {
        self.workspace.folders()
    }
}

pub fn folder_status_message(
    extension_name: &str,
    add_count: usize,
    remove_count: usize,
) -> String {
    let wants_to_add = add_count > 0;
    let wants_to_delete = remove_count > 0;

    if wants_to_add && !wants_to_delete {
        if add_count == 1 {
            localize(
                "folderStatusMessageAddSingleFolder",
                "Extension '{0}' added 1 folder to the workspace",
                &[&extension_name],
            )
        } else {
            localize(
                "folderStatusMessageAddMultipleFolders",
                "Extension '{0}' added {1} folders to the workspace",
                &[&extension_name, &add_count],
            )
        }
    } else if wants_to_delete && !wants_to_add {
        if remove_count == 1 {
            localize(
                "folderStatusMessageRemoveSingleFolder",
                "Extension '{0}' removed 1 folder from the workspace",
                &[&extension_name],
            )
        } else {
            localize(
                "folderStatusMessageRemoveMultipleFolders",
                "Extension '{0}' removed {1} folders from the workspace",
                &[&extension_name, &remove_count],
            )
        }
    } else {
        localize(
            "folderStatusMessageChangeFolders",
            "Extension '{0}' changed folders of the workspace",
            &[&extension_name],
        )
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/services/adapters/relay.rs"]
mod tests;
