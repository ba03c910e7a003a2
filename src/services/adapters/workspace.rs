use crate::services::ports::{BoxFuture, WorkspaceContext, WorkspaceEditingService, WorkspaceFolder};
use std::sync::{Arc, RwLock};

/// In-memory workspace folder list; edits splice into it.
#[derive(Default, Clone)]
pub struct LocalWorkspace {
    folders: Arc<RwLock<Vec<WorkspaceFolder>>>,
}

impl LocalWorkspace {
    pub fn new(folders: Vec<WorkspaceFolder>) -> Self {
        Self {
            folders: Arc::new(RwLock::new(folders)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    fn splice(
        &self,
        index: usize,
        delete_count: usize,
        folders_to_add: Vec<WorkspaceFolder>,
    ) -> anyhow::Result<()> {
        let mut folders = self
            .folders
            .write()
            .map_err(|_| anyhow::anyhow!("workspace folder lock poisoned"))?;

        let end = index
            .checked_add(delete_count)
            .filter(|end| *end <= folders.len())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "invalid folder range {index}..+{delete_count} for {} folders",
                    folders.len()
                )
            })?;

        folders.drain(index..end);

        let mut insert_at = index;
        for folder in folders_to_add {
            if folders.iter().any(|f| f.uri == folder.uri) {
                tracing::debug!(folder = %folder.uri.display(), "folder already in workspace");
                continue;
            }
            folders.insert(insert_at, folder);
            insert_at += 1;
        }
        Ok(())
    }
}

impl WorkspaceContext for LocalWorkspace {
    fn folders(&self) -> Vec<WorkspaceFolder> {
        self.folders.read().map(|f| f.clone()).unwrap_or_default()
    }
}

impl WorkspaceEditingService for LocalWorkspace {
    fn update_folders(
        &self,
        index: usize,
        delete_count: usize,
        folders_to_add: Vec<WorkspaceFolder>,
        donot_notify_error: bool,
    ) -> BoxFuture<anyhow::Result<()>> {
        let result = self.splice(index, delete_count, folders_to_add);
        if let Err(e) = &result {
            if !donot_notify_error {
                tracing::error!(error = %e, "update workspace folders failed");
            }
        }
        Box::pin(async move { result })
    }
}
