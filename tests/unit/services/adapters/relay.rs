use super::*;
use crate::services::adapters::{LocalWorkspace, StatusChannel, StatusMessage};
use crate::services::ports::{BoxFuture, SaveAllResult, SaveResult};
use crate::services::testing::create_runtime;
use std::sync::mpsc::Receiver;
use std::sync::Mutex;

struct FakeTextFiles {
    outcomes: Vec<bool>,
    calls: Mutex<Vec<bool>>,
}

impl FakeTextFiles {
    fn new(outcomes: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            outcomes: outcomes.to_vec(),
            calls: Mutex::new(Vec::new()),
        })
    }
}

impl TextFileService for FakeTextFiles {
    fn save_all(&self, include_untitled: bool) -> BoxFuture<SaveAllResult> {
        self.calls.lock().unwrap().push(include_untitled);
        let results = self
            .outcomes
            .iter()
            .map(|&success| SaveResult { success })
            .collect();
        Box::pin(async move { SaveAllResult { results } })
    }
}

struct RecordingEditor {
    calls: Mutex<Vec<(usize, usize, usize, bool)>>,
}

impl WorkspaceEditingService for RecordingEditor {
    fn update_folders(
        &self,
        index: usize,
        delete_count: usize,
        folders_to_add: Vec<WorkspaceFolder>,
        donot_notify_error: bool,
    ) -> BoxFuture<anyhow::Result<()>> {
        self.calls.lock().unwrap().push((
            index,
            delete_count,
            folders_to_add.len(),
            donot_notify_error,
        ));
        Box::pin(async { Ok(()) })
    }
}

fn relay_with(
    workspace: LocalWorkspace,
    text_files: Arc<FakeTextFiles>,
) -> (WorkspaceRelay, Receiver<StatusMessage>) {
    let (status, rx) = StatusChannel::new();
    let workspace = Arc::new(workspace);
    let relay = WorkspaceRelay::new(
        workspace.clone(),
        workspace,
        text_files,
        Arc::new(status),
        Duration::from_millis(10_000),
    );
    (relay, rx)
}

#[test]
fn test_status_message_variants() {
    assert_eq!(
        folder_status_message("git", 1, 0),
        "Extension 'git' added 1 folder to the workspace"
    );
    assert_eq!(
        folder_status_message("git", 3, 0),
        "Extension 'git' added 3 folders to the workspace"
    );
    assert_eq!(
        folder_status_message("git", 0, 1),
        "Extension 'git' removed 1 folder from the workspace"
    );
    assert_eq!(
        folder_status_message("git", 0, 2),
        "Extension 'git' removed 2 folders from the workspace"
    );
    assert_eq!(
        folder_status_message("git", 1, 1),
        "Extension 'git' changed folders of the workspace"
    );
    assert_eq!(
        folder_status_message("git", 0, 0),
        "Extension 'git' changed folders of the workspace"
    );
}

#[test]
fn test_save_all_requires_every_file() {
    let rt = create_runtime();

    let files = FakeTextFiles::new(&[true, true]);
    let (relay, _rx) = relay_with(LocalWorkspace::empty(), files.clone());
    assert!(rt.block_on(relay.save_all(true)));
    assert_eq!(*files.calls.lock().unwrap(), vec![true]);

    let (relay, _rx) = relay_with(LocalWorkspace::empty(), FakeTextFiles::new(&[true, false]));
    assert!(!rt.block_on(relay.save_all(false)));

    let (relay, _rx) = relay_with(LocalWorkspace::empty(), FakeTextFiles::new(&[]));
    assert!(rt.block_on(relay.save_all(false)));
}

#[test]
fn test_update_folders_posts_status_and_edits() {
    let rt = create_runtime();
    let workspace = LocalWorkspace::new(vec![WorkspaceFolder::new("/w/a")]);
    let (relay, rx) = relay_with(workspace, FakeTextFiles::new(&[]));

    rt.block_on(relay.update_folders(
        "ext.git",
        1,
        0,
        vec![WorkspaceFolder::new("/w/b"), WorkspaceFolder::new("/w/c")],
    ))
    .unwrap();

    let status = rx.try_recv().unwrap();
    assert_eq!(
        status.text,
        "Extension 'ext.git' added 2 folders to the workspace"
    );
    assert_eq!(status.timeout, Duration::from_millis(10_000));

    let uris: Vec<_> = relay.workspace_data().into_iter().map(|f| f.uri).collect();
    assert_eq!(
        uris,
        vec![
            std::path::PathBuf::from("/w/a"),
            std::path::PathBuf::from("/w/b"),
            std::path::PathBuf::from("/w/c"),
        ]
    );
}

#[test]
fn test_update_folders_suppresses_editor_notification() {
    let rt = create_runtime();
    let editor = Arc::new(RecordingEditor {
        calls: Mutex::new(Vec::new()),
    });
    let (status, rx) = StatusChannel::new();
    let relay = WorkspaceRelay::new(
        Arc::new(LocalWorkspace::empty()),
        editor.clone(),
        FakeTextFiles::new(&[]),
        Arc::new(status),
        Duration::from_secs(1),
    );

    rt.block_on(relay.update_folders("ext", 0, 2, Vec::new()))
        .unwrap();

    assert_eq!(*editor.calls.lock().unwrap(), vec![(0, 2, 0, true)]);
    assert_eq!(
        rx.try_recv().unwrap().text,
        "Extension 'ext' removed 2 folders from the workspace"
    );
}

#[test]
fn test_update_folders_reports_invalid_range() {
    let rt = create_runtime();
    let (relay, rx) = relay_with(LocalWorkspace::empty(), FakeTextFiles::new(&[]));

    let err = rt
        .block_on(relay.update_folders("ext", 3, 1, Vec::new()))
        .unwrap_err();
    assert!(matches!(err, RelayError::UpdateFolders(_)));
    // the status message is posted before the edit runs
    assert!(rx.try_recv().is_ok());
    assert!(relay.workspace_data().is_empty());
}
