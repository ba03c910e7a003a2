//! Service adapters: runtime specific implementations (IO/async).

pub mod bridge;
pub mod paths;
pub mod relay;
pub mod search;
pub mod settings;
pub mod status;
pub mod workspace;

pub use bridge::{Bridge, BridgeError};
pub use paths::{ensure_log_dir, get_log_dir};
pub use relay::{folder_status_message, RelayError, WorkspaceRelay};
pub use search::{DispatchResult, SearchBroker};
pub use settings::{
    ensure_settings_file, ensure_settings_file_at, folder_settings_path, get_settings_path,
    load_settings, load_settings_from, FolderSettingsProvider,
};
pub use status::{StatusChannel, StatusMessage};
pub use workspace::LocalWorkspace;
