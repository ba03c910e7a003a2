//! Service ports: traits + data contracts.

pub mod runtime;
pub mod search;
pub mod settings;
pub mod workspace;

pub use runtime::BoxFuture;
pub use search::{
    BackendFailure, ExcludeSpec, FileMatch, FolderQuery, GlobPattern, LineMatch, PatternInfo,
    ProgressCallback, QueryType, RequestId, SearchBackend, SearchComplete, SearchError,
    SearchQuery, TextSearchOptions,
};
pub use settings::{ConfigurationProvider, SearchSettings, Settings};
pub use workspace::{
    SaveAllResult, SaveResult, StatusBar, TextFileService, WorkbenchState, WorkspaceContext,
    WorkspaceEditingService, WorkspaceFolder,
};
