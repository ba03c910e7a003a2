use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::runtime::BoxFuture;

/// Caller-assigned identifier correlating a dispatch with a later cancel.
pub type RequestId = u64;

/// Glob → enabled, e.g. `{"*.log": true}`.
pub type GlobPattern = BTreeMap<String, bool>;

pub type ProgressCallback = Arc<dyn Fn(FileMatch) + Send + Sync>;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Opaque backend failure, handed to the caller unchanged.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct BackendFailure(#[from] anyhow::Error);

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search was cancelled")]
    Cancelled,
    #[error(transparent)]
    Backend(#[from] BackendFailure),
}

impl SearchError {
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        SearchError::Backend(BackendFailure(err.into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryType {
    File,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderQuery {
    pub folder: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInfo {
    pub pattern: String,
    #[serde(default)]
    pub is_reg_exp: bool,
    #[serde(default)]
    pub is_case_sensitive: bool,
    #[serde(default)]
    pub is_word_match: bool,
}

/// How a file search treats configured exclude rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcludeSpec {
    #[default]
    None,
    /// Ignore every exclude setting.
    Disregard,
    /// Use this glob as the exclude pattern.
    Pattern(String),
}

impl ExcludeSpec {
    pub fn pattern(&self) -> Option<&str> {
        match self {
            ExcludeSpec::Pattern(p) => Some(p),
            _ => None,
        }
    }

    pub fn disregards_excludes(&self) -> bool {
        matches!(self, ExcludeSpec::Disregard)
    }
}

// Wire form: `false` | "glob" | null.
impl Serialize for ExcludeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ExcludeSpec::None => serializer.serialize_none(),
            ExcludeSpec::Disregard => serializer.serialize_bool(false),
            ExcludeSpec::Pattern(p) => serializer.serialize_str(p),
        }
    }
}

impl<'de> Deserialize<'de> for ExcludeSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Pattern(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(ExcludeSpec::None),
            Some(Raw::Flag(false)) => Ok(ExcludeSpec::Disregard),
            Some(Raw::Flag(true)) => Err(serde::de::Error::custom(
                "expected `false` or an exclude glob, found `true`",
            )),
            Some(Raw::Pattern(p)) => Ok(ExcludeSpec::Pattern(p)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSearchOptions {
    pub include_pattern: Option<String>,
    pub exclude_pattern: ExcludeSpec,
    pub max_results: Option<usize>,
    pub disregard_ignore_files: bool,
    pub max_file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(rename = "type")]
    pub kind: QueryType,
    pub folder_queries: Vec<FolderQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_pattern: Option<PatternInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_pattern: Option<GlobPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_pattern: Option<GlobPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
    #[serde(default)]
    pub disregard_exclude_settings: bool,
    #[serde(default)]
    pub disregard_ignore_files: bool,
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub use_ripgrep: bool,
    #[serde(default)]
    pub ignore_symlinks: bool,
}

impl SearchQuery {
    pub fn new(kind: QueryType, folder_queries: Vec<FolderQuery>) -> Self {
        Self {
            kind,
            folder_queries,
            content_pattern: None,
            include_pattern: None,
            exclude_pattern: None,
            max_results: None,
            max_file_size: None,
            disregard_exclude_settings: false,
            disregard_ignore_files: false,
            exists: false,
            use_ripgrep: false,
            ignore_symlinks: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMatch {
    pub preview: String,
    pub line_number: usize,
    /// `(offset, length)` pairs within `preview`.
    pub offset_and_lengths: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMatch {
    pub resource: PathBuf,
    #[serde(default)]
    pub line_matches: Vec<LineMatch>,
}

impl FileMatch {
    pub fn new(resource: impl Into<PathBuf>) -> Self {
        Self {
            resource: resource.into(),
            line_matches: Vec::new(),
        }
    }

    pub fn has_matches(&self) -> bool {
        !self.line_matches.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchComplete {
    pub results: Vec<FileMatch>,
    pub limit_hit: bool,
}

/// The host's search engine. Implementations must observe `token` and stop
/// their own work once it fires; the broker never aborts them.
pub trait SearchBackend: Send + Sync {
    fn search(
        &self,
        query: SearchQuery,
        token: CancellationToken,
        on_progress: Option<ProgressCallback>,
    ) -> BoxFuture<Result<SearchComplete>>;
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::File => f.write_str("file"),
            QueryType::Text => f.write_str("text"),
        }
    }
}
