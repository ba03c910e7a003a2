//! Wire types for the extension host bridge.

use crate::services::ports::{
    ExcludeSpec, FileMatch, PatternInfo, RequestId, SearchQuery, TextSearchOptions,
    WorkspaceFolder,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use thiserror::Error;

pub const START_FILE_SEARCH: &str = "search/startFileSearch";
pub const START_TEXT_SEARCH: &str = "search/startTextSearch";
pub const CHECK_EXISTS: &str = "search/checkExists";
pub const CANCEL_SEARCH: &str = "search/cancel";
pub const SAVE_ALL: &str = "workspace/saveAll";
pub const UPDATE_FOLDERS: &str = "workspace/updateFolders";
pub const WORKSPACE_DATA: &str = "workspace/data";

pub const TEXT_SEARCH_RESULT: &str = "search/textSearchResult";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} ({code})")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("unknown method: {method}"))
    }

    pub fn invalid_params(err: serde_json::Error) -> Self {
        Self::new(INVALID_PARAMS, err.to_string())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::new(INTERNAL_ERROR, err.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartFileSearchParams {
    #[serde(default)]
    pub include_pattern: Option<String>,
    #[serde(default)]
    pub include_folder: Option<PathBuf>,
    #[serde(default)]
    pub exclude_pattern_or_disregard_excludes: ExcludeSpec,
    #[serde(default)]
    pub max_results: Option<usize>,
    pub request_id: RequestId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTextSearchParams {
    pub pattern: PatternInfo,
    #[serde(default)]
    pub options: TextSearchOptions,
    pub request_id: RequestId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckExistsParams {
    pub query: SearchQuery,
    pub request_id: RequestId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSearchParams {
    pub request_id: RequestId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAllParams {
    #[serde(default)]
    pub include_untitled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFoldersParams {
    pub extension_name: String,
    pub index: usize,
    pub delete_count: usize,
    #[serde(default)]
    pub folders_to_add: Vec<WorkspaceFolder>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSearchResultParams<'a> {
    pub request_id: RequestId,
    pub result: &'a FileMatch,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceData {
    pub folders: Vec<WorkspaceFolder>,
}

/// Null params decode as an empty object so all-default structs still parse.
pub fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(RpcError::invalid_params)
}

pub fn response(id: Value, result: Result<Value, RpcError>) -> Value {
    match result {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(err) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": err.code, "message": err.message },
        }),
    }
}

pub fn notification(method: &str, params: Value) -> Value {
    json!({ "jsonrpc": "2.0", "method": method, "params": params })
}
