//! 搜索请求代理
//!
//! 扩展侧按自己分配的 request id 发起 file/text/exists 搜索，
//! 代理负责登记取消句柄、转发结果，并在结束时恰好注销一次。

use super::pending::{PendingRequests, SettleGuard};
use super::query::{FileQueryParams, QueryBuilder};
use crate::services::ports::{
    BackendFailure, BoxFuture, ConfigurationProvider, ExcludeSpec, FileMatch, PatternInfo,
    ProgressCallback, RequestId, SearchBackend, SearchComplete, SearchError, SearchQuery,
    TextSearchOptions, WorkspaceContext,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// `Ok(None)`: cancelled, shut down, or nothing to search.
pub type DispatchResult<T> = std::result::Result<Option<T>, BackendFailure>;

pub struct SearchBroker {
    backend: Arc<dyn SearchBackend>,
    workspace: Arc<dyn WorkspaceContext>,
    queries: QueryBuilder,
    pending: Arc<PendingRequests>,
}

impl SearchBroker {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        workspace: Arc<dyn WorkspaceContext>,
        config: Arc<dyn ConfigurationProvider>,
    ) -> Self {
        Self {
            backend,
            workspace,
            queries: QueryBuilder::new(config),
            pending: Arc::new(PendingRequests::new()),
        }
    }

    /// Resolves to the resources of every match.
    ///
    /// The request is registered before this returns, so a `cancel_search`
    /// issued afterwards always finds it.
    pub fn start_file_search(
        &self,
        include_pattern: Option<&str>,
        include_folder: Option<&Path>,
        exclude: &ExcludeSpec,
        max_results: Option<usize>,
        request_id: RequestId,
    ) -> BoxFuture<DispatchResult<Vec<PathBuf>>> {
        let folders = self.workspace.folders();
        let Some(folder_queries) = QueryBuilder::folder_queries(&folders, include_folder) else {
            tracing::debug!(request_id, "file search skipped: nothing to search");
            return Box::pin(async { Ok(None) });
        };

        let query = self.queries.file(
            folder_queries,
            FileQueryParams {
                include_pattern,
                exclude,
                max_results,
            },
        );

        self.dispatch(request_id, query, None, |complete| {
            complete.results.into_iter().map(|m| m.resource).collect()
        })
    }

    /// Forwards every progress item that carries line matches to `on_result`,
    /// then resolves with `Some(())`.
    pub fn start_text_search(
        &self,
        pattern: PatternInfo,
        options: &TextSearchOptions,
        request_id: RequestId,
        on_result: ProgressCallback,
    ) -> BoxFuture<DispatchResult<()>> {
        let folders = self.workspace.folders();
        let query = self.queries.text(pattern, &folders, options);
        let forward: ProgressCallback = Arc::new(move |item: FileMatch| {
            if item.has_matches() {
                on_result(item);
            }
        });

        self.dispatch(request_id, query, Some(forward), |_| ())
    }

    /// Resolves with whether the backend hit its result limit.
    pub fn check_exists(
        &self,
        mut query: SearchQuery,
        request_id: RequestId,
    ) -> BoxFuture<DispatchResult<bool>> {
        query.exists = true;
        self.dispatch(request_id, query, None, |complete| complete.limit_hit)
    }

    /// `Some(true)` if an active request was cancelled, `None` otherwise.
    pub fn cancel_search(&self, request_id: RequestId) -> Option<bool> {
        if self.pending.cancel(request_id) {
            tracing::debug!(request_id, "search cancelled");
            Some(true)
        } else {
            None
        }
    }

    pub fn shutdown(&self) {
        if self.pending.is_closed() {
            return;
        }
        let cancelled = self.pending.close();
        tracing::info!(cancelled, "search broker shut down");
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, request_id: RequestId) -> bool {
        self.pending.contains(request_id)
    }

    fn dispatch<T, F>(
        &self,
        request_id: RequestId,
        query: SearchQuery,
        on_progress: Option<ProgressCallback>,
        map: F,
    ) -> BoxFuture<DispatchResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(SearchComplete) -> T + Send + 'static,
    {
        let Some(registration) = self.pending.register(request_id) else {
            tracing::debug!(request_id, "search broker is shut down, request ignored");
            return Box::pin(async { Ok(None) });
        };

        tracing::debug!(
            request_id,
            kind = %query.kind,
            exists = query.exists,
            displaced = registration.displaced,
            "search dispatched"
        );

        let guard = SettleGuard::new(Arc::clone(&self.pending), &registration);
        let search = self
            .backend
            .search(query, registration.handle.token(), on_progress);

        Box::pin(async move {
            let result = search.await;
            guard.complete();

            match result {
                Ok(complete) => Ok(Some(map(complete))),
                Err(SearchError::Cancelled) => {
                    tracing::debug!(request_id, "search resolved as cancelled");
                    Ok(None)
                }
                Err(SearchError::Backend(err)) => {
                    tracing::warn!(request_id, error = %err, "search failed");
                    Err(err)
                }
            }
        })
    }
}

impl Drop for SearchBroker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/services/adapters/search/broker.rs"]
mod tests;
