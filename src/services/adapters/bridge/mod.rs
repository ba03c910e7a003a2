//! 扩展宿主桥：stdio(JSON-RPC + Content-Length framing)
//!
//! - 每个请求一个 tokio task，`search/cancel` 可以越过正在运行的搜索
//! - 搜索在路由时同步登记，之后才挂起
//! - 读端结束（EOF / 错误）时关闭搜索代理，取消所有进行中的请求
//! - 关闭后最多等待 `shutdown_grace`，仍未完成的请求 task 直接 abort

mod frame;
pub mod protocol;

pub use frame::{encode_frame, FrameReader, MAX_MESSAGE_BYTES};

use self::protocol::{
    notification, parse_params, response, CancelSearchParams, CheckExistsParams, IncomingMessage,
    RpcError, SaveAllParams, StartFileSearchParams, StartTextSearchParams,
    TextSearchResultParams, UpdateFoldersParams, WorkspaceData,
};
use super::relay::WorkspaceRelay;
use super::search::SearchBroker;
use crate::services::ports::{BoxFuture, FileMatch, ProgressCallback};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;

pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("bridge io: {0}")]
    Io(#[from] std::io::Error),
}

type RequestFuture = BoxFuture<Result<Value, RpcError>>;

#[derive(Clone)]
pub struct Bridge {
    broker: Arc<SearchBroker>,
    relay: Arc<WorkspaceRelay>,
    shutdown_grace: Duration,
}

impl Bridge {
    pub fn new(broker: Arc<SearchBroker>, relay: Arc<WorkspaceRelay>) -> Self {
        Self {
            broker,
            relay,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    /// How long `serve` waits for in-flight requests once the input ends.
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn broker(&self) -> &Arc<SearchBroker> {
        &self.broker
    }

    /// Serves until `reader` reaches end of stream, then shuts the broker
    /// down and waits up to the shutdown grace for in-flight responses.
    /// Requests still running after that are aborted without a reply.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), BridgeError>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (out_tx, out_rx) = unbounded_channel::<Vec<u8>>();
        let writer_task = tokio::spawn(writer_loop(writer, out_rx));

        let mut tasks = JoinSet::new();
        let mut frames = FrameReader::new(reader);
        let result = loop {
            while tasks.try_join_next().is_some() {}
            match frames.next().await {
                Ok(Some(bytes)) => self.handle_frame(&bytes, &out_tx, &mut tasks),
                Ok(None) => break Ok(()),
                Err(e) => {
                    tracing::warn!(error = %e, "bridge read error");
                    break Err(BridgeError::Io(e));
                }
            }
        };

        self.broker.shutdown();
        let drain = async { while tasks.join_next().await.is_some() {} };
        if tokio::time::timeout(self.shutdown_grace, drain).await.is_err() {
            tracing::warn!(
                remaining = tasks.len(),
                "bridge: aborting requests still running after shutdown"
            );
            tasks.shutdown().await;
        }
        drop(out_tx);
        if let Err(e) = writer_task.await {
            tracing::error!(error = %e, "bridge writer task failed");
        }
        result
    }

    fn handle_frame(
        &self,
        bytes: &[u8],
        out_tx: &UnboundedSender<Vec<u8>>,
        tasks: &mut JoinSet<()>,
    ) {
        let msg = match serde_json::from_slice::<IncomingMessage>(bytes) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, "bridge: invalid json");
                let err = RpcError::new(protocol::PARSE_ERROR, e.to_string());
                let _ = out_tx.send(encode_frame(&response(Value::Null, Err(err))));
                return;
            }
        };

        let Some(method) = msg.method else {
            tracing::debug!("bridge: ignoring message without method");
            return;
        };
        let Some(id) = msg.id else {
            tracing::debug!(method = %method, "bridge: ignoring notification");
            return;
        };

        match self.route(&method, msg.params, out_tx) {
            Ok(task) => {
                let out_tx = out_tx.clone();
                tasks.spawn(async move {
                    let result = task.await;
                    let _ = out_tx.send(encode_frame(&response(id, result)));
                });
            }
            Err(err) => {
                tracing::debug!(method = %method, error = %err, "bridge: request rejected");
                let _ = out_tx.send(encode_frame(&response(id, Err(err))));
            }
        }
    }

    /// Decodes params and starts the operation. Everything up to the returned
    /// future runs synchronously, including search registration.
    fn route(
        &self,
        method: &str,
        params: Value,
        out_tx: &UnboundedSender<Vec<u8>>,
    ) -> Result<RequestFuture, RpcError> {
        match method {
            protocol::START_FILE_SEARCH => {
                let p: StartFileSearchParams = parse_params(params)?;
                let search = self.broker.start_file_search(
                    p.include_pattern.as_deref(),
                    p.include_folder.as_deref(),
                    &p.exclude_pattern_or_disregard_excludes,
                    p.max_results,
                    p.request_id,
                );
                Ok(Box::pin(async move {
                    let resources = search.await.map_err(RpcError::internal)?;
                    Ok::<_, RpcError>(json!(resources))
                }))
            }
            protocol::START_TEXT_SEARCH => {
                let p: StartTextSearchParams = parse_params(params)?;
                let request_id = p.request_id;
                let out_tx = out_tx.clone();
                let on_result: ProgressCallback = Arc::new(move |item: FileMatch| {
                    let params = TextSearchResultParams {
                        request_id,
                        result: &item,
                    };
                    match serde_json::to_value(&params) {
                        Ok(params) => {
                            let msg = notification(protocol::TEXT_SEARCH_RESULT, params);
                            let _ = out_tx.send(encode_frame(&msg));
                        }
                        Err(e) => tracing::error!(error = %e, "serialize text search result failed"),
                    }
                });
                let search = self
                    .broker
                    .start_text_search(p.pattern, &p.options, request_id, on_result);
                Ok(Box::pin(async move {
                    search.await.map_err(RpcError::internal)?;
                    Ok::<_, RpcError>(Value::Null)
                }))
            }
            protocol::CHECK_EXISTS => {
                let p: CheckExistsParams = parse_params(params)?;
                let search = self.broker.check_exists(p.query, p.request_id);
                Ok(Box::pin(async move {
                    let limit_hit = search.await.map_err(RpcError::internal)?;
                    Ok::<_, RpcError>(json!(limit_hit))
                }))
            }
            protocol::CANCEL_SEARCH => {
                let p: CancelSearchParams = parse_params(params)?;
                let cancelled = self.broker.cancel_search(p.request_id);
                Ok(Box::pin(async move { Ok::<_, RpcError>(json!(cancelled)) }))
            }
            protocol::SAVE_ALL => {
                let p: SaveAllParams = parse_params(params)?;
                let relay = Arc::clone(&self.relay);
                Ok(Box::pin(async move {
                    Ok::<_, RpcError>(json!(relay.save_all(p.include_untitled).await))
                }))
            }
            protocol::UPDATE_FOLDERS => {
                let p: UpdateFoldersParams = parse_params(params)?;
                let relay = Arc::clone(&self.relay);
                Ok(Box::pin(async move {
                    let UpdateFoldersParams {
                        extension_name,
                        index,
                        delete_count,
                        folders_to_add,
                    } = p;
                    relay
                        .update_folders(&extension_name, index, delete_count, folders_to_add)
                        .await
                        .map_err(RpcError::internal)?;
                    Ok::<_, RpcError>(Value::Null)
                }))
            }
            protocol::WORKSPACE_DATA => {
                let data = WorkspaceData {
                    folders: self.relay.workspace_data(),
                };
                Ok(Box::pin(async move {
                    serde_json::to_value(data).map_err(RpcError::internal)
                }))
            }
            _ => Err(RpcError::method_not_found(method)),
        }
    }
}

async fn writer_loop<W: AsyncWrite + Unpin>(mut writer: W, mut rx: UnboundedReceiver<Vec<u8>>) {
    while let Some(msg) = rx.recv().await {
        if writer.write_all(&msg).await.is_err() {
            break;
        }
        let _ = writer.flush().await;
    }

    tracing::debug!("bridge writer loop ended");
}

#[cfg(test)]
#[path = "../../../../tests/unit/services/adapters/bridge.rs"]
mod tests;
