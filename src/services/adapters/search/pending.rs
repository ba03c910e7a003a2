//! 进行中搜索请求表
//!
//! - key: 调用方分配的 request id
//! - value: 取消句柄 + 代号（generation）
//! - settle 时只删除代号一致的条目，避免旧任务误删同 id 的新注册

use crate::services::ports::RequestId;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

/// One-shot cancellation signal for a single dispatched search.
#[derive(Debug, Clone, Default)]
pub(crate) struct CancellationHandle {
    token: CancellationToken,
}

impl CancellationHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    #[cfg(test)]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

struct PendingEntry {
    generation: u64,
    handle: CancellationHandle,
}

#[derive(Default)]
struct PendingState {
    entries: FxHashMap<RequestId, PendingEntry>,
    next_generation: u64,
    closed: bool,
}

#[derive(Default)]
pub(crate) struct PendingRequests {
    state: Mutex<PendingState>,
}

pub(crate) struct Registration {
    pub(crate) request_id: RequestId,
    pub(crate) generation: u64,
    pub(crate) handle: CancellationHandle,
    /// Set when the id was still active; that handle has already been cancelled.
    pub(crate) displaced: bool,
}

impl PendingRequests {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // Every critical section leaves the map consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, PendingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs a fresh handle under `request_id`. Returns `None` once closed.
    pub(crate) fn register(&self, request_id: RequestId) -> Option<Registration> {
        let handle = CancellationHandle::new();
        let (generation, displaced) = {
            let mut state = self.lock();
            if state.closed {
                return None;
            }
            let generation = state.next_generation;
            state.next_generation += 1;
            let displaced = state.entries.insert(
                request_id,
                PendingEntry {
                    generation,
                    handle: handle.clone(),
                },
            );
            (generation, displaced)
        };

        let displaced = match displaced {
            Some(old) => {
                tracing::warn!(
                    request_id,
                    "search request id reused while active; cancelling previous request"
                );
                old.handle.cancel();
                true
            }
            None => false,
        };

        Some(Registration {
            request_id,
            generation,
            handle,
            displaced,
        })
    }

    /// Removes the entry only if it still belongs to `generation`.
    pub(crate) fn settle(&self, request_id: RequestId, generation: u64) -> bool {
        let mut state = self.lock();
        match state.entries.get(&request_id) {
            Some(entry) if entry.generation == generation => {
                state.entries.remove(&request_id);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cancel(&self, request_id: RequestId) -> bool {
        let removed = self.lock().entries.remove(&request_id);
        match removed {
            Some(entry) => {
                entry.handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels everything still active and refuses later registrations.
    pub(crate) fn close(&self) -> usize {
        let drained: Vec<PendingEntry> = {
            let mut state = self.lock();
            state.closed = true;
            state.entries.drain().map(|(_, entry)| entry).collect()
        };
        for entry in &drained {
            entry.handle.cancel();
        }
        drained.len()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn contains(&self, request_id: RequestId) -> bool {
        self.lock().entries.contains_key(&request_id)
    }
}

/// Removes its registration exactly once when dropped. If the operation never
/// reached [`SettleGuard::complete`] (its future was dropped), the token is
/// cancelled as well so the backend can stop.
pub(crate) struct SettleGuard {
    table: Arc<PendingRequests>,
    request_id: RequestId,
    generation: u64,
    handle: CancellationHandle,
    completed: bool,
}

impl SettleGuard {
    pub(crate) fn new(table: Arc<PendingRequests>, registration: &Registration) -> Self {
        Self {
            table,
            request_id: registration.request_id,
            generation: registration.generation,
            handle: registration.handle.clone(),
            completed: false,
        }
    }

    pub(crate) fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if !self.completed {
            self.handle.cancel();
        }
        if self.table.settle(self.request_id, self.generation) {
            tracing::trace!(request_id = self.request_id, "search request settled");
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/services/adapters/search/pending.rs"]
mod tests;
