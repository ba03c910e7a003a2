//! 状态栏消息通道：代理侧写入，UI 线程 try_recv 取出并显示 timeout 时长

use crate::services::ports::StatusBar;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::time::Duration;

const STATUS_QUEUE_CAP: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub timeout: Duration,
}

pub struct StatusChannel {
    tx: SyncSender<StatusMessage>,
}

impl StatusChannel {
    pub fn new() -> (Self, Receiver<StatusMessage>) {
        let (tx, rx) = mpsc::sync_channel(STATUS_QUEUE_CAP);
        (Self { tx }, rx)
    }
}

impl StatusBar for StatusChannel {
    fn set_status_message(&self, message: String, timeout: Duration) {
        tracing::info!(message = %message, "status message");
        if self
            .tx
            .try_send(StatusMessage {
                text: message,
                timeout,
            })
            .is_err()
        {
            tracing::debug!("status message dropped: queue full or closed");
        }
    }
}
