//! 搜索请求代理模块
//!
//! - PendingRequests: request id → 取消句柄（进行中请求表）
//! - QueryBuilder: 按文件夹配置构造后端查询
//! - SearchBroker: 对外的 file/text/exists/cancel 入口

mod broker;
mod pending;
mod query;

pub use broker::{DispatchResult, SearchBroker};
pub use query::{FileQueryParams, FolderOptions, QueryBuilder};
