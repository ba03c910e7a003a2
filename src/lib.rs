//! zcode-exthost - 扩展宿主桥
//!
//! 模块结构：
//! - services::ports: 协作服务契约（搜索后端、工作区、配置、保存、状态栏）
//! - services::adapters: 搜索请求代理、工作区编辑转发、JSON-RPC 桥
//! - nls: 本地化字符串
//! - logging: tracing 初始化

pub mod logging;
pub mod nls;
pub mod services;

pub use services::adapters::{Bridge, SearchBroker, WorkspaceRelay};
pub use services::ports::{ExcludeSpec, RequestId, SearchBackend, SearchError};
