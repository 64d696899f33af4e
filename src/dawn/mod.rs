//! Dawn 奖励 API 客户端
//!
//! - `provider`: 积分查询与保活 ping
//! - `probe`: 出口连通性检测
//! - `session`: 账号请求头
//! - `model`: 请求/响应与凭证模型

pub mod error;
pub mod model;
pub mod probe;
pub mod provider;
pub mod session;
pub mod user_agent;
