//! Dawn 数据模型
//!
//! - `credentials`: 账号凭证
//! - `ping`: 保活 ping 请求/响应
//! - `point`: 积分查询响应

pub mod credentials;
pub mod ping;
pub mod point;
