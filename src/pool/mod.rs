//! 账号与代理池模块
//!
//! 提供账号表、账号状态快照与共享代理池

pub mod account;
pub mod proxy;
pub mod status;

pub use account::{Account, AccountRegistry};
pub use proxy::ProxyPool;
pub use status::{AccountStatus, Points};
