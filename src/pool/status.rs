//! 账号状态快照
//!
//! 每个账号一份，可被轮询循环与保活循环并发写入（按字段后写覆盖），
//! 展示层只读取克隆出来的快照。

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 积分字段
#[derive(Debug, Clone, PartialEq)]
pub enum Points {
    /// 服务端返回的积分
    Value(serde_json::Number),
    /// 最近一次查询失败
    Error,
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Points::Value(n) => write!(f, "{}", n),
            Points::Error => write!(f, "Error"),
        }
    }
}

/// 账号状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountStatus {
    /// 当前使用的代理
    pub proxy: Option<String>,
    /// 积分
    pub points: Option<Points>,
    /// 最近一次 ping 结果
    pub ping_status: Option<String>,
    /// 状态文本
    pub status: Option<String>,
}

/// 账号状态句柄
///
/// 锁只在同步的字段赋值期间持有，从不跨越 `.await`
#[derive(Debug, Clone, Default)]
pub struct StatusHandle {
    inner: Arc<Mutex<AccountStatus>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AccountStatus> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 原地修改多个字段
    pub fn update(&self, f: impl FnOnce(&mut AccountStatus)) {
        f(&mut self.lock());
    }

    pub fn set_status(&self, status: impl Into<String>) {
        self.lock().status = Some(status.into());
    }

    pub fn set_proxy(&self, proxy: Option<String>) {
        self.lock().proxy = proxy;
    }

    pub fn set_ping_status(&self, ping_status: impl Into<String>) {
        self.lock().ping_status = Some(ping_status.into());
    }

    /// 读取当前快照
    pub fn snapshot(&self) -> AccountStatus {
        self.lock().clone()
    }
}
