//! 代理池
//!
//! 所有账号共享一份有序代理列表和一个全局游标，按轮询方式为账号分配代理。
//! 游标推进与分配表写入在同一把锁内完成，避免并发时重复或跳过代理。

use anyhow::Context;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 可识别的代理协议前缀
pub const SUPPORTED_SCHEMES: [&str; 4] = ["http://", "https://", "socks4://", "socks5://"];

/// 补全代理协议，没有可识别前缀时默认 `http://`
pub fn normalize_scheme(proxy: &str) -> String {
    if SUPPORTED_SCHEMES.iter().any(|s| proxy.starts_with(s)) {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    }
}

#[derive(Debug, Default)]
struct PoolState {
    /// 下一个要分配的下标
    cursor: usize,
    /// 账号 -> 当前代理
    assignments: HashMap<String, String>,
}

/// 代理池
#[derive(Debug, Default)]
pub struct ProxyPool {
    proxies: Vec<String>,
    state: Mutex<PoolState>,
}

impl ProxyPool {
    pub fn new(proxies: Vec<String>) -> Self {
        Self {
            proxies,
            state: Mutex::new(PoolState::default()),
        }
    }

    /// 空代理池，所有操作都返回 `None`
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从文本文件加载，每行一个代理
    ///
    /// 文件不存在时返回空池；空行忽略，重复行只保留第一次出现
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("代理文件 {:?} 不存在，不使用代理", path);
            return Ok(Self::empty());
        }

        let content =
            fs::read_to_string(path).with_context(|| format!("读取代理文件失败: {:?}", path))?;
        let proxies = parse_proxy_list(&content);
        tracing::info!("从 {:?} 加载了 {} 个代理", path, proxies.len());
        Ok(Self::new(proxies))
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 取游标处的代理并推进游标，调用方必须持有锁
    fn take_next(&self, state: &mut PoolState) -> String {
        let proxy = normalize_scheme(&self.proxies[state.cursor]);
        state.cursor = (state.cursor + 1) % self.proxies.len();
        proxy
    }

    /// 为账号分配代理
    ///
    /// 已有分配时原样返回且不推进游标
    pub fn assign_next(&self, account_id: &str) -> Option<String> {
        if self.proxies.is_empty() {
            return None;
        }

        let mut state = self.lock();
        if let Some(proxy) = state.assignments.get(account_id) {
            return Some(proxy.clone());
        }

        let proxy = self.take_next(&mut state);
        state
            .assignments
            .insert(account_id.to_string(), proxy.clone());
        Some(proxy)
    }

    /// 轮换账号代理：无条件取下一个并覆盖原分配
    pub fn rotate(&self, account_id: &str) -> Option<String> {
        if self.proxies.is_empty() {
            return None;
        }

        let mut state = self.lock();
        let proxy = self.take_next(&mut state);
        state
            .assignments
            .insert(account_id.to_string(), proxy.clone());
        Some(proxy)
    }

    /// 读取账号当前分配的代理
    pub fn current(&self, account_id: &str) -> Option<String> {
        self.lock().assignments.get(account_id).cloned()
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> usize {
        self.lock().cursor
    }
}

fn parse_proxy_list(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(line.to_string()))
        .map(str::to_string)
        .collect()
}
