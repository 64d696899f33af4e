//! 测试用的脚本化传输层与连通性检测

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::dawn::error::ApiError;
use crate::dawn::model::ping::{PingRequest, EXTENSION_ID};
use crate::dawn::probe::ConnectionProbe;
use crate::dawn::provider::RewardsApi;
use crate::dawn::session::AccountSession;
use crate::model::config::Timings;
use crate::pool::{Account, ProxyPool};

use super::WorkerContext;

/// 按脚本依次返回结果，脚本用完后返回默认值
pub struct ScriptedApi {
    points: Mutex<VecDeque<Result<serde_json::Number, ApiError>>>,
    pings: Mutex<VecDeque<Result<String, ApiError>>>,
    default_points: Result<serde_json::Number, ApiError>,
    default_ping: Result<String, ApiError>,
    point_calls: AtomicUsize,
    ping_calls: AtomicUsize,
    point_proxies: Mutex<Vec<Option<String>>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            points: Mutex::new(VecDeque::new()),
            pings: Mutex::new(VecDeque::new()),
            default_points: Ok(100.into()),
            default_ping: Ok("pong".to_string()),
            point_calls: AtomicUsize::new(0),
            ping_calls: AtomicUsize::new(0),
            point_proxies: Mutex::new(Vec::new()),
        }
    }

    pub fn with_points(
        mut self,
        script: impl IntoIterator<Item = Result<serde_json::Number, ApiError>>,
        default: Result<serde_json::Number, ApiError>,
    ) -> Self {
        self.points = Mutex::new(script.into_iter().collect());
        self.default_points = default;
        self
    }

    pub fn with_pings(
        mut self,
        script: impl IntoIterator<Item = Result<String, ApiError>>,
        default: Result<String, ApiError>,
    ) -> Self {
        self.pings = Mutex::new(script.into_iter().collect());
        self.default_ping = default;
        self
    }

    pub fn point_calls(&self) -> usize {
        self.point_calls.load(Ordering::SeqCst)
    }

    pub fn ping_calls(&self) -> usize {
        self.ping_calls.load(Ordering::SeqCst)
    }

    pub fn point_proxies(&self) -> Vec<Option<String>> {
        self.point_proxies.lock().unwrap().clone()
    }
}

#[async_trait]
impl RewardsApi for ScriptedApi {
    async fn fetch_points(
        &self,
        _session: &AccountSession,
        proxy: Option<&str>,
    ) -> Result<serde_json::Number, ApiError> {
        self.point_calls.fetch_add(1, Ordering::SeqCst);
        self.point_proxies
            .lock()
            .unwrap()
            .push(proxy.map(str::to_string));
        let next = self.points.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.default_points.clone())
    }

    async fn send_ping(
        &self,
        _session: &AccountSession,
        _proxy: Option<&str>,
        _request: &PingRequest,
    ) -> Result<String, ApiError> {
        self.ping_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.pings.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.default_ping.clone())
    }
}

/// 按脚本返回连通性结果，并记录每次检测使用的代理
pub struct ScriptedProbe {
    results: Mutex<VecDeque<bool>>,
    default: bool,
    seen: Mutex<Vec<Option<String>>>,
}

impl ScriptedProbe {
    /// 脚本用完后返回 true
    pub fn new(results: impl IntoIterator<Item = bool>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().collect()),
            default: true,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn always(result: bool) -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            default: result,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<Option<String>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConnectionProbe for ScriptedProbe {
    async fn check(&self, proxy: Option<&str>) -> bool {
        self.seen.lock().unwrap().push(proxy.map(str::to_string));
        let next = self.results.lock().unwrap().pop_front();
        next.unwrap_or(self.default)
    }
}

pub fn pool(items: &[&str]) -> ProxyPool {
    ProxyPool::new(items.iter().map(|s| s.to_string()).collect())
}

pub fn account(id: &str) -> Arc<Account> {
    Arc::new(Account::new(
        id,
        AccountSession::new(format!("uid-{}", id), "token", "TestAgent/1.0"),
    ))
}

pub fn context(
    api: Arc<dyn RewardsApi>,
    probe: Arc<dyn ConnectionProbe>,
    proxies: Arc<ProxyPool>,
    use_proxy: bool,
    rotate_proxy: bool,
) -> Arc<WorkerContext> {
    Arc::new(WorkerContext {
        api,
        probe,
        proxies,
        timings: Timings::default(),
        use_proxy,
        rotate_proxy,
        extension_id: EXTENSION_ID.to_string(),
    })
}

/// 暂停时钟下断言经过的时间，容忍计时器的毫秒取整
pub fn assert_elapsed(start: Instant, secs: u64) {
    let elapsed = start.elapsed();
    let expected = Duration::from_secs(secs);
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(100),
        "expected ~{:?}, got {:?}",
        expected,
        elapsed
    );
}
