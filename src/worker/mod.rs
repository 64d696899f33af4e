//! 账号工作任务
//!
//! 每个账号一个独立任务：先检测出口连通性（失败时可轮换代理），
//! 连通后并发运行积分轮询与保活 ping 两个循环，直到进程收到中断信号。

pub mod keepalive;
pub mod points;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::dawn::probe::ConnectionProbe;
use crate::dawn::provider::RewardsApi;
use crate::model::config::Timings;
use crate::pool::{Account, AccountRegistry, ProxyPool};

use keepalive::KeepalivePinger;
use points::PointsPoller;

pub const STATUS_CHECKING: &str = "Checking Connection...";
pub const STATUS_CONNECT_FAILED: &str = "Connection Failed. Retrying...";
pub const STATUS_CONNECTED: &str = "Connection Successful";

/// 所有账号任务共享的依赖
pub struct WorkerContext {
    pub api: Arc<dyn RewardsApi>,
    pub probe: Arc<dyn ConnectionProbe>,
    pub proxies: Arc<ProxyPool>,
    pub timings: Timings,
    pub use_proxy: bool,
    pub rotate_proxy: bool,
    pub extension_id: String,
}

impl WorkerContext {
    /// 为账号分配代理，未启用代理时为 `None`
    ///
    /// 已分配过的账号直接返回原分配，不会推进游标
    pub fn assign_proxy(&self, account_id: &str) -> Option<String> {
        if self.use_proxy {
            self.proxies.assign_next(account_id)
        } else {
            None
        }
    }

    /// 读取已分配的代理，不推进游标
    pub fn current_proxy(&self, account_id: &str) -> Option<String> {
        if self.use_proxy {
            self.proxies.current(account_id)
        } else {
            None
        }
    }
}

/// 账号任务所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Connecting,
    Connected,
    Running,
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerPhase::Connecting => "connecting",
            WorkerPhase::Connected => "connected",
            WorkerPhase::Running => "running",
        };
        f.write_str(s)
    }
}

/// 单个账号的编排任务
pub struct AccountWorker {
    ctx: Arc<WorkerContext>,
    account: Arc<Account>,
    phase: WorkerPhase,
}

impl AccountWorker {
    pub fn new(ctx: Arc<WorkerContext>, account: Arc<Account>) -> Self {
        Self {
            ctx,
            account,
            phase: WorkerPhase::Connecting,
        }
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> WorkerPhase {
        self.phase
    }

    fn enter(&mut self, phase: WorkerPhase) {
        tracing::debug!("{} -> {}", self.phase, phase);
        self.phase = phase;
    }

    /// 循环检测连通性直到成功
    ///
    /// 每次失败后按配置轮换代理并等待重连间隔；被取消时返回 false
    pub async fn connect(&mut self, cancel: &CancellationToken) -> bool {
        self.enter(WorkerPhase::Connecting);
        let account = self.account.clone();
        let ctx = self.ctx.clone();

        let mut proxy = ctx.assign_proxy(&account.id);
        account.status.update(|s| {
            s.proxy = proxy.clone();
            s.status = Some(STATUS_CHECKING.to_string());
        });

        loop {
            let Some(connected) = cancel
                .run_until_cancelled(ctx.probe.check(proxy.as_deref()))
                .await
            else {
                return false;
            };
            if connected {
                break;
            }

            account.status.set_status(STATUS_CONNECT_FAILED);
            if ctx.use_proxy && ctx.rotate_proxy {
                proxy = ctx.proxies.rotate(&account.id);
                tracing::info!("连接失败，轮换代理: {:?}", proxy);
                account.status.set_proxy(proxy.clone());
            } else {
                tracing::debug!("连接失败，{:?} 后重试", ctx.timings.reconnect_delay);
            }

            if cancel
                .run_until_cancelled(tokio::time::sleep(ctx.timings.reconnect_delay))
                .await
                .is_none()
            {
                return false;
            }
        }

        self.enter(WorkerPhase::Connected);
        account.status.set_status(STATUS_CONNECTED);
        tracing::info!("连接成功，代理: {:?}", proxy);
        true
    }

    /// 运行账号任务直到取消
    ///
    /// 积分轮询与保活各自独立 spawn，一个 panic 不影响另一个
    pub async fn run(mut self, cancel: CancellationToken) {
        if !self.connect(&cancel).await {
            return;
        }
        self.enter(WorkerPhase::Running);

        let span = tracing::Span::current();
        let poller = PointsPoller::new(self.ctx.clone(), self.account.clone());
        let pinger = KeepalivePinger::new(self.ctx.clone(), self.account.clone());

        let points_task = {
            let cancel = cancel.clone();
            tokio::spawn(async move { poller.run(&cancel).await }.instrument(span.clone()))
        };
        let keepalive_task = {
            let cancel = cancel.clone();
            tokio::spawn(async move { pinger.run(&cancel).await }.instrument(span))
        };

        let (points_result, keepalive_result) = tokio::join!(points_task, keepalive_task);
        for (name, result) in [("积分轮询", points_result), ("保活", keepalive_result)] {
            if let Err(e) = result {
                tracing::error!("{}任务异常退出: {:?}", name, e);
            }
        }
    }
}

/// 为每个账号启动独立任务并等待全部结束
pub async fn run_fleet(
    registry: Arc<AccountRegistry>,
    ctx: Arc<WorkerContext>,
    cancel: CancellationToken,
) {
    let mut set = JoinSet::new();

    for account in registry.iter() {
        let span = tracing::info_span!("account", id = %account.masked_id());
        let worker = AccountWorker::new(ctx.clone(), account.clone());
        set.spawn(worker.run(cancel.child_token()).instrument(span));
    }
    tracing::info!("已启动 {} 个账号任务", set.len());

    while let Some(result) = set.join_next().await {
        if let Err(e) = result {
            tracing::error!("账号任务异常退出: {:?}", e);
        }
    }
    tracing::info!("所有账号任务已结束");
}

/// 收到中断信号后取消所有任务
///
/// 信号监听注册失败时只记录错误，不取消
pub async fn cancel_on_signal<F>(signal: F, cancel: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            tracing::info!("收到中断信号，正在退出");
            cancel.cancel();
        }
        Err(e) => tracing::error!("无法监听中断信号: {}", e),
    }
}
