//! 保活 ping
//!
//! 单次 ping 最多尝试 `ping_max_attempts` 次：401 立即放弃，429 等待较长时间后重试，
//! 其它失败短暂等待后重试。成功后倒计时到下一轮，失败则整体等待后重来。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::dawn::error::{ApiError, PingFailure};
use crate::dawn::model::ping::PingRequest;
use crate::pool::Account;

use super::WorkerContext;

pub const STATUS_SENDING: &str = "Sending Ping...";
pub const PING_STATUS_FAILED: &str = "Failed";

/// 秒数格式化为 `HH:MM:SS`
pub fn format_seconds(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

pub struct KeepalivePinger {
    ctx: Arc<WorkerContext>,
    account: Arc<Account>,
}

impl KeepalivePinger {
    pub fn new(ctx: Arc<WorkerContext>, account: Arc<Account>) -> Self {
        Self { ctx, account }
    }

    fn build_request(&self) -> PingRequest {
        PingRequest::new(
            self.account.session.user_id.as_str(),
            self.ctx.extension_id.as_str(),
            Utc::now(),
        )
    }

    /// 发送一次 ping（含重试），成功时返回服务端 message
    pub async fn ping_with_retry(&self, proxy: Option<&str>) -> Result<String, PingFailure> {
        let timings = &self.ctx.timings;
        let request = self.build_request();

        let mut attempt = 1;
        loop {
            let exhausted = attempt >= timings.ping_max_attempts;
            let result = self
                .ctx
                .api
                .send_ping(&self.account.session, proxy, &request)
                .await;

            match result {
                Ok(message) => return Ok(message),
                Err(ApiError::TokenExpired) => return Err(PingFailure::TokenExpired),
                Err(ApiError::RateLimited) if exhausted => return Err(PingFailure::RateLimited),
                Err(ApiError::RateLimited) => {
                    tracing::debug!(
                        "ping 被限流 (第 {}/{} 次)，{:?} 后重试",
                        attempt,
                        timings.ping_max_attempts,
                        timings.rate_limit_delay
                    );
                    sleep(timings.rate_limit_delay).await;
                }
                Err(e) if exhausted => {
                    tracing::debug!("ping 失败，已用尽重试次数: {}", e);
                    return Err(PingFailure::RequestFailed);
                }
                Err(e) => {
                    tracing::debug!(
                        "ping 失败 (第 {}/{} 次): {}，{:?} 后重试",
                        attempt,
                        timings.ping_max_attempts,
                        e,
                        timings.ping_retry_delay
                    );
                    sleep(timings.ping_retry_delay).await;
                }
            }
            attempt += 1;
        }
    }

    /// 一轮完整流程：ping，成功则倒计时，失败则等待
    async fn cycle(&self) {
        let status = &self.account.status;
        let proxy = self.ctx.current_proxy(&self.account.id);

        status.set_status(STATUS_SENDING);
        match self.ping_with_retry(proxy.as_deref()).await {
            Ok(message) => {
                tracing::debug!("ping 成功: {}", message);
                status.set_ping_status(message);
                self.countdown().await;
            }
            Err(failure) => {
                if failure == PingFailure::TokenExpired {
                    tracing::warn!("ping 返回 401，session token 已过期，需要重新登录");
                } else {
                    tracing::info!("ping 失败: {}", failure);
                }
                status.update(|s| {
                    s.ping_status = Some(PING_STATUS_FAILED.to_string());
                    s.status = Some(format!("Error: {}", failure));
                });
                sleep(self.ctx.timings.ping_failure_delay).await;
            }
        }
    }

    /// 每秒刷新一次剩余时间
    async fn countdown(&self) {
        let total = self.ctx.timings.ping_interval.as_secs();
        for remaining in (1..=total).rev() {
            self.account
                .status
                .set_status(format!("Next Ping in {}", format_seconds(remaining)));
            sleep(Duration::from_secs(1)).await;
        }
    }

    /// 循环 ping 直到取消
    pub async fn run(&self, cancel: &CancellationToken) {
        let cycle = async {
            loop {
                self.cycle().await;
            }
        };
        cancel.run_until_cancelled(cycle).await;
    }
}
