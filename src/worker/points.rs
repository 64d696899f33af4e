//! 积分轮询
//!
//! 固定节奏查询积分，失败不增加等待时间

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::dawn::error::ApiError;
use crate::pool::{Account, Points};

use super::WorkerContext;

pub const STATUS_FETCHING: &str = "Fetching Points...";
pub const STATUS_RUNNING: &str = "Running";
pub const STATUS_TOKEN_EXPIRED: &str = "Token Expired";
pub const STATUS_FETCH_FAILED: &str = "Point fetch failed";

pub struct PointsPoller {
    ctx: Arc<WorkerContext>,
    account: Arc<Account>,
}

impl PointsPoller {
    pub fn new(ctx: Arc<WorkerContext>, account: Arc<Account>) -> Self {
        Self { ctx, account }
    }

    /// 查询一次积分并更新状态
    ///
    /// 401 时只更新状态文本，积分保留上一次的值
    pub async fn poll_once(&self) -> Result<serde_json::Number, ApiError> {
        let status = &self.account.status;
        // 代理已在连接阶段确定，这里只读不轮换
        let proxy = self.ctx.current_proxy(&self.account.id);

        status.set_status(STATUS_FETCHING);
        let result = self
            .ctx
            .api
            .fetch_points(&self.account.session, proxy.as_deref())
            .await;

        match &result {
            Ok(points) => status.update(|s| {
                s.points = Some(Points::Value(points.clone()));
                s.status = Some(STATUS_RUNNING.to_string());
            }),
            Err(ApiError::TokenExpired) => {
                tracing::warn!("积分查询返回 401，session token 已过期，需要重新登录");
                status.set_status(STATUS_TOKEN_EXPIRED);
            }
            Err(e) => {
                tracing::debug!("积分查询失败: {}", e);
                status.update(|s| {
                    s.points = Some(Points::Error);
                    s.status = Some(STATUS_FETCH_FAILED.to_string());
                });
            }
        }
        result
    }

    /// 循环查询直到取消
    pub async fn run(&self, cancel: &CancellationToken) {
        let interval = self.ctx.timings.point_interval;
        let cycle = async {
            loop {
                let _ = self.poll_once().await;
                tokio::time::sleep(interval).await;
            }
        };
        cancel.run_until_cancelled(cycle).await;
    }
}
