//! Dawn API Provider
//!
//! 负责与 Dawn 奖励 API 通信：积分查询与保活 ping。
//! 每次调用都按账号当前代理构建独立的短生命周期 Client，避免跨账号复用连接。

use async_trait::async_trait;
use reqwest::Response;

use crate::dawn::error::ApiError;
use crate::dawn::model::ping::{PingRequest, PingResponse};
use crate::dawn::model::point::PointResponse;
use crate::dawn::session::AccountSession;
use crate::http_client::client_for;

/// 奖励 API 抽象，便于在测试中替换传输层
#[async_trait]
pub trait RewardsApi: Send + Sync {
    /// `GET /point?user_id={id}`
    async fn fetch_points(
        &self,
        session: &AccountSession,
        proxy: Option<&str>,
    ) -> Result<serde_json::Number, ApiError>;

    /// `POST /ping?role=extension`，返回服务端 message
    async fn send_ping(
        &self,
        session: &AccountSession,
        proxy: Option<&str>,
        request: &PingRequest,
    ) -> Result<String, ApiError>;
}

/// 基于 reqwest 的 Dawn API 实现
#[derive(Debug, Clone)]
pub struct DawnProvider {
    base_url: String,
    timeout_secs: u64,
}

impl DawnProvider {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs,
        }
    }

    pub fn point_url(&self, user_id: &str) -> String {
        format!("{}/point?user_id={}", self.base_url, user_id)
    }

    pub fn ping_url(&self) -> String {
        format!("{}/ping?role=extension", self.base_url)
    }
}

/// 401/429/其它非 2xx 统一转成 [`ApiError`]
fn check_status(response: Response) -> Result<Response, ApiError> {
    match ApiError::from_status(response.status()) {
        Some(e) => Err(e),
        None => Ok(response),
    }
}

#[async_trait]
impl RewardsApi for DawnProvider {
    async fn fetch_points(
        &self,
        session: &AccountSession,
        proxy: Option<&str>,
    ) -> Result<serde_json::Number, ApiError> {
        let client = client_for(proxy, self.timeout_secs)?;
        let response = client
            .get(self.point_url(&session.user_id))
            .headers(session.headers(false)?)
            .send()
            .await?;

        let body: PointResponse = check_status(response)?.json().await?;
        Ok(body.points())
    }

    async fn send_ping(
        &self,
        session: &AccountSession,
        proxy: Option<&str>,
        request: &PingRequest,
    ) -> Result<String, ApiError> {
        let client = client_for(proxy, self.timeout_secs)?;
        let response = client
            .post(self.ping_url())
            .headers(session.headers(true)?)
            .json(request)
            .send()
            .await?;

        let body: PingResponse = check_status(response)?.json().await?;
        Ok(body.message.unwrap_or_else(|| "OK".to_string()))
    }
}
