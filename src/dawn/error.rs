//! Dawn API 错误类型

use reqwest::StatusCode;
use thiserror::Error;

use crate::http_client::{ClientError, ProxyError};

/// 单次网络请求的失败种类
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 401，需要重新登录获取 token
    #[error("Token 已过期 (401)")]
    TokenExpired,
    /// 429
    #[error("请求被限流 (429)")]
    RateLimited,
    /// 其它非 2xx 响应
    #[error("API 返回错误状态: {status}")]
    Http { status: u16 },
    /// 超时、连接失败、响应体解析失败等
    #[error("网络请求失败: {0}")]
    Transport(String),
    /// 代理不可用，只影响本次调用
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

impl ApiError {
    /// 把非 2xx 状态码映射为错误，2xx 返回 `None`
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            s if s.is_success() => None,
            StatusCode::UNAUTHORIZED => Some(Self::TokenExpired),
            StatusCode::TOO_MANY_REQUESTS => Some(Self::RateLimited),
            s => Some(Self::Http { status: s.as_u16() }),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Proxy(e) => Self::Proxy(e),
            ClientError::Build(e) => Self::Transport(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// 一轮 ping（含重试）的最终失败原因，直接用于状态文本
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PingFailure {
    #[error("Token Expired")]
    TokenExpired,
    #[error("Rate Limited")]
    RateLimited,
    #[error("Request Failed")]
    RequestFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert_eq!(ApiError::from_status(StatusCode::OK), None);
        assert_eq!(ApiError::from_status(StatusCode::NO_CONTENT), None);
        assert_eq!(
            ApiError::from_status(StatusCode::UNAUTHORIZED),
            Some(ApiError::TokenExpired)
        );
        assert_eq!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS),
            Some(ApiError::RateLimited)
        );
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_GATEWAY),
            Some(ApiError::Http { status: 502 })
        );
    }

    #[test]
    fn test_ping_failure_text() {
        assert_eq!(PingFailure::TokenExpired.to_string(), "Token Expired");
        assert_eq!(PingFailure::RateLimited.to_string(), "Rate Limited");
        assert_eq!(PingFailure::RequestFailed.to_string(), "Request Failed");
    }
}
