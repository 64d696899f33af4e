//! 账号会话配置
//!
//! 不是长连接：只负责派生请求头，每次请求由调用方按当前代理构建独立 Client

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

use crate::dawn::error::ApiError;

/// 账号会话
#[derive(Debug, Clone)]
pub struct AccountSession {
    /// Dawn 用户 ID
    pub user_id: String,
    /// Bearer session token
    session_token: String,
    /// 本次运行固定的 User-Agent
    pub user_agent: String,
}

impl AccountSession {
    pub fn new(
        user_id: impl Into<String>,
        session_token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            session_token: session_token.into(),
            user_agent: user_agent.into(),
        }
    }

    /// 构建请求头
    ///
    /// `json` 为 true 时附加 `Content-Type: application/json`
    pub fn headers(&self, json: bool) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&self.user_agent)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", self.session_token))?,
        );
        if json {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|e| ApiError::Transport(format!("无效的请求头: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        let session = AccountSession::new("uid-1", "tok-abc", "TestAgent/1.0");
        let headers = session.headers(false).unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok-abc");
        assert_eq!(headers.get(USER_AGENT).unwrap(), "TestAgent/1.0");
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_json_headers() {
        let session = AccountSession::new("uid-1", "tok-abc", "TestAgent/1.0");
        let headers = session.headers(true).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let session = AccountSession::new("uid-1", "tok\nabc", "TestAgent/1.0");
        assert!(matches!(
            session.headers(false),
            Err(ApiError::Transport(_))
        ));
    }
}
