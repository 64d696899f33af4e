use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 浏览器扩展 ID，服务端据此识别 ping 来源
pub const EXTENSION_ID: &str = "fpdkjdnhkakefebpekbdhillbhonfjjp";

/// 保活 ping 请求体
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PingRequest {
    pub user_id: String,
    pub extension_id: String,
    pub timestamp: String,
}

impl PingRequest {
    pub fn new(user_id: impl Into<String>, extension_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            extension_id: extension_id.into(),
            timestamp: format_timestamp(now),
        }
    }
}

/// 毫秒精度的 UTC 时间，以字面量 `Z` 结尾
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// 保活 ping 响应体
#[derive(Debug, Deserialize)]
pub struct PingResponse {
    #[serde(default)]
    pub message: Option<String>,
}
