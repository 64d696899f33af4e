use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::dawn::model::credentials::DawnCredentials;
use crate::dawn::model::ping::EXTENSION_ID;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_base_api")]
    pub base_api: String,

    /// 连通性检测地址
    #[serde(default = "default_ip_check_url")]
    pub ip_check_url: String,

    #[serde(default = "default_accounts_path")]
    pub accounts_path: String,

    #[serde(default = "default_proxies_path")]
    pub proxies_path: String,

    /// 是否使用代理
    #[serde(default)]
    pub use_proxy: bool,

    /// 连接失败时是否轮换代理
    #[serde(default)]
    pub rotate_proxy: bool,

    #[serde(default = "default_extension_id")]
    pub extension_id: String,

    #[serde(default = "default_point_interval_secs")]
    pub point_interval_secs: u64,

    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,

    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,

    #[serde(default = "default_ping_retry_delay_secs")]
    pub ping_retry_delay_secs: u64,

    #[serde(default = "default_rate_limit_delay_secs")]
    pub rate_limit_delay_secs: u64,

    #[serde(default = "default_ping_failure_delay_secs")]
    pub ping_failure_delay_secs: u64,

    #[serde(default = "default_ping_max_attempts")]
    pub ping_max_attempts: u32,

    /// 数据请求超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// 连通性检测超时（秒）
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// 状态面板刷新间隔（毫秒）
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

impl Config {
    /// 从环境变量覆盖配置
    pub fn override_from_env(&mut self) {
        if let Ok(base_api) = env::var("DAWN_BASE_API") {
            self.base_api = base_api;
        }
        if let Ok(path) = env::var("ACCOUNTS_PATH") {
            self.accounts_path = path;
        }
        if let Ok(path) = env::var("PROXIES_PATH") {
            self.proxies_path = path;
        }
        if let Some(v) = env_flag("USE_PROXY") {
            self.use_proxy = v;
        }
        if let Some(v) = env_flag("ROTATE_PROXY") {
            self.rotate_proxy = v;
        }
    }

    /// 循环节奏
    pub fn timings(&self) -> Timings {
        Timings {
            point_interval: Duration::from_secs(self.point_interval_secs),
            ping_interval: Duration::from_secs(self.ping_interval_secs),
            reconnect_delay: Duration::from_secs(self.reconnect_delay_secs),
            ping_retry_delay: Duration::from_secs(self.ping_retry_delay_secs),
            rate_limit_delay: Duration::from_secs(self.rate_limit_delay_secs),
            ping_failure_delay: Duration::from_secs(self.ping_failure_delay_secs),
            ping_max_attempts: self.ping_max_attempts.max(1),
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// 各循环的等待时长与重试预算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub point_interval: Duration,
    pub ping_interval: Duration,
    pub reconnect_delay: Duration,
    pub ping_retry_delay: Duration,
    pub rate_limit_delay: Duration,
    pub ping_failure_delay: Duration,
    pub ping_max_attempts: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Config::default().timings()
    }
}

fn default_base_api() -> String {
    "https://api.dawninternet.com".to_string()
}

fn default_ip_check_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_accounts_path() -> String {
    DawnCredentials::default_credentials_path().to_string()
}

fn default_proxies_path() -> String {
    "proxy.txt".to_string()
}

fn default_extension_id() -> String {
    EXTENSION_ID.to_string()
}

fn default_point_interval_secs() -> u64 {
    300
}

fn default_ping_interval_secs() -> u64 {
    600
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

fn default_ping_retry_delay_secs() -> u64 {
    5
}

fn default_rate_limit_delay_secs() -> u64 {
    60
}

fn default_ping_failure_delay_secs() -> u64 {
    60
}

fn default_ping_max_attempts() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_probe_timeout_secs() -> u64 {
    10
}

fn default_refresh_interval_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_api: default_base_api(),
            ip_check_url: default_ip_check_url(),
            accounts_path: default_accounts_path(),
            proxies_path: default_proxies_path(),
            use_proxy: false,
            rotate_proxy: false,
            extension_id: default_extension_id(),
            point_interval_secs: default_point_interval_secs(),
            ping_interval_secs: default_ping_interval_secs(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            ping_retry_delay_secs: default_ping_retry_delay_secs(),
            rate_limit_delay_secs: default_rate_limit_delay_secs(),
            ping_failure_delay_secs: default_ping_failure_delay_secs(),
            ping_max_attempts: default_ping_max_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

impl Config {
    /// 获取默认配置文件路径
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // 配置文件不存在，返回默认配置
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
