//! 出口连通性检测

use async_trait::async_trait;

use crate::http_client::client_for;

/// 连通性检测
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    /// 通过代理（或直连）检测出口是否可用，不做内部重试
    async fn check(&self, proxy: Option<&str>) -> bool;
}

/// 请求公共 IP 查询接口判断出口是否可用
#[derive(Debug, Clone)]
pub struct IpifyProbe {
    url: String,
    timeout_secs: u64,
}

impl IpifyProbe {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            url: url.into(),
            timeout_secs,
        }
    }
}

#[async_trait]
impl ConnectionProbe for IpifyProbe {
    async fn check(&self, proxy: Option<&str>) -> bool {
        let client = match client_for(proxy, self.timeout_secs) {
            Ok(client) => client,
            Err(e) => {
                tracing::debug!("连通性检测无法构建 Client: {}", e);
                return false;
            }
        };

        match client.get(&self.url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("连通性检测失败: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_check_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ip":"1.2.3.4"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let probe = IpifyProbe::new(server.uri(), 10);
        assert!(probe.check(None).await);
    }

    #[tokio::test]
    async fn test_check_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let probe = IpifyProbe::new(server.uri(), 10);
        assert!(!probe.check(None).await);
    }

    #[tokio::test]
    async fn test_check_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let probe = IpifyProbe::new(server.uri(), 1);
        let start = Instant::now();
        assert!(!probe.check(None).await);
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_check_unsupported_proxy() {
        let probe = IpifyProbe::new("http://127.0.0.1:9", 10);
        assert!(!probe.check(Some("gopher://10.0.0.1:70")).await);
    }
}
