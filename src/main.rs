mod dashboard;
mod dawn;
mod http_client;
mod logger;
mod model;
mod pool;
mod worker;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use dashboard::Dashboard;
use dawn::model::credentials::DawnCredentials;
use dawn::probe::IpifyProbe;
use dawn::provider::DawnProvider;
use model::arg::Args;
use model::config::Config;
use pool::{AccountRegistry, ProxyPool};
use worker::{cancel_on_signal, run_fleet, WorkerContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 加载配置：文件 < 环境变量 < 命令行
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let mut config = Config::load(&config_path)?;
    config.override_from_env();
    args.apply(&mut config);

    let _log_guard = logger::setup_logger(args.no_dashboard)?;

    // 加载账号
    let credentials = DawnCredentials::load_all(&config.accounts_path)?;
    let registry = Arc::new(AccountRegistry::from_credentials(credentials));
    if registry.is_empty() {
        tracing::warn!("{} 中没有可用账号，退出", config.accounts_path);
        return Ok(());
    }

    // 加载代理
    let proxies = if config.use_proxy {
        ProxyPool::load(&config.proxies_path)?
    } else {
        ProxyPool::empty()
    };
    if config.use_proxy && proxies.is_empty() {
        tracing::warn!("已启用代理但代理列表为空，将直接连接");
    }

    tracing::info!("Dawn 保活启动");
    tracing::info!("账号数量: {}", registry.len());
    tracing::info!(
        "代理: {} (共 {} 个)，失败轮换: {}",
        if config.use_proxy { "启用" } else { "关闭" },
        proxies.len(),
        if config.rotate_proxy { "启用" } else { "关闭" }
    );
    tracing::info!("API: {}", config.base_api);

    let ctx = Arc::new(WorkerContext {
        api: Arc::new(DawnProvider::new(
            config.base_api.clone(),
            config.request_timeout_secs,
        )),
        probe: Arc::new(IpifyProbe::new(
            config.ip_check_url.clone(),
            config.probe_timeout_secs,
        )),
        proxies: Arc::new(proxies),
        timings: config.timings(),
        use_proxy: config.use_proxy,
        rotate_proxy: config.rotate_proxy,
        extension_id: config.extension_id.clone(),
    });

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(tokio::signal::ctrl_c(), cancel.clone()));

    let dashboard = (!args.no_dashboard).then(|| {
        let dashboard = Dashboard::new(
            registry.clone(),
            Duration::from_millis(config.refresh_interval_ms.max(1)),
        );
        tokio::spawn(dashboard.run(cancel.clone()))
    });

    run_fleet(registry, ctx, cancel.clone()).await;

    cancel.cancel();
    if let Some(handle) = dashboard {
        let _ = handle.await;
    }

    Ok(())
}
