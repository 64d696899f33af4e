use clap::Parser;

use super::config::Config;

/// Dawn 多账号保活与积分查询
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<String>,

    /// 账号凭证文件路径
    #[arg(long)]
    pub accounts: Option<String>,

    /// 代理列表文件路径
    #[arg(long)]
    pub proxies: Option<String>,

    /// 使用代理运行
    #[arg(long)]
    pub use_proxy: bool,

    /// 连接失败时轮换代理
    #[arg(long)]
    pub rotate_proxy: bool,

    /// 不显示状态面板，日志同时输出到终端
    #[arg(long)]
    pub no_dashboard: bool,
}

impl Args {
    /// 命令行参数优先于配置文件与环境变量
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.accounts {
            config.accounts_path = path.clone();
        }
        if let Some(path) = &self.proxies {
            config.proxies_path = path.clone();
        }
        if self.use_proxy {
            config.use_proxy = true;
        }
        if self.rotate_proxy {
            config.rotate_proxy = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let args = Args::parse_from([
            "dawn-rs",
            "--accounts",
            "my-tokens.json",
            "--use-proxy",
            "--rotate-proxy",
        ]);
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.accounts_path, "my-tokens.json");
        assert_eq!(config.proxies_path, "proxy.txt");
        assert!(config.use_proxy);
        assert!(config.rotate_proxy);
        assert!(!args.no_dashboard);
    }
}
