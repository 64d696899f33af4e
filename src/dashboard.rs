//! 终端状态面板
//!
//! 定时清屏并重绘所有账号的状态表，只读取状态快照。

use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use nu_ansi_term::Color;
use tokio_util::sync::CancellationToken;

use crate::pool::account::mask_account;
use crate::pool::{AccountRegistry, AccountStatus};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const ACCOUNT_WIDTH: usize = 25;
const PROXY_WIDTH: usize = 20;
const POINTS_WIDTH: usize = 15;
const PING_WIDTH: usize = 20;

/// 状态文本的色调
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Failure,
    Success,
    Pending,
    Neutral,
}

impl StatusTone {
    pub fn classify(status: &str) -> Self {
        let lower = status.to_ascii_lowercase();
        if lower.contains("failed") || lower.contains("error") {
            StatusTone::Failure
        } else if lower.contains("success") || lower.contains("running") {
            StatusTone::Success
        } else if lower.contains("checking")
            || lower.contains("fetching")
            || lower.contains("sending")
        {
            StatusTone::Pending
        } else {
            StatusTone::Neutral
        }
    }

    fn paint(self, text: &str) -> String {
        match self {
            StatusTone::Failure => Color::Red.paint(text).to_string(),
            StatusTone::Success => Color::Green.paint(text).to_string(),
            StatusTone::Pending => Color::Yellow.paint(text).to_string(),
            StatusTone::Neutral => text.to_string(),
        }
    }
}

/// 按字符截断到指定宽度
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// 渲染状态表
pub fn render(rows: &[(String, AccountStatus)]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<aw$} {:<pw$} {:<ptw$} {:<gw$} {}",
        "ACCOUNT",
        "PROXY",
        "POINTS",
        "PING STATUS",
        "STATUS",
        aw = ACCOUNT_WIDTH,
        pw = PROXY_WIDTH,
        ptw = POINTS_WIDTH,
        gw = PING_WIDTH,
    );
    let _ = writeln!(
        out,
        "{}",
        "-".repeat(ACCOUNT_WIDTH + PROXY_WIDTH + POINTS_WIDTH + PING_WIDTH + 24)
    );

    for (id, status) in rows {
        let proxy = status.proxy.as_deref().unwrap_or("N/A");
        let points = status
            .points
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let ping = status.ping_status.as_deref().unwrap_or("Queued");
        let text = status.status.as_deref().unwrap_or("Initializing...");

        let _ = writeln!(
            out,
            "{:<aw$} {:<pw$} {:<ptw$} {:<gw$} {}",
            fit(&mask_account(id), ACCOUNT_WIDTH),
            fit(proxy, PROXY_WIDTH),
            fit(&points, POINTS_WIDTH),
            fit(ping, PING_WIDTH),
            StatusTone::classify(text).paint(text),
            aw = ACCOUNT_WIDTH,
            pw = PROXY_WIDTH,
            ptw = POINTS_WIDTH,
            gw = PING_WIDTH,
        );
    }
    out
}

/// 状态面板
pub struct Dashboard {
    registry: Arc<AccountRegistry>,
    refresh: Duration,
}

impl Dashboard {
    pub fn new(registry: Arc<AccountRegistry>, refresh: Duration) -> Self {
        Self { registry, refresh }
    }

    fn draw(&self) {
        let table = render(&self.registry.snapshot());
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}{}", CLEAR_SCREEN, table);
        let _ = stdout.flush();
    }

    /// 定时重绘直到取消，退出前再画一次
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.refresh);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => self.draw(),
            }
        }
        self.draw();
    }
}
