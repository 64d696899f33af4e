//! 日志初始化
//!
//! 日志始终写入 `logs/` 下按天滚动的文件；状态面板占用终端时不向 stdout 输出。

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "dawn.log";

/// 创建按天滚动的日志文件写入器，目录不可写时返回错误
fn file_appender(dir: &Path) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir).with_context(|| format!("创建日志目录失败: {:?}", dir))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(dir)
        .with_context(|| format!("创建日志文件失败: {:?}", dir))
}

/// 初始化全局日志，返回的 guard 需要在 main 中保持存活
pub fn setup_logger(console: bool) -> anyhow::Result<WorkerGuard> {
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(Path::new(LOG_DIR))?);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
    let console_layer = console.then(|| fmt::layer().with_writer(std::io::stdout));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("初始化日志失败")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("dawn-rs-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_appender_creates_dir() {
        let dir = scratch_dir("logger-ok").join("logs");
        assert!(file_appender(&dir).is_ok());
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }

    #[test]
    fn test_file_appender_unwritable_dir_is_error() {
        let base = scratch_dir("logger-err");
        std::fs::create_dir_all(&base).unwrap();
        // 父路径是普通文件，目录无法创建
        let blocker = base.join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let err = file_appender(&blocker.join("logs")).unwrap_err();
        assert!(err.to_string().contains("创建日志目录失败"));
        let _ = std::fs::remove_dir_all(&base);
    }
}
