//! Booktriage - 图书传记标注审阅工具
//!
//! 入口：初始化日志、加载配置、创建审阅运行时与 TUI，并运行主循环。

use anyhow::Context;
use booktriage::config::{load_config, AppConfig};
use booktriage::core::create_reviewer;
use booktriage::ui::run_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    booktriage::observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    // 创建审阅运行时：返回命令发送端、状态接收端、通知接收端
    let (cmd_tx, state_rx, notice_rx) = create_reviewer(cfg)
        .await
        .context("Failed to create reviewer")?;

    // 启动 TUI 主循环（消费 state/notice，向 cmd_tx 发送用户命令）
    run_app(state_rx, notice_rx, cmd_tx)
        .await
        .context("App run failed")?;

    Ok(())
}
