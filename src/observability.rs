//! 可观测性
//!
//! tracing 初始化：默认 info，RUST_LOG 可覆盖；输出走 stderr，避免与 TUI 的
//! stdout 交替屏冲突。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
