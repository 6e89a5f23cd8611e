//! Booktriage - 图书传记标注审阅工具
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 审阅游标状态机、失败类型、事件上报、状态投影、主控循环
//! - **observability**: tracing 初始化
//! - **persist**: 上次浏览位置的单文件持久化
//! - **store**: 记录存储抽象与实现（Kinto / Mock）
//! - **ui**: Ratatui TUI 界面

pub mod config;
pub mod core;
pub mod observability;
pub mod persist;
pub mod store;
pub mod ui;
