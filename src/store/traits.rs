//! 记录存储抽象
//!
//! Record Source / Sink 的统一 seam：list_records（首页）、next_page（按句柄取下一页）、
//! update_record（写回单条）。具体后端（Kinto / Mock）实现本 trait，由运行时以
//! Arc<dyn RecordStore> 注入，而非模块级单例客户端。

use async_trait::async_trait;
use thiserror::Error;

use crate::store::{BookRecord, PageToken, RecordPage};

/// 存储层错误：请求失败 / 非 2xx 状态 / 响应解码失败 / 记录不存在
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("record not found: {0}")]
    NotFound(String),
}

/// 记录存储 trait：对象安全，后端可替换
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 取首页：按 sort 字段升序，最多 limit 条
    async fn list_records(&self, sort: &str, limit: usize) -> Result<RecordPage, StoreError>;

    /// 按句柄取下一页
    async fn next_page(&self, token: &PageToken) -> Result<RecordPage, StoreError>;

    /// 写回单条记录，返回远端回显（含已持久化的分类值）
    async fn update_record(&self, record: &BookRecord) -> Result<BookRecord, StoreError>;
}
