//! Mock 记录存储（用于测试与未配置远端时的本地运行）
//!
//! 内存中按 title 升序持有全部记录，按 limit 切页，翻页句柄为 "offset:limit" 字符串；
//! set_fail_updates 用于注入写回失败，覆盖 classify 的失败路径。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::store::{BookRecord, Classification, PageToken, RecordPage, RecordStore, StoreError};

/// 内存 Mock 后端
#[derive(Debug, Default)]
pub struct MockStore {
    records: Mutex<Vec<BookRecord>>,
    fail_updates: AtomicBool,
}

impl MockStore {
    pub fn new(mut records: Vec<BookRecord>) -> Self {
        records.sort_by(|a, b| a.title.cmp(&b.title));
        Self {
            records: Mutex::new(records),
            fail_updates: AtomicBool::new(false),
        }
    }

    /// 生成一组演示记录（未配置远端端点时的回落数据）
    pub fn with_sample_data(count: usize) -> Self {
        let records = (0..count)
            .map(|i| BookRecord {
                id: uuid::Uuid::new_v4().to_string(),
                title: format!("Sample Book {:03}", i),
                author: format!("Author {}", i % 7),
                isbn: format!("978-0-000-{:05}-0", i),
                synopsis: "A sample record served from the in-memory store.".to_string(),
                is_biography: Classification::Unset,
                last_modified: None,
            })
            .collect();
        Self::new(records)
    }

    /// 注入/解除写回失败（测试用）
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    fn page_at(&self, offset: usize, limit: usize) -> RecordPage {
        let records = self.records.lock().unwrap();
        let start = offset.min(records.len());
        let end = (offset + limit).min(records.len());
        let page = records[start..end].to_vec();
        let next = (end < records.len()).then(|| PageToken::new(format!("{}:{}", end, limit)));
        RecordPage {
            records: page,
            next,
        }
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn list_records(&self, _sort: &str, limit: usize) -> Result<RecordPage, StoreError> {
        Ok(self.page_at(0, limit))
    }

    async fn next_page(&self, token: &PageToken) -> Result<RecordPage, StoreError> {
        let (offset, limit) = token
            .as_str()
            .split_once(':')
            .and_then(|(o, l)| Some((o.parse().ok()?, l.parse().ok()?)))
            .ok_or_else(|| StoreError::NotFound(format!("bad page token: {}", token.as_str())))?;
        Ok(self.page_at(offset, limit))
    }

    async fn update_record(&self, record: &BookRecord) -> Result<BookRecord, StoreError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Status {
                status: 503,
                detail: "injected update failure".to_string(),
            });
        }
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| StoreError::NotFound(record.id.clone()))?;
        let mut updated = record.clone();
        updated.last_modified = Some(slot.last_modified.unwrap_or(0) + 1);
        *slot = updated.clone();
        Ok(updated)
    }
}
