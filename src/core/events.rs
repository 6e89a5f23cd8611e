//! 审阅事件上报
//!
//! 状态机不直接碰控制台或任何展示层：写回成功、远端失败、集合耗尽都经 ReviewObserver
//! 上报，由实现方决定呈现方式。运行时实现把失败记入 tracing，把成功与耗尽转成通知文本
//! 广播给 UI（瞬时提示）。

use tokio::sync::broadcast;

use crate::core::ReviewFailure;
use crate::store::{BookRecord, Classification};

/// 审阅事件回调
pub trait ReviewObserver: Send + Sync {
    /// 一条记录分类写回成功（record 为远端回显）
    fn on_classified(&self, record: &BookRecord, kind: Classification);

    /// 远端操作失败（fetch / update）
    fn on_failure(&self, failure: &ReviewFailure);

    /// 到达最后一批末尾且无下一页
    fn on_exhausted(&self);
}

/// 按远端回显的分类值生成通知文案
pub(crate) fn classified_notice(record: &BookRecord, kind: Classification) -> String {
    let verdict = match kind {
        Classification::Yes => "The book was saved as a biography",
        Classification::No => "The book was saved as NO biography",
        Classification::Unknown => "The book was saved as unknown",
        Classification::Unset => "The book was saved without a classification",
    };
    format!("Updated: {} - {}", record.title, verdict)
}

/// 运行时 observer：失败只进日志（界面不显示错误），成功与耗尽广播为通知文本
pub struct NoticeObserver {
    notice_tx: broadcast::Sender<String>,
}

impl NoticeObserver {
    pub fn new(notice_tx: broadcast::Sender<String>) -> Self {
        Self { notice_tx }
    }
}

impl ReviewObserver for NoticeObserver {
    fn on_classified(&self, record: &BookRecord, kind: Classification) {
        tracing::info!(id = %record.id, kind = kind.as_str(), "record classified");
        let _ = self.notice_tx.send(classified_notice(record, kind));
    }

    fn on_failure(&self, failure: &ReviewFailure) {
        tracing::warn!(kind = failure.kind(), error = %failure, "remote operation failed");
    }

    fn on_exhausted(&self) {
        tracing::info!("collection exhausted");
        let _ = self.notice_tx.send("No more records to review".to_string());
    }
}
