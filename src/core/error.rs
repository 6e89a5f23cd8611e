//! 审阅失败类型
//!
//! 两类远端失败：批次拉取（Fetch）与分类写回（Update）。均经 observer 上报后吞掉：
//! 不重试、不中断进程、不在界面显示；classify 失败不前进游标，重按即重试。

use thiserror::Error;

use crate::store::StoreError;

/// 审阅过程中的远端失败
#[derive(Error, Debug)]
pub enum ReviewFailure {
    #[error("batch fetch failed: {0}")]
    Fetch(#[source] StoreError),

    #[error("classification update failed: {0}")]
    Update(#[source] StoreError),
}

impl ReviewFailure {
    /// 失败种类短名（日志字段用）
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewFailure::Fetch(_) => "fetch",
            ReviewFailure::Update(_) => "update",
        }
    }
}
