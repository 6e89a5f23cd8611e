//! 状态定义：ReviewPhase 与 UiState 投影
//!
//! UI 只持有轻量投影（阶段、当前记录、计数、续看提示）；完整游标状态由 Orchestrator
//! 内的 ReviewCursor 维护，每次命令处理前后投影一次。

use serde::Serialize;

use crate::store::BookRecord;

/// 审阅阶段（UI 投影用）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ReviewPhase {
    Loading,
    Reviewing,
    Exhausted,
}

/// UI 看到的「投影」状态，轻量且易于渲染
#[derive(Clone, Debug, Serialize)]
pub struct UiState {
    pub phase: ReviewPhase,
    /// 当前批次大小
    pub batch_len: usize,
    /// 批内位置；None 表示尚无批次
    pub position: Option<usize>,
    /// 当前记录（位置有效时）
    pub current: Option<BookRecord>,
    /// 上一会话停在的位置；仅作启动提示，不与当前批次校验
    pub resume_hint: Option<usize>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            phase: ReviewPhase::Loading,
            batch_len: 0,
            position: None,
            current: None,
            resume_hint: None,
        }
    }
}
