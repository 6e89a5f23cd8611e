//! 审阅运行时：主控循环
//!
//! 负责：按配置构建存储后端（未配置端点时回落 Mock）、读取上次位置提示、
//! 建立 cmd/state/notice 三通道，并在后台任务中消费用户命令（Next/Classify/Quit），
//! 驱动 ReviewCursor 并投影 UiState。命令逐条处理，每条等远端调用结束才取下一条，
//! 游标操作不会交错。

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};

use crate::config::AppConfig;
use crate::core::{NoticeObserver, ReviewCursor, ReviewPhase, UiState};
use crate::persist::ResumeStore;
use crate::store::{Classification, KintoStore, MockStore, RecordStore};

/// 从 UI 发往运行时的用户命令
#[derive(Debug, Clone)]
pub enum Command {
    /// 前进到下一条记录
    Next,
    /// 对当前记录写回分类（成功后自动前进）
    Classify(Classification),
    /// 退出应用
    Quit,
}

/// 根据配置选择存储后端（有端点走 Kinto，否则内存示例数据）
pub(crate) fn create_store_from_config(cfg: &AppConfig) -> Arc<dyn RecordStore> {
    match &cfg.store.base_url {
        Some(base_url) => {
            tracing::info!(
                %base_url,
                bucket = %cfg.store.bucket,
                collection = %cfg.store.collection,
                "Using Kinto record store"
            );
            Arc::new(KintoStore::new(
                base_url,
                &cfg.store.bucket,
                &cfg.store.collection,
                cfg.store.timeout_secs,
                cfg.store.auth.clone(),
            ))
        }
        None => {
            tracing::warn!("No store endpoint configured, using in-memory sample store");
            Arc::new(MockStore::with_sample_data(12))
        }
    }
}

/// 创建审阅运行时：返回命令发送端、状态接收端、通知接收端；后台任务消费命令并更新状态
pub async fn create_reviewer(
    cfg: AppConfig,
) -> anyhow::Result<(
    mpsc::UnboundedSender<Command>,
    watch::Receiver<UiState>,
    broadcast::Receiver<String>,
)> {
    let store = create_store_from_config(&cfg);

    let resume = ResumeStore::new(&cfg.review.resume_path);
    let resume_hint = resume.load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to read last index, starting fresh");
        None
    });
    if let Some(hint) = resume_hint {
        tracing::info!(last_index = hint, "last session stopped here");
    }

    // 三通道：UI -> Core 命令；Core -> UI 状态快照；Core -> UI 通知文本
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (state_tx, state_rx) = watch::channel(UiState {
        resume_hint,
        ..UiState::default()
    });
    let (notice_tx, notice_rx) = broadcast::channel::<String>(16);

    let observer = Arc::new(NoticeObserver::new(notice_tx));
    let mut cursor = ReviewCursor::new(
        store,
        observer,
        resume,
        cfg.review.batch_size,
        cfg.review.sort.clone(),
    );

    tokio::spawn(async move {
        // 启动即拉首页；失败只留日志，空批次照常进入循环
        cursor.load_initial_batch().await;
        let _ = state_tx.send(project(&cursor, phase_of(&cursor), resume_hint));

        loop {
            tokio::select! {
                Some(cmd) = cmd_rx.recv() => {
                    match cmd {
                        Command::Next => {
                            let _ = state_tx.send(project(&cursor, ReviewPhase::Loading, resume_hint));
                            cursor.advance().await;
                        }
                        Command::Classify(kind) => {
                            let _ = state_tx.send(project(&cursor, ReviewPhase::Loading, resume_hint));
                            cursor.classify(kind).await;
                        }
                        Command::Quit => break,
                    }
                    let _ = state_tx.send(project(&cursor, phase_of(&cursor), resume_hint));
                }
                else => break,  // cmd_tx 已关闭，退出循环
            }
        }
    });

    Ok((cmd_tx, state_rx, notice_rx))
}

fn phase_of(cursor: &ReviewCursor) -> ReviewPhase {
    if cursor.is_exhausted() {
        ReviewPhase::Exhausted
    } else {
        ReviewPhase::Reviewing
    }
}

fn project(cursor: &ReviewCursor, phase: ReviewPhase, resume_hint: Option<usize>) -> UiState {
    UiState {
        phase,
        batch_len: cursor.batch().len(),
        position: cursor.position(),
        current: cursor.current().cloned(),
        resume_hint,
    }
}
