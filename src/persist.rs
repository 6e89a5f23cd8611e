//! 上次浏览位置持久化
//!
//! 将最后浏览到的批内位置写入/读出单个 JSON 文件，跨会话保留。仅作续看提示，
//! 不与在线批次做一致性校验（悬空位置是接受的）。

use std::path::{Path, PathBuf};

/// 单文件 JSON 持久化：{"last_index": n}；-1 表示从未写过
#[derive(Debug, Clone)]
pub struct ResumeStore {
    path: PathBuf,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct SerHint {
    last_index: i64,
}

impl ResumeStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 读取上次位置；文件不存在或为 -1 哨兵时返回 None
    pub fn load(&self) -> anyhow::Result<Option<usize>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)?;
        let hint: SerHint = serde_json::from_str(&data)?;
        Ok(usize::try_from(hint.last_index).ok())
    }

    /// 写入当前位置；父目录不存在时自动创建
    pub fn save(&self, index: usize) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let ser = SerHint {
            last_index: index as i64,
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&ser)?)?;
        Ok(())
    }
}
