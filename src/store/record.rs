//! 记录类型：BookRecord、Classification、RecordPage、PageToken
//!
//! 与远端存储的 wire 格式对应：分类字段名为 is_biography，取值 yes/no/unknown；
//! 翻页句柄 PageToken 为不透明字符串（Kinto 后端为 Next-Page 头的完整 URL）。

use serde::{Deserialize, Serialize};

/// 三态分类；Unset 表示远端尚未标注（或未知取值），不会写回
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Yes,
    No,
    Unknown,
    #[default]
    #[serde(other)]
    Unset,
}

impl Classification {
    pub fn is_unset(&self) -> bool {
        matches!(self, Classification::Unset)
    }

    /// wire/日志用小写短名
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Yes => "yes",
            Classification::No => "no",
            Classification::Unknown => "unknown",
            Classification::Unset => "unset",
        }
    }
}

/// 单条图书记录；远端为权威数据源，本地仅持有当前批次的瞬时副本
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// 远端分配的不透明标识
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub synopsis: String,
    /// 分类字段；Unset 不序列化（避免把「未标注」写回远端）
    #[serde(default, skip_serializing_if = "Classification::is_unset")]
    pub is_biography: Classification,
    /// 远端最后修改时间（毫秒时间戳，透传不解释）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<u64>,
}

/// 不透明翻页句柄；由 Record Source 返回，取下一页时原样传回
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 一批记录加可选的下一页句柄；批次只整体替换，除写回同步外不做原地修改
#[derive(Clone, Debug, Default)]
pub struct RecordPage {
    pub records: Vec<BookRecord>,
    pub next: Option<PageToken>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_wire_names() {
        assert_eq!(serde_json::to_string(&Classification::Yes).unwrap(), r#""yes""#);
        let parsed: Classification = serde_json::from_str(r#""no""#).unwrap();
        assert_eq!(parsed, Classification::No);
    }

    #[test]
    fn test_unknown_wire_value_maps_to_unset() {
        let parsed: Classification = serde_json::from_str(r#""maybe""#).unwrap();
        assert_eq!(parsed, Classification::Unset);
    }

    #[test]
    fn test_unset_classification_not_serialized() {
        let record = BookRecord {
            id: "r1".to_string(),
            title: "T".to_string(),
            ..BookRecord::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("is_biography"));

        let classified = BookRecord {
            is_biography: Classification::Yes,
            ..record
        };
        let json = serde_json::to_string(&classified).unwrap();
        assert!(json.contains(r#""is_biography":"yes""#));
    }

    #[test]
    fn test_record_tolerates_missing_fields() {
        let record: BookRecord = serde_json::from_str(r#"{"id": "r2"}"#).unwrap();
        assert_eq!(record.id, "r2");
        assert!(record.title.is_empty());
        assert_eq!(record.is_biography, Classification::Unset);
        assert!(record.last_modified.is_none());
    }
}
