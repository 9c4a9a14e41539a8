//! # エラーレスポンスボディ
//!
//! バックエンドが非 2xx ステータスと共に返す JSON ボディ。
//!
//! ## 設計
//!
//! - すべてのフィールドは省略可能（バックエンドによって形状が異なるため）
//! - `details` は構造が固定されていないため `serde_json::Value` で保持する

use serde::{Deserialize, Serialize};

/// 非 2xx レスポンスのボディ
///
/// `{ "message": "...", "code": "...", "details": {...} }` 形式。
/// 未知のフィールドは無視する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub message: Option<String>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub code:    Option<String>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub details: Option<serde_json::Value>,
}

impl ErrorBody {
   /// バイト列から JSON としてパースする
   ///
   /// JSON オブジェクトとして解釈できない場合は `None` を返す。
   pub fn parse(bytes: &[u8]) -> Option<Self> {
      serde_json::from_slice(bytes).ok()
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_message_code_detailsをパースする() {
      let body = br#"{"message": "db down", "code": "DB_UNAVAILABLE", "details": {"retryAfter": 30}}"#;

      let parsed = ErrorBody::parse(body).unwrap();

      assert_eq!(parsed.message.as_deref(), Some("db down"));
      assert_eq!(parsed.code.as_deref(), Some("DB_UNAVAILABLE"));
      assert_eq!(parsed.details, Some(serde_json::json!({"retryAfter": 30})));
   }

   #[test]
   fn test_フィールドが欠けていてもパースできる() {
      let parsed = ErrorBody::parse(br#"{"error": "unknown shape"}"#).unwrap();

      assert_eq!(parsed, ErrorBody::default());
   }

   #[test]
   fn test_jsonでないボディはnoneを返す() {
      assert_eq!(ErrorBody::parse(b"<html>Bad Gateway</html>"), None);
      assert_eq!(ErrorBody::parse(b""), None);
   }
}
