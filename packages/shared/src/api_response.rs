//! # API レスポンスエンベロープ
//!
//! バックエンドの統一レスポンス形式 `{ "data": T, "success": bool, "message": string }` を提供する。

use serde::{Deserialize, Serialize};

/// バックエンドの統一レスポンス型
///
/// すべてのエンドポイントはこの形式でレスポンスを返す。
/// `success` が `false` の場合、`data` はプレースホルダであり `message` に失敗理由が入る。
/// 呼び出し側は `data` を信頼する前に必ず `success` を確認すること。
///
/// `success` / `message` がワイヤ上に存在しない場合は、それぞれ `true` / `""` とみなす。
///
/// ## 使用例
///
/// ```
/// use courtside_shared::ApiResponse;
///
/// let response = ApiResponse::ok("hello");
/// assert!(response.success);
/// assert_eq!(response.data, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
   pub data:    T,
   #[serde(default = "default_success")]
   pub success: bool,
   #[serde(default)]
   pub message: String,
}

fn default_success() -> bool {
   true
}

impl<T> ApiResponse<T> {
   /// 成功レスポンスを作成する
   pub fn ok(data: T) -> Self {
      Self {
         data,
         success: true,
         message: String::new(),
      }
   }

   /// メッセージ付きの成功レスポンスを作成する
   pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
      Self {
         data,
         success: true,
         message: message.into(),
      }
   }

   /// 失敗レスポンスを作成する
   ///
   /// `placeholder` は呼び出し側が参照してはならない値。
   pub fn failure(placeholder: T, message: impl Into<String>) -> Self {
      Self {
         data:    placeholder,
         success: false,
         message: message.into(),
      }
   }

   /// `success` に応じて `Ok(data)` または `Err(message)` に変換する
   pub fn into_result(self) -> Result<T, String> {
      if self.success {
         Ok(self.data)
      } else {
         Err(self.message)
      }
   }

   /// `data` を変換する（`success` / `message` は維持）
   pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
      ApiResponse {
         data:    f(self.data),
         success: self.success,
         message: self.message,
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_serializeを正しいjson形状にする() {
      let response = ApiResponse::ok_with_message("hello", "ok");
      let json = serde_json::to_value(&response).unwrap();

      assert_eq!(
         json,
         serde_json::json!({ "data": "hello", "success": true, "message": "ok" })
      );
   }

   #[test]
   fn test_successとmessageが無いjsonは成功として扱う() {
      let json = r#"{"data": "world"}"#;
      let response: ApiResponse<String> = serde_json::from_str(json).unwrap();

      assert_eq!(response, ApiResponse::ok("world".to_string()));
   }

   #[test]
   fn test_失敗レスポンスをデシリアライズする() {
      let json = r#"{"data": null, "success": false, "message": "チームが満員です"}"#;
      let response: ApiResponse<Option<i32>> = serde_json::from_str(json).unwrap();

      assert!(!response.success);
      assert_eq!(response.message, "チームが満員です");
   }

   #[test]
   fn test_into_resultは失敗時にmessageを返す() {
      let failed = ApiResponse::failure(0, "権限がありません");
      assert_eq!(failed.into_result(), Err("権限がありません".to_string()));

      let succeeded = ApiResponse::ok(42);
      assert_eq!(succeeded.into_result(), Ok(42));
   }

   #[test]
   fn test_mapはsuccessとmessageを維持する() {
      let response = ApiResponse::failure(vec![1, 2], "部分的に失敗").map(|v| v.len());

      assert_eq!(response, ApiResponse::failure(2, "部分的に失敗"));
   }
}
