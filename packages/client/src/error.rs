//! # API クライアントのエラー型
//!
//! ディスパッチャが返す正規化済みエラー。
//!
//! - [`ApiError::Network`]: レスポンスを受け取れなかった（接続失敗など）
//! - [`ApiError::Http`]: 非 2xx ステータスを受け取った
//! - [`ApiError::Serialization`]: リクエストボディのエンコード、
//!   またはレスポンスボディのデコードに失敗した
//!
//! 入力値のバリデーションエラーはフォーム層の責務であり、このクレートでは生成しない。

use std::fmt;

use courtside_shared::ErrorBody;
use thiserror::Error;

/// 非 2xx ステータスのレスポンスから構築されるエラー
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
   /// HTTP ステータスコード
   pub status:  u16,
   /// ボディの `message`、なければステータステキスト
   pub message: String,
   /// ボディの構造化エラーコード
   pub code:    Option<String>,
   /// ボディの構造化詳細情報
   pub details: Option<serde_json::Value>,
}

impl HttpError {
   /// ステータスとボディから `HttpError` を構築する
   ///
   /// ボディに `message` がない場合は `status_text` を使用する。
   pub fn from_parts(status: u16, status_text: &str, body: Option<ErrorBody>) -> Self {
      let body = body.unwrap_or_default();
      Self {
         status,
         message: body.message.unwrap_or_else(|| status_text.to_string()),
         code: body.code,
         details: body.details,
      }
   }
}

impl fmt::Display for HttpError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{} {}", self.status, self.message)
   }
}

/// API クライアントエラー
#[derive(Debug, Clone, Error)]
pub enum ApiError {
   /// ネットワークエラー（レスポンスなし）
   #[error("ネットワークエラー: {0}")]
   Network(String),

   /// HTTP エラー（非 2xx）
   #[error("HTTP エラー: {0}")]
   Http(HttpError),

   /// シリアライズ/デシリアライズエラー
   #[error("シリアライズエラー: {0}")]
   Serialization(String),
}

impl ApiError {
   /// HTTP ステータスコード（`Http` の場合のみ）
   pub fn status(&self) -> Option<u16> {
      match self {
         Self::Http(err) => Some(err.status),
         _ => None,
      }
   }
}

impl From<reqwest::Error> for ApiError {
   fn from(err: reqwest::Error) -> Self {
      ApiError::Network(err.to_string())
   }
}

impl From<serde_json::Error> for ApiError {
   fn from(err: serde_json::Error) -> Self {
      ApiError::Serialization(err.to_string())
   }
}
