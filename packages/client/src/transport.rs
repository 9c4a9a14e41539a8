//! # HTTP トランスポート
//!
//! ディスパッチャとネットワークの境界。HTTP の送受信そのものは
//! `reqwest` に委譲し、ディスパッチャはこのトレイト越しにのみ通信する。
//!
//! テスト時は [`StubTransport`]（`test-utils` feature）で送信内容を記録し、
//! 応答をスクリプトできる。

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Method, StatusCode, header::HeaderMap};
use url::Url;

use crate::error::ApiError;

/// 送信する HTTP リクエスト
///
/// ディスパッチ時点で確定したヘッダーを保持する。
/// 送信後にトークンが変わってもこのリクエストには影響しない。
#[derive(Debug, Clone)]
pub struct HttpRequest {
   pub method:  Method,
   pub url:     Url,
   pub headers: HeaderMap,
   pub body:    Option<Vec<u8>>,
}

/// 受信した HTTP レスポンス
#[derive(Debug, Clone)]
pub struct HttpResponse {
   pub status: StatusCode,
   pub body:   Bytes,
}

impl HttpResponse {
   pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
      Self {
         status,
         body: body.into(),
      }
   }

   /// JSON ボディのレスポンスを作成する
   pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
      Self::new(status, body.to_string())
   }

   /// ステータステキスト（例: `Internal Server Error`）
   pub fn status_text(&self) -> &'static str {
      self.status.canonical_reason().unwrap_or("Unknown Status")
   }
}

/// HTTP トランスポートトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
/// レスポンスを受け取れなかった場合のみ `ApiError::Network` を返し、
/// 非 2xx ステータスはそのまま `HttpResponse` として返す。
#[async_trait]
pub trait Transport: Send + Sync {
   async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// reqwest によるトランスポート実装
///
/// タイムアウトは設定しない（reqwest の既定動作に従う）。
#[derive(Clone, Default)]
pub struct ReqwestTransport {
   client: reqwest::Client,
}

impl ReqwestTransport {
   pub fn new() -> Self {
      Self::default()
   }

   /// 設定済みの `reqwest::Client` を使用する
   pub fn with_client(client: reqwest::Client) -> Self {
      Self { client }
   }
}

#[async_trait]
impl Transport for ReqwestTransport {
   async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
      let mut builder = self
         .client
         .request(request.method, request.url)
         .headers(request.headers);
      if let Some(body) = request.body {
         builder = builder.body(body);
      }

      let response = builder.send().await?;
      let status = response.status();
      let body = response.bytes().await?;

      Ok(HttpResponse { status, body })
   }
}

#[cfg(any(test, feature = "test-utils"))]
pub use stub::StubTransport;

#[cfg(any(test, feature = "test-utils"))]
mod stub {
   use std::{
      collections::VecDeque,
      sync::{Arc, Mutex},
   };

   use async_trait::async_trait;
   use reqwest::StatusCode;

   use super::{HttpRequest, HttpResponse, Transport};
   use crate::error::ApiError;

   /// 応答をスクリプトできるテスト用トランスポート
   ///
   /// 登録順に応答を返し、キューが空になったら `fallback` を返す。
   /// `fallback` もなければ `ApiError::Network` を返す。
   /// 受け取ったリクエストはすべて記録する。
   #[derive(Clone, Default)]
   pub struct StubTransport {
      responses: Arc<Mutex<VecDeque<Result<HttpResponse, ApiError>>>>,
      fallback:  Option<HttpResponse>,
      requests:  Arc<Mutex<Vec<HttpRequest>>>,
   }

   impl StubTransport {
      pub fn new() -> Self {
         Self::default()
      }

      /// 常に同じ応答を返すスタブ
      pub fn always(response: HttpResponse) -> Self {
         Self {
            fallback: Some(response),
            ..Self::default()
         }
      }

      /// 常に `{ data, success: true }` を 200 で返すスタブ
      pub fn always_ok(data: serde_json::Value) -> Self {
         Self::always(HttpResponse::json(
            StatusCode::OK,
            &serde_json::json!({ "data": data, "success": true, "message": "" }),
         ))
      }

      pub fn push_response(&self, response: HttpResponse) {
         self.lock_responses().push_back(Ok(response));
      }

      pub fn push_json(&self, status: u16, body: serde_json::Value) {
         let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
         self.push_response(HttpResponse::json(status, &body));
      }

      pub fn push_error(&self, error: ApiError) {
         self.lock_responses().push_back(Err(error));
      }

      /// 記録されたリクエスト
      pub fn requests(&self) -> Vec<HttpRequest> {
         self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
      }

      /// 受け取ったリクエスト数
      pub fn call_count(&self) -> usize {
         self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
      }

      fn lock_responses(
         &self,
      ) -> std::sync::MutexGuard<'_, VecDeque<Result<HttpResponse, ApiError>>> {
         self.responses.lock().unwrap_or_else(|e| e.into_inner())
      }
   }

   #[async_trait]
   impl Transport for StubTransport {
      async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
         self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

         match self.lock_responses().pop_front() {
            Some(scripted) => scripted,
            None => self.fallback.clone().ok_or_else(|| {
               ApiError::Network("スタブに応答が登録されていません".to_string())
            }),
         }
      }
   }
}
