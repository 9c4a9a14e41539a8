//! # リクエストディスパッチャ
//!
//! すべての API 呼び出しが通過する単一の経路。
//!
//! ## 処理の流れ
//!
//! 1. URL を組み立てる（ベース URL + エンドポイント、GET のみクエリを付与）
//! 2. ヘッダーを組み立てる（`Content-Type: application/json` → 既定ヘッダー → 呼び出しごとの上書き）
//! 3. GET 以外はボディを JSON にエンコードする
//! 4. 非 2xx は [`HttpError`] に、2xx はエンベロープ [`ApiResponse<T>`] にデコードする
//!
//! 失敗はログに記録してから呼び出し側に返す。
//!
//! ## 開発モード
//!
//! [`DevMode`] で動作を切り替える。本番環境では常に [`DevMode::Disabled`]。
//!
//! - `MockOnly`: ネットワークを使わずモック応答を返す
//! - `Fallback`: 実ディスパッチが失敗し、登録済みフィクスチャがあればそれを返す

use std::sync::Arc;

use courtside_shared::{ApiResponse, ErrorBody};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
   auth_token::HeaderProvider,
   config::ClientConfig,
   error::{ApiError, HttpError},
   mock::{FixtureRegistry, MockResponder},
   request::RequestDescriptor,
   transport::{HttpRequest, HttpResponse, Transport},
};

/// 開発モードの動作
#[derive(Debug, Clone, Default)]
pub enum DevMode {
   /// 本番動作（フィクスチャを一切参照しない）
   #[default]
   Disabled,
   /// 実ディスパッチの失敗時のみ登録済みフィクスチャで置き換える
   Fallback(MockResponder),
   /// ネットワークを使わずモック応答を返す
   MockOnly(MockResponder),
}

impl DevMode {
   /// 設定から開発モードを決定する
   pub fn from_config(config: &ClientConfig, fixtures: FixtureRegistry) -> Self {
      if !config.is_development() {
         return Self::Disabled;
      }

      let responder = MockResponder::new(fixtures, config.mock_latency);
      if config.use_mock_api {
         Self::MockOnly(responder)
      } else {
         Self::Fallback(responder)
      }
   }
}

/// リクエストディスパッチャ
#[derive(Clone)]
pub struct Dispatcher {
   base_url:  String,
   transport: Arc<dyn Transport>,
   headers:   Arc<dyn HeaderProvider>,
   dev_mode:  DevMode,
}

impl Dispatcher {
   /// 本番動作のディスパッチャを作成する
   ///
   /// # 引数
   ///
   /// - `base_url`: すべてのエンドポイントの前に付与する URL（例: `http://localhost:3001/api`）
   /// - `transport`: HTTP の送受信を行うトランスポート
   /// - `headers`: ディスパッチごとに既定ヘッダーを提供する
   pub fn new(
      base_url: &str,
      transport: Arc<dyn Transport>,
      headers: Arc<dyn HeaderProvider>,
   ) -> Self {
      Self {
         base_url: base_url.trim_end_matches('/').to_string(),
         transport,
         headers,
         dev_mode: DevMode::Disabled,
      }
   }

   pub fn with_dev_mode(mut self, dev_mode: DevMode) -> Self {
      self.dev_mode = dev_mode;
      self
   }

   pub fn base_url(&self) -> &str {
      &self.base_url
   }

   /// リクエストを送信し、エンベロープにデコードして返す
   ///
   /// `success: false` のエンベロープもそのまま `Ok` で返す。
   /// 呼び出し側は `data` を使う前に `success` を確認すること。
   #[tracing::instrument(
      skip_all,
      level = "debug",
      fields(method = %request.method, endpoint = %request.endpoint)
   )]
   pub async fn dispatch<T: DeserializeOwned + Default>(
      &self,
      request: RequestDescriptor,
   ) -> Result<ApiResponse<T>, ApiError> {
      match &self.dev_mode {
         DevMode::Disabled => self.send(&request).await,
         DevMode::MockOnly(responder) => decode_envelope(responder.respond(&request).await),
         DevMode::Fallback(responder) => match self.send(&request).await {
            Err(err @ (ApiError::Network(_) | ApiError::Http(_))) => {
               match responder.fallback(&request) {
                  Some(envelope) => {
                     tracing::warn!(
                        error = %err,
                        "開発モード: 失敗したリクエストをフィクスチャで置き換えます"
                     );
                     decode_envelope(envelope)
                  }
                  None => Err(err),
               }
            }
            other => other,
         },
      }
   }

   async fn send<T: DeserializeOwned + Default>(
      &self,
      request: &RequestDescriptor,
   ) -> Result<ApiResponse<T>, ApiError> {
      let http_request = self.build_request(request)?;

      let response = match self.transport.send(http_request).await {
         Ok(response) => response,
         Err(err) => {
            tracing::error!(error = %err, "API リクエストが失敗しました");
            return Err(err);
         }
      };

      handle_response(response)
   }

   fn build_request(&self, request: &RequestDescriptor) -> Result<HttpRequest, ApiError> {
      let mut url = Url::parse(&format!("{}{}", self.base_url, request.endpoint))
         .map_err(|e| ApiError::Serialization(format!("URL を構築できません: {e}")))?;
      if request.is_read_only() && !request.query.is_empty() {
         url.query_pairs_mut().extend_pairs(request.query.iter());
      }

      // 後から追加したものが優先される
      let mut headers = HeaderMap::new();
      headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
      headers.extend(self.headers.headers());
      headers.extend(request.headers.clone());

      let body = match &request.body {
         Some(body) if !request.is_read_only() => Some(serde_json::to_vec(body)?),
         _ => None,
      };

      Ok(HttpRequest {
         method: request.method.clone(),
         url,
         headers,
         body,
      })
   }
}

/// HTTP レスポンスの共通ハンドリング
///
/// 非 2xx はボディの `message` / `code` / `details`（なければステータステキスト）から
/// [`HttpError`] を構築する。空ボディの 2xx は `data: null` の成功エンベロープとして扱う。
pub(crate) fn handle_response<T: DeserializeOwned + Default>(
   response: HttpResponse,
) -> Result<ApiResponse<T>, ApiError> {
   if !response.status.is_success() {
      let error = HttpError::from_parts(
         response.status.as_u16(),
         response.status_text(),
         ErrorBody::parse(&response.body),
      );
      if response.status.is_server_error() {
         tracing::error!(status = error.status, message = %error.message, code = ?error.code, "API がエラーを返しました");
      } else {
         tracing::warn!(status = error.status, message = %error.message, code = ?error.code, "API がエラーを返しました");
      }
      return Err(ApiError::Http(error));
   }

   if response.body.iter().all(u8::is_ascii_whitespace) {
      return decode_envelope(ApiResponse::ok(serde_json::Value::Null));
   }

   let envelope = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&response.body)
      .map_err(|e| {
         tracing::error!(error = %e, "レスポンスボディをデコードできません");
         ApiError::from(e)
      })?;
   decode_envelope(envelope)
}

/// `Value` のエンベロープを型付きのエンベロープに変換する
///
/// 失敗エンベロープと `data: null` の data はプレースホルダなので、
/// 要求された型にデコードできなければ `T::default()` で置き換える。
fn decode_envelope<T: DeserializeOwned + Default>(
   envelope: ApiResponse<serde_json::Value>,
) -> Result<ApiResponse<T>, ApiError> {
   let ApiResponse {
      data,
      success,
      message,
   } = envelope;
   let placeholder = !success || data.is_null();

   let data = match serde_json::from_value(data) {
      Ok(data) => data,
      Err(_) if placeholder => T::default(),
      Err(e) => {
         tracing::error!(error = %e, "レスポンスの data を要求された型にデコードできません");
         return Err(e.into());
      }
   };

   Ok(ApiResponse {
      data,
      success,
      message,
   })
}
