//! # API クライアントコンテキスト
//!
//! ディスパッチャ、キャッシュ、認証トークンマネージャ、リトライポリシーを束ねる。
//! プロセス全体で共有されるグローバル状態は持たず、すべての依存をこの構造体に注入する。
//! テストでは独立したインスタンスを作成できる。
//!
//! ## 合成ルール
//!
//! | 種別 | 動作 |
//! |------|------|
//! | 読み取り（キャッシュあり） | キャッシュ → リトライ → ディスパッチ。成功エンベロープのみ保存 |
//! | 読み取り（キャッシュなし） | リトライ → ディスパッチ |
//! | 更新 | 1 回だけディスパッチ。成功時は影響するキャッシュを削除 |
//!
//! 更新系はリトライしない。応答が失われただけでサーバー側では成功していた場合に
//! 二重登録（チームの重複作成など）が起きるため。

use std::{sync::Arc, time::Duration};

use courtside_shared::ApiResponse;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
   auth_token::{AuthTokenManager, AuthTokens},
   cache::{Cache, CacheStore, InMemoryCacheStore},
   clock::{Clock, SystemClock},
   config::{ClientConfig, ConfigError},
   dispatcher::{DevMode, Dispatcher},
   error::ApiError,
   mock::{FixtureLoadError, FixtureRegistry},
   request::RequestDescriptor,
   retry::{RetryPolicy, with_retry},
   transport::{ReqwestTransport, Transport},
};

/// API クライアント
///
/// `Clone` は同じキャッシュとトークンを共有する。
#[derive(Clone)]
pub struct ApiClient {
   config:     Arc<ClientConfig>,
   dispatcher: Dispatcher,
   cache:      Cache,
   tokens:     Arc<AuthTokenManager>,
}

impl ApiClient {
   /// 既定の依存（reqwest、インメモリキャッシュ、システム時計）で作成する
   pub fn new(config: ClientConfig) -> Self {
      Self::builder(config).build()
   }

   pub fn builder(config: ClientConfig) -> ApiClientBuilder {
      ApiClientBuilder::new(config)
   }

   /// 環境変数の設定から作成する
   pub fn from_env() -> Result<Self, ConfigError> {
      Ok(Self::new(ClientConfig::from_env()?))
   }

   pub fn config(&self) -> &ClientConfig {
      &self.config
   }

   pub fn retry_policy(&self) -> RetryPolicy {
      self.config.retry
   }

   /// アクセストークンを設定する（以降のディスパッチに適用）
   pub fn set_auth_token(&self, token: impl Into<String>) {
      self.tokens.set_auth_token(token);
   }

   /// ログイン/登録で発行されたトークン一式を設定する
   pub fn set_tokens(&self, tokens: &AuthTokens) {
      self.tokens.set_tokens(tokens);
   }

   /// すべてのトークンを破棄する
   pub fn clear_auth_token(&self) {
      self.tokens.clear_auth_token();
   }

   pub fn token_manager(&self) -> &AuthTokenManager {
      &self.tokens
   }

   pub fn cache(&self) -> &Cache {
      &self.cache
   }

   /// `pattern` を含むキャッシュキーを削除する（`None` なら全削除）
   pub fn clear_cache(&self, pattern: Option<&str>) -> usize {
      self.cache.clear_cache(pattern)
   }

   /// リクエストを 1 回ディスパッチする
   pub async fn dispatch<T: DeserializeOwned + Default>(
      &self,
      request: RequestDescriptor,
   ) -> Result<ApiResponse<T>, ApiError> {
      self.dispatcher.dispatch(request).await
   }

   /// 読み取りリクエストをリトライ付きでディスパッチする
   pub async fn retried<T: DeserializeOwned + Default>(
      &self,
      request: RequestDescriptor,
   ) -> Result<ApiResponse<T>, ApiError> {
      with_retry(self.config.retry, || self.dispatch(request.clone())).await
   }

   /// 読み取りリクエストをキャッシュとリトライ付きでディスパッチする
   ///
   /// キャッシュキーはエンドポイントと正規化済みクエリから導出する。
   /// `success: false` のエンベロープは保存しない。
   pub async fn cached<T: Serialize + DeserializeOwned + Default>(
      &self,
      request: RequestDescriptor,
      ttl: Duration,
   ) -> Result<ApiResponse<T>, ApiError> {
      let key = request.cache_key();
      self.cache
         .with_cache_if(
            &key,
            || self.retried(request),
            ttl,
            |response: &ApiResponse<T>| response.success,
         )
         .await
   }

   /// 更新リクエストを 1 回だけディスパッチする
   ///
   /// 成功した場合は `invalidate` の各パターンを含むキャッシュキーを削除する。
   pub async fn mutate<T: DeserializeOwned + Default>(
      &self,
      request: RequestDescriptor,
      invalidate: &[&str],
   ) -> Result<ApiResponse<T>, ApiError> {
      let response = self.dispatch::<T>(request).await?;

      if response.success {
         for pattern in invalidate {
            self.cache.clear_cache(Some(pattern));
         }
      }

      Ok(response)
   }
}

/// [`ApiClient`] のビルダー
///
/// 指定しなかった依存は既定の実装を使用する。
pub struct ApiClientBuilder {
   config:      ClientConfig,
   transport:   Option<Arc<dyn Transport>>,
   cache_store: Option<Arc<dyn CacheStore>>,
   clock:       Option<Arc<dyn Clock>>,
   tokens:      Option<Arc<AuthTokenManager>>,
   fixtures:    FixtureRegistry,
}

impl ApiClientBuilder {
   pub fn new(config: ClientConfig) -> Self {
      Self {
         config,
         transport: None,
         cache_store: None,
         clock: None,
         tokens: None,
         fixtures: FixtureRegistry::new(),
      }
   }

   pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
      self.transport = Some(transport);
      self
   }

   pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
      self.cache_store = Some(store);
      self
   }

   pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
      self.clock = Some(clock);
      self
   }

   pub fn token_manager(mut self, tokens: Arc<AuthTokenManager>) -> Self {
      self.tokens = Some(tokens);
      self
   }

   /// 開発モードで使用するフィクスチャ
   pub fn fixtures(mut self, fixtures: FixtureRegistry) -> Self {
      self.fixtures = fixtures;
      self
   }

   /// 設定の `fixtures_path` があればフィクスチャを読み込む
   ///
   /// 本番環境ではフィクスチャを参照しないため読み込まない。
   pub fn load_fixtures(self) -> Result<Self, FixtureLoadError> {
      match (&self.config.fixtures_path, self.config.is_development()) {
         (Some(path), true) => {
            let fixtures = FixtureRegistry::from_file(path)?;
            tracing::info!(
               path = %path.display(),
               routes = fixtures.len(),
               "フィクスチャを読み込みました"
            );
            Ok(self.fixtures(fixtures))
         }
         _ => Ok(self),
      }
   }

   pub fn build(self) -> ApiClient {
      let transport = self
         .transport
         .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));
      let store = self
         .cache_store
         .unwrap_or_else(|| Arc::new(InMemoryCacheStore::new()));
      let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
      let tokens = self.tokens.unwrap_or_default();

      let dev_mode = DevMode::from_config(&self.config, self.fixtures);
      let dispatcher = Dispatcher::new(&self.config.base_url, transport, tokens.clone())
         .with_dev_mode(dev_mode);

      ApiClient {
         config: Arc::new(self.config),
         dispatcher,
         cache: Cache::new(store, clock),
         tokens,
      }
   }
}

#[cfg(test)]
mod tests {
   use chrono::Utc;
   use pretty_assertions::assert_eq;
   use reqwest::header::AUTHORIZATION;
   use serde_json::json;

   use super::*;
   use crate::{clock::ManualClock, transport::StubTransport};

   const TTL: Duration = Duration::from_secs(60);

   fn setup(stub: &StubTransport) -> (ApiClient, Arc<ManualClock>) {
      let clock = Arc::new(ManualClock::new(Utc::now()));
      let config = ClientConfig::new("http://localhost:3001/api")
         .with_retry(RetryPolicy::new(2, Duration::from_millis(10)));
      let client = ApiClient::builder(config)
         .transport(Arc::new(stub.clone()))
         .clock(clock.clone())
         .build();
      (client, clock)
   }

   #[tokio::test]
   async fn test_cachedはttl内なら2回目にディスパッチしない() {
      let stub = StubTransport::always_ok(json!(["t1"]));
      let (client, _) = setup(&stub);

      let first: ApiResponse<Vec<String>> =
         client.cached(RequestDescriptor::get("/teams"), TTL).await.unwrap();
      let second: ApiResponse<Vec<String>> =
         client.cached(RequestDescriptor::get("/teams"), TTL).await.unwrap();

      assert_eq!(first, second);
      assert_eq!(stub.call_count(), 1);
   }

   #[tokio::test]
   async fn test_cachedはクエリが異なれば別キーになる() {
      let stub = StubTransport::always_ok(json!([]));
      let (client, _) = setup(&stub);

      let _: ApiResponse<Vec<String>> = client
         .cached(RequestDescriptor::get("/courts").query_param("page", 1), TTL)
         .await
         .unwrap();
      let _: ApiResponse<Vec<String>> = client
         .cached(RequestDescriptor::get("/courts").query_param("page", 2), TTL)
         .await
         .unwrap();

      assert_eq!(stub.call_count(), 2);
   }

   #[tokio::test]
   async fn test_cachedはsuccess_falseのエンベロープを保存しない() {
      let stub = StubTransport::always(crate::transport::HttpResponse::json(
         reqwest::StatusCode::OK,
         &json!({"data": null, "success": false, "message": "maintenance"}),
      ));
      let (client, _) = setup(&stub);

      for _ in 0..2 {
         let response: ApiResponse<Option<String>> =
            client.cached(RequestDescriptor::get("/teams"), TTL).await.unwrap();
         assert!(!response.success);
      }

      assert_eq!(stub.call_count(), 2);
      assert!(client.cache().is_empty());
   }

   #[tokio::test(start_paused = true)]
   async fn test_retriedは一時的な失敗をリトライする() {
      let stub = StubTransport::always_ok(json!("ok"));
      stub.push_error(ApiError::Network("reset".to_string()));
      stub.push_json(503, json!({"message": "busy"}));
      let (client, _) = setup(&stub);

      let response: ApiResponse<String> =
         client.retried(RequestDescriptor::get("/games")).await.unwrap();

      assert_eq!(response.data, "ok");
      assert_eq!(stub.call_count(), 3);
   }

   #[tokio::test]
   async fn test_mutateはリトライせず1回だけディスパッチする() {
      let stub = StubTransport::new();
      stub.push_error(ApiError::Network("reset".to_string()));
      let (client, _) = setup(&stub);

      let result: Result<ApiResponse<()>, _> =
         client.mutate(RequestDescriptor::post("/teams"), &["teams"]).await;

      assert!(matches!(result, Err(ApiError::Network(_))));
      assert_eq!(stub.call_count(), 1);
   }

   #[tokio::test]
   async fn test_mutateは成功時に指定パターンのキャッシュを削除する() {
      let stub = StubTransport::always_ok(json!(null));
      let (client, _) = setup(&stub);
      client.cache().put("/teams?page=1", &json!(1), TTL);
      client.cache().put("/games", &json!(2), TTL);

      let _: ApiResponse<()> = client
         .mutate(RequestDescriptor::post("/teams/t1/join"), &["/teams"])
         .await
         .unwrap();

      assert_eq!(client.cache().get::<i32>("/teams?page=1"), None);
      assert_eq!(client.cache().get::<i32>("/games"), Some(2));
   }

   #[tokio::test]
   async fn test_set_auth_tokenとclear_auth_tokenがディスパッチに反映される() {
      let stub = StubTransport::always_ok(json!(null));
      let (client, _) = setup(&stub);

      client.set_auth_token("t1");
      let _: ApiResponse<()> = client.dispatch(RequestDescriptor::get("/auth/me")).await.unwrap();
      client.clear_auth_token();
      let _: ApiResponse<()> = client.dispatch(RequestDescriptor::get("/auth/me")).await.unwrap();

      let requests = stub.requests();
      assert_eq!(requests[0].headers.get(AUTHORIZATION).unwrap(), "Bearer t1");
      assert!(requests[1].headers.get(AUTHORIZATION).is_none());
   }

   #[test]
   fn test_本番環境ではフィクスチャファイルを読み込まない() {
      let mut config = ClientConfig::new("http://localhost");
      config.fixtures_path = Some("/nonexistent/fixtures.json".into());

      assert!(ApiClient::builder(config).load_fixtures().is_ok());
   }

   #[test]
   fn test_開発環境で存在しないフィクスチャファイルはエラー() {
      let mut config = ClientConfig::new("http://localhost").development(true);
      config.fixtures_path = Some("/nonexistent/fixtures.json".into());

      let result = ApiClient::builder(config).load_fixtures();

      assert!(matches!(result, Err(FixtureLoadError::Io(_))));
   }
}
