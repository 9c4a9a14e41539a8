//! # 開発用モック応答（Dev Mock Responder）
//!
//! 開発環境でバックエンドなしにフロントエンド開発を進めるため、
//! ディスパッチをネットワークなしの静的フィクスチャ応答に置き換える。
//!
//! ## 動作
//!
//! 1. 擬似レイテンシだけ待機する
//! 2. リクエストのパスに一致するフィクスチャを探す
//! 3. 見つかればそれを成功レスポンスとして返し、なければ空の成功レスポンス（`data: null`）を返す
//!
//! 実ディスパッチが失敗した場合のフォールバックでは、登録済みのフィクスチャのみを使う
//! （空レスポンスへのフォールバックはしない）。
//!
//! ## 安全策
//!
//! - 開発環境（`APP_ENV=development`）でのみディスパッチャから呼ばれる
//! - フィクスチャは説明用の手書きデータであり、バックエンドのスキーマとの契約ではない

use std::{collections::HashMap, fmt, path::Path, str::FromStr, sync::Arc, time::Duration};

use courtside_shared::ApiResponse;
use reqwest::Method;
use thiserror::Error;

use crate::request::RequestDescriptor;

/// フィクスチャを生成する関数
pub type FixtureProducer = Arc<dyn Fn(&RequestDescriptor) -> serde_json::Value + Send + Sync>;

/// フィクスチャの読み込みエラー
#[derive(Debug, Error)]
pub enum FixtureLoadError {
   #[error("フィクスチャファイルを読み込めません: {0}")]
   Io(#[from] std::io::Error),

   #[error("フィクスチャの JSON が不正です: {0}")]
   Parse(#[from] serde_json::Error),

   /// トップレベルがオブジェクトでない
   #[error("フィクスチャはパスをキーとするオブジェクトである必要があります")]
   NotAnObject,

   /// `"METHOD /path"` 形式のキーのメソッドが不正
   #[error("フィクスチャキーのメソッドが不正です: {0}")]
   InvalidMethod(String),
}

/// フィクスチャのルート
///
/// `method` が `None` の場合はすべてのメソッドに一致する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixtureRoute {
   pub method: Option<Method>,
   pub path:   String,
}

/// フィクスチャの検索結果
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureMatch {
   /// 登録済みのフィクスチャ
   Registered(serde_json::Value),
   /// 未登録（既定の空レスポンスを返す）
   Default,
}

/// フィクスチャのレジストリ
///
/// ルート（メソッド + 完全一致のパス）からフィクスチャ生成関数への対応表。
/// メソッド指定のルートはメソッド指定なしのルートより優先される。
#[derive(Clone, Default)]
pub struct FixtureRegistry {
   routes: HashMap<FixtureRoute, FixtureProducer>,
}

impl fmt::Debug for FixtureRegistry {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("FixtureRegistry")
         .field("routes", &self.routes.keys().collect::<Vec<_>>())
         .finish()
   }
}

impl FixtureRegistry {
   pub fn new() -> Self {
      Self::default()
   }

   /// すべてのメソッドに一致するフィクスチャを登録する
   pub fn route<F>(mut self, path: impl Into<String>, producer: F) -> Self
   where
      F: Fn(&RequestDescriptor) -> serde_json::Value + Send + Sync + 'static,
   {
      self.insert(None, path.into(), Arc::new(producer));
      self
   }

   /// 特定のメソッドにのみ一致するフィクスチャを登録する
   pub fn route_method<F>(mut self, method: Method, path: impl Into<String>, producer: F) -> Self
   where
      F: Fn(&RequestDescriptor) -> serde_json::Value + Send + Sync + 'static,
   {
      self.insert(Some(method), path.into(), Arc::new(producer));
      self
   }

   /// 固定値のフィクスチャを登録する
   pub fn fixture(self, path: impl Into<String>, data: serde_json::Value) -> Self {
      self.route(path, move |_| data.clone())
   }

   fn insert(&mut self, method: Option<Method>, path: String, producer: FixtureProducer) {
      self.routes.insert(FixtureRoute { method, path }, producer);
   }

   /// リクエストに対応するフィクスチャを探す
   pub fn resolve(&self, request: &RequestDescriptor) -> FixtureMatch {
      let exact = FixtureRoute {
         method: Some(request.method.clone()),
         path:   request.endpoint.clone(),
      };
      let any = FixtureRoute {
         method: None,
         path:   request.endpoint.clone(),
      };

      match self.routes.get(&exact).or_else(|| self.routes.get(&any)) {
         Some(producer) => FixtureMatch::Registered(producer(request)),
         None => FixtureMatch::Default,
      }
   }

   pub fn len(&self) -> usize {
      self.routes.len()
   }

   pub fn is_empty(&self) -> bool {
      self.routes.is_empty()
   }

   /// JSON からレジストリを構築する
   ///
   /// キーはパス（`"/teams"`）または `"METHOD /path"`（`"POST /teams"`）。
   /// 値はレスポンスの `data` にそのまま入る。
   pub fn from_json(json: &str) -> Result<Self, FixtureLoadError> {
      let serde_json::Value::Object(entries) = serde_json::from_str(json)? else {
         return Err(FixtureLoadError::NotAnObject);
      };

      let mut registry = Self::new();
      for (key, data) in entries {
         let (method, path) = parse_route_key(&key)?;
         registry.insert(method, path, Arc::new(move |_| data.clone()));
      }
      Ok(registry)
   }

   /// JSON ファイルからレジストリを構築する
   pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureLoadError> {
      let json = std::fs::read_to_string(path)?;
      Self::from_json(&json)
   }
}

fn parse_route_key(key: &str) -> Result<(Option<Method>, String), FixtureLoadError> {
   match key.split_once(' ') {
      Some((method, path)) => {
         let method = Method::from_str(&method.to_ascii_uppercase())
            .map_err(|_| FixtureLoadError::InvalidMethod(method.to_string()))?;
         Ok((Some(method), path.trim().to_string()))
      }
      None => Ok((None, key.to_string())),
   }
}

/// 開発用モック応答
#[derive(Debug, Clone)]
pub struct MockResponder {
   registry: Arc<FixtureRegistry>,
   latency:  Duration,
}

impl MockResponder {
   pub fn new(registry: FixtureRegistry, latency: Duration) -> Self {
      Self {
         registry: Arc::new(registry),
         latency,
      }
   }

   /// ネットワークを使わずに応答する
   ///
   /// 擬似レイテンシの後、フィクスチャまたは空の成功レスポンスを返す。
   pub async fn respond(&self, request: &RequestDescriptor) -> ApiResponse<serde_json::Value> {
      tokio::time::sleep(self.latency).await;

      match self.registry.resolve(request) {
         FixtureMatch::Registered(data) => {
            tracing::debug!(
               method = %request.method,
               endpoint = %request.endpoint,
               "モックデータを返却"
            );
            ApiResponse::ok_with_message(data, "Mock data")
         }
         FixtureMatch::Default => {
            tracing::debug!(
               method = %request.method,
               endpoint = %request.endpoint,
               "モックデータ未登録: 空のレスポンスを返却"
            );
            ApiResponse::ok_with_message(serde_json::Value::Null, "No mock data registered")
         }
      }
   }

   /// 実ディスパッチ失敗時のフォールバック
   ///
   /// 登録済みのフィクスチャがある場合のみ返す。
   pub fn fallback(&self, request: &RequestDescriptor) -> Option<ApiResponse<serde_json::Value>> {
      match self.registry.resolve(request) {
         FixtureMatch::Registered(data) => {
            Some(ApiResponse::ok_with_message(data, "Mock data (fallback)"))
         }
         FixtureMatch::Default => None,
      }
   }
}
