//! # クライアント設定
//!
//! 環境変数から API クライアントの設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `API_BASE_URL` | No | `http://localhost:3001/api` | すべてのエンドポイントの前に付与するベース URL |
//! | `APP_ENV` | No | `production` | 実行環境（`development` / `production`） |
//! | `USE_MOCK_API` | No | 開発環境では `true` | ネットワークを使わずフィクスチャを返す |
//! | `MOCK_LATENCY_MS` | No | `300` | モック応答の擬似レイテンシ |
//! | `MOCK_FIXTURES_PATH` | No | - | フィクスチャ JSON ファイルのパス |
//! | `API_MAX_RETRIES` | No | `3` | 読み取り系 API のリトライ回数 |
//! | `API_RETRY_BASE_DELAY_MS` | No | `1000` | バックオフの基準待機時間 |
//!
//! `USE_MOCK_API` と `MOCK_*` は開発環境でのみ意味を持つ。
//! 本番環境ではモックもフォールバックも一切動作しない。

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use strum::{Display, EnumString};
use thiserror::Error;

use crate::retry::RetryPolicy;

const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";
const DEFAULT_MOCK_LATENCY_MS: u64 = 300;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
   /// 値の形式が不正
   #[error("環境変数 {name} の値が不正です: {value:?}")]
   InvalidValue { name: &'static str, value: String },

   /// ベース URL が URL として解釈できない
   #[error("API_BASE_URL が不正な URL です: {0}")]
   InvalidBaseUrl(#[from] url::ParseError),
}

/// 実行環境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
   /// 開発環境（モック応答とフォールバックが有効）
   Development,
   /// 本番環境
   #[default]
   Production,
}

/// API クライアントの設定
#[derive(Debug, Clone)]
pub struct ClientConfig {
   /// ベース URL（末尾の `/` は除去済み）
   pub base_url:      String,
   /// 実行環境
   pub environment:   Environment,
   /// 開発環境でネットワークを使わずフィクスチャを返すか
   pub use_mock_api:  bool,
   /// モック応答の擬似レイテンシ
   pub mock_latency:  Duration,
   /// フィクスチャ JSON ファイルのパス
   pub fixtures_path: Option<PathBuf>,
   /// 読み取り系 API のリトライポリシー
   pub retry:         RetryPolicy,
}

impl ClientConfig {
   /// 指定したベース URL の本番用設定を作成する
   pub fn new(base_url: &str) -> Self {
      Self {
         base_url:      base_url.trim_end_matches('/').to_string(),
         environment:   Environment::Production,
         use_mock_api:  false,
         mock_latency:  Duration::from_millis(DEFAULT_MOCK_LATENCY_MS),
         fixtures_path: None,
         retry:         RetryPolicy::new(
            DEFAULT_MAX_RETRIES,
            Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
         ),
      }
   }

   /// 開発環境に切り替える
   pub fn development(mut self, use_mock_api: bool) -> Self {
      self.environment = Environment::Development;
      self.use_mock_api = use_mock_api;
      self
   }

   pub fn with_mock_latency(mut self, latency: Duration) -> Self {
      self.mock_latency = latency;
      self
   }

   pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
      self.retry = retry;
      self
   }

   /// 開発モードか
   pub fn is_development(&self) -> bool {
      self.environment == Environment::Development
   }

   /// ディスパッチをネットワークなしでモック応答に置き換えるか
   ///
   /// 開発環境以外では常に `false`。
   pub fn serves_mocks(&self) -> bool {
      self.is_development() && self.use_mock_api
   }

   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      let base_url = env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
      url::Url::parse(&base_url)?;

      let environment = match env::var("APP_ENV") {
         Ok(value) => parse_environment(&value)?,
         Err(_) => Environment::default(),
      };
      let use_mock_api = match env::var("USE_MOCK_API") {
         Ok(value) => parse_bool("USE_MOCK_API", &value)?,
         Err(_) => environment == Environment::Development,
      };
      let mock_latency_ms = parse_var("MOCK_LATENCY_MS", DEFAULT_MOCK_LATENCY_MS)?;
      let max_retries = parse_var("API_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;
      let base_delay_ms = parse_var("API_RETRY_BASE_DELAY_MS", DEFAULT_RETRY_BASE_DELAY_MS)?;

      let config = Self {
         base_url: base_url.trim_end_matches('/').to_string(),
         environment,
         use_mock_api,
         mock_latency: Duration::from_millis(mock_latency_ms),
         fixtures_path: env::var("MOCK_FIXTURES_PATH").ok().map(PathBuf::from),
         retry: RetryPolicy::new(max_retries, Duration::from_millis(base_delay_ms)),
      };

      if config.is_development() {
         tracing::warn!(
            use_mock_api = config.use_mock_api,
            "開発モードで起動しました: 失敗したリクエストはフィクスチャで置き換えられる可能性があります"
         );
      }

      Ok(config)
   }
}

fn parse_environment(value: &str) -> Result<Environment, ConfigError> {
   Environment::from_str(value.trim()).map_err(|_| ConfigError::InvalidValue {
      name:  "APP_ENV",
      value: value.to_string(),
   })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
   match value.trim().to_ascii_lowercase().as_str() {
      "true" | "1" | "yes" => Ok(true),
      "false" | "0" | "no" | "" => Ok(false),
      _ => Err(ConfigError::InvalidValue {
         name,
         value: value.to_string(),
      }),
   }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
   match env::var(name) {
      Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
         name,
         value: value.clone(),
      }),
      Err(_) => Ok(default),
   }
}
