//! # Courtside API クライアント
//!
//! バスケットボールコミュニティアプリのバックエンドと通信するクライアント層。
//! すべてのネットワーク通信はこのクレートを通過する。
//!
//! ## 構成
//!
//! - [`dispatcher`]: 1 つの HTTP リクエストを組み立てて送信し、レスポンス/エラーを正規化する
//! - [`auth_token`]: ベアラートークンを保持し、送信するリクエストに付与する
//! - [`cache`]: TTL 付きの値ストア。冪等な読み取りの重複呼び出しを省く
//! - [`retry`]: 指数バックオフ付きのリトライ
//! - [`mock`]: 開発環境でのフィクスチャ応答とフォールバック
//! - [`api`]: 業務操作ごとの型付きファサード
//!
//! [`ApiClient`] がこれらを束ねるコンテキストであり、グローバル状態は持たない。
//!
//! ## 使用例
//!
//! ```no_run
//! use courtside_client::{ApiClient, ClientConfig, api::{TeamApi, types::TeamFilters}};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(ClientConfig::new("http://localhost:3001/api"));
//! let response = client.get_teams(&TeamFilters::default()).await?;
//! if response.success {
//!     println!("{} チーム", response.data.pagination.total);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth_token;
pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod mock;
pub mod request;
pub mod retry;
pub mod transport;

pub use api::{AuthApi, CourtApi, CourtsideApi, GameApi, TeamApi, UserApi};
pub use auth_token::{AuthTokenManager, AuthTokens, HeaderProvider};
pub use cache::{Cache, CacheEntry, CacheStore, InMemoryCacheStore};
pub use client::{ApiClient, ApiClientBuilder};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ClientConfig, ConfigError, Environment};
pub use courtside_shared::{ApiResponse, PaginatedResponse, Pagination};
pub use dispatcher::{DevMode, Dispatcher};
pub use error::{ApiError, HttpError};
pub use mock::{FixtureLoadError, FixtureMatch, FixtureRegistry, MockResponder};
pub use request::RequestDescriptor;
pub use retry::{RetryPolicy, with_retry};
#[cfg(any(test, feature = "test-utils"))]
pub use transport::StubTransport;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
