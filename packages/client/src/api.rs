//! # ドメイン API
//!
//! 業務操作ごとに 1 メソッドを持つ型付きファサード。
//! 各メソッドは HTTP メソッドとパスを 1 つ選び、必要に応じてキャッシュとリトライで包み、
//! [`ApiResponse`](courtside_shared::ApiResponse) をそのまま返す。
//!
//! 入力のバリデーションとエラーの変換は行わない（フォーム層の責務）。
//!
//! ## トレイト構成
//!
//! ドメインごとのサブトレイトを [`ApiClient`](crate::ApiClient) に実装し、
//! [`CourtsideApi`] で束ねる。テスト時にはサブトレイト単位でスタブを使用できる。
//!
//! ## キャッシュ TTL
//!
//! | 対象 | TTL |
//! |------|-----|
//! | ユーザー | 5 分 |
//! | チーム | 5 分 |
//! | ゲーム | 2 分 |
//! | コート | 10 分 |
//! | レビュー | 5 分 |
//!
//! ライブスコア（`/games/{id}/live`）はキャッシュしない。

pub mod auth_api;
pub mod court_api;
pub mod game_api;
pub mod team_api;
pub mod types;
pub mod user_api;

use std::{borrow::Cow, time::Duration};

pub use auth_api::AuthApi;
pub use court_api::CourtApi;
pub use game_api::GameApi;
pub use team_api::TeamApi;
pub use user_api::UserApi;

/// ドメイン API トレイト（スーパートレイト）
///
/// `Arc<dyn CourtsideApi>` として UI 層に渡せる。
pub trait CourtsideApi: AuthApi + UserApi + TeamApi + GameApi + CourtApi {}

impl<T> CourtsideApi for T where T: AuthApi + UserApi + TeamApi + GameApi + CourtApi {}

pub(crate) const USER_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub(crate) const TEAM_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub(crate) const GAME_CACHE_TTL: Duration = Duration::from_secs(2 * 60);
pub(crate) const COURT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
pub(crate) const REVIEW_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// ID をパスセグメントとしてエンコードする
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
   urlencoding::encode(id)
}
