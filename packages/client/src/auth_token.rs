//! # 認証トークン管理
//!
//! 現在のベアラートークンを保持し、以降に送信するリクエストへ
//! `Authorization: Bearer <token>` ヘッダーを付与する。
//!
//! ## 不変条件
//!
//! - 同時に有効な資格情報はクライアントごとに最大 1 つ
//! - トークンの変更は変更後にディスパッチされたリクエストにのみ影響する
//!   （ヘッダーはディスパッチ時点で [`HeaderProvider::headers`] からスナップショットされる）

use std::sync::RwLock;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

/// ログイン/登録で発行されるトークン一式
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
   pub access_token:  String,
   pub refresh_token: String,
   /// アクセストークンの有効期間（秒）
   pub expires_in:    u64,
}

/// 既定ヘッダーを提供するトレイト
///
/// ディスパッチャはこのトレイト越しにヘッダーを取得する。
pub trait HeaderProvider: Send + Sync {
   /// 現時点の既定ヘッダー（呼び出しごとに新しいスナップショット）
   fn headers(&self) -> HeaderMap;
}

#[derive(Debug, Default)]
struct TokenState {
   access_token:  Option<String>,
   refresh_token: Option<String>,
}

/// 認証トークンマネージャ
#[derive(Debug, Default)]
pub struct AuthTokenManager {
   state: RwLock<TokenState>,
}

impl AuthTokenManager {
   pub fn new() -> Self {
      Self::default()
   }

   /// アクセストークンを設定（置き換え）する
   pub fn set_auth_token(&self, token: impl Into<String>) {
      self.write().access_token = Some(token.into());
   }

   /// アクセストークンとリフレッシュトークンを設定する
   pub fn set_tokens(&self, tokens: &AuthTokens) {
      let mut state = self.write();
      state.access_token = Some(tokens.access_token.clone());
      state.refresh_token = Some(tokens.refresh_token.clone());
   }

   /// すべてのトークンを破棄する
   pub fn clear_auth_token(&self) {
      *self.write() = TokenState::default();
   }

   pub fn access_token(&self) -> Option<String> {
      self.read().access_token.clone()
   }

   pub fn refresh_token(&self) -> Option<String> {
      self.read().refresh_token.clone()
   }

   pub fn is_authenticated(&self) -> bool {
      self.read().access_token.is_some()
   }

   fn read(&self) -> std::sync::RwLockReadGuard<'_, TokenState> {
      self.state.read().unwrap_or_else(|e| e.into_inner())
   }

   fn write(&self) -> std::sync::RwLockWriteGuard<'_, TokenState> {
      self.state.write().unwrap_or_else(|e| e.into_inner())
   }
}

impl HeaderProvider for AuthTokenManager {
   fn headers(&self) -> HeaderMap {
      let mut headers = HeaderMap::new();
      if let Some(token) = self.read().access_token.as_deref() {
         match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
               value.set_sensitive(true);
               headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
               tracing::warn!("アクセストークンにヘッダーとして使用できない文字が含まれています");
            }
         }
      }
      headers
   }
}
