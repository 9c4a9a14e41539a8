//! テスト共通フィクスチャ
//!
//! wiremock のモックサーバーに接続するクライアントと、
//! バックエンドのレスポンス形式に沿った JSON を生成するヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::time::Duration;

use courtside_client::{ApiClient, ClientConfig, RetryPolicy};
use serde_json::{Value, json};
use wiremock::MockServer;

/// テスト用のリトライポリシー（待機時間を短くする）
pub const TEST_RETRY: RetryPolicy = RetryPolicy::new(2, Duration::from_millis(10));

/// モックサーバーの `/api` をベース URL とする本番設定
pub fn config_for(server: &MockServer) -> ClientConfig {
   ClientConfig::new(&format!("{}/api", server.uri())).with_retry(TEST_RETRY)
}

/// reqwest トランスポートでモックサーバーに接続するクライアント
pub fn client_for(server: &MockServer) -> ApiClient {
   ApiClient::new(config_for(server))
}

/// 成功エンベロープ
pub fn ok(data: Value) -> Value {
   json!({ "data": data, "success": true, "message": "" })
}

/// 失敗エンベロープ
pub fn failure(message: &str) -> Value {
   json!({ "data": null, "success": false, "message": message })
}

pub fn team_json(id: &str, name: &str) -> Value {
   json!({
      "id": id,
      "name": name,
      "captainId": "u1",
      "memberCount": 5,
      "maxMembers": 10,
      "isPublic": true,
      "createdAt": "2026-01-15T10:00:00Z"
   })
}

pub fn page_json(items: Vec<Value>, page: u32, limit: u32, total: u64) -> Value {
   let total_pages = if limit == 0 { 0 } else { total.div_ceil(u64::from(limit)) };
   json!({
      "data": items,
      "pagination": { "page": page, "limit": limit, "total": total, "totalPages": total_pages }
   })
}

pub fn session_json(access_token: &str) -> Value {
   json!({
      "user": {
         "id": "u1",
         "username": "hooper",
         "email": "hooper@example.com",
         "createdAt": "2026-01-15T10:00:00Z"
      },
      "tokens": {
         "accessToken": access_token,
         "refreshToken": "refresh-1",
         "expiresIn": 3600
      }
   })
}
