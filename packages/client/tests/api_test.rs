//! ドメイン API 統合テスト
//!
//! 業務操作ごとのファサードを wiremock のモックサーバーに対して実行し、
//! 認証・キャッシュ・リトライの組み合わせを検証する。
//!
//! 実行方法:
//! ```bash
//! cargo test -p courtside-client --test api_test
//! ```

mod common;

use std::sync::Arc;

use common::{TEST_RETRY, client_for, failure, ok, page_json, session_json, team_json};
use courtside_client::{
   ApiClient,
   ApiError,
   AuthApi,
   ClientConfig,
   CourtApi,
   GameApi,
   StubTransport,
   TeamApi,
   api::types::{CreateTeamRequest, GameFilters, LoginRequest, Team, TeamFilters},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
   Mock,
   MockServer,
   ResponseTemplate,
   matchers::{header, method, path, query_param},
};

fn login_request() -> LoginRequest {
   LoginRequest {
      email:    "hooper@example.com".to_string(),
      password: "secret".to_string(),
   }
}

// =============================================================================
// 認証
// =============================================================================

#[tokio::test]
async fn test_ログイン後のリクエストにアクセストークンが付与される() {
   let server = MockServer::start().await;
   Mock::given(method("POST"))
      .and(path("/api/auth/login"))
      .respond_with(ResponseTemplate::new(200).set_body_json(ok(session_json("access-1"))))
      .expect(1)
      .mount(&server)
      .await;
   Mock::given(method("GET"))
      .and(path("/api/teams/t1"))
      .and(header("authorization", "Bearer access-1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(ok(team_json("t1", "Night Owls"))))
      .expect(1)
      .mount(&server)
      .await;
   let client = client_for(&server);

   let session = client.login(&login_request()).await.unwrap();
   let team = client.get_team("t1").await.unwrap();

   assert_eq!(session.data.user.username, "hooper");
   assert!(client.token_manager().is_authenticated());
   assert_eq!(team.data.name, "Night Owls");
}

#[tokio::test]
async fn test_ログインが401ならトークンを設定しない() {
   let server = MockServer::start().await;
   Mock::given(method("POST"))
      .and(path("/api/auth/login"))
      .respond_with(ResponseTemplate::new(401).set_body_json(json!({
         "message": "invalid credentials",
         "code": "INVALID_CREDENTIALS"
      })))
      .expect(1)
      .mount(&server)
      .await;
   let client = client_for(&server);

   let result = client.login(&login_request()).await;

   assert!(matches!(
      result,
      Err(ApiError::Http(err)) if err.status == 401 && err.message == "invalid credentials"
   ));
   assert!(!client.token_manager().is_authenticated());
}

#[tokio::test]
async fn test_ログアウトでトークンとキャッシュが破棄される() {
   let server = MockServer::start().await;
   Mock::given(method("POST"))
      .and(path("/api/auth/login"))
      .respond_with(ResponseTemplate::new(200).set_body_json(ok(session_json("access-1"))))
      .mount(&server)
      .await;
   Mock::given(method("GET"))
      .and(path("/api/teams"))
      .respond_with(ResponseTemplate::new(200).set_body_json(ok(page_json(vec![], 1, 10, 0))))
      .mount(&server)
      .await;
   Mock::given(method("POST"))
      .and(path("/api/auth/logout"))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&server)
      .await;
   let client = client_for(&server);
   client.login(&login_request()).await.unwrap();
   client.get_teams(&TeamFilters::default()).await.unwrap();
   assert!(!client.cache().is_empty());

   let response = client.logout().await.unwrap();

   assert!(response.success);
   assert!(!client.token_manager().is_authenticated());
   assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_未認証でもリクエストは送信され失敗エンベロープはそのまま返る() {
   let server = MockServer::start().await;
   Mock::given(method("POST"))
      .and(path("/api/teams/t1/join"))
      .respond_with(ResponseTemplate::new(200).set_body_json(failure("login required")))
      .expect(1)
      .mount(&server)
      .await;
   let client = client_for(&server);

   let response = client.join_team("t1").await.unwrap();

   assert!(!response.success);
   assert_eq!(response.message, "login required");
   let received = server.received_requests().await.unwrap();
   assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_ログインの失敗エンベロープはokで返りトークンを設定しない() {
   let server = MockServer::start().await;
   Mock::given(method("POST"))
      .and(path("/api/auth/login"))
      .respond_with(ResponseTemplate::new(200).set_body_json(failure("account locked")))
      .expect(1)
      .mount(&server)
      .await;
   let client = client_for(&server);

   let response = client.login(&login_request()).await.unwrap();

   assert!(!response.success);
   assert_eq!(response.message, "account locked");
   assert!(!client.token_manager().is_authenticated());
}

// =============================================================================
// キャッシュ
// =============================================================================

#[tokio::test]
async fn test_同じ条件のチーム一覧は2回目をキャッシュから返す() {
   let server = MockServer::start().await;
   Mock::given(method("GET"))
      .and(path("/api/teams"))
      .and(query_param("city", "Osaka"))
      .respond_with(ResponseTemplate::new(200).set_body_json(ok(page_json(
         vec![team_json("t1", "Night Owls")],
         1,
         10,
         1,
      ))))
      .expect(1)
      .mount(&server)
      .await;
   let client = client_for(&server);
   let filters = TeamFilters {
      city: Some("Osaka".to_string()),
      ..Default::default()
   };

   let first = client.get_teams(&filters).await.unwrap();
   let second = client.get_teams(&filters).await.unwrap();

   assert_eq!(first, second);
   assert_eq!(second.data.data[0].id, "t1");
   assert_eq!(second.data.pagination.total, 1);
}

#[tokio::test]
async fn test_チーム作成の成功でチーム一覧のキャッシュが無効化される() {
   let server = MockServer::start().await;
   Mock::given(method("GET"))
      .and(path("/api/teams"))
      .respond_with(ResponseTemplate::new(200).set_body_json(ok(page_json(vec![], 1, 10, 0))))
      .expect(2)
      .mount(&server)
      .await;
   Mock::given(method("POST"))
      .and(path("/api/teams"))
      .respond_with(ResponseTemplate::new(201).set_body_json(ok(team_json("t9", "Rim Rockers"))))
      .expect(1)
      .mount(&server)
      .await;
   let client = client_for(&server);

   client.get_teams(&TeamFilters::default()).await.unwrap();
   let created = client
      .create_team(&CreateTeamRequest {
         name:        "Rim Rockers".to_string(),
         description: None,
         city:        None,
         skill_level: None,
         max_members: 10,
         is_public:   true,
      })
      .await
      .unwrap();
   client.get_teams(&TeamFilters::default()).await.unwrap();

   assert_eq!(created.data.id, "t9");
}

#[tokio::test]
async fn test_型付きの作成操作は失敗エンベロープをそのまま返しキャッシュを残す() {
   let stub = StubTransport::new();
   stub.push_json(200, ok(page_json(vec![team_json("t1", "Night Owls")], 1, 10, 1)));
   stub.push_json(200, failure("name taken"));
   let config = ClientConfig::new("http://localhost:3001/api").with_retry(TEST_RETRY);
   let client = ApiClient::builder(config)
      .transport(Arc::new(stub.clone()))
      .build();
   client.get_teams(&TeamFilters::default()).await.unwrap();

   let response = client
      .create_team(&CreateTeamRequest {
         name:        "Night Owls".to_string(),
         description: None,
         city:        None,
         skill_level: None,
         max_members: 10,
         is_public:   true,
      })
      .await
      .unwrap();

   assert!(!response.success);
   assert_eq!(response.message, "name taken");
   assert_eq!(response.data, Team::default());
   assert_eq!(client.cache().len(), 1);
}

#[tokio::test]
async fn test_型付きの取得操作の失敗エンベロープはキャッシュしない() {
   let server = MockServer::start().await;
   Mock::given(method("GET"))
      .and(path("/api/teams/t1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(failure("team archived")))
      .expect(2)
      .mount(&server)
      .await;
   let client = client_for(&server);

   for _ in 0..2 {
      let response = client.get_team("t1").await.unwrap();
      assert!(!response.success);
      assert_eq!(response.message, "team archived");
   }

   assert!(client.cache().is_empty());
}

// =============================================================================
// リトライ
// =============================================================================

#[tokio::test]
async fn test_読み取りは503の後にリトライして成功する() {
   let server = MockServer::start().await;
   Mock::given(method("GET"))
      .and(path("/api/courts/c1"))
      .respond_with(ResponseTemplate::new(503))
      .up_to_n_times(1)
      .expect(1)
      .mount(&server)
      .await;
   Mock::given(method("GET"))
      .and(path("/api/courts/c1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
         "id": "c1",
         "name": "Riverside Park",
         "address": "1-2-3 Kita",
         "city": "Osaka",
         "latitude": 34.7,
         "longitude": 135.5,
         "indoor": false
      }))))
      .expect(1)
      .mount(&server)
      .await;
   let client = client_for(&server);

   let court = client.get_court("c1").await.unwrap();

   assert_eq!(court.data.name, "Riverside Park");
}

#[tokio::test]
async fn test_リトライ上限を超えると最後のエラーを返す() {
   let server = MockServer::start().await;
   Mock::given(method("GET"))
      .and(path("/api/games"))
      .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
      // 初回 + リトライ 2 回
      .expect(3)
      .mount(&server)
      .await;
   let client = client_for(&server);

   let result = client.get_games(&GameFilters::default()).await;

   assert!(matches!(
      result,
      Err(ApiError::Http(err)) if err.status == 500 && err.message == "db down"
   ));
   assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_更新系は503でもリトライしない() {
   let server = MockServer::start().await;
   Mock::given(method("POST"))
      .and(path("/api/games/g1/join"))
      .respond_with(ResponseTemplate::new(503))
      .expect(1)
      .mount(&server)
      .await;
   let client = client_for(&server);

   let result = client.join_game("g1").await;

   assert!(matches!(result, Err(ApiError::Http(err)) if err.status == 503));
}

#[tokio::test]
async fn test_成功エンベロープのデータは型付きで取り出せる() {
   let server = MockServer::start().await;
   Mock::given(method("POST"))
      .and(path("/api/teams/t1/leave"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
         "data": {"left": true},
         "success": true,
         "message": "left team"
      })))
      .mount(&server)
      .await;
   let client = client_for(&server);

   let response = client.leave_team("t1").await.unwrap();

   assert_eq!(response.message, "left team");
   assert_eq!(response.data, json!({"left": true}));
}

// =============================================================================
// スタブトランスポート
// =============================================================================

#[tokio::test]
async fn test_更新系の失敗ではキャッシュを削除しない() {
   let stub = StubTransport::new();
   stub.push_json(200, ok(page_json(vec![team_json("t1", "Night Owls")], 1, 10, 1)));
   stub.push_json(409, json!({"message": "team is full", "code": "TEAM_FULL"}));
   let config = ClientConfig::new("http://localhost:3001/api").with_retry(TEST_RETRY);
   let client = ApiClient::builder(config)
      .transport(Arc::new(stub.clone()))
      .build();
   client.get_teams(&TeamFilters::default()).await.unwrap();

   let result = client.join_team("t1").await;

   assert!(matches!(
      result,
      Err(ApiError::Http(err)) if err.code.as_deref() == Some("TEAM_FULL")
   ));
   assert_eq!(client.cache().len(), 1);
   assert_eq!(stub.call_count(), 2);
}
