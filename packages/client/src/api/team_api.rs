//! チーム API

use async_trait::async_trait;
use courtside_shared::{ApiResponse, PaginatedResponse};
use serde_json::Value;

use super::{
   TEAM_CACHE_TTL,
   segment,
   types::{
      Achievement,
      CreateTeamRequest,
      ImageUpload,
      InvitePlayerRequest,
      Lineup,
      Team,
      TeamFilters,
      TeamMember,
      TeamStats,
      UpdateTeamRequest,
      UploadedImage,
   },
};
use crate::{client::ApiClient, error::ApiError, request::RequestDescriptor};

/// チーム関連のキャッシュキーに共通する部分文字列
///
/// `/users/{id}/teams` も含まれる。
const TEAMS: &str = "/teams";

/// チーム API トレイト
#[async_trait]
pub trait TeamApi: Send + Sync {
   /// チーム一覧を取得する
   ///
   /// `GET /teams` を呼び出す（キャッシュあり）。絞り込み条件とページはクエリで渡す。
   async fn get_teams(
      &self,
      filters: &TeamFilters,
   ) -> Result<ApiResponse<PaginatedResponse<Team>>, ApiError>;

   /// `GET /teams/{id}`（キャッシュあり）
   async fn get_team(&self, team_id: &str) -> Result<ApiResponse<Team>, ApiError>;

   /// `POST /teams`
   async fn create_team(&self, req: &CreateTeamRequest) -> Result<ApiResponse<Team>, ApiError>;

   /// `PUT /teams/{id}`
   async fn update_team(
      &self,
      team_id: &str,
      req: &UpdateTeamRequest,
   ) -> Result<ApiResponse<Team>, ApiError>;

   /// `DELETE /teams/{id}`
   async fn delete_team(&self, team_id: &str) -> Result<ApiResponse<Value>, ApiError>;

   /// チームに参加する
   ///
   /// `POST /teams/{id}/join` を呼び出す。参加可否はバックエンドが `success` で返す。
   async fn join_team(&self, team_id: &str) -> Result<ApiResponse<Value>, ApiError>;

   /// `POST /teams/{id}/leave`
   async fn leave_team(&self, team_id: &str) -> Result<ApiResponse<Value>, ApiError>;

   /// `GET /teams/{id}/members`
   async fn get_team_members(
      &self,
      team_id: &str,
   ) -> Result<ApiResponse<Vec<TeamMember>>, ApiError>;

   /// `POST /teams/{id}/invite`
   async fn invite_player(
      &self,
      team_id: &str,
      req: &InvitePlayerRequest,
   ) -> Result<ApiResponse<Value>, ApiError>;

   /// `GET /teams/{id}/stats`（キャッシュあり）
   async fn get_team_stats(&self, team_id: &str) -> Result<ApiResponse<TeamStats>, ApiError>;

   /// `PUT /teams/{id}/lineup`
   async fn update_lineup(
      &self,
      team_id: &str,
      lineup: &Lineup,
   ) -> Result<ApiResponse<Lineup>, ApiError>;

   /// `POST /teams/{id}/logo`
   async fn upload_logo(
      &self,
      team_id: &str,
      image: &ImageUpload,
   ) -> Result<ApiResponse<UploadedImage>, ApiError>;

   /// `GET /teams/{id}/achievements`
   async fn get_team_achievements(
      &self,
      team_id: &str,
   ) -> Result<ApiResponse<Vec<Achievement>>, ApiError>;
}

fn team_path(team_id: &str) -> String {
   format!("{TEAMS}/{}", segment(team_id))
}

#[async_trait]
impl TeamApi for ApiClient {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn get_teams(
      &self,
      filters: &TeamFilters,
   ) -> Result<ApiResponse<PaginatedResponse<Team>>, ApiError> {
      let request = RequestDescriptor::get(TEAMS).query(filters)?;
      self.cached(request, TEAM_CACHE_TTL).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn get_team(&self, team_id: &str) -> Result<ApiResponse<Team>, ApiError> {
      self.cached(RequestDescriptor::get(team_path(team_id)), TEAM_CACHE_TTL)
         .await
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn create_team(&self, req: &CreateTeamRequest) -> Result<ApiResponse<Team>, ApiError> {
      self.mutate(RequestDescriptor::post(TEAMS).json(req)?, &[TEAMS])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn update_team(
      &self,
      team_id: &str,
      req: &UpdateTeamRequest,
   ) -> Result<ApiResponse<Team>, ApiError> {
      let request = RequestDescriptor::put(team_path(team_id)).json(req)?;
      self.mutate(request, &[TEAMS]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn delete_team(&self, team_id: &str) -> Result<ApiResponse<Value>, ApiError> {
      self.mutate(RequestDescriptor::delete(team_path(team_id)), &[TEAMS])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn join_team(&self, team_id: &str) -> Result<ApiResponse<Value>, ApiError> {
      let path = format!("{}/join", team_path(team_id));
      self.mutate(RequestDescriptor::post(path), &[TEAMS]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn leave_team(&self, team_id: &str) -> Result<ApiResponse<Value>, ApiError> {
      let path = format!("{}/leave", team_path(team_id));
      self.mutate(RequestDescriptor::post(path), &[TEAMS]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn get_team_members(
      &self,
      team_id: &str,
   ) -> Result<ApiResponse<Vec<TeamMember>>, ApiError> {
      let path = format!("{}/members", team_path(team_id));
      self.retried(RequestDescriptor::get(path)).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn invite_player(
      &self,
      team_id: &str,
      req: &InvitePlayerRequest,
   ) -> Result<ApiResponse<Value>, ApiError> {
      let path = format!("{}/invite", team_path(team_id));
      self.mutate(RequestDescriptor::post(path).json(req)?, &[])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn get_team_stats(&self, team_id: &str) -> Result<ApiResponse<TeamStats>, ApiError> {
      let path = format!("{}/stats", team_path(team_id));
      self.cached(RequestDescriptor::get(path), TEAM_CACHE_TTL).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn update_lineup(
      &self,
      team_id: &str,
      lineup: &Lineup,
   ) -> Result<ApiResponse<Lineup>, ApiError> {
      let path = format!("{}/lineup", team_path(team_id));
      self.mutate(RequestDescriptor::put(path).json(lineup)?, &[])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn upload_logo(
      &self,
      team_id: &str,
      image: &ImageUpload,
   ) -> Result<ApiResponse<UploadedImage>, ApiError> {
      let path = format!("{}/logo", team_path(team_id));
      self.mutate(RequestDescriptor::post(path).json(image)?, &[TEAMS])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%team_id))]
   async fn get_team_achievements(
      &self,
      team_id: &str,
   ) -> Result<ApiResponse<Vec<Achievement>>, ApiError> {
      let path = format!("{}/achievements", team_path(team_id));
      self.retried(RequestDescriptor::get(path)).await
   }
}

#[cfg(test)]
mod tests {
   use std::sync::Arc;

   use pretty_assertions::assert_eq;
   use reqwest::header::AUTHORIZATION;
   use serde_json::json;

   use super::*;
   use crate::{
      api::types::SkillLevel,
      config::ClientConfig,
      transport::StubTransport,
   };

   fn client(stub: &StubTransport) -> ApiClient {
      ApiClient::builder(ClientConfig::new("http://localhost:3001/api"))
         .transport(Arc::new(stub.clone()))
         .build()
   }

   fn teams_page() -> Value {
      json!({
         "data": [{
            "id": "t1",
            "name": "Night Owls",
            "captainId": "u1",
            "memberCount": 5,
            "maxMembers": 10,
            "isPublic": true,
            "createdAt": "2026-01-15T10:00:00Z"
         }],
         "pagination": {"page": 1, "limit": 10, "total": 1, "totalPages": 1}
      })
   }

   #[tokio::test]
   async fn test_チーム一覧は絞り込み条件をクエリで送る() {
      let stub = StubTransport::always_ok(teams_page());
      let client = client(&stub);
      let filters = TeamFilters {
         page: Some(1),
         limit: Some(10),
         skill_level: Some(SkillLevel::Advanced),
         ..TeamFilters::default()
      };

      let response = client.get_teams(&filters).await.unwrap();

      assert_eq!(response.data.pagination.total_pages, 1);
      assert_eq!(response.data.data[0].name, "Night Owls");
      let url = &stub.requests()[0].url;
      let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
      pairs.sort();
      assert_eq!(
         pairs,
         vec![
            ("limit".to_string(), "10".to_string()),
            ("page".to_string(), "1".to_string()),
            ("skillLevel".to_string(), "advanced".to_string()),
         ]
      );
   }

   #[tokio::test]
   async fn test_チーム一覧はttl内ならキャッシュから返す() {
      let stub = StubTransport::always_ok(teams_page());
      let client = client(&stub);

      client.get_teams(&TeamFilters::default()).await.unwrap();
      client.get_teams(&TeamFilters::default()).await.unwrap();

      assert_eq!(stub.call_count(), 1);
   }

   #[tokio::test]
   async fn test_未認証でも参加リクエストを送り結果をそのまま返す() {
      let stub = StubTransport::new();
      stub.push_json(
         200,
         json!({"data": null, "success": false, "message": "ログインが必要です"}),
      );
      let client = client(&stub);

      let response = client.join_team("t1").await.unwrap();

      assert!(!response.success);
      assert_eq!(response.message, "ログインが必要です");
      let sent = &stub.requests()[0];
      assert_eq!(sent.url.path(), "/api/teams/t1/join");
      assert!(sent.headers.get(AUTHORIZATION).is_none());
   }

   #[tokio::test]
   async fn test_参加成功でチーム関連のキャッシュを削除する() {
      let stub = StubTransport::always_ok(teams_page());
      let client = client(&stub);
      client.get_teams(&TeamFilters::default()).await.unwrap();
      client
         .cache()
         .put("/users/u1/teams", &json!([]), TEAM_CACHE_TTL);
      client.cache().put("/games", &json!([]), TEAM_CACHE_TTL);

      client.join_team("t1").await.unwrap();

      assert_eq!(client.cache().len(), 1);
      assert!(client.cache().get::<Value>("/games").is_some());
   }
}
