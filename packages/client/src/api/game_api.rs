//! ゲーム API

use async_trait::async_trait;
use courtside_shared::{ApiResponse, PaginatedResponse};
use serde_json::Value;

use super::{
   GAME_CACHE_TTL,
   segment,
   types::{
      CancelGameRequest,
      CreateGameRequest,
      Game,
      GameFilters,
      GameParticipant,
      GameResult,
      GameStats,
      LiveGame,
      UpdateGameRequest,
   },
};
use crate::{client::ApiClient, error::ApiError, request::RequestDescriptor};

/// ゲーム関連のキャッシュキーに共通する部分文字列
const GAMES: &str = "/games";

/// ゲーム API トレイト
#[async_trait]
pub trait GameApi: Send + Sync {
   /// ゲーム一覧を取得する
   ///
   /// `GET /games` を呼び出す（キャッシュあり）。
   async fn get_games(
      &self,
      filters: &GameFilters,
   ) -> Result<ApiResponse<PaginatedResponse<Game>>, ApiError>;

   /// `GET /games/{id}`（キャッシュあり）
   async fn get_game(&self, game_id: &str) -> Result<ApiResponse<Game>, ApiError>;

   /// `POST /games`
   async fn create_game(&self, req: &CreateGameRequest) -> Result<ApiResponse<Game>, ApiError>;

   /// `PUT /games/{id}`
   async fn update_game(
      &self,
      game_id: &str,
      req: &UpdateGameRequest,
   ) -> Result<ApiResponse<Game>, ApiError>;

   /// `DELETE /games/{id}`
   async fn delete_game(&self, game_id: &str) -> Result<ApiResponse<Value>, ApiError>;

   /// `POST /games/{id}/join`
   async fn join_game(&self, game_id: &str) -> Result<ApiResponse<Value>, ApiError>;

   /// `POST /games/{id}/leave`
   async fn leave_game(&self, game_id: &str) -> Result<ApiResponse<Value>, ApiError>;

   /// `GET /games/{id}/participants`
   async fn get_game_participants(
      &self,
      game_id: &str,
   ) -> Result<ApiResponse<Vec<GameParticipant>>, ApiError>;

   /// ゲームを開始する
   ///
   /// `POST /games/{id}/start` を呼び出す。
   async fn start_game(&self, game_id: &str) -> Result<ApiResponse<Game>, ApiError>;

   /// `POST /games/{id}/end`
   async fn end_game(&self, game_id: &str) -> Result<ApiResponse<Game>, ApiError>;

   /// 最終スコアを登録してゲームを完了する
   ///
   /// `POST /games/{id}/complete` を呼び出す。
   async fn complete_game(
      &self,
      game_id: &str,
      result: &GameResult,
   ) -> Result<ApiResponse<Game>, ApiError>;

   /// `POST /games/{id}/cancel`
   async fn cancel_game(
      &self,
      game_id: &str,
      req: &CancelGameRequest,
   ) -> Result<ApiResponse<Value>, ApiError>;

   /// `GET /games/{id}/stats`（キャッシュあり）
   async fn get_game_stats(&self, game_id: &str) -> Result<ApiResponse<GameStats>, ApiError>;

   /// ライブスコアを取得する
   ///
   /// `GET /games/{id}/live` を呼び出す。常に最新の値が必要なためキャッシュしない。
   async fn get_live_game(&self, game_id: &str) -> Result<ApiResponse<LiveGame>, ApiError>;
}

fn game_path(game_id: &str) -> String {
   format!("{GAMES}/{}", segment(game_id))
}

#[async_trait]
impl GameApi for ApiClient {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn get_games(
      &self,
      filters: &GameFilters,
   ) -> Result<ApiResponse<PaginatedResponse<Game>>, ApiError> {
      let request = RequestDescriptor::get(GAMES).query(filters)?;
      self.cached(request, GAME_CACHE_TTL).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn get_game(&self, game_id: &str) -> Result<ApiResponse<Game>, ApiError> {
      self.cached(RequestDescriptor::get(game_path(game_id)), GAME_CACHE_TTL)
         .await
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn create_game(&self, req: &CreateGameRequest) -> Result<ApiResponse<Game>, ApiError> {
      self.mutate(RequestDescriptor::post(GAMES).json(req)?, &[GAMES])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn update_game(
      &self,
      game_id: &str,
      req: &UpdateGameRequest,
   ) -> Result<ApiResponse<Game>, ApiError> {
      let request = RequestDescriptor::put(game_path(game_id)).json(req)?;
      self.mutate(request, &[GAMES]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn delete_game(&self, game_id: &str) -> Result<ApiResponse<Value>, ApiError> {
      self.mutate(RequestDescriptor::delete(game_path(game_id)), &[GAMES])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn join_game(&self, game_id: &str) -> Result<ApiResponse<Value>, ApiError> {
      let path = format!("{}/join", game_path(game_id));
      self.mutate(RequestDescriptor::post(path), &[GAMES]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn leave_game(&self, game_id: &str) -> Result<ApiResponse<Value>, ApiError> {
      let path = format!("{}/leave", game_path(game_id));
      self.mutate(RequestDescriptor::post(path), &[GAMES]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn get_game_participants(
      &self,
      game_id: &str,
   ) -> Result<ApiResponse<Vec<GameParticipant>>, ApiError> {
      let path = format!("{}/participants", game_path(game_id));
      self.retried(RequestDescriptor::get(path)).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn start_game(&self, game_id: &str) -> Result<ApiResponse<Game>, ApiError> {
      let path = format!("{}/start", game_path(game_id));
      self.mutate(RequestDescriptor::post(path), &[GAMES]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn end_game(&self, game_id: &str) -> Result<ApiResponse<Game>, ApiError> {
      let path = format!("{}/end", game_path(game_id));
      self.mutate(RequestDescriptor::post(path), &[GAMES]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn complete_game(
      &self,
      game_id: &str,
      result: &GameResult,
   ) -> Result<ApiResponse<Game>, ApiError> {
      let path = format!("{}/complete", game_path(game_id));
      self.mutate(RequestDescriptor::post(path).json(result)?, &[GAMES])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn cancel_game(
      &self,
      game_id: &str,
      req: &CancelGameRequest,
   ) -> Result<ApiResponse<Value>, ApiError> {
      let path = format!("{}/cancel", game_path(game_id));
      self.mutate(RequestDescriptor::post(path).json(req)?, &[GAMES])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn get_game_stats(&self, game_id: &str) -> Result<ApiResponse<GameStats>, ApiError> {
      let path = format!("{}/stats", game_path(game_id));
      self.cached(RequestDescriptor::get(path), GAME_CACHE_TTL).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%game_id))]
   async fn get_live_game(&self, game_id: &str) -> Result<ApiResponse<LiveGame>, ApiError> {
      let path = format!("{}/live", game_path(game_id));
      self.retried(RequestDescriptor::get(path)).await
   }
}
