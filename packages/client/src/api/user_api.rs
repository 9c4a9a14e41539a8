//! ユーザー API

use async_trait::async_trait;
use courtside_shared::ApiResponse;
use serde_json::Value;

use super::{
   USER_CACHE_TTL,
   segment,
   types::{
      Game,
      ImageUpload,
      Reservation,
      Team,
      UpdateUserRequest,
      UploadedImage,
      User,
      UserPreferences,
      UserStats,
   },
};
use crate::{client::ApiClient, error::ApiError, request::RequestDescriptor};

/// ユーザー API トレイト
#[async_trait]
pub trait UserApi: Send + Sync {
   /// ユーザーを取得する
   ///
   /// `GET /users/{id}` を呼び出す（キャッシュあり）。
   async fn get_user(&self, user_id: &str) -> Result<ApiResponse<User>, ApiError>;

   /// プロフィールを更新する
   ///
   /// `PUT /users/{id}` を呼び出す。
   async fn update_user(
      &self,
      user_id: &str,
      req: &UpdateUserRequest,
   ) -> Result<ApiResponse<User>, ApiError>;

   /// 通算成績を取得する
   ///
   /// `GET /users/{id}/stats` を呼び出す（キャッシュあり）。
   async fn get_user_stats(&self, user_id: &str) -> Result<ApiResponse<UserStats>, ApiError>;

   /// `GET /users/{id}/teams`
   async fn get_user_teams(&self, user_id: &str) -> Result<ApiResponse<Vec<Team>>, ApiError>;

   /// `GET /users/{id}/games`
   async fn get_user_games(&self, user_id: &str) -> Result<ApiResponse<Vec<Game>>, ApiError>;

   /// `GET /users/{id}/reservations`
   async fn get_user_reservations(
      &self,
      user_id: &str,
   ) -> Result<ApiResponse<Vec<Reservation>>, ApiError>;

   /// `GET /users/{id}/followers`
   async fn get_followers(&self, user_id: &str) -> Result<ApiResponse<Vec<User>>, ApiError>;

   /// `GET /users/{id}/following`
   async fn get_following(&self, user_id: &str) -> Result<ApiResponse<Vec<User>>, ApiError>;

   /// ユーザーをフォローする
   ///
   /// `POST /users/{id}/followers` を呼び出す。
   async fn follow_user(&self, user_id: &str) -> Result<ApiResponse<Value>, ApiError>;

   /// フォローを解除する
   ///
   /// `DELETE /users/{id}/followers` を呼び出す。
   async fn unfollow_user(&self, user_id: &str) -> Result<ApiResponse<Value>, ApiError>;

   /// `POST /users/{id}/avatar`
   async fn upload_avatar(
      &self,
      user_id: &str,
      image: &ImageUpload,
   ) -> Result<ApiResponse<UploadedImage>, ApiError>;

   /// `GET /users/{id}/preferences`
   async fn get_preferences(
      &self,
      user_id: &str,
   ) -> Result<ApiResponse<UserPreferences>, ApiError>;

   /// `PUT /users/{id}/preferences`
   async fn update_preferences(
      &self,
      user_id: &str,
      preferences: &UserPreferences,
   ) -> Result<ApiResponse<UserPreferences>, ApiError>;
}

fn user_path(user_id: &str) -> String {
   format!("/users/{}", segment(user_id))
}

#[async_trait]
impl UserApi for ApiClient {
   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn get_user(&self, user_id: &str) -> Result<ApiResponse<User>, ApiError> {
      self.cached(RequestDescriptor::get(user_path(user_id)), USER_CACHE_TTL)
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn update_user(
      &self,
      user_id: &str,
      req: &UpdateUserRequest,
   ) -> Result<ApiResponse<User>, ApiError> {
      let path = user_path(user_id);
      self.mutate(RequestDescriptor::put(path.as_str()).json(req)?, &[path.as_str()])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn get_user_stats(&self, user_id: &str) -> Result<ApiResponse<UserStats>, ApiError> {
      let path = format!("{}/stats", user_path(user_id));
      self.cached(RequestDescriptor::get(path), USER_CACHE_TTL).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn get_user_teams(&self, user_id: &str) -> Result<ApiResponse<Vec<Team>>, ApiError> {
      let path = format!("{}/teams", user_path(user_id));
      self.retried(RequestDescriptor::get(path)).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn get_user_games(&self, user_id: &str) -> Result<ApiResponse<Vec<Game>>, ApiError> {
      let path = format!("{}/games", user_path(user_id));
      self.retried(RequestDescriptor::get(path)).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn get_user_reservations(
      &self,
      user_id: &str,
   ) -> Result<ApiResponse<Vec<Reservation>>, ApiError> {
      let path = format!("{}/reservations", user_path(user_id));
      self.retried(RequestDescriptor::get(path)).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn get_followers(&self, user_id: &str) -> Result<ApiResponse<Vec<User>>, ApiError> {
      let path = format!("{}/followers", user_path(user_id));
      self.retried(RequestDescriptor::get(path)).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn get_following(&self, user_id: &str) -> Result<ApiResponse<Vec<User>>, ApiError> {
      let path = format!("{}/following", user_path(user_id));
      self.retried(RequestDescriptor::get(path)).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn follow_user(&self, user_id: &str) -> Result<ApiResponse<Value>, ApiError> {
      let path = format!("{}/followers", user_path(user_id));
      self.mutate(RequestDescriptor::post(path), &["/users"]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn unfollow_user(&self, user_id: &str) -> Result<ApiResponse<Value>, ApiError> {
      let path = format!("{}/followers", user_path(user_id));
      self.mutate(RequestDescriptor::delete(path), &["/users"]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn upload_avatar(
      &self,
      user_id: &str,
      image: &ImageUpload,
   ) -> Result<ApiResponse<UploadedImage>, ApiError> {
      let path = user_path(user_id);
      let request = RequestDescriptor::post(format!("{path}/avatar")).json(image)?;
      self.mutate(request, &[path.as_str()]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn get_preferences(
      &self,
      user_id: &str,
   ) -> Result<ApiResponse<UserPreferences>, ApiError> {
      let path = format!("{}/preferences", user_path(user_id));
      self.retried(RequestDescriptor::get(path)).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn update_preferences(
      &self,
      user_id: &str,
      preferences: &UserPreferences,
   ) -> Result<ApiResponse<UserPreferences>, ApiError> {
      let path = format!("{}/preferences", user_path(user_id));
      self.mutate(RequestDescriptor::put(path).json(preferences)?, &[])
         .await
   }
}
