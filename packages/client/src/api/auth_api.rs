//! 認証 API

use async_trait::async_trait;
use courtside_shared::ApiResponse;
use serde_json::{Value, json};

use super::types::{
   AuthSession,
   ChangePasswordRequest,
   LoginRequest,
   RefreshedToken,
   RegisterRequest,
   ResetPasswordRequest,
   User,
};
use crate::{client::ApiClient, error::ApiError, request::RequestDescriptor};

/// 認証 API トレイト
#[async_trait]
pub trait AuthApi: Send + Sync {
   /// ユーザー登録する
   ///
   /// `POST /auth/register` を呼び出す。成功時は発行されたトークンを設定する。
   async fn register(&self, req: &RegisterRequest) -> Result<ApiResponse<AuthSession>, ApiError>;

   /// ログインする
   ///
   /// `POST /auth/login` を呼び出す。成功時は発行されたトークンを設定する。
   async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<AuthSession>, ApiError>;

   /// ログアウトする
   ///
   /// `POST /auth/logout` を呼び出す。結果に関わらずトークンとキャッシュをすべて破棄する。
   async fn logout(&self) -> Result<ApiResponse<Value>, ApiError>;

   /// アクセストークンを更新する
   ///
   /// 保持しているリフレッシュトークンで `POST /auth/refresh` を呼び出し、
   /// 成功時はアクセストークンを置き換える。
   async fn refresh_token(&self) -> Result<ApiResponse<RefreshedToken>, ApiError>;

   /// ログイン中のユーザーを取得する
   ///
   /// `GET /auth/me` を呼び出す。
   async fn get_current_user(&self) -> Result<ApiResponse<User>, ApiError>;

   /// `POST /auth/change-password`
   async fn change_password(
      &self,
      req: &ChangePasswordRequest,
   ) -> Result<ApiResponse<Value>, ApiError>;

   /// パスワード再設定メールを送信する
   ///
   /// `POST /auth/forgot-password` を呼び出す。
   async fn forgot_password(&self, email: &str) -> Result<ApiResponse<Value>, ApiError>;

   /// `POST /auth/reset-password`
   async fn reset_password(
      &self,
      req: &ResetPasswordRequest,
   ) -> Result<ApiResponse<Value>, ApiError>;

   /// `POST /auth/verify-email`
   async fn verify_email(&self, token: &str) -> Result<ApiResponse<Value>, ApiError>;

   /// `POST /auth/resend-verification`
   async fn resend_verification(&self, email: &str) -> Result<ApiResponse<Value>, ApiError>;
}

#[async_trait]
impl AuthApi for ApiClient {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn register(&self, req: &RegisterRequest) -> Result<ApiResponse<AuthSession>, ApiError> {
      let response: ApiResponse<AuthSession> = self
         .mutate(RequestDescriptor::post("/auth/register").json(req)?, &[])
         .await?;

      if response.success {
         self.set_tokens(&response.data.tokens);
      }
      Ok(response)
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<AuthSession>, ApiError> {
      let response: ApiResponse<AuthSession> = self
         .mutate(RequestDescriptor::post("/auth/login").json(req)?, &[])
         .await?;

      if response.success {
         self.set_tokens(&response.data.tokens);
         tracing::info!(user_id = %response.data.user.id, "ログインしました");
      }
      Ok(response)
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn logout(&self) -> Result<ApiResponse<Value>, ApiError> {
      let result = self.dispatch(RequestDescriptor::post("/auth/logout")).await;

      // サーバー側の失敗に関わらずローカルの資格情報は破棄する
      self.clear_auth_token();
      self.clear_cache(None);

      result
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn refresh_token(&self) -> Result<ApiResponse<RefreshedToken>, ApiError> {
      let refresh_token = self.token_manager().refresh_token();
      let request = RequestDescriptor::post("/auth/refresh")
         .json(&json!({ "refreshToken": refresh_token }))?;

      let response: ApiResponse<RefreshedToken> = self.mutate(request, &[]).await?;

      if response.success {
         self.set_auth_token(response.data.access_token.clone());
      }
      Ok(response)
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn get_current_user(&self) -> Result<ApiResponse<User>, ApiError> {
      self.retried(RequestDescriptor::get("/auth/me")).await
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn change_password(
      &self,
      req: &ChangePasswordRequest,
   ) -> Result<ApiResponse<Value>, ApiError> {
      self.mutate(RequestDescriptor::post("/auth/change-password").json(req)?, &[])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn forgot_password(&self, email: &str) -> Result<ApiResponse<Value>, ApiError> {
      let request =
         RequestDescriptor::post("/auth/forgot-password").json(&json!({ "email": email }))?;
      self.mutate(request, &[]).await
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn reset_password(
      &self,
      req: &ResetPasswordRequest,
   ) -> Result<ApiResponse<Value>, ApiError> {
      self.mutate(RequestDescriptor::post("/auth/reset-password").json(req)?, &[])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn verify_email(&self, token: &str) -> Result<ApiResponse<Value>, ApiError> {
      let request =
         RequestDescriptor::post("/auth/verify-email").json(&json!({ "token": token }))?;
      self.mutate(request, &["/users"]).await
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn resend_verification(&self, email: &str) -> Result<ApiResponse<Value>, ApiError> {
      let request = RequestDescriptor::post("/auth/resend-verification")
         .json(&json!({ "email": email }))?;
      self.mutate(request, &[]).await
   }
}

#[cfg(test)]
mod tests {
   use std::{sync::Arc, time::Duration};

   use pretty_assertions::assert_eq;
   use reqwest::header::AUTHORIZATION;

   use super::*;
   use crate::{config::ClientConfig, transport::StubTransport};

   fn client(stub: &StubTransport) -> ApiClient {
      ApiClient::builder(ClientConfig::new("http://localhost:3001/api"))
         .transport(Arc::new(stub.clone()))
         .build()
   }

   fn session_json() -> Value {
      json!({
         "user": {
            "id": "u1",
            "username": "hooper",
            "email": "hooper@example.com",
            "createdAt": "2026-01-15T10:00:00Z"
         },
         "tokens": {
            "accessToken": "access-1",
            "refreshToken": "refresh-1",
            "expiresIn": 3600
         }
      })
   }

   fn login_request() -> LoginRequest {
      LoginRequest {
         email:    "hooper@example.com".to_string(),
         password: "secret".to_string(),
      }
   }

   #[tokio::test]
   async fn test_ログイン成功でトークンを設定する() {
      let stub = StubTransport::new();
      stub.push_json(200, json!({"data": session_json(), "success": true}));
      let client = client(&stub);

      let response = client.login(&login_request()).await.unwrap();

      assert!(response.success);
      assert_eq!(client.token_manager().access_token().as_deref(), Some("access-1"));
      assert_eq!(client.token_manager().refresh_token().as_deref(), Some("refresh-1"));
      let body: Value = serde_json::from_slice(stub.requests()[0].body.as_ref().unwrap()).unwrap();
      assert_eq!(body, json!({"email": "hooper@example.com", "password": "secret"}));
   }

   #[tokio::test]
   async fn test_ログイン失敗はリトライせずトークンも設定しない() {
      let stub = StubTransport::new();
      stub.push_json(401, json!({"message": "invalid credentials"}));
      let client = client(&stub);

      let result = client.login(&login_request()).await;

      assert!(matches!(result, Err(ApiError::Http(err)) if err.status == 401));
      assert!(!client.token_manager().is_authenticated());
      assert_eq!(stub.call_count(), 1);
   }

   #[tokio::test]
   async fn test_ログアウトはサーバーエラーでもトークンとキャッシュを破棄する() {
      let stub = StubTransport::new();
      stub.push_json(500, json!({"message": "db down"}));
      let client = client(&stub);
      client.set_auth_token("access-1");
      client.cache().put("/teams", &json!([]), Duration::from_secs(60));

      let result = client.logout().await;

      assert!(result.is_err());
      assert!(!client.token_manager().is_authenticated());
      assert!(client.cache().is_empty());
   }

   #[tokio::test]
   async fn test_リフレッシュでアクセストークンを置き換える() {
      let stub = StubTransport::new();
      stub.push_json(
         200,
         json!({"data": {"accessToken": "access-2", "expiresIn": 900}, "success": true}),
      );
      let client = client(&stub);
      client.set_tokens(&crate::auth_token::AuthTokens {
         access_token:  "access-1".to_string(),
         refresh_token: "refresh-1".to_string(),
         expires_in:    3600,
      });

      client.refresh_token().await.unwrap();

      let sent = &stub.requests()[0];
      let body: Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
      assert_eq!(body, json!({"refreshToken": "refresh-1"}));
      assert_eq!(sent.headers.get(AUTHORIZATION).unwrap(), "Bearer access-1");
      assert_eq!(client.token_manager().access_token().as_deref(), Some("access-2"));
      assert_eq!(client.token_manager().refresh_token().as_deref(), Some("refresh-1"));
   }
}
