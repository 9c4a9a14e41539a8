//! コート API

use async_trait::async_trait;
use chrono::NaiveDate;
use courtside_shared::{ApiResponse, PaginatedResponse};
use serde_json::Value;

use super::{
   COURT_CACHE_TTL,
   REVIEW_CACHE_TTL,
   segment,
   types::{
      AddReviewRequest,
      AvailabilitySlot,
      BookCourtRequest,
      Court,
      CourtFilters,
      CourtPhoto,
      CourtStats,
      CreateCourtRequest,
      ImageUpload,
      PageQuery,
      ReportCourtRequest,
      Reservation,
      Review,
   },
};
use crate::{client::ApiClient, error::ApiError, request::RequestDescriptor};

/// コート関連のキャッシュキーに共通する部分文字列
const COURTS: &str = "/courts";

/// コート API トレイト
#[async_trait]
pub trait CourtApi: Send + Sync {
   /// コート一覧を取得する
   ///
   /// `GET /courts` を呼び出す（キャッシュあり）。
   async fn get_courts(
      &self,
      filters: &CourtFilters,
   ) -> Result<ApiResponse<PaginatedResponse<Court>>, ApiError>;

   /// `GET /courts/{id}`（キャッシュあり）
   async fn get_court(&self, court_id: &str) -> Result<ApiResponse<Court>, ApiError>;

   /// `POST /courts`
   async fn create_court(&self, req: &CreateCourtRequest) -> Result<ApiResponse<Court>, ApiError>;

   /// 指定日の空き状況を取得する
   ///
   /// `GET /courts/{id}/availability?date=YYYY-MM-DD` を呼び出す。
   /// 予約判断に使うためキャッシュしない。
   async fn get_court_availability(
      &self,
      court_id: &str,
      date: NaiveDate,
   ) -> Result<ApiResponse<Vec<AvailabilitySlot>>, ApiError>;

   /// `POST /courts/{id}/book`
   async fn book_court(
      &self,
      court_id: &str,
      req: &BookCourtRequest,
   ) -> Result<ApiResponse<Reservation>, ApiError>;

   /// `GET /courts/{id}/reviews`（キャッシュあり）
   async fn get_court_reviews(
      &self,
      court_id: &str,
      page: &PageQuery,
   ) -> Result<ApiResponse<PaginatedResponse<Review>>, ApiError>;

   /// `POST /courts/{id}/reviews`
   async fn add_court_review(
      &self,
      court_id: &str,
      req: &AddReviewRequest,
   ) -> Result<ApiResponse<Review>, ApiError>;

   /// `GET /courts/{id}/photos`
   async fn get_court_photos(
      &self,
      court_id: &str,
   ) -> Result<ApiResponse<Vec<CourtPhoto>>, ApiError>;

   /// `POST /courts/{id}/photos`
   async fn upload_court_photo(
      &self,
      court_id: &str,
      image: &ImageUpload,
   ) -> Result<ApiResponse<CourtPhoto>, ApiError>;

   /// `POST /courts/{id}/report`
   async fn report_court(
      &self,
      court_id: &str,
      req: &ReportCourtRequest,
   ) -> Result<ApiResponse<Value>, ApiError>;

   /// `GET /courts/{id}/stats`（キャッシュあり）
   async fn get_court_stats(&self, court_id: &str) -> Result<ApiResponse<CourtStats>, ApiError>;
}

fn court_path(court_id: &str) -> String {
   format!("{COURTS}/{}", segment(court_id))
}

#[async_trait]
impl CourtApi for ApiClient {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn get_courts(
      &self,
      filters: &CourtFilters,
   ) -> Result<ApiResponse<PaginatedResponse<Court>>, ApiError> {
      let request = RequestDescriptor::get(COURTS).query(filters)?;
      self.cached(request, COURT_CACHE_TTL).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%court_id))]
   async fn get_court(&self, court_id: &str) -> Result<ApiResponse<Court>, ApiError> {
      self.cached(RequestDescriptor::get(court_path(court_id)), COURT_CACHE_TTL)
         .await
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn create_court(
      &self,
      req: &CreateCourtRequest,
   ) -> Result<ApiResponse<Court>, ApiError> {
      self.mutate(RequestDescriptor::post(COURTS).json(req)?, &[COURTS])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%court_id, %date))]
   async fn get_court_availability(
      &self,
      court_id: &str,
      date: NaiveDate,
   ) -> Result<ApiResponse<Vec<AvailabilitySlot>>, ApiError> {
      let request = RequestDescriptor::get(format!("{}/availability", court_path(court_id)))
         .query_param("date", date.format("%Y-%m-%d"));
      self.retried(request).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%court_id))]
   async fn book_court(
      &self,
      court_id: &str,
      req: &BookCourtRequest,
   ) -> Result<ApiResponse<Reservation>, ApiError> {
      let path = court_path(court_id);
      let request = RequestDescriptor::post(format!("{path}/book")).json(req)?;
      let stats = format!("{path}/stats");
      self.mutate(request, &[stats.as_str()]).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%court_id))]
   async fn get_court_reviews(
      &self,
      court_id: &str,
      page: &PageQuery,
   ) -> Result<ApiResponse<PaginatedResponse<Review>>, ApiError> {
      let request =
         RequestDescriptor::get(format!("{}/reviews", court_path(court_id))).query(page)?;
      self.cached(request, REVIEW_CACHE_TTL).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%court_id))]
   async fn add_court_review(
      &self,
      court_id: &str,
      req: &AddReviewRequest,
   ) -> Result<ApiResponse<Review>, ApiError> {
      let path = format!("{}/reviews", court_path(court_id));
      // 評価は一覧とコート詳細の rating にも反映される
      self.mutate(RequestDescriptor::post(path).json(req)?, &[COURTS])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%court_id))]
   async fn get_court_photos(
      &self,
      court_id: &str,
   ) -> Result<ApiResponse<Vec<CourtPhoto>>, ApiError> {
      let path = format!("{}/photos", court_path(court_id));
      self.retried(RequestDescriptor::get(path)).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%court_id))]
   async fn upload_court_photo(
      &self,
      court_id: &str,
      image: &ImageUpload,
   ) -> Result<ApiResponse<CourtPhoto>, ApiError> {
      let path = format!("{}/photos", court_path(court_id));
      self.mutate(RequestDescriptor::post(path).json(image)?, &[])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%court_id))]
   async fn report_court(
      &self,
      court_id: &str,
      req: &ReportCourtRequest,
   ) -> Result<ApiResponse<Value>, ApiError> {
      let path = format!("{}/report", court_path(court_id));
      self.mutate(RequestDescriptor::post(path).json(req)?, &[])
         .await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%court_id))]
   async fn get_court_stats(&self, court_id: &str) -> Result<ApiResponse<CourtStats>, ApiError> {
      let path = format!("{}/stats", court_path(court_id));
      self.cached(RequestDescriptor::get(path), COURT_CACHE_TTL).await
   }
}
