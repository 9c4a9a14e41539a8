//! ドメイン API のレスポンス型 / リクエスト型
//!
//! ワイヤ上は camelCase。ID はバックエンドが発行する不透明な文字列として扱う。
//! レスポンス型はキャッシュに保存するため `Serialize` も実装する。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::auth_token::AuthTokens;

// --- 列挙型 ---

/// プレイヤー/チーム/ゲームのスキルレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkillLevel {
   #[default]
   Beginner,
   Intermediate,
   Advanced,
   Professional,
}

/// ポジション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Position {
   #[default]
   PointGuard,
   ShootingGuard,
   SmallForward,
   PowerForward,
   Center,
}

/// ゲームの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameType {
   #[default]
   Pickup,
   League,
   Tournament,
   Scrimmage,
}

/// ゲームの状態
///
/// `Scheduled` → `InProgress` → `Completed`、または途中で `Cancelled`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
   #[default]
   Scheduled,
   InProgress,
   Completed,
   Cancelled,
}

/// チーム内の役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TeamRole {
   Captain,
   CoCaptain,
   #[default]
   Member,
}

/// 予約の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReservationStatus {
   #[default]
   Pending,
   Confirmed,
   Cancelled,
}

/// プロフィールの公開範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProfileVisibility {
   #[default]
   Public,
   FollowersOnly,
   Private,
}

// --- 共通 ---

/// ページ指定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
   pub page:  Option<u32>,
   pub limit: Option<u32>,
}

/// 画像のアップロード
///
/// 画像本体はストレージへ直接アップロード済みであり、ここでは URL を登録する。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
   pub url:     String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub caption: Option<String>,
}

/// アップロード後の画像 URL
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
   pub url: String,
}

// --- 認証 ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
   pub username:     String,
   pub email:        String,
   pub password:     String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
   pub email:    String,
   pub password: String,
}

/// ログイン/登録のレスポンス
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthSession {
   pub user:   User,
   pub tokens: AuthTokens,
}

/// トークン更新のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedToken {
   pub access_token: String,
   pub expires_in:   u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
   pub current_password: String,
   pub new_password:     String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
   pub token:        String,
   pub new_password: String,
}

// --- ユーザー ---

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
   pub id:           String,
   pub username:     String,
   pub email:        String,
   #[serde(default)]
   pub display_name: Option<String>,
   #[serde(default)]
   pub avatar_url:   Option<String>,
   #[serde(default)]
   pub bio:          Option<String>,
   #[serde(default)]
   pub city:         Option<String>,
   #[serde(default)]
   pub skill_level:  Option<SkillLevel>,
   #[serde(default)]
   pub position:     Option<Position>,
   pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
   #[serde(skip_serializing_if = "Option::is_none")]
   pub display_name: Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub bio:          Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub city:         Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub skill_level:  Option<SkillLevel>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub position:     Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
   pub games_played:      u32,
   pub wins:              u32,
   pub losses:            u32,
   pub points_per_game:   f64,
   pub rebounds_per_game: f64,
   pub assists_per_game:  f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
   pub push_notifications:  bool,
   pub email_notifications: bool,
   pub profile_visibility:  ProfileVisibility,
   #[serde(default)]
   pub preferred_court_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
   pub id:         String,
   pub court_id:   String,
   pub user_id:    String,
   pub start_time: DateTime<Utc>,
   pub end_time:   DateTime<Utc>,
   pub status:     ReservationStatus,
}

// --- チーム ---

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
   pub id:           String,
   pub name:         String,
   #[serde(default)]
   pub description:  Option<String>,
   #[serde(default)]
   pub logo_url:     Option<String>,
   #[serde(default)]
   pub city:         Option<String>,
   #[serde(default)]
   pub skill_level:  Option<SkillLevel>,
   pub captain_id:   String,
   pub member_count: u32,
   pub max_members:  u32,
   pub is_public:    bool,
   pub created_at:   DateTime<Utc>,
}

/// チーム一覧の絞り込み条件
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFilters {
   pub page:        Option<u32>,
   pub limit:       Option<u32>,
   pub search:      Option<String>,
   pub city:        Option<String>,
   pub skill_level: Option<SkillLevel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
   pub name:        String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub description: Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub city:        Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub skill_level: Option<SkillLevel>,
   pub max_members: u32,
   pub is_public:   bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
   #[serde(skip_serializing_if = "Option::is_none")]
   pub name:        Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub description: Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub city:        Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub skill_level: Option<SkillLevel>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub max_members: Option<u32>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub is_public:   Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
   pub user_id:       String,
   pub username:      String,
   pub role:          TeamRole,
   #[serde(default)]
   pub position:      Option<Position>,
   #[serde(default)]
   pub jersey_number: Option<u8>,
   pub joined_at:     DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitePlayerRequest {
   pub user_id: String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
   pub games_played:   u32,
   pub wins:           u32,
   pub losses:         u32,
   pub win_rate:       f64,
   pub points_for:     u32,
   pub points_against: u32,
}

/// スターティングメンバーとベンチ
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lineup {
   pub starters: Vec<String>,
   pub bench:    Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
   pub id:          String,
   pub title:       String,
   #[serde(default)]
   pub description: Option<String>,
   pub earned_at:   DateTime<Utc>,
}

// --- ゲーム ---

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
   pub id:               String,
   pub title:            String,
   #[serde(default)]
   pub description:      Option<String>,
   pub court_id:         String,
   pub host_id:          String,
   pub game_type:        GameType,
   pub status:           GameStatus,
   #[serde(default)]
   pub skill_level:      Option<SkillLevel>,
   pub scheduled_at:     DateTime<Utc>,
   pub duration_minutes: u32,
   pub max_players:      u32,
   pub current_players:  u32,
   #[serde(default)]
   pub home_team_id:     Option<String>,
   #[serde(default)]
   pub away_team_id:     Option<String>,
   #[serde(default)]
   pub home_score:       Option<u32>,
   #[serde(default)]
   pub away_score:       Option<u32>,
}

/// ゲーム一覧の絞り込み条件
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFilters {
   pub page:        Option<u32>,
   pub limit:       Option<u32>,
   pub status:      Option<GameStatus>,
   pub game_type:   Option<GameType>,
   pub skill_level: Option<SkillLevel>,
   pub court_id:    Option<String>,
   pub date_from:   Option<NaiveDate>,
   pub date_to:     Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
   pub title:            String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub description:      Option<String>,
   pub court_id:         String,
   pub game_type:        GameType,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub skill_level:      Option<SkillLevel>,
   pub scheduled_at:     DateTime<Utc>,
   pub duration_minutes: u32,
   pub max_players:      u32,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
   #[serde(skip_serializing_if = "Option::is_none")]
   pub title:            Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub description:      Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub scheduled_at:     Option<DateTime<Utc>>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub duration_minutes: Option<u32>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub max_players:      Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameParticipant {
   pub user_id:   String,
   pub username:  String,
   #[serde(default)]
   pub team_id:   Option<String>,
   pub joined_at: DateTime<Utc>,
}

/// ゲーム終了時の最終スコア
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
   pub home_score: u32,
   pub away_score: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CancelGameRequest {
   #[serde(skip_serializing_if = "Option::is_none")]
   pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameStats {
   pub user_id:  String,
   pub points:   u32,
   pub rebounds: u32,
   pub assists:  u32,
   pub steals:   u32,
   pub blocks:   u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
   pub game_id: String,
   pub players: Vec<PlayerGameStats>,
}

/// 進行中ゲームのスコアボード
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGame {
   pub game_id:    String,
   pub status:     GameStatus,
   pub home_score: u32,
   pub away_score: u32,
   pub quarter:    u8,
   /// 残り時間（例: `"04:32"`）
   pub game_clock: String,
   pub updated_at: DateTime<Utc>,
}

// --- コート ---

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
   pub id:           String,
   pub name:         String,
   pub address:      String,
   pub city:         String,
   pub latitude:     f64,
   pub longitude:    f64,
   pub indoor:       bool,
   #[serde(default)]
   pub hourly_rate:  Option<f64>,
   #[serde(default)]
   pub rating:       Option<f64>,
   #[serde(default)]
   pub review_count: u32,
   #[serde(default)]
   pub amenities:    Vec<String>,
}

/// コート一覧の絞り込み条件
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtFilters {
   pub page:       Option<u32>,
   pub limit:      Option<u32>,
   pub search:     Option<String>,
   pub city:       Option<String>,
   pub indoor:     Option<bool>,
   pub min_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourtRequest {
   pub name:        String,
   pub address:     String,
   pub city:        String,
   pub latitude:    f64,
   pub longitude:   f64,
   pub indoor:      bool,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub hourly_rate: Option<f64>,
   pub amenities:   Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
   pub start_time: DateTime<Utc>,
   pub end_time:   DateTime<Utc>,
   pub available:  bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCourtRequest {
   pub start_time: DateTime<Utc>,
   pub end_time:   DateTime<Utc>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub notes:      Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
   pub id:         String,
   pub court_id:   String,
   pub user_id:    String,
   /// 1〜5
   pub rating:     u8,
   #[serde(default)]
   pub comment:    Option<String>,
   pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddReviewRequest {
   pub rating:  u8,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtPhoto {
   pub id:          String,
   pub url:         String,
   #[serde(default)]
   pub caption:     Option<String>,
   pub uploaded_by: String,
   pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportCourtRequest {
   pub reason:  String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtStats {
   pub total_games:        u32,
   pub total_reservations: u32,
   #[serde(default)]
   pub average_rating:     Option<f64>,
   /// 最も混雑する時間帯（0〜23 時）
   #[serde(default)]
   pub busiest_hour:       Option<u8>,
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use serde_json::json;

   use super::*;

   #[test]
   fn test_チームはcamel_caseでデシリアライズされる() {
      let team: Team = serde_json::from_value(json!({
         "id": "t1",
         "name": "Night Owls",
         "captainId": "u1",
         "memberCount": 5,
         "maxMembers": 10,
         "isPublic": true,
         "skillLevel": "advanced",
         "createdAt": "2026-01-15T10:00:00Z"
      }))
      .unwrap();

      assert_eq!(team.captain_id, "u1");
      assert_eq!(team.skill_level, Some(SkillLevel::Advanced));
      assert_eq!(team.description, None);
   }

   #[test]
   fn test_更新リクエストは未指定のフィールドを送らない() {
      let request = UpdateTeamRequest {
         name: Some("Bricklayers".to_string()),
         ..UpdateTeamRequest::default()
      };

      assert_eq!(serde_json::to_value(&request).unwrap(), json!({"name": "Bricklayers"}));
   }

   #[test]
   fn test_ゲーム状態はsnake_caseで表現される() {
      assert_eq!(serde_json::to_value(GameStatus::InProgress).unwrap(), json!("in_progress"));
      assert_eq!(GameStatus::InProgress.to_string(), "in_progress");
      assert_eq!("completed".parse::<GameStatus>().unwrap(), GameStatus::Completed);
   }
}
