//! # Courtside 共有ユーティリティ
//!
//! API クライアントと CLI の双方から使用されるワイヤ形式と
//! ログ初期化を提供する。
//!
//! ## 設計方針
//!
//! - バックエンドとの契約（エンベロープ形式）をこのクレートに集約する
//! - ビジネスロジックや HTTP 通信は含めない
//! - 外部クレートへの依存は最小限に抑える（tracing-subscriber は feature で分離）

pub mod api_response;
pub mod error_body;
pub mod observability;
pub mod paginated_response;

pub use api_response::ApiResponse;
pub use error_body::ErrorBody;
pub use paginated_response::{PaginatedResponse, Pagination};
