//! # ページネーション付きレスポンス
//!
//! ページ番号ベースのページネーションに対応したリスト型。

use serde::{Deserialize, Serialize};

/// ページネーション情報
///
/// `total_pages` は常に `ceil(total / limit)` となる。
/// `limit` が 0 の場合は 0 ページとして扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
   pub page:        u32,
   pub limit:       u32,
   pub total:       u64,
   pub total_pages: u64,
}

impl Pagination {
   /// `total_pages` を計算してページネーション情報を作成する
   pub fn new(page: u32, limit: u32, total: u64) -> Self {
      let total_pages = if limit == 0 {
         0
      } else {
         total.div_ceil(u64::from(limit))
      };

      Self {
         page,
         limit,
         total,
         total_pages,
      }
   }

   /// 次のページが存在するか
   pub fn has_next_page(&self) -> bool {
      u64::from(self.page) < self.total_pages
   }
}

/// ページネーション付きレスポンス
///
/// `ApiResponse<T>` の `data` に入るリスト + ページ情報の形式。
///
/// ## JSON 形式
///
/// ```json
/// {
///   "data": [...],
///   "pagination": { "page": 1, "limit": 10, "total": 42, "totalPages": 5 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
   pub data:       Vec<T>,
   pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
   /// 1 ページ分のデータからレスポンスを作成する
   ///
   /// `data` が `limit` を超える場合は `limit` 件に切り詰める。
   pub fn new(mut data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
      data.truncate(limit as usize);
      Self {
         data,
         pagination: Pagination::new(page, limit, total),
      }
   }

   /// 空のページ
   pub fn empty(limit: u32) -> Self {
      Self::new(Vec::new(), 1, limit, 0)
   }
}

// derive では `T: Default` が要求されるため手書きする
impl<T> Default for PaginatedResponse<T> {
   fn default() -> Self {
      Self {
         data:       Vec::new(),
         pagination: Pagination::default(),
      }
   }
}
