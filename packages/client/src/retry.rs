//! # リトライ制御
//!
//! 失敗した呼び出しを指数バックオフ付きで再試行する。
//!
//! ## バックオフ
//!
//! 試行 `i + 1` の前（`i = 0 … max_retries - 1`）に `base_delay × 2^i` 待機する。
//! 最後の試行が失敗した後は待機しない。総試行回数は `max_retries + 1`。

use std::{fmt::Display, future::Future, time::Duration};

/// リトライポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
   /// 初回試行後の最大リトライ回数
   pub max_retries: u32,
   /// バックオフの基準待機時間
   pub base_delay:  Duration,
}

impl RetryPolicy {
   pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
      Self {
         max_retries,
         base_delay,
      }
   }

   /// リトライしないポリシー
   pub const fn none() -> Self {
      Self::new(0, Duration::ZERO)
   }

   /// `retry` 回目（0 始まり）のリトライ前の待機時間
   ///
   /// `base_delay × 2^retry`。オーバーフローする場合は `Duration::MAX` で飽和する。
   pub fn delay_for(&self, retry: u32) -> Duration {
      2u32.checked_pow(retry)
         .and_then(|factor| self.base_delay.checked_mul(factor))
         .unwrap_or(Duration::MAX)
   }
}

/// `operation` をポリシーに従ってリトライする
///
/// すべての試行が失敗した場合は最後のエラーを返す。
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
   E: Display,
   F: FnMut() -> Fut,
   Fut: Future<Output = Result<T, E>>,
{
   let mut retry = 0;
   loop {
      match operation().await {
         Ok(value) => return Ok(value),
         Err(err) if retry < policy.max_retries => {
            let delay = policy.delay_for(retry);
            retry += 1;
            tracing::warn!(
               attempt = retry + 1,
               max_attempts = policy.max_retries + 1,
               delay_ms = saturating_millis(delay),
               error = %err,
               "リクエスト失敗: バックオフ後にリトライ"
            );
            tokio::time::sleep(delay).await;
         }
         Err(err) => {
            if policy.max_retries > 0 {
               tracing::error!(
                  attempts = retry + 1,
                  error = %err,
                  "リトライ上限超過"
               );
            }
            return Err(err);
         }
      }
   }
}

/// ログ用のミリ秒表現（`u64` に収まらなければ飽和する）
fn saturating_millis(delay: Duration) -> u64 {
   u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}
