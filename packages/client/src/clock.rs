//! # Clock（時刻プロバイダ）
//!
//! キャッシュの鮮度判定で `Utc::now()` を直接呼ばず、
//! テストで時刻を注入・進行できるようにするための抽象化。

use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 手動で進めるテスト用の時計
///
/// `advance` を呼ぶまで同じ時刻を返し続ける。
pub struct ManualClock {
   now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self {
         now: Mutex::new(now),
      }
   }

   /// 時刻を `duration` だけ進める
   pub fn advance(&self, duration: std::time::Duration) {
      let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
      if let Some(next) = chrono::Duration::from_std(duration)
         .ok()
         .and_then(|delta| now.checked_add_signed(delta))
      {
         *now = next;
      }
   }
}

impl Clock for ManualClock {
   fn now(&self) -> DateTime<Utc> {
      *self.now.lock().unwrap_or_else(|e| e.into_inner())
   }
}

#[cfg(test)]
mod tests {
   use std::time::Duration;

   use super::*;

   #[test]
   fn test_system_clock_は現在時刻を返す() {
      let clock = SystemClock;
      let before = Utc::now();
      let result = clock.now();
      let after = Utc::now();

      assert!(result >= before);
      assert!(result <= after);
   }

   #[test]
   fn test_manual_clock_はadvanceするまで同じ時刻を返す() {
      let fixed_time = Utc::now();
      let clock = ManualClock::new(fixed_time);

      assert_eq!(clock.now(), fixed_time);
      assert_eq!(clock.now(), fixed_time);
   }

   #[test]
   fn test_manual_clock_はadvanceした分だけ進む() {
      let fixed_time = Utc::now();
      let clock = ManualClock::new(fixed_time);

      clock.advance(Duration::from_secs(90));

      assert_eq!(clock.now(), fixed_time + chrono::Duration::seconds(90));
   }
}
