//! # キャッシュレイヤー
//!
//! キーごとに TTL を持つ値ストア。冪等な読み取り API の重複呼び出しを省く。
//!
//! ## 動作
//!
//! 1. キャッシュにエントリがあり `now - timestamp < ttl` ならその値を返す（producer は呼ばない）
//! 2. エントリがない、または期限切れなら producer を呼び、結果を現在時刻と TTL で保存して返す
//! 3. producer が失敗した場合は何も保存せずエラーをそのまま返す
//!
//! キャッシュキーは結果に影響するすべてのパラメータ（フィルタ、ページ等）を
//! 含んでいなければならない。キーの導出は呼び出し側の責務であり、このレイヤーは行わない。
//!
//! 値は `serde_json::Value` として保存するため、1 つのストアで任意の型を扱える。

use std::{
   collections::HashMap,
   future::Future,
   sync::{Arc, Mutex},
   time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::clock::{Clock, SystemClock};

/// キャッシュエントリ
///
/// 作成後に変更されることはなく、更新時は丸ごと上書きされる。
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
   pub data:      serde_json::Value,
   pub timestamp: DateTime<Utc>,
   pub ttl:       Duration,
}

impl CacheEntry {
   /// `now - timestamp < ttl` のとき有効
   ///
   /// `now` が `timestamp` より前（時計の巻き戻り）の場合は経過時間 0 とみなす。
   pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
      let elapsed = (now - self.timestamp).to_std().unwrap_or(Duration::ZERO);
      elapsed < self.ttl
   }
}

/// キャッシュストレージのトレイト
///
/// 同一キーへの並行書き込みは後勝ち（マージしない）。
pub trait CacheStore: Send + Sync {
   fn get(&self, key: &str) -> Option<CacheEntry>;

   fn insert(&self, key: String, entry: CacheEntry);

   fn remove(&self, key: &str);

   /// `pattern` を部分文字列として含むキーをすべて削除する
   ///
   /// `None` の場合はすべて削除する。削除した件数を返す。
   fn clear(&self, pattern: Option<&str>) -> usize;

   fn len(&self) -> usize;

   fn is_empty(&self) -> bool {
      self.len() == 0
   }
}

/// インメモリのキャッシュストレージ
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
   entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryCacheStore {
   pub fn new() -> Self {
      Self::default()
   }

   fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
      self.entries.lock().unwrap_or_else(|e| e.into_inner())
   }
}

impl CacheStore for InMemoryCacheStore {
   fn get(&self, key: &str) -> Option<CacheEntry> {
      self.lock().get(key).cloned()
   }

   fn insert(&self, key: String, entry: CacheEntry) {
      self.lock().insert(key, entry);
   }

   fn remove(&self, key: &str) {
      self.lock().remove(key);
   }

   fn clear(&self, pattern: Option<&str>) -> usize {
      let mut entries = self.lock();
      let before = entries.len();
      match pattern {
         Some(pattern) => entries.retain(|key, _| !key.contains(pattern)),
         None => entries.clear(),
      }
      before - entries.len()
   }

   fn len(&self) -> usize {
      self.lock().len()
   }
}

/// キャッシュレイヤー
///
/// ストレージと時計を注入して使用する。`Clone` は同じストレージを共有する。
#[derive(Clone)]
pub struct Cache {
   store: Arc<dyn CacheStore>,
   clock: Arc<dyn Clock>,
}

impl Cache {
   pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
      Self { store, clock }
   }

   /// インメモリストレージとシステム時計のキャッシュ
   pub fn in_memory() -> Self {
      Self::new(Arc::new(InMemoryCacheStore::new()), Arc::new(SystemClock))
   }

   /// キャッシュを経由して値を取得する
   ///
   /// 有効なエントリがあれば `producer` を呼ばずにその値を返す。
   pub async fn with_cache<T, E, F, Fut>(&self, key: &str, producer: F, ttl: Duration) -> Result<T, E>
   where
      T: Serialize + DeserializeOwned,
      F: FnOnce() -> Fut,
      Fut: Future<Output = Result<T, E>>,
   {
      self.with_cache_if(key, producer, ttl, |_| true).await
   }

   /// `should_store` が `true` を返した結果のみ保存する [`with_cache`](Self::with_cache)
   pub async fn with_cache_if<T, E, F, Fut, P>(
      &self,
      key: &str,
      producer: F,
      ttl: Duration,
      should_store: P,
   ) -> Result<T, E>
   where
      T: Serialize + DeserializeOwned,
      F: FnOnce() -> Fut,
      Fut: Future<Output = Result<T, E>>,
      P: FnOnce(&T) -> bool,
   {
      if let Some(cached) = self.get::<T>(key) {
         tracing::debug!(key, "キャッシュヒット");
         return Ok(cached);
      }

      let value = producer().await?;

      if should_store(&value) {
         self.put(key, &value, ttl);
      }

      Ok(value)
   }

   /// 有効なエントリの値を取得する
   ///
   /// 期限切れのエントリは削除して `None` を返す。
   /// 要求された型にデコードできない値もミスとして扱う。
   pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
      let entry = self.store.get(key)?;

      if !entry.is_valid(self.clock.now()) {
         self.store.remove(key);
         return None;
      }

      match serde_json::from_value(entry.data) {
         Ok(value) => Some(value),
         Err(e) => {
            tracing::warn!(key, error = %e, "キャッシュ値を要求された型にデコードできません");
            None
         }
      }
   }

   /// 現在時刻と TTL で値を保存（上書き）する
   ///
   /// シリアライズできない値は保存せずに警告のみ出す。
   pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
      match serde_json::to_value(value) {
         Ok(data) => self.store.insert(
            key.to_string(),
            CacheEntry {
               data,
               timestamp: self.clock.now(),
               ttl,
            },
         ),
         Err(e) => {
            tracing::warn!(key, error = %e, "キャッシュ値をシリアライズできません");
         }
      }
   }

   /// `pattern` を含むキーを削除する（`None` なら全削除）
   pub fn clear_cache(&self, pattern: Option<&str>) -> usize {
      let removed = self.store.clear(pattern);
      tracing::debug!(pattern, removed, "キャッシュを削除");
      removed
   }

   pub fn len(&self) -> usize {
      self.store.len()
   }

   pub fn is_empty(&self) -> bool {
      self.store.is_empty()
   }
}
