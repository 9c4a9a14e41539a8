//! # リクエスト記述子
//!
//! 1 回のディスパッチで送るリクエストの内容（メソッド、エンドポイント、
//! クエリ、ボディ、ヘッダー上書き）を保持する。呼び出しごとに新しく作成し、
//! その呼び出しだけが所有する。

use reqwest::{
   Method,
   header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;
use url::form_urlencoded;

use crate::error::ApiError;

/// リクエスト記述子
///
/// クエリパラメータは GET のときのみ URL に付与され、
/// ボディは GET 以外のときのみ JSON として送信される。
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
   pub method:   Method,
   /// ベース URL からの相対パス（例: `/teams/42/join`）
   pub endpoint: String,
   pub query:    Vec<(String, String)>,
   pub body:     Option<serde_json::Value>,
   /// 既定ヘッダーより優先されるヘッダー
   pub headers:  HeaderMap,
}

impl RequestDescriptor {
   pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
      Self {
         method,
         endpoint: endpoint.into(),
         query: Vec::new(),
         body: None,
         headers: HeaderMap::new(),
      }
   }

   pub fn get(endpoint: impl Into<String>) -> Self {
      Self::new(Method::GET, endpoint)
   }

   pub fn post(endpoint: impl Into<String>) -> Self {
      Self::new(Method::POST, endpoint)
   }

   pub fn put(endpoint: impl Into<String>) -> Self {
      Self::new(Method::PUT, endpoint)
   }

   pub fn patch(endpoint: impl Into<String>) -> Self {
      Self::new(Method::PATCH, endpoint)
   }

   pub fn delete(endpoint: impl Into<String>) -> Self {
      Self::new(Method::DELETE, endpoint)
   }

   /// クエリパラメータを 1 つ追加する
   pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
      self.query.push((key.into(), value.to_string()));
      self
   }

   /// シリアライズ可能な構造体をクエリパラメータに展開する
   ///
   /// トップレベルのフィールドを 1 つずつパラメータにする。
   /// `null` のフィールドは省略し、配列は同じキーで繰り返す。
   pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, ApiError> {
      let serde_json::Value::Object(fields) = serde_json::to_value(params)? else {
         return Err(ApiError::Serialization(
            "クエリパラメータはオブジェクトである必要があります".to_string(),
         ));
      };

      for (key, value) in fields {
         match value {
            serde_json::Value::Null => {}
            serde_json::Value::Array(items) => {
               for item in items {
                  self.query.push((key.clone(), query_value(item)));
               }
            }
            other => self.query.push((key, query_value(other))),
         }
      }

      Ok(self)
   }

   /// JSON ボディを設定する
   pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
      self.body = Some(serde_json::to_value(body)?);
      Ok(self)
   }

   /// ヘッダーを上書き指定する
   pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
      self.headers.insert(name, value);
      self
   }

   /// 読み取り専用（冪等）なリクエストか
   pub fn is_read_only(&self) -> bool {
      self.method == Method::GET
   }

   /// キャッシュキーに使う正規化済みの文字列（`/teams?page=1&limit=10`）
   ///
   /// クエリはキー順に並べ替えるため、指定順序の違いで別キーにならない。
   pub fn cache_key(&self) -> String {
      if self.query.is_empty() {
         return self.endpoint.clone();
      }

      let mut pairs = self.query.clone();
      pairs.sort();
      // 値に含まれる `&` や `=` で別のクエリと同じキーにならないようエンコードする
      let query = form_urlencoded::Serializer::new(String::new())
         .extend_pairs(pairs)
         .finish();
      format!("{}?{}", self.endpoint, query)
   }
}

fn query_value(value: serde_json::Value) -> String {
   match value {
      serde_json::Value::String(s) => s,
      other => other.to_string(),
   }
}
