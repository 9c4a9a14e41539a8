//! # Courtside CLI
//!
//! API クライアント層を端末から試すためのコマンドラインツール。
//! 読み取り操作を 1 つ実行し、レスポンスエンベロープを整形済み JSON で標準出力に書き出す。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_BASE_URL` | No | バックエンドの URL（デフォルト: `http://localhost:3001/api`） |
//! | `APP_ENV` | No | `development` / `production`（デフォルト: `production`） |
//! | `USE_MOCK_API` | No | 開発環境でフィクスチャのみを返す |
//! | `MOCK_FIXTURES_PATH` | No | フィクスチャファイルのパス |
//! | `API_ACCESS_TOKEN` | No | 送信するアクセストークン |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 実行方法
//!
//! ```bash
//! cargo run -p courtside-cli -- teams
//! APP_ENV=development MOCK_FIXTURES_PATH=fixtures.json cargo run -p courtside-cli -- team t1
//! ```

mod command;

use command::Command;
use courtside_client::{ApiClient, ClientConfig};
use courtside_shared::observability::{TracingConfig, init_tracing};

/// CLI のエントリーポイント
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. クライアント設定の読み込みとフィクスチャの読み込み
/// 4. コマンドの実行
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   dotenvy::dotenv().ok();

   let tracing_config = TracingConfig::from_env("courtside-cli");
   init_tracing(&tracing_config);
   let _tracing_guard = tracing::info_span!("app", app = %tracing_config.app_name).entered();

   let command = Command::parse(std::env::args().skip(1))?;

   let config = ClientConfig::from_env()?;
   let client = ApiClient::builder(config).load_fixtures()?.build();
   if let Ok(token) = std::env::var("API_ACCESS_TOKEN") {
      client.set_auth_token(token);
   }

   tracing::debug!(?command, "コマンドを実行します");
   let response = command.run(&client).await?;

   println!("{}", serde_json::to_string_pretty(&response)?);
   Ok(())
}
