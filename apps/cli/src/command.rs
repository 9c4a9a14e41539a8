//! # コマンド
//!
//! コマンドライン引数を読み取り操作 1 つに対応付ける。

use anyhow::{Context, bail};
use courtside_client::{CourtsideApi, api::types::{CourtFilters, GameFilters, TeamFilters}};
use serde_json::Value;

/// 実行する読み取り操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
   /// ログイン中のユーザー
   Me,
   Teams,
   Team(String),
   Games,
   Game(String),
   /// ライブスコア
   Live(String),
   Courts,
   Court(String),
}

pub const USAGE: &str = "\
使い方: courtside <コマンド> [ID]

コマンド:
  me            ログイン中のユーザー
  teams         チーム一覧
  team <id>     チーム詳細
  games         ゲーム一覧
  game <id>     ゲーム詳細
  live <id>     ライブスコア
  courts        コート一覧
  court <id>    コート詳細";

impl Command {
   /// プログラム名を除いた引数からコマンドを組み立てる
   pub fn parse<I, S>(args: I) -> anyhow::Result<Self>
   where
      I: IntoIterator<Item = S>,
      S: AsRef<str>,
   {
      let mut args = args.into_iter();
      let Some(name) = args.next() else {
         bail!("コマンドが指定されていません\n\n{USAGE}");
      };
      let name = name.as_ref().to_ascii_lowercase();

      let mut id = || -> anyhow::Result<String> {
         args.next()
            .map(|s| s.as_ref().to_string())
            .with_context(|| format!("{name} には ID が必要です"))
      };

      let command = match name.as_str() {
         "me" => Self::Me,
         "teams" => Self::Teams,
         "team" => Self::Team(id()?),
         "games" => Self::Games,
         "game" => Self::Game(id()?),
         "live" => Self::Live(id()?),
         "courts" => Self::Courts,
         "court" => Self::Court(id()?),
         other => bail!("不明なコマンドです: {other}\n\n{USAGE}"),
      };
      Ok(command)
   }

   /// 操作を実行し、レスポンスエンベロープを JSON として返す
   pub async fn run<A>(&self, api: &A) -> anyhow::Result<Value>
   where
      A: CourtsideApi + ?Sized,
   {
      let value = match self {
         Self::Me => serde_json::to_value(api.get_current_user().await?)?,
         Self::Teams => serde_json::to_value(api.get_teams(&TeamFilters::default()).await?)?,
         Self::Team(id) => serde_json::to_value(api.get_team(id).await?)?,
         Self::Games => serde_json::to_value(api.get_games(&GameFilters::default()).await?)?,
         Self::Game(id) => serde_json::to_value(api.get_game(id).await?)?,
         Self::Live(id) => serde_json::to_value(api.get_live_game(id).await?)?,
         Self::Courts => {
            serde_json::to_value(api.get_courts(&CourtFilters::default()).await?)?
         }
         Self::Court(id) => serde_json::to_value(api.get_court(id).await?)?,
      };
      Ok(value)
   }
}
