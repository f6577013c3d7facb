//! Impls - ports の実装
//!
//! - **UnavailableGenerator**: 認証情報やバックエンドが無いときの生成器（常に失敗）
//! - **ScriptedGenerator**: 開発・テスト用（応答を順番に再生）
//! - **CommandGenerator**: 外部プロセスに生成を委譲
//! - **StaticPool / JsonFilePool**: プロバイダ一覧の供給元

pub mod command;
pub mod pool;
pub mod scripted;
pub mod unavailable;

pub use self::command::CommandGenerator;
pub use self::pool::{JsonFilePool, StaticPool};
pub use self::scripted::ScriptedGenerator;
pub use self::unavailable::UnavailableGenerator;
