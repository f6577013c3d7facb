//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。外部協調者（テキスト生成サービス、
//! プロバイダ一覧の供給元、時計）へのインターフェースを定義し、
//! 実装の詳細は impls に閉じ込めます。

pub mod clock;
pub mod generator;
pub mod id_generator;
pub mod provider_source;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::generator::{GenerationRequest, TextGenerator};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::provider_source::ProviderSource;
