

pub mod config;
pub mod error;
pub mod guard;
pub mod search_modes;

pub use config::{
    EmbeddingConfig, GenerationConfig, Language, LlmConfig, ReasoningKind, ScoringConfig,
    SearchConfig, StylistConfig,
};
pub use error::{Result, StylistError};
pub use guard::with_timeout;
pub use search_modes::SearchMode;
