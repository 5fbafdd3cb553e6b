pub mod catalog;
pub mod context;
pub mod core;
pub mod llm;
pub mod recommend;
pub mod utils;

pub use utils::{safe_truncate, truncate_for_log};


pub use catalog::{CatalogIndex, CatalogItem, Category, EmbeddingMatrix};
pub use context::UserContext;
pub use core::config::StylistConfig;
pub use core::error::{Result, StylistError};
pub use core::search_modes::SearchMode;
pub use llm::embeddings::{EmbeddingGenerator, Encoder};
pub use recommend::{RecommendationPipeline, RecommendationResult};


pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";


pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";


pub const DEFAULT_LLM_MODEL: &str = "llama3.1:8b";


pub const DEFAULT_CACHE_SIZE: usize = 1000;
