

pub mod embeddings;
pub mod factory;
pub mod providers;

pub use embeddings::{EmbeddingError, EmbeddingGenerator, Encoder, cosine_similarity};
pub use factory::{EmbeddingProviderFactory, LlmProviderFactory};
pub use providers::{LlmProvider, LlmProviderError};
