pub mod index;
pub mod keyword;
pub mod loader;
pub mod models;

pub use index::{AttributeFilter, CatalogIndex, CatalogStats, SearchHit, SearchResults};
pub use loader::{load_catalog, load_embeddings, parse_catalog, parse_embeddings};
pub use models::{CatalogItem, Category, EmbeddingMatrix};
