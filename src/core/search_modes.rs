use serde::{Deserialize, Serialize};
use strum::Display;


/// Retrieval path. An index is either `Semantic` or `Keyword` for its whole
/// lifetime; `KeywordFallback` tags a single query that a semantic index had
/// to answer by keyword matching.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchMode {

    Semantic,

    #[default]
    Keyword,

    KeywordFallback,
}

impl SearchMode {
    /// Keyword scores are raw match counts and must be rescaled before scoring.
    #[must_use]
    pub fn is_keyword(&self) -> bool {
        matches!(self, Self::Keyword | Self::KeywordFallback)
    }
}
