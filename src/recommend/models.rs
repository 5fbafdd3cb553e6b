use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::catalog::models::CatalogItem;
use crate::core::error::Result;
use crate::core::search_modes::SearchMode;


/// A retrieved item while one pipeline call is running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub item: &'a CatalogItem,
    pub position: usize,
    /// Retrieval score rescaled into [0, 1].
    pub retrieval_score: f64,
    pub match_score: f64,
}

impl<'a> ScoredCandidate<'a> {
    pub fn new(item: &'a CatalogItem, position: usize, retrieval_score: f64) -> Self {
        Self {
            item,
            position,
            retrieval_score,
            match_score: 0.0,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeCandidate {
    pub item_id: String,
    pub image_filename: String,
    pub match_score: f64,
    pub retrieval_score: f64,
}

impl From<&ScoredCandidate<'_>> for AlternativeCandidate {
    fn from(candidate: &ScoredCandidate<'_>) -> Self {
        Self {
            item_id: candidate.item.id.clone(),
            image_filename: candidate.item.image_filename.clone(),
            match_score: candidate.match_score,
            retrieval_score: candidate.retrieval_score,
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReasoningSource {
    Template,
    Llm,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub recommendation_id: Uuid,
    pub selected_item_id: String,
    pub selected_image_filename: String,
    pub reasoning_text: String,
    pub reasoning_source: ReasoningSource,
    pub generation_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub fashion_notes: String,
    pub confidence_score: f64,
    pub alternative_candidates: Vec<AlternativeCandidate>,
    pub search_mode: SearchMode,
    pub generated_at: DateTime<Utc>,
}

impl RecommendationResult {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
