use std::sync::Arc;

use chrono::Utc;
use strum::Display;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::explain::ExplanationGenerator;
use super::models::{AlternativeCandidate, RecommendationResult};
use super::reasoner::{ReasoningStrategy, reasoner_from_config};
use super::scorer::CandidateScorer;
use crate::catalog::index::CatalogIndex;
use crate::context::UserContext;
use crate::core::config::{SearchConfig, StylistConfig};
use crate::core::error::{Result, StylistError};

const HOT_QUERY_ABOVE_C: f64 = 25.0;
const COLD_QUERY_BELOW_C: f64 = 15.0;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Start,
    Retrieve,
    EmptyResult,
    Score,
    Select,
    Generate,
    Done,
}


/// Raw query followed by weather, colour, style and occasion keywords,
/// single-space separated.
pub fn build_composite_query(context: &UserContext) -> String {
    let mut parts: Vec<&str> = vec![context.query.trim()];

    let temperature = context.weather.temperature_c;
    if temperature > HOT_QUERY_ABOVE_C {
        parts.push("breathable lightweight");
    } else if temperature < COLD_QUERY_BELOW_C {
        parts.push("warm cozy");
    }
    if context
        .weather
        .condition
        .as_deref()
        .is_some_and(|c| c.to_lowercase().contains("sunny"))
    {
        parts.push("light color sun protection");
    }

    parts.extend(context.profile.color_preferences.iter().map(|c| c.trim()));
    parts.extend(context.profile.style_preferences.iter().map(|s| s.trim()));
    parts.push(context.occasion.kind.trim());

    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}


/// Retrieve → score → select → generate over a shared, read-only index.
pub struct RecommendationPipeline {
    index: Arc<CatalogIndex>,
    search: SearchConfig,
    scorer: CandidateScorer,
    explainer: Arc<ExplanationGenerator>,
    reasoner: Arc<dyn ReasoningStrategy>,
}

impl RecommendationPipeline {
    pub fn new(index: Arc<CatalogIndex>, config: &StylistConfig) -> Self {
        let explainer = Arc::new(ExplanationGenerator::new(
            &config.generation,
            config.scoring.clone(),
        ));
        let reasoner = reasoner_from_config(config, Arc::clone(&explainer));
        info!(
            "RecommendationPipeline ready: items={}, mode={}, reasoning={}",
            index.len(),
            index.mode(),
            reasoner.name()
        );
        Self {
            index,
            search: config.search.clone(),
            scorer: CandidateScorer::new(config.scoring.clone()),
            explainer,
            reasoner,
        }
    }

    pub fn with_reasoner(mut self, reasoner: Arc<dyn ReasoningStrategy>) -> Self {
        self.reasoner = reasoner;
        self
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn scorer(&self) -> &CandidateScorer {
        &self.scorer
    }


    pub async fn recommend(&self, context: &UserContext) -> Result<RecommendationResult> {
        self.recommend_with_top_k(context, self.search.top_k).await
    }

    pub async fn recommend_with_top_k(
        &self,
        context: &UserContext,
        top_k: usize,
    ) -> Result<RecommendationResult> {
        let mut stage = PipelineStage::Start;
        if top_k == 0 {
            return Err(StylistError::Validation("top_k must be at least 1".to_string()));
        }
        context.validate()?;

        let query = build_composite_query(context);
        stage = advance(stage, PipelineStage::Retrieve);
        let results = self
            .index
            .search(&query, top_k, self.search.similarity_threshold)
            .await;

        if results.is_empty() {
            advance(stage, PipelineStage::EmptyResult);
            warn!("No candidates for '{}'", crate::truncate_for_log(&query, 80));
            return Err(StylistError::NoCandidates { query });
        }

        stage = advance(stage, PipelineStage::Score);
        let mut candidates = self.scorer.candidates(&self.index, &results);
        self.scorer.score_all(&mut candidates, context);

        stage = advance(stage, PipelineStage::Select);
        let Some((best, alternatives)) = self.scorer.select(candidates) else {
            advance(stage, PipelineStage::EmptyResult);
            return Err(StylistError::NoCandidates { query });
        };

        stage = advance(stage, PipelineStage::Generate);
        let item = best.item;
        let reasoning = self.reasoner.reason(item, context).await;

        let result = RecommendationResult {
            recommendation_id: Uuid::new_v4(),
            selected_item_id: item.id.clone(),
            selected_image_filename: item.image_filename.clone(),
            reasoning_text: reasoning.text,
            reasoning_source: reasoning.source,
            generation_prompt: self.explainer.render_generation_prompt(item, context),
            negative_prompt: Some(self.explainer.render_negative_prompt()),
            fashion_notes: self.explainer.render_fashion_notes(item, context),
            confidence_score: best.match_score,
            alternative_candidates: alternatives.iter().map(AlternativeCandidate::from).collect(),
            search_mode: results.mode,
            generated_at: Utc::now(),
        };

        advance(stage, PipelineStage::Done);
        info!(
            "Recommended {} (confidence={:.3}, mode={}, alternatives={})",
            result.selected_item_id,
            result.confidence_score,
            result.search_mode,
            result.alternative_candidates.len()
        );
        Ok(result)
    }
}

fn advance(from: PipelineStage, to: PipelineStage) -> PipelineStage {
    debug!("pipeline {} -> {}", from, to);
    to
}
