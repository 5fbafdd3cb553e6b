pub mod explain;
pub mod models;
pub mod pipeline;
pub mod reasoner;
pub mod scorer;

pub use explain::{ExplanationGenerator, NEGATIVE_PROMPT, lighting_for};
pub use models::{AlternativeCandidate, ReasoningSource, RecommendationResult, ScoredCandidate};
pub use pipeline::{PipelineStage, RecommendationPipeline, build_composite_query};
pub use reasoner::{LlmReasoner, Reasoning, ReasoningStrategy, TemplatedReasoner, reasoner_from_config};
pub use scorer::{CandidateScorer, ScoreBreakdown, TemperatureBand};
