

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::error::Result;


pub const ENV_PREFIX: &str = "STYLIST";


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StylistConfig {
    pub search: SearchConfig,
    pub scoring: ScoringConfig,
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
    pub generation: GenerationConfig,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub top_k: usize,
    pub similarity_threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            similarity_threshold: 0.3,
        }
    }
}


/// Product-tuning knobs for the candidate scorer. None of these are
/// correctness requirements; the defaults are the historical heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub color_bonus: f64,
    pub style_bonus: f64,
    pub material_bonus: f64,
    pub hot_above_c: f64,
    pub cold_below_c: f64,
    pub hot_materials: Vec<String>,
    pub cold_materials: Vec<String>,
    pub max_alternatives: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            color_bonus: 0.25,
            style_bonus: 0.25,
            material_bonus: 0.2,
            hot_above_c: 28.0,
            cold_below_c: 18.0,
            hot_materials: vec!["silk".into(), "cotton".into(), "linen".into()],
            cold_materials: vec!["wool".into(), "blend".into()],
            max_alternatives: 3,
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub enabled: bool,
    pub provider: String,
    pub model: String,
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub cache_size: usize,
    /// Models tried in order, same provider and url, when `model` does not
    /// produce vectors of the catalog's embedding width.
    pub fallback_models: Vec<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "ollama".to_string(),
            model: crate::DEFAULT_EMBEDDING_MODEL.to_string(),
            url: crate::DEFAULT_OLLAMA_URL.to_string(),
            api_key: None,
            timeout_ms: 5_000,
            cache_size: crate::DEFAULT_CACHE_SIZE,
            fallback_models: Vec::new(),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub temperature: f64,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: crate::DEFAULT_LLM_MODEL.to_string(),
            base_url: None,
            api_key: None,
            temperature: 0.3,
            timeout_ms: 15_000,
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReasoningKind {
    #[default]
    Template,
    Llm,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    #[strum(serialize = "en", ascii_case_insensitive)]
    English,
    #[serde(rename = "zh-tw")]
    #[strum(serialize = "zh-tw", ascii_case_insensitive)]
    TraditionalChinese,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub reasoning: ReasoningKind,
    pub language: Language,
    pub subject: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            reasoning: ReasoningKind::Template,
            language: Language::English,
            subject: "an elegant woman".to_string(),
        }
    }
}


impl StylistConfig {

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&Self::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("embedding.fallback_models"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }


    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }
}
