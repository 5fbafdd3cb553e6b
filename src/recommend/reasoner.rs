use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::explain::ExplanationGenerator;
use super::models::ReasoningSource;
use crate::catalog::models::CatalogItem;
use crate::context::UserContext;
use crate::core::config::{Language, ReasoningKind, StylistConfig};
use crate::core::guard::with_timeout;
use crate::llm::factory::LlmProviderFactory;
use crate::llm::providers::LlmProvider;


pub const SYSTEM_PROMPT: &str = r#"You are a professional fashion stylist. You explain why a single, already chosen garment suits a client today.

Rules:
1. Never suggest a different garment.
2. Stay factual: only use the attributes you are given.
3. Write 2-3 short sentences, no lists, no markdown."#;


pub fn build_reasoning_prompt(item: &CatalogItem, context: &UserContext, language: Language) -> String {
    let styles = if context.profile.style_preferences.is_empty() {
        "none given".to_string()
    } else {
        context
            .profile
            .style_preferences
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    let tags = item.style_tags.iter().cloned().collect::<Vec<_>>().join(", ");
    let answer_in = match language {
        Language::English => "English",
        Language::TraditionalChinese => "Traditional Chinese",
    };

    format!(
        r#"Explain why this garment is a good choice.

**Garment:**
  Category: {category}
  Colour: {color}
  Material: {material}
  Style: {tags}
  Fit: {fit}
  Description: {description}

**Client:**
  Occasion: {occasion} ({formality})
  Weather: {temperature:.0}°C, {condition}
  Preferred styles: {styles}
  Colour season: {season}

Answer in {answer_in}."#,
        category = item.category,
        color = item.color_primary,
        material = item.material,
        fit = item.fit_silhouette.as_deref().unwrap_or("unspecified"),
        description = item.description,
        occasion = context.occasion.kind,
        formality = context.occasion.formality.as_deref().unwrap_or("unspecified formality"),
        temperature = context.weather.temperature_c,
        condition = context.weather.condition.as_deref().unwrap_or("unknown conditions"),
        season = context.profile.personal_color_season.as_deref().unwrap_or("unknown"),
    )
}


#[derive(Debug, Clone, PartialEq)]
pub struct Reasoning {
    pub text: String,
    pub source: ReasoningSource,
}


/// Produces the justification text. Never changes which item was chosen.
#[async_trait]
pub trait ReasoningStrategy: Send + Sync {
    async fn reason(&self, item: &CatalogItem, context: &UserContext) -> Reasoning;

    fn name(&self) -> &str;
}


pub struct TemplatedReasoner {
    explainer: Arc<ExplanationGenerator>,
}

impl TemplatedReasoner {
    pub fn new(explainer: Arc<ExplanationGenerator>) -> Self {
        Self { explainer }
    }
}

#[async_trait]
impl ReasoningStrategy for TemplatedReasoner {
    async fn reason(&self, item: &CatalogItem, context: &UserContext) -> Reasoning {
        Reasoning {
            text: self.explainer.render_reasoning(item, context),
            source: ReasoningSource::Template,
        }
    }

    fn name(&self) -> &str {
        "template"
    }
}


/// Best-effort LLM phrasing; the template answers whenever the call fails,
/// times out or comes back blank.
pub struct LlmReasoner {
    llm: Arc<dyn LlmProvider>,
    fallback: TemplatedReasoner,
    language: Language,
    timeout: Duration,
}

impl LlmReasoner {
    pub fn new(llm: Arc<dyn LlmProvider>, explainer: Arc<ExplanationGenerator>, timeout: Duration) -> Self {
        info!(
            "LlmReasoner initialized with {} ({})",
            llm.provider_name(),
            llm.model_name()
        );
        Self {
            llm,
            language: explainer.language(),
            fallback: TemplatedReasoner::new(explainer),
            timeout,
        }
    }
}

#[async_trait]
impl ReasoningStrategy for LlmReasoner {
    async fn reason(&self, item: &CatalogItem, context: &UserContext) -> Reasoning {
        let prompt = build_reasoning_prompt(item, context, self.language);

        match with_timeout("llm", self.timeout, self.llm.generate(SYSTEM_PROMPT, &prompt)).await {
            Ok(text) if !text.trim().is_empty() => Reasoning {
                text: text.trim().to_string(),
                source: ReasoningSource::Llm,
            },
            Ok(_) => {
                warn!("LLM returned empty reasoning, using template");
                self.fallback.reason(item, context).await
            }
            Err(e) => {
                warn!("LLM reasoning failed, using template: {}", e);
                self.fallback.reason(item, context).await
            }
        }
    }

    fn name(&self) -> &str {
        "llm"
    }
}


/// Chooses the strategy from configuration. An LLM provider that cannot be
/// built degrades to the template instead of failing startup.
pub fn reasoner_from_config(
    config: &StylistConfig,
    explainer: Arc<ExplanationGenerator>,
) -> Arc<dyn ReasoningStrategy> {
    match config.generation.reasoning {
        ReasoningKind::Template => Arc::new(TemplatedReasoner::new(explainer)),
        ReasoningKind::Llm => match LlmProviderFactory::create(&config.llm) {
            Ok(llm) => Arc::new(LlmReasoner::new(
                llm,
                explainer,
                Duration::from_millis(config.llm.timeout_ms),
            )),
            Err(e) => {
                warn!("Cannot build LLM provider, using template reasoning: {}", e);
                Arc::new(TemplatedReasoner::new(explainer))
            }
        },
    }
}
