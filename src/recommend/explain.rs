use super::scorer::{CandidateScorer, TemperatureBand};
use crate::catalog::models::CatalogItem;
use crate::context::UserContext;
use crate::core::config::{GenerationConfig, Language, ScoringConfig};

pub const NEGATIVE_PROMPT: &str = "ugly, distorted, blurry, low quality, amateur, unfinished, \
     oversaturated, poorly lit, wrong proportions, deformed, extra limbs, watermark, text";

const QUALITY_SUFFIX: &str = "professional fashion photography, cinematic composition, \
     ultra high quality, detailed fabric texture, natural skin";

const DEFAULT_LIGHTING: &str = "balanced studio lighting";

const LIGHTING: &[(&str, &str)] = &[
    ("sunny", "golden hour lighting"),
    ("overcast", "soft diffused lighting"),
    ("cloudy", "soft diffused lighting"),
    ("clear", "clear evening light"),
    ("rain", "moody diffused light"),
    ("snow", "crisp bright winter light"),
];


pub fn lighting_for(condition: Option<&str>) -> &'static str {
    let Some(condition) = condition else {
        return DEFAULT_LIGHTING;
    };
    let condition = condition.to_lowercase();
    LIGHTING
        .iter()
        .find(|(key, _)| condition.contains(key))
        .map_or(DEFAULT_LIGHTING, |(_, phrase)| *phrase)
}


/// Deterministic text rendering for a selected item.
pub struct ExplanationGenerator {
    language: Language,
    subject: String,
    materials: CandidateScorer,
}

impl ExplanationGenerator {
    pub fn new(generation: &GenerationConfig, scoring: ScoringConfig) -> Self {
        Self {
            language: generation.language,
            subject: generation.subject.clone(),
            materials: CandidateScorer::new(scoring),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }


    /// Clauses for colour, material, style and occasion; each only when its
    /// condition holds.
    pub fn render_reasoning(&self, item: &CatalogItem, context: &UserContext) -> String {
        let profile = &context.profile;
        let zh = self.language == Language::TraditionalChinese;
        let mut clauses = Vec::new();

        if profile.prefers_color(&item.color_primary) {
            clauses.push(match (&profile.personal_color_season, zh) {
                (Some(season), false) => format!(
                    "The {} shade sits in your preferred palette and suits your {} colour season",
                    item.color_primary, season
                ),
                (None, false) => format!("The {} shade sits in your preferred palette", item.color_primary),
                (Some(season), true) => {
                    format!("{}色系符合您的偏好，也適合您的{}色彩季型", item.color_primary, season)
                }
                (None, true) => format!("{}色系符合您的偏好", item.color_primary),
            });
        }

        let temperature = context.weather.temperature_c;
        if self.materials.material_fits(item, temperature) {
            let band = self.materials.band(temperature);
            clauses.push(match (band, zh) {
                (TemperatureBand::Cold, false) => format!(
                    "{} keeps you warm at {:.0}°C",
                    item.material, temperature
                ),
                (_, false) => format!(
                    "{} is breathable and comfortable at {:.0}°C",
                    item.material, temperature
                ),
                (TemperatureBand::Cold, true) => {
                    format!("{}材質保暖，適合{:.0}°C的天氣", item.material, temperature)
                }
                (_, true) => format!("{}材質透氣舒適，適合{:.0}°C的高溫", item.material, temperature),
            });
        }

        if let Some(style) = item.style_tags.iter().find(|t| profile.prefers_style(t)) {
            clauses.push(if zh {
                format!("完美詮釋您偏愛的{style}風格")
            } else {
                format!("Its {style} look matches the style you prefer")
            });
        }

        let occasion = context.occasion.kind.trim();
        if !occasion.is_empty() {
            clauses.push(match (&context.occasion.formality, zh) {
                (Some(f), false) => format!("It is right for {occasion} at a {f} level"),
                (None, false) => format!("It is right for {occasion}"),
                (Some(f), true) => format!("服裝等級與{occasion}的{f}場合相符"),
                (None, true) => format!("服裝等級與場合相符（{occasion}）"),
            });
        }

        if clauses.is_empty() {
            clauses.push(if zh {
                format!("這件{}優雅得體", item.category)
            } else {
                format!("This {} {} is a well-balanced choice", item.color_primary, item.category)
            });
        }

        self.join(clauses)
    }


    /// Subject, then garment, then setting, then lighting, then quality.
    /// Image generators downstream rely on this order.
    pub fn render_generation_prompt(&self, item: &CatalogItem, context: &UserContext) -> String {
        let mut garment = format!("{} {} {}", item.color_primary, item.material, item.category);
        if let Some(fit) = &item.fit_silhouette {
            garment.push_str(&format!(" ({fit} silhouette)"));
        }
        let description = item.description.trim();
        if !description.is_empty() {
            garment.push_str(&format!(", {description}"));
        }

        let setting = match context.occasion.location.as_deref().map(str::trim) {
            Some(location) if !location.is_empty() => {
                format!("standing gracefully in a {location} setting")
            }
            _ => "posing in a minimalist studio".to_string(),
        };

        format!(
            "A photorealistic image of {} wearing a {}, {}, {}, {}",
            self.subject,
            garment,
            setting,
            lighting_for(context.weather.condition.as_deref()),
            QUALITY_SUFFIX
        )
    }

    pub fn render_negative_prompt(&self) -> String {
        NEGATIVE_PROMPT.to_string()
    }


    pub fn render_fashion_notes(&self, item: &CatalogItem, context: &UserContext) -> String {
        let zh = self.language == Language::TraditionalChinese;
        let profile = &context.profile;
        let mut notes = Vec::new();

        if let Some(season) = &profile.personal_color_season {
            notes.push(if zh {
                format!("完美詮釋您的{season}色彩季型")
            } else {
                format!("Plays to your {season} colour season")
            });
        }

        if let (Some(body), Some(fit)) = (&profile.body_type, &item.fit_silhouette) {
            notes.push(if zh {
                format!("{fit}剪裁修飾{body}身材")
            } else {
                format!("The {fit} cut flatters a {body} figure")
            });
        }

        if let Some(formality) = &context.occasion.formality {
            notes.push(if zh {
                format!("得體展現{formality}場合的優雅氣質")
            } else {
                format!("Strikes the right tone for a {formality} {}", context.occasion.kind)
            });
        }

        if notes.is_empty() {
            notes.push(if zh {
                "展現個人品味與自信".to_string()
            } else {
                "A confident expression of personal taste".to_string()
            });
        }

        self.join(notes)
    }

    fn join(&self, clauses: Vec<String>) -> String {
        match self.language {
            Language::English => format!("{}.", clauses.join(". ")),
            Language::TraditionalChinese => format!("{}。", clauses.join("。")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::Category;

    fn generator(language: Language) -> ExplanationGenerator {
        let generation = GenerationConfig {
            language,
            ..Default::default()
        };
        ExplanationGenerator::new(&generation, ScoringConfig::default())
    }

    fn dress() -> CatalogItem {
        CatalogItem::new("outfit_1", Category::Dress, "Green", "Silk")
            .with_style_tags(["Elegant"])
            .with_fit("A-line")
            .with_description("flowing slip dress")
    }

    fn context() -> UserContext {
        UserContext::new("beach wedding", 32.0, "Beach Wedding")
            .with_condition("Sunny")
            .with_color_preferences(["Green"])
            .with_style_preferences(["elegant"])
            .with_location("beach")
    }

    #[test]
    fn test_lighting_table() {
        assert_eq!(lighting_for(Some("Sunny")), "golden hour lighting");
        assert_eq!(lighting_for(Some("partly cloudy")), "soft diffused lighting");
        assert_eq!(lighting_for(Some("clear")), "clear evening light");
        assert_eq!(lighting_for(Some("windy")), DEFAULT_LIGHTING);
        assert_eq!(lighting_for(None), DEFAULT_LIGHTING);
    }

    #[test]
    fn test_prompt_sections_in_order() {
        let prompt = generator(Language::English).render_generation_prompt(&dress(), &context());

        let subject = prompt.find("an elegant woman").unwrap();
        let garment = prompt.find("Green Silk Dress").unwrap();
        let setting = prompt.find("beach setting").unwrap();
        let lighting = prompt.find("golden hour lighting").unwrap();
        let quality = prompt.find("ultra high quality").unwrap();
        assert!(subject < garment && garment < setting && setting < lighting && lighting < quality);
        assert!(prompt.contains("A-line silhouette"));
    }

    #[test]
    fn test_prompt_defaults_without_location_or_condition() {
        let ctx = UserContext::new("office", 22.0, "Work");
        let prompt = generator(Language::English).render_generation_prompt(&dress(), &ctx);
        assert!(prompt.contains("minimalist studio"));
        assert!(prompt.contains(DEFAULT_LIGHTING));
    }

    #[test]
    fn test_reasoning_includes_triggered_clauses() {
        let text = generator(Language::English).render_reasoning(&dress(), &context());
        assert!(text.contains("Green shade"));
        assert!(text.contains("Silk is breathable"));
        assert!(text.contains("Elegant look"));
        assert!(text.contains("Beach Wedding"));
        assert!(text.ends_with('.'));
    }

    #[test]
    fn test_reasoning_omits_material_clause_in_mild_weather() {
        let mut ctx = context();
        ctx.weather.temperature_c = 22.0;
        let text = generator(Language::English).render_reasoning(&dress(), &ctx);
        assert!(!text.contains("Silk"));
    }

    #[test]
    fn test_chinese_reasoning() {
        let text = generator(Language::TraditionalChinese).render_reasoning(&dress(), &context());
        assert!(text.contains("透氣舒適"));
        assert!(text.ends_with('。'));
    }

    #[test]
    fn test_fashion_notes() {
        let g = generator(Language::English);
        assert_eq!(
            g.render_fashion_notes(&dress(), &context()),
            "A confident expression of personal taste."
        );

        let ctx = context()
            .with_color_season("Spring")
            .with_body_type("pear")
            .with_formality("semi-formal");
        let notes = g.render_fashion_notes(&dress(), &ctx);
        assert!(notes.contains("Spring colour season"));
        assert!(notes.contains("A-line cut flatters a pear figure"));
        assert!(notes.contains("semi-formal Beach Wedding"));
    }

    #[test]
    fn test_negative_prompt_is_static() {
        let g = generator(Language::English);
        assert_eq!(g.render_negative_prompt(), g.render_negative_prompt());
        assert!(g.render_negative_prompt().contains("blurry"));
    }
}
