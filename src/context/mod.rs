use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StylistError};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    #[serde(alias = "temperature_c", alias = "temp_c")]
    pub temperature_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(
        default,
        alias = "personal_color_season",
        alias = "personalColor",
        skip_serializing_if = "Option::is_none"
    )]
    pub personal_color_season: Option<String>,
    #[serde(alias = "color_preferences")]
    pub color_preferences: BTreeSet<String>,
    #[serde(alias = "style_preferences")]
    pub style_preferences: BTreeSet<String>,
    #[serde(default, alias = "body_type", skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
}

impl UserProfile {
    pub fn prefers_color(&self, color: &str) -> bool {
        self.color_preferences
            .iter()
            .any(|c| c.eq_ignore_ascii_case(color))
    }

    pub fn prefers_style(&self, style: &str) -> bool {
        self.style_preferences
            .iter()
            .any(|s| s.eq_ignore_ascii_case(style))
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occasion {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}


/// Per-request input. Required fields are enforced by deserialization,
/// value ranges by [`UserContext::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub query: String,
    pub weather: Weather,
    pub profile: UserProfile,
    pub occasion: Occasion,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub constraints: BTreeSet<String>,
}

impl UserContext {
    pub fn new(query: impl Into<String>, temperature_c: f64, occasion: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            weather: Weather {
                temperature_c,
                condition: None,
            },
            profile: UserProfile::default(),
            occasion: Occasion {
                kind: occasion.into(),
                formality: None,
                location: None,
            },
            constraints: BTreeSet::new(),
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.weather.condition = Some(condition.into());
        self
    }

    pub fn with_color_preferences<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profile.color_preferences = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_style_preferences<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profile.style_preferences = styles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_color_season(mut self, season: impl Into<String>) -> Self {
        self.profile.personal_color_season = Some(season.into());
        self
    }

    pub fn with_body_type(mut self, body_type: impl Into<String>) -> Self {
        self.profile.body_type = Some(body_type.into());
        self
    }

    pub fn with_formality(mut self, formality: impl Into<String>) -> Self {
        self.occasion.formality = Some(formality.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.occasion.location = Some(location.into());
        self
    }

    pub fn with_constraints<I, S>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints = constraints.into_iter().map(Into::into).collect();
        self
    }


    /// Required fields are enforced by deserialization. A blank query is
    /// allowed: the composite query still carries weather, preferences and
    /// occasion terms.
    pub fn validate(&self) -> Result<()> {
        let t = self.weather.temperature_c;
        if !t.is_finite() {
            return Err(StylistError::Validation(format!("temperature must be a number, got {t}")));
        }
        Ok(())
    }

    /// Parses and validates. Missing required fields are validation errors.
    pub fn from_json(json: &str) -> Result<Self> {
        let context: Self = serde_json::from_str(json)
            .map_err(|e| StylistError::Validation(format!("invalid user context: {e}")))?;
        context.validate()?;
        Ok(context)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
