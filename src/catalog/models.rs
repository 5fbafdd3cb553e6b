use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, de};
use strum::{Display, EnumIter, EnumString};


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    #[strum(to_string = "Upper", serialize = "top")]
    Upper,
    #[strum(to_string = "Lower", serialize = "bottom")]
    Lower,
    Dress,
    #[strum(to_string = "Outerwear", serialize = "outer")]
    Outerwear,
    Accessory,
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("unknown category: {raw}")))
    }
}


/// One catalog entry. Loaded once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub category: Category,
    pub color_primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_secondary: Option<String>,
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub style_tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_silhouette: Option<String>,
    #[serde(default)]
    pub description: String,
    pub image_filename: String,
}

impl CatalogItem {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        color_primary: impl Into<String>,
        material: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let image_filename = image_filename_for(&id);
        Self {
            id,
            category,
            color_primary: color_primary.into(),
            color_secondary: None,
            material: material.into(),
            pattern: None,
            style_tags: BTreeSet::new(),
            fit_silhouette: None,
            description: String::new(),
            image_filename,
        }
    }

    pub fn with_style_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.style_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_fit(mut self, fit: impl Into<String>) -> Self {
        self.fit_silhouette = Some(fit.into());
        self
    }

    pub fn with_image(mut self, filename: impl Into<String>) -> Self {
        self.image_filename = filename.into();
        self
    }

    pub fn has_style_tag(&self, tag: &str) -> bool {
        self.style_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}


/// `outfit_12` → `12.jpg`; ids without an underscore keep their full text.
pub fn image_filename_for(item_id: &str) -> String {
    match item_id.rsplit_once('_') {
        Some((_, suffix)) if !suffix.is_empty() => format!("{suffix}.jpg"),
        _ => format!("{item_id}.jpg"),
    }
}


/// Row-aligned item embeddings: row `i` belongs to catalog item `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingMatrix {
    rows: Vec<Vec<f32>>,
}

impl EmbeddingMatrix {
    pub fn new(rows: Vec<Vec<f32>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dimensionality of the first row; `None` for an empty matrix.
    pub fn dimension(&self) -> Option<usize> {
        self.rows.first().map(Vec::len)
    }

    /// Index of the first row whose length differs from row 0.
    pub fn first_ragged_row(&self) -> Option<usize> {
        let dim = self.dimension()?;
        self.rows.iter().position(|row| row.len() != dim)
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }
}

impl From<Vec<Vec<f32>>> for EmbeddingMatrix {
    fn from(rows: Vec<Vec<f32>>) -> Self {
        Self::new(rows)
    }
}
