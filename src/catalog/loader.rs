use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::models::{CatalogItem, Category, EmbeddingMatrix, image_filename_for};
use crate::core::error::{Result, StylistError};


/// Record shape written by the upstream catalog builder. Ids and image
/// names are positional there, so they are assigned on load.
#[derive(Debug, Deserialize)]
struct BuilderRecord {
    category: String,
    #[serde(default)]
    subcategory: Option<String>,
    color_primary: String,
    #[serde(default)]
    color_secondary: Option<String>,
    material: String,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    style_aesthetic: Option<StyleField>,
    #[serde(default)]
    fit_silhouette: Option<String>,
    #[serde(default)]
    complete_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StyleField {
    Joined(String),
    List(Vec<String>),
}

impl StyleField {
    fn into_tags(self) -> BTreeSet<String> {
        let raw = match self {
            StyleField::Joined(s) => s.split(',').map(str::to_string).collect(),
            StyleField::List(v) => v,
        };
        raw.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("none"))
}

impl BuilderRecord {
    fn into_item(self, position: usize) -> Result<CatalogItem> {
        let category: Category = self.category.trim().parse().map_err(|_| {
            StylistError::Schema(format!(
                "item {}: unknown category '{}'",
                position, self.category
            ))
        })?;

        let id = format!("outfit_{position}");
        let description = present(self.complete_description).unwrap_or_else(|| {
            let kind = present(self.subcategory).unwrap_or_else(|| category.to_string());
            format!("{} {} {}", self.color_primary, self.material, kind)
        });

        Ok(CatalogItem {
            image_filename: image_filename_for(&id),
            id,
            category,
            color_primary: self.color_primary,
            color_secondary: present(self.color_secondary),
            material: self.material,
            pattern: present(self.pattern),
            style_tags: self.style_aesthetic.map(StyleField::into_tags).unwrap_or_default(),
            fit_silhouette: present(self.fit_silhouette),
            description,
        })
    }
}


/// Parses a JSON array of items. Records carrying an `id` use the native
/// shape; the rest are read as catalog-builder records.
pub fn parse_catalog(json: &str) -> Result<Vec<CatalogItem>> {
    let records: Vec<Value> = serde_json::from_str(json)
        .map_err(|e| StylistError::Schema(format!("catalog is not a JSON array: {e}")))?;

    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            if record.get("id").is_some() {
                serde_json::from_value::<CatalogItem>(record)
                    .map_err(|e| StylistError::Schema(format!("item {position}: {e}")))
            } else {
                serde_json::from_value::<BuilderRecord>(record)
                    .map_err(|e| StylistError::Schema(format!("item {position}: {e}")))?
                    .into_item(position)
            }
        })
        .collect()
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<CatalogItem>> {
    let path = path.as_ref();
    let items = parse_catalog(&fs::read_to_string(path)?)?;
    info!("Loaded {} catalog items from {}", items.len(), path.display());
    Ok(items)
}


pub fn parse_embeddings(json: &str) -> Result<EmbeddingMatrix> {
    serde_json::from_str::<Vec<Vec<f32>>>(json)
        .map(EmbeddingMatrix::new)
        .map_err(|e| StylistError::Schema(format!("embeddings must be an array of float rows: {e}")))
}

pub fn load_embeddings(path: impl AsRef<Path>) -> Result<EmbeddingMatrix> {
    let path = path.as_ref();
    let matrix = parse_embeddings(&fs::read_to_string(path)?)?;
    info!(
        "Loaded {} embedding rows (dim={:?}) from {}",
        matrix.len(),
        matrix.dimension(),
        path.display()
    );
    Ok(matrix)
}
