use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use super::keyword::{item_term_counts, keyword_score, query_terms};
use super::models::{CatalogItem, Category, EmbeddingMatrix};
use crate::core::error::{Result, StylistError};
use crate::core::guard::with_timeout;
use crate::core::search_modes::SearchMode;
use crate::llm::embeddings::{Encoder, batch_cosine_similarity};

pub const DEFAULT_ENCODE_TIMEOUT: Duration = Duration::from_secs(5);

const DIMENSION_CHECK_TEXT: &str = "__dimension_check__";


/// One retrieved item: its catalog position and the raw retrieval score
/// (cosine similarity, or an unnormalized match count in keyword modes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub position: usize,
    pub score: f64,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub mode: SearchMode,
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    fn empty(mode: SearchMode) -> Self {
        Self { mode, hits: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}


/// Exact, case-insensitive attribute filter. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub color: Option<String>,
    pub material: Option<String>,
    pub category: Option<Category>,
    pub style: Option<String>,
    pub fit: Option<String>,
}

impl AttributeFilter {
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn fit(mut self, fit: impl Into<String>) -> Self {
        self.fit = Some(fit.into());
        self
    }

    fn matches(&self, item: &CatalogItem) -> bool {
        fn same(expected: &Option<String>, actual: Option<&str>) -> bool {
            match expected {
                Some(e) => actual.is_some_and(|a| a.eq_ignore_ascii_case(e)),
                None => true,
            }
        }

        same(&self.color, Some(&item.color_primary))
            && same(&self.material, Some(&item.material))
            && same(&self.fit, item.fit_silhouette.as_deref())
            && self.category.is_none_or(|c| c == item.category)
            && self.style.as_deref().is_none_or(|s| item.has_style_tag(s))
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_items: usize,
    pub per_category: BTreeMap<Category, usize>,
    pub unique_colors: usize,
    pub unique_materials: usize,
    pub unique_styles: usize,
    pub search_mode: SearchMode,
    pub embedding_model: Option<String>,
    pub embedding_dim: Option<usize>,
}


/// Read-only catalog with a search mode fixed at load time.
pub struct CatalogIndex {
    items: Vec<CatalogItem>,
    positions: HashMap<String, usize>,
    term_counts: Vec<HashMap<String, usize>>,
    embeddings: Option<EmbeddingMatrix>,
    embedding_dim: Option<usize>,
    encoder: Option<Arc<dyn Encoder>>,
    encode_timeout: Duration,
    mode: SearchMode,
    degraded_reason: Option<String>,
}

impl std::fmt::Debug for CatalogIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogIndex")
            .field("items", &self.items.len())
            .field("mode", &self.mode)
            .field("embedding_dim", &self.embedding_dim)
            .field("degraded_reason", &self.degraded_reason)
            .finish()
    }
}

impl CatalogIndex {

    pub async fn load(
        items: Vec<CatalogItem>,
        embeddings: Option<EmbeddingMatrix>,
        encoder: Option<Arc<dyn Encoder>>,
    ) -> Result<Self> {
        Self::load_with_timeout(items, embeddings, encoder, DEFAULT_ENCODE_TIMEOUT).await
    }

    pub async fn load_with_timeout(
        items: Vec<CatalogItem>,
        embeddings: Option<EmbeddingMatrix>,
        encoder: Option<Arc<dyn Encoder>>,
        encode_timeout: Duration,
    ) -> Result<Self> {
        Self::load_with_encoders(items, embeddings, encoder.into_iter().collect(), encode_timeout).await
    }

    /// Validates shapes, then encodes a fixed text with each candidate
    /// encoder in order and keeps the first whose output width matches the
    /// embeddings. With no match the index is keyword-only. Only shape
    /// problems are errors.
    pub async fn load_with_encoders(
        items: Vec<CatalogItem>,
        embeddings: Option<EmbeddingMatrix>,
        encoders: Vec<Arc<dyn Encoder>>,
        encode_timeout: Duration,
    ) -> Result<Self> {
        let mut positions = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if positions.insert(item.id.clone(), position).is_some() {
                return Err(StylistError::Schema(format!("duplicate item id: {}", item.id)));
            }
        }

        if let Some(matrix) = &embeddings {
            if matrix.len() != items.len() {
                return Err(StylistError::Schema(format!(
                    "embedding rows ({}) do not match catalog items ({})",
                    matrix.len(),
                    items.len()
                )));
            }
            if let Some(row) = matrix.first_ragged_row() {
                return Err(StylistError::Schema(format!(
                    "embedding row {} has {} dimensions, expected {}",
                    row,
                    matrix.row(row).map_or(0, <[f32]>::len),
                    matrix.dimension().unwrap_or(0)
                )));
            }
        }

        let embedding_dim = embeddings.as_ref().and_then(EmbeddingMatrix::dimension);
        let decision = match embedding_dim {
            None if embeddings.is_none() => Err("no embeddings supplied".to_string()),
            None => Err("embedding matrix is empty".to_string()),
            Some(_) if encoders.is_empty() => Err("no query encoder configured".to_string()),
            Some(dim) => select_encoder(encoders, dim, encode_timeout).await,
        };

        let term_counts = items.iter().map(item_term_counts).collect();

        let index = match decision {
            Ok(encoder) => Self {
                items,
                positions,
                term_counts,
                embeddings,
                embedding_dim,
                encoder: Some(encoder),
                encode_timeout,
                mode: SearchMode::Semantic,
                degraded_reason: None,
            },
            Err(reason) => {
                warn!("Catalog index using keyword-only search: {}", reason);
                Self {
                    items,
                    positions,
                    term_counts,
                    embeddings: None,
                    embedding_dim,
                    encoder: None,
                    encode_timeout,
                    mode: SearchMode::Keyword,
                    degraded_reason: Some(reason),
                }
            }
        };

        info!(
            "CatalogIndex loaded: items={}, mode={}, dim={:?}",
            index.items.len(),
            index.mode,
            index.embedding_dim
        );
        Ok(index)
    }


    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Why the index is keyword-only; `None` in semantic mode.
    pub fn degraded_reason(&self) -> Option<&str> {
        self.degraded_reason.as_deref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn item(&self, position: usize) -> Option<&CatalogItem> {
        self.items.get(position)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&CatalogItem> {
        self.positions.get(id).and_then(|&p| self.items.get(p))
    }


    /// At most `top_k` hits sorted by descending score, ties in catalog
    /// order. Never fails: encoder trouble or an empty semantic result turns
    /// into a keyword search for this one query.
    pub async fn search(&self, query: &str, top_k: usize, threshold: f64) -> SearchResults {
        if top_k == 0 {
            return SearchResults::empty(self.mode);
        }

        let (Some(encoder), Some(matrix)) = (&self.encoder, &self.embeddings) else {
            return self.keyword_search(query, top_k, SearchMode::Keyword);
        };

        let query_vector =
            match with_timeout("encoder", self.encode_timeout, encoder.encode(query)).await {
                Ok(v) if Some(v.len()) == self.embedding_dim => v,
                Ok(v) => {
                    warn!(
                        "Query embedding has {} dimensions, index has {:?}; using keyword search",
                        v.len(),
                        self.embedding_dim
                    );
                    return self.keyword_search(query, top_k, SearchMode::KeywordFallback);
                }
                Err(e) => {
                    warn!("Query encoding failed, using keyword search: {}", e);
                    return self.keyword_search(query, top_k, SearchMode::KeywordFallback);
                }
            };

        let mut hits: Vec<SearchHit> = batch_cosine_similarity(&query_vector, matrix.rows())
            .into_iter()
            .enumerate()
            .map(|(position, score)| SearchHit { position, score })
            .filter(|hit| hit.score >= threshold)
            .collect();

        if hits.is_empty() {
            warn!(
                "No item reached similarity {:.2} for '{}'; using keyword search",
                threshold,
                crate::truncate_for_log(query, 60)
            );
            return self.keyword_search(query, top_k, SearchMode::KeywordFallback);
        }

        rank(&mut hits, top_k);
        debug!("Semantic search returned {} hits", hits.len());
        SearchResults {
            mode: SearchMode::Semantic,
            hits,
        }
    }

    fn keyword_search(&self, query: &str, top_k: usize, mode: SearchMode) -> SearchResults {
        let terms = query_terms(query);
        if terms.is_empty() || top_k == 0 {
            return SearchResults::empty(mode);
        }

        let mut hits: Vec<SearchHit> = self
            .term_counts
            .iter()
            .enumerate()
            .filter_map(|(position, counts)| {
                let score = keyword_score(&terms, counts);
                (score > 0).then_some(SearchHit {
                    position,
                    score: score as f64,
                })
            })
            .collect();

        rank(&mut hits, top_k);
        debug!("Keyword search ({}) returned {} hits", mode, hits.len());
        SearchResults { mode, hits }
    }


    pub fn search_by_attributes(&self, filter: &AttributeFilter, top_k: usize) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| filter.matches(item))
            .take(top_k)
            .collect()
    }


    pub fn stats(&self) -> CatalogStats {
        let mut per_category: BTreeMap<Category, usize> =
            Category::iter().map(|c| (c, 0)).collect();
        let mut colors = BTreeSet::new();
        let mut materials = BTreeSet::new();
        let mut styles = BTreeSet::new();

        for item in &self.items {
            *per_category.entry(item.category).or_insert(0) += 1;
            colors.insert(item.color_primary.to_lowercase());
            materials.insert(item.material.to_lowercase());
            styles.extend(item.style_tags.iter().map(|t| t.to_lowercase()));
        }

        CatalogStats {
            total_items: self.items.len(),
            per_category,
            unique_colors: colors.len(),
            unique_materials: materials.len(),
            unique_styles: styles.len(),
            search_mode: self.mode,
            embedding_model: self.encoder.as_ref().map(|e| e.model_name().to_string()),
            embedding_dim: self.embedding_dim,
        }
    }
}


/// First candidate whose output width matches, or every rejection reason.
async fn select_encoder(
    candidates: Vec<Arc<dyn Encoder>>,
    expected_dim: usize,
    timeout: Duration,
) -> std::result::Result<Arc<dyn Encoder>, String> {
    let mut rejected = Vec::with_capacity(candidates.len());
    for (attempt, encoder) in candidates.into_iter().enumerate() {
        match check_encoder(encoder.as_ref(), expected_dim, timeout).await {
            Ok(()) => {
                if attempt > 0 {
                    info!(
                        "Using fallback embedding model '{}' ({} dimensions)",
                        encoder.model_name(),
                        expected_dim
                    );
                }
                return Ok(encoder);
            }
            Err(reason) => {
                debug!("Embedding model '{}' rejected: {}", encoder.model_name(), reason);
                rejected.push(reason);
            }
        }
    }
    Err(rejected.join("; "))
}

async fn check_encoder(
    encoder: &dyn Encoder,
    expected_dim: usize,
    timeout: Duration,
) -> std::result::Result<(), String> {
    match with_timeout("encoder", timeout, encoder.encode(DIMENSION_CHECK_TEXT)).await {
        Ok(v) if v.len() == expected_dim => Ok(()),
        Ok(v) => Err(format!(
            "embedding dimension mismatch: embeddings={}, model '{}'={}",
            expected_dim,
            encoder.model_name(),
            v.len()
        )),
        Err(e) => Err(format!("encoder check failed: {e}")),
    }
}


fn rank(hits: &mut Vec<SearchHit>, top_k: usize) {
    // stable sort keeps catalog order among equal scores
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits.truncate(top_k);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::embeddings::EmbeddingError;
    use async_trait::async_trait;

    const AXES: [&str; 3] = ["silk", "wool", "denim"];

    /// One dimension per axis word, counting occurrences in the text.
    struct AxisEncoder;

    #[async_trait]
    impl Encoder for AxisEncoder {
        async fn encode(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
            let lower = text.to_lowercase();
            Ok(AXES.iter().map(|a| lower.matches(a).count() as f32).collect())
        }

        fn model_name(&self) -> &str {
            "axis-3"
        }
    }

    struct WideEncoder;

    #[async_trait]
    impl Encoder for WideEncoder {
        async fn encode(&self, _text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
            Ok(vec![0.1; 8])
        }

        fn model_name(&self) -> &str {
            "wide-8"
        }
    }

    struct FailingEncoder;

    #[async_trait]
    impl Encoder for FailingEncoder {
        async fn encode(&self, _text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::InvalidResponse("service down".to_string()))
        }

        fn model_name(&self) -> &str {
            "broken"
        }
    }

    #[derive(Debug, Clone, Copy)]
    enum QueryFault {
        Error,
        Hang,
        WrongSize,
    }

    /// Passes the load-time dimension check, then misbehaves on real queries.
    struct FlakyEncoder(QueryFault);

    #[async_trait]
    impl Encoder for FlakyEncoder {
        async fn encode(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
            if text == DIMENSION_CHECK_TEXT {
                return Ok(vec![1.0, 0.0, 0.0]);
            }
            match self.0 {
                QueryFault::Error => Err(EmbeddingError::InvalidResponse("quota exceeded".to_string())),
                QueryFault::Hang => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(vec![1.0, 0.0, 0.0])
                }
                QueryFault::WrongSize => Ok(vec![1.0; 5]),
            }
        }

        fn model_name(&self) -> &str {
            "flaky-3"
        }
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("outfit_0", Category::Dress, "Green", "Silk")
                .with_description("green silk slip dress for summer evenings")
                .with_style_tags(["Elegant"]),
            CatalogItem::new("outfit_1", Category::Outerwear, "Camel", "Wool")
                .with_description("camel wool coat with a wool lining")
                .with_style_tags(["Classic"]),
            CatalogItem::new("outfit_2", Category::Lower, "Navy", "Denim")
                .with_description("straight navy denim jeans")
                .with_style_tags(["Casual"]),
            CatalogItem::new("outfit_3", Category::Upper, "White", "Silk")
                .with_description("white silk blouse")
                .with_style_tags(["Elegant", "Minimal"])
                .with_fit("Relaxed"),
        ]
    }

    fn matrix() -> EmbeddingMatrix {
        EmbeddingMatrix::new(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.9, 0.1, 0.0],
        ])
    }

    fn axis() -> Option<Arc<dyn Encoder>> {
        Some(Arc::new(AxisEncoder))
    }

    #[tokio::test]
    async fn test_load_rejects_row_count_mismatch() {
        let short = EmbeddingMatrix::new(vec![vec![1.0, 0.0, 0.0]]);
        let err = CatalogIndex::load(catalog(), Some(short), axis()).await.unwrap_err();
        assert!(matches!(err, StylistError::Schema(_)));
    }

    #[tokio::test]
    async fn test_load_rejects_ragged_rows() {
        let ragged = EmbeddingMatrix::new(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0],
        ]);
        let err = CatalogIndex::load(catalog(), Some(ragged), axis()).await.unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[tokio::test]
    async fn test_load_rejects_duplicate_ids() {
        let mut items = catalog();
        items[2].id = "outfit_0".to_string();
        let err = CatalogIndex::load(items, None, None).await.unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[tokio::test]
    async fn test_matching_dimensions_enable_semantic_mode() {
        let index = CatalogIndex::load(catalog(), Some(matrix()), axis()).await.unwrap();
        assert_eq!(index.mode(), SearchMode::Semantic);
        assert!(index.degraded_reason().is_none());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_degrades_to_keyword() {
        let index = CatalogIndex::load(catalog(), Some(matrix()), Some(Arc::new(WideEncoder)))
            .await
            .unwrap();
        assert_eq!(index.mode(), SearchMode::Keyword);
        assert!(index.degraded_reason().unwrap().contains("mismatch"));
    }

    #[tokio::test]
    async fn test_failing_encoder_degrades_to_keyword() {
        let index = CatalogIndex::load(catalog(), Some(matrix()), Some(Arc::new(FailingEncoder)))
            .await
            .unwrap();
        assert_eq!(index.mode(), SearchMode::Keyword);
        assert!(index.degraded_reason().unwrap().contains("check failed"));
    }

    #[tokio::test]
    async fn test_first_matching_fallback_encoder_is_kept() {
        let encoders: Vec<Arc<dyn Encoder>> = vec![Arc::new(WideEncoder), Arc::new(AxisEncoder)];
        let index = CatalogIndex::load_with_encoders(
            catalog(),
            Some(matrix()),
            encoders,
            DEFAULT_ENCODE_TIMEOUT,
        )
        .await
        .unwrap();

        assert_eq!(index.mode(), SearchMode::Semantic);
        assert!(index.degraded_reason().is_none());
        assert_eq!(index.stats().embedding_model.as_deref(), Some("axis-3"));
        assert_eq!(index.search("silk", 5, 0.3).await.mode, SearchMode::Semantic);
    }

    #[tokio::test]
    async fn test_no_matching_encoder_lists_every_rejection() {
        let encoders: Vec<Arc<dyn Encoder>> = vec![Arc::new(WideEncoder), Arc::new(FailingEncoder)];
        let index = CatalogIndex::load_with_encoders(
            catalog(),
            Some(matrix()),
            encoders,
            DEFAULT_ENCODE_TIMEOUT,
        )
        .await
        .unwrap();

        assert_eq!(index.mode(), SearchMode::Keyword);
        let reason = index.degraded_reason().unwrap();
        assert!(reason.contains("mismatch"));
        assert!(reason.contains("check failed"));
    }

    #[tokio::test]
    async fn test_query_encoding_fault_falls_back_per_query() {
        for fault in [QueryFault::Error, QueryFault::Hang, QueryFault::WrongSize] {
            let index = CatalogIndex::load_with_timeout(
                catalog(),
                Some(matrix()),
                Some(Arc::new(FlakyEncoder(fault))),
                Duration::from_millis(20),
            )
            .await
            .unwrap();
            assert_eq!(index.mode(), SearchMode::Semantic, "{fault:?}");

            let results = index.search("silk", 5, 0.3).await;
            assert_eq!(results.mode, SearchMode::KeywordFallback, "{fault:?}");
            let ids: Vec<_> = results
                .hits
                .iter()
                .map(|h| index.item(h.position).unwrap().id.as_str())
                .collect();
            assert_eq!(ids, vec!["outfit_0", "outfit_3"], "{fault:?}");
            assert_eq!(index.mode(), SearchMode::Semantic);
        }
    }

    #[tokio::test]
    async fn test_missing_embeddings_is_keyword_mode() {
        let index = CatalogIndex::load(catalog(), None, axis()).await.unwrap();
        assert_eq!(index.mode(), SearchMode::Keyword);

        let results = index.search("silk dress", 5, 0.3).await;
        assert_eq!(results.mode, SearchMode::Keyword);
        assert!(!results.is_empty());
        assert_eq!(index.item(results.hits[0].position).unwrap().id, "outfit_0");
    }

    #[tokio::test]
    async fn test_semantic_search_sorted_and_bounded() {
        let index = CatalogIndex::load(catalog(), Some(matrix()), axis()).await.unwrap();
        let results = index.search("silk", 5, 0.3).await;

        assert_eq!(results.mode, SearchMode::Semantic);
        let ids: Vec<_> = results
            .hits
            .iter()
            .map(|h| index.item(h.position).unwrap().id.as_str())
            .collect();
        assert_eq!(ids, vec!["outfit_0", "outfit_3"]);
        assert!(results.hits[0].score >= results.hits[1].score);

        let one = index.search("silk", 1, 0.3).await;
        assert_eq!(one.len(), 1);
    }

    #[tokio::test]
    async fn test_semantic_ties_keep_catalog_order() {
        let tied = EmbeddingMatrix::new(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0],
        ]);
        let index = CatalogIndex::load(catalog(), Some(tied), axis()).await.unwrap();
        let results = index.search("silk", 5, 0.3).await;
        let positions: Vec<_> = results.hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_nothing_above_threshold_falls_back_to_keywords() {
        let index = CatalogIndex::load(catalog(), Some(matrix()), axis()).await.unwrap();
        // no axis word, so the query vector is all zeros
        let results = index.search("navy jeans", 5, 0.3).await;
        assert_eq!(results.mode, SearchMode::KeywordFallback);
        assert_eq!(results.len(), 1);
        assert_eq!(index.item(results.hits[0].position).unwrap().id, "outfit_2");
    }

    #[tokio::test]
    async fn test_keyword_scores_are_raw_counts_with_stable_ties() {
        let index = CatalogIndex::load(catalog(), None, None).await.unwrap();
        let results = index.search("wool elegant", 10, 0.3).await;

        let scored: Vec<_> = results.hits.iter().map(|h| (h.position, h.score)).collect();
        assert_eq!(scored, vec![(1, 2.0), (0, 1.0), (3, 1.0)]);
    }

    #[tokio::test]
    async fn test_keyword_search_never_exceeds_top_k() {
        let index = CatalogIndex::load(catalog(), None, None).await.unwrap();
        assert_eq!(index.search("silk wool denim", 2, 0.3).await.len(), 2);
        assert!(index.search("silk", 0, 0.3).await.is_empty());
        assert!(index.search("   ", 5, 0.3).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_and_attribute_filter() {
        let index = CatalogIndex::load(catalog(), None, None).await.unwrap();
        assert_eq!(index.get_by_id("outfit_1").unwrap().material, "Wool");
        assert!(index.get_by_id("missing").is_none());

        let silk = index.search_by_attributes(&AttributeFilter::default().material("silk"), 10);
        assert_eq!(silk.len(), 2);

        let relaxed_tops = index.search_by_attributes(
            &AttributeFilter::default()
                .category(Category::Upper)
                .style("elegant")
                .fit("relaxed"),
            10,
        );
        assert_eq!(relaxed_tops.len(), 1);
        assert_eq!(relaxed_tops[0].id, "outfit_3");

        assert_eq!(index.search_by_attributes(&AttributeFilter::default(), 3).len(), 3);
    }

    #[tokio::test]
    async fn test_stats_counts_categories() {
        let index = CatalogIndex::load(catalog(), Some(matrix()), axis()).await.unwrap();
        let stats = index.stats();

        assert_eq!(stats.total_items, 4);
        assert_eq!(stats.per_category[&Category::Dress], 1);
        assert_eq!(stats.per_category[&Category::Accessory], 0);
        assert_eq!(stats.unique_materials, 3);
        assert_eq!(stats.unique_styles, 4);
        assert_eq!(stats.search_mode, SearchMode::Semantic);
        assert_eq!(stats.embedding_model.as_deref(), Some("axis-3"));
        assert_eq!(stats.embedding_dim, Some(3));
    }

    #[tokio::test]
    async fn test_empty_catalog_loads() {
        let index = CatalogIndex::load(Vec::new(), Some(EmbeddingMatrix::default()), axis())
            .await
            .unwrap();
        assert!(index.is_empty());
        assert_eq!(index.mode(), SearchMode::Keyword);
        assert!(index.search("anything", 5, 0.3).await.is_empty());
    }
}
