use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use super::models::ScoredCandidate;
use crate::catalog::index::{CatalogIndex, SearchResults};
use crate::catalog::models::CatalogItem;
use crate::context::UserContext;
use crate::core::config::ScoringConfig;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBand {
    Hot,
    Mild,
    Cold,
}


/// Which bonuses fired for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub color_bonus: f64,
    pub style_bonus: f64,
    pub material_bonus: f64,
    pub matched_style: Option<String>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        (self.base + self.color_bonus + self.style_bonus + self.material_bonus).min(1.0)
    }
}


pub struct CandidateScorer {
    config: ScoringConfig,
}

impl CandidateScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn band(&self, temperature_c: f64) -> TemperatureBand {
        if temperature_c > self.config.hot_above_c {
            TemperatureBand::Hot
        } else if temperature_c < self.config.cold_below_c {
            TemperatureBand::Cold
        } else {
            TemperatureBand::Mild
        }
    }

    /// True when the item's material is one the temperature band favors.
    pub fn material_fits(&self, item: &CatalogItem, temperature_c: f64) -> bool {
        let favored = match self.band(temperature_c) {
            TemperatureBand::Hot => &self.config.hot_materials,
            TemperatureBand::Cold => &self.config.cold_materials,
            TemperatureBand::Mild => return false,
        };
        let material = item.material.to_lowercase();
        favored.iter().any(|m| material.contains(&m.to_lowercase()))
    }


    /// Turns raw hits into candidates with retrieval scores in [0, 1].
    /// Keyword counts are divided by the largest count in this result set.
    pub fn candidates<'a>(
        &self,
        index: &'a CatalogIndex,
        results: &SearchResults,
    ) -> Vec<ScoredCandidate<'a>> {
        let divisor = if results.mode.is_keyword() {
            results
                .hits
                .iter()
                .map(|h| h.score)
                .fold(0.0_f64, f64::max)
        } else {
            1.0
        };

        results
            .hits
            .iter()
            .filter_map(|hit| {
                let item = index.item(hit.position)?;
                let base = if divisor > 0.0 { hit.score / divisor } else { 0.0 };
                Some(ScoredCandidate::new(item, hit.position, base.clamp(0.0, 1.0)))
            })
            .collect()
    }


    pub fn breakdown(&self, candidate: &ScoredCandidate<'_>, context: &UserContext) -> ScoreBreakdown {
        let item = candidate.item;
        let profile = &context.profile;

        let color_bonus = if profile.prefers_color(&item.color_primary) {
            self.config.color_bonus
        } else {
            0.0
        };

        let matched_style = item
            .style_tags
            .iter()
            .find(|tag| profile.prefers_style(tag))
            .cloned();
        let style_bonus = if matched_style.is_some() {
            self.config.style_bonus
        } else {
            0.0
        };

        let material_bonus = if self.material_fits(item, context.weather.temperature_c) {
            self.config.material_bonus
        } else {
            0.0
        };

        ScoreBreakdown {
            base: candidate.retrieval_score.clamp(0.0, 1.0),
            color_bonus,
            style_bonus,
            material_bonus,
            matched_style,
        }
    }

    pub fn score(&self, candidate: &ScoredCandidate<'_>, context: &UserContext) -> f64 {
        self.breakdown(candidate, context).total()
    }

    pub fn score_all(&self, candidates: &mut [ScoredCandidate<'_>], context: &UserContext) {
        for candidate in candidates.iter_mut() {
            candidate.match_score = self.score(candidate, context);
            debug!(
                "Scored {}: retrieval={:.3} match={:.3}",
                candidate.item.id, candidate.retrieval_score, candidate.match_score
            );
        }
    }


    /// Best candidate plus up to `max_alternatives` runners-up. Ties go to
    /// the higher retrieval score, then to the earlier catalog position.
    pub fn select<'a>(
        &self,
        mut candidates: Vec<ScoredCandidate<'a>>,
    ) -> Option<(ScoredCandidate<'a>, Vec<ScoredCandidate<'a>>)> {
        candidates.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.retrieval_score
                        .partial_cmp(&a.retrieval_score)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.position.cmp(&b.position))
        });

        let mut ranked = candidates.into_iter();
        let best = ranked.next()?;
        let alternatives = ranked.take(self.config.max_alternatives).collect();
        Some((best, alternatives))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::index::SearchHit;
    use crate::catalog::models::Category;
    use crate::core::search_modes::SearchMode;

    fn scorer() -> CandidateScorer {
        CandidateScorer::new(ScoringConfig::default())
    }

    fn green_silk_dress() -> CatalogItem {
        CatalogItem::new("outfit_1", Category::Dress, "Green", "Silk").with_style_tags(["Elegant"])
    }

    fn beach_wedding() -> UserContext {
        UserContext::new("beach wedding", 32.0, "Beach Wedding")
            .with_color_preferences(["green"])
            .with_style_preferences(["Elegant"])
    }

    #[test]
    fn test_all_bonuses_stack() {
        let item = green_silk_dress();
        let candidate = ScoredCandidate::new(&item, 0, 0.2);
        let breakdown = scorer().breakdown(&candidate, &beach_wedding());

        assert_eq!(breakdown.color_bonus, 0.25);
        assert_eq!(breakdown.style_bonus, 0.25);
        assert_eq!(breakdown.material_bonus, 0.2);
        assert_eq!(breakdown.matched_style.as_deref(), Some("Elegant"));
        assert!((breakdown.total() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_capped_and_deterministic() {
        let item = green_silk_dress();
        let candidate = ScoredCandidate::new(&item, 0, 0.8);
        let ctx = beach_wedding();

        let first = scorer().score(&candidate, &ctx);
        assert_eq!(first, 1.0);
        for _ in 0..10 {
            assert_eq!(scorer().score(&candidate, &ctx), first);
        }
    }

    #[test]
    fn test_score_stays_in_unit_range() {
        let item = green_silk_dress();
        for base in [-3.0, 0.0, 0.4, 1.0, 7.5] {
            for temp in [-10.0, 20.0, 35.0] {
                let candidate = ScoredCandidate::new(&item, 0, base);
                let mut ctx = beach_wedding();
                ctx.weather.temperature_c = temp;
                let score = scorer().score(&candidate, &ctx);
                assert!((0.0..=1.0).contains(&score), "score {score} out of range");
            }
        }
    }

    #[test]
    fn test_material_bands() {
        let s = scorer();
        let wool = CatalogItem::new("w", Category::Outerwear, "Camel", "Wool");
        let linen = CatalogItem::new("l", Category::Upper, "White", "Linen");

        assert_eq!(s.band(28.0), TemperatureBand::Mild);
        assert_eq!(s.band(28.5), TemperatureBand::Hot);
        assert_eq!(s.band(17.0), TemperatureBand::Cold);
        assert!(s.material_fits(&wool, 10.0));
        assert!(!s.material_fits(&wool, 30.0));
        assert!(s.material_fits(&linen, 30.0));
        assert!(!s.material_fits(&linen, 22.0));
    }

    #[tokio::test]
    async fn test_keyword_counts_are_rescaled_by_max() {
        let items = vec![
            CatalogItem::new("outfit_0", Category::Upper, "Red", "Cotton"),
            CatalogItem::new("outfit_1", Category::Lower, "Blue", "Denim"),
        ];
        let index = CatalogIndex::load(items, None, None).await.unwrap();
        let results = SearchResults {
            mode: SearchMode::Keyword,
            hits: vec![
                SearchHit { position: 1, score: 4.0 },
                SearchHit { position: 0, score: 1.0 },
            ],
        };

        let candidates = scorer().candidates(&index, &results);
        assert_eq!(candidates[0].item.id, "outfit_1");
        assert_eq!(candidates[0].retrieval_score, 1.0);
        assert_eq!(candidates[1].retrieval_score, 0.25);
    }

    #[test]
    fn test_select_breaks_ties_deterministically() {
        let items: Vec<_> = (0..5)
            .map(|i| CatalogItem::new(format!("outfit_{i}"), Category::Upper, "Red", "Cotton"))
            .collect();
        let mut candidates = vec![
            ScoredCandidate::new(&items[3], 3, 0.5),
            ScoredCandidate::new(&items[1], 1, 0.5),
            ScoredCandidate::new(&items[2], 2, 0.9),
            ScoredCandidate::new(&items[0], 0, 0.1),
            ScoredCandidate::new(&items[4], 4, 0.5),
        ];
        for c in candidates.iter_mut() {
            c.match_score = 0.6;
        }
        candidates[3].match_score = 0.95;

        let (best, alternatives) = scorer().select(candidates).unwrap();
        assert_eq!(best.item.id, "outfit_0");
        let alt_ids: Vec<_> = alternatives.iter().map(|c| c.item.id.as_str()).collect();
        assert_eq!(alt_ids, vec!["outfit_2", "outfit_1", "outfit_3"]);
    }

    #[test]
    fn test_select_empty_is_none() {
        assert!(scorer().select(Vec::new()).is_none());
    }
}
