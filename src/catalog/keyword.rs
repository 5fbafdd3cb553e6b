use std::collections::{BTreeSet, HashMap};

use lazy_static::lazy_static;
use regex::Regex;

use super::models::CatalogItem;

lazy_static! {
    static ref TOKEN_SPLIT: Regex = Regex::new(r"[^\p{L}\p{N}]+").unwrap();
}


/// Lowercases and splits on anything that is not a letter or digit.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_SPLIT
        .split(&text.to_lowercase())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}


/// Distinct query terms. Repeats in the composite query do not count twice.
pub fn query_terms(query: &str) -> BTreeSet<String> {
    tokenize(query).into_iter().collect()
}


/// Term frequencies over the searchable text of one item: its description
/// plus every style tag.
pub fn item_term_counts(item: &CatalogItem) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    let tag_tokens = item.style_tags.iter().flat_map(|tag| tokenize(tag));
    for token in tokenize(&item.description).into_iter().chain(tag_tokens) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}


/// Raw match count: for each distinct query term, how often it occurs in the
/// item's searchable text. Not normalized.
pub fn keyword_score(terms: &BTreeSet<String>, counts: &HashMap<String, usize>) -> usize {
    terms.iter().filter_map(|term| counts.get(term)).sum()
}
