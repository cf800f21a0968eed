//! Reciprocal Rank Fusion (RRF) for combining ranked result lists.
//!
//! `score(d) = Σ 1 / (k + rank + 1)` over every list `d` appears in, with
//! `rank` 0-indexed. Only positions matter, not the per-source scores, so
//! lists with incomparable scoring (cosine similarity, graph hits) merge
//! cleanly.

use indexmap::IndexMap;

use crate::types::retrieval::{FusedResult, RankedItem};

/// Default smoothing constant.
pub const DEFAULT_RRF_K: f64 = 60.0;

struct Accumulated<'a> {
    item: &'a RankedItem,
    score: f64,
    sources: Vec<String>,
}

/// Merge ranked lists (each best-first) into one list.
///
/// Scores are normalized by the maximum, so the top result scores 1.0.
/// Items are keyed by id; an item in several lists accumulates each
/// contribution and records every source tag it appeared under. Ties keep
/// first-seen order. Smaller `k` widens the gap between adjacent ranks.
pub fn fusion_rrf(lists: &[Vec<RankedItem>], k: f64) -> Vec<FusedResult> {
    let mut scores: IndexMap<&str, Accumulated<'_>> = IndexMap::new();

    for list in lists {
        for (rank, item) in list.iter().enumerate() {
            let contribution = 1.0 / (k + rank as f64 + 1.0);

            let entry = scores.entry(item.id.as_str()).or_insert_with(|| Accumulated {
                item,
                score: 0.0,
                sources: Vec::new(),
            });
            entry.score += contribution;
            if !entry.sources.contains(&item.source) {
                entry.sources.push(item.source.clone());
            }
        }
    }

    if scores.is_empty() {
        return Vec::new();
    }

    let max_score = scores
        .values()
        .map(|a| a.score)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut fused: Vec<FusedResult> = scores
        .into_values()
        .map(|a| FusedResult {
            id: a.item.id.clone(),
            content: a.item.content.clone(),
            score: if max_score > 0.0 { a.score / max_score } else { 0.0 },
            source: a.item.source.clone(),
            sources: a.sources,
        })
        .collect();

    fused.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    fused
}
