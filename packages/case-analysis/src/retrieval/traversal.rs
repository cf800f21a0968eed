//! Bounded-depth graph traversal.
//!
//! An explicit breadth-first worklist over [`GraphStore::outgoing`], so the
//! same traversal runs against any store. Each queued item carries its own
//! path; an edge whose target is already on that path is skipped, which
//! rules out cycles per branch while still reporting an entity once per
//! distinct path that reaches it.
//!
//! The number of distinct paths grows exponentially with depth on dense
//! graphs, so the walk stops expanding once [`MAX_TRAVERSAL_PATHS`] paths
//! are collected. Breadth-first order means every path shorter than the
//! one where the cap hit is still returned.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use crate::error::Result;
use crate::traits::graph::GraphStore;
use crate::types::graph::{GraphEntity, GraphRelation, TraversalHit};

/// Upper bound on paths collected by one traversal.
pub const MAX_TRAVERSAL_PATHS: usize = 1_000;

/// Entities reachable from `start_id` within `max_depth` hops.
///
/// The start entity is the first result, at depth 0. Results are ordered
/// by depth, then by name. An unknown start id yields no results; edges
/// to unknown entities are ignored. At most [`MAX_TRAVERSAL_PATHS`]
/// results are returned.
pub async fn traverse<G>(store: &G, start_id: &str, max_depth: usize) -> Result<Vec<TraversalHit>>
where
    G: GraphStore + ?Sized,
{
    let Some(start) = store.entity(start_id).await? else {
        return Ok(Vec::new());
    };

    let mut edges: HashMap<String, Vec<GraphRelation>> = HashMap::new();
    let mut entities: HashMap<String, Option<GraphEntity>> = HashMap::new();

    let mut hits = Vec::new();
    let mut queue = VecDeque::new();
    let mut truncated = false;
    queue.push_back(TraversalHit {
        path: vec![start.id.clone()],
        entity: start,
        depth: 0,
    });

    while let Some(hit) = queue.pop_front() {
        if hit.depth < max_depth {
            if !edges.contains_key(&hit.entity.id) {
                let mut outgoing = store.outgoing(&hit.entity.id).await?;
                outgoing.sort_by(|a, b| {
                    b.weight
                        .partial_cmp(&a.weight)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                edges.insert(hit.entity.id.clone(), outgoing);
            }

            for relation in edges.get(&hit.entity.id).into_iter().flatten() {
                if hit.path.contains(&relation.target_id) {
                    continue;
                }
                if hits.len() + queue.len() + 1 >= MAX_TRAVERSAL_PATHS {
                    truncated = true;
                    break;
                }

                if !entities.contains_key(&relation.target_id) {
                    let target = store.entity(&relation.target_id).await?;
                    entities.insert(relation.target_id.clone(), target);
                }
                let Some(Some(target)) = entities.get(&relation.target_id) else {
                    continue;
                };

                let mut path = hit.path.clone();
                path.push(target.id.clone());
                queue.push_back(TraversalHit {
                    entity: target.clone(),
                    depth: hit.depth + 1,
                    path,
                });
            }
        }
        hits.push(hit);
    }

    if truncated {
        warn!(start_id, max_depth, limit = MAX_TRAVERSAL_PATHS, "Graph traversal truncated");
    }

    hits.sort_by(|a, b| {
        a.depth
            .cmp(&b.depth)
            .then_with(|| a.entity.name.cmp(&b.entity.name))
    });

    debug!(start_id, max_depth, results = hits.len(), "Graph traversal complete");
    Ok(hits)
}
