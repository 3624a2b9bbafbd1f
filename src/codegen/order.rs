//! # Order Calculation
//!
//! Assigns every bubble reachable from Start an `order` used to lay out the
//! emitted script. The walk goes over connections, not bubbles: each
//! connection is followed at most once, which bounds the walk on cyclic
//! graphs. Locked bubbles keep their order and the walk continues from it.

use std::collections::HashSet;

use crate::error::Result;
use crate::graph::{ConnectionId, Scene, Uid};

/// Order the whole scene from its Start bubble.
///
/// Start itself is pinned to order 0 unless locked. Returns the number of
/// connections traversed.
pub fn compute_order(scene: &mut Scene) -> Result<usize> {
    let start = scene.start_mut()?;
    if !start.locked {
        start.order = 0;
    }
    let start_uid = start.uid;

    let first = scene.links(start_uid).first().map(|connection| connection.id);
    let traversed = match first {
        Some(id) => calculate_order(scene, id, 0),
        None => 0,
    };

    tracing::debug!("[ORDER] {}: traversed {} connection(s)", scene.name(), traversed);
    Ok(traversed)
}

/// Walk from `start`, assigning `order` to its target and `order + 1` onwards.
///
/// Uses an explicit stack that visits connections in the same pre-order a
/// recursive walk would.
pub fn calculate_order(scene: &mut Scene, start: ConnectionId, order: i64) -> usize {
    let mut processed: HashSet<ConnectionId> = HashSet::new();
    let mut pending = vec![(start, order)];

    while let Some((id, order)) = pending.pop() {
        if !processed.insert(id) {
            continue;
        }

        let Some(target) = scene.connection(id).map(|connection| connection.to) else {
            continue;
        };
        let Some(bubble) = scene.bubble_mut(target) else {
            continue;
        };

        let order = if bubble.locked {
            bubble.order
        } else {
            bubble.order = order;
            order
        };
        tracing::trace!("[ORDER] {} via {} -> order {}", target, id, order);

        let links: Vec<ConnectionId> = scene.links(target).iter().map(|connection| connection.id).collect();
        pending.extend(links.into_iter().rev().map(|link| (link, order + 1)));
    }

    processed.len()
}

/// Bubbles sorted for emission: ascending order, Start first among equals,
/// then ascending UID.
pub fn emission_sequence(scene: &Scene) -> Vec<Uid> {
    let mut bubbles: Vec<_> = scene.bubbles().iter().collect();
    bubbles.sort_by_key(|bubble| (bubble.order, !bubble.is_start(), bubble.uid));
    bubbles.into_iter().map(|bubble| bubble.uid).collect()
}
