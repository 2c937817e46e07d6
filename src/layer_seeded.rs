//! Walks forced to start on a given layer.
//!
//! Per-node walks visit layers roughly in proportion to their edge counts, so sparse layers
//! can be nearly absent from a corpus. Seeding a fixed number of walks on every layer
//! guarantees each one shows up.

use crate::graph::{LayerId, LayeredGraph, UserId};
use crate::random_walk::single_walk;
use crate::{Error, Result, Walk};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerSeedConfig {
    pub walks_per_layer: usize,
}

impl Default for LayerSeedConfig {
    fn default() -> Self {
        Self { walks_per_layer: 1 }
    }
}

/// Token count of a seeded walk that did not end early: the layer token followed by
/// `length` node slots and the layers between them.
pub fn seeded_walk_len(length: usize) -> usize {
    2 * length.max(1)
}

/// `walks_per_layer` walks for every layer in `layer_ids`, each shaped
/// `[layer, u0, l1, u1, ...]` and starting on `layer`.
///
/// The start node is the first user with a list on `layer` in a fresh shuffle of `users`.
/// Output is grouped by layer, in the order of `layer_ids`.
///
/// # Errors
/// - [`Error::UnknownLayer`] if a layer id does not appear in the graph.
/// - [`Error::NoLayerOwner`] if no entry of `users` has a list on that layer.
/// - anything [`single_walk`] returns.
pub fn create_layer_seeded_walks<R, I>(
    graph: &LayeredGraph,
    layer_ids: I,
    users: &[UserId],
    length: usize,
    walks_per_layer: usize,
    p: f64,
    rng: &mut R,
) -> Result<Vec<Walk>>
where
    R: Rng,
    I: IntoIterator<Item = LayerId>,
{
    let target_len = seeded_walk_len(length);
    let mut pool = users.to_vec();
    let mut walks = Vec::new();

    for layer in layer_ids {
        if !graph.layer_ids().contains(&layer) {
            return Err(Error::UnknownLayer(layer));
        }
        for _ in 0..walks_per_layer {
            pool.shuffle(rng);
            let start = pool
                .iter()
                .copied()
                .find(|&u| graph.has_layer(u, layer))
                .ok_or(Error::NoLayerOwner(layer))?;

            let tail = single_walk(graph, start, length.saturating_sub(1), Some(layer), p, rng)?;
            let mut walk = Vec::with_capacity(target_len);
            walk.push(layer);
            walk.extend(tail);
            walk.truncate(target_len);
            walks.push(walk);
        }
    }

    Ok(walks)
}
