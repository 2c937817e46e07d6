//! Layer-switching random walks.

use crate::graph::{LayerId, LayeredGraph, UserId};
use crate::sample::sample_one;
use crate::{Error, Result};
use rand::Rng;
use tracing::debug;

/// `[u0, l1, u1, l2, u2, ...]`: start node, then `(layer, node)` pairs, one per step.
pub type Walk = Vec<i64>;

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkConfig {
    /// Requested number of steps per walk.
    pub length: usize,
    /// Jump-retention probability: chance of keeping the current layer at a step,
    /// provided the layer is still available at the current node.
    pub p: f64,
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self { length: 50, p: 0.8, seed: 42 }
    }
}

impl WalkConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.p) {
            return Err(Error::InvalidParameter(format!(
                "retention probability p must be in [0, 1], got {}",
                self.p
            )));
        }
        Ok(())
    }
}

/// Token count of a walk that completed all `length` steps.
pub fn full_walk_len(length: usize) -> usize {
    1 + 2 * length
}

/// Generate one walk of up to `length` steps from `start`.
///
/// The first layer is `start_layer` when given, otherwise sampled from the layers of
/// `start`. At each step one uniform draw in `[0, 1)` decides whether to keep the current
/// layer (`draw <= p`); the layer is also resampled whenever the current node has no list
/// on it, which happens when the node was reached over an edge it does not own.
///
/// A node with no layers at all ends the walk early; the shorter walk is returned.
///
/// # Errors
/// - [`Error::UnreachableStartNode`] if `start` has no layers.
/// - [`Error::EmptyAdjacency`] if a stored neighbor list is empty.
pub fn single_walk<R: Rng>(
    graph: &LayeredGraph,
    start: UserId,
    length: usize,
    start_layer: Option<LayerId>,
    p: f64,
    rng: &mut R,
) -> Result<Walk> {
    let start_layers = graph.layers(start);
    if start_layers.is_empty() {
        return Err(Error::UnreachableStartNode(start));
    }
    let mut layer = match start_layer {
        Some(layer) => layer,
        None => sample_one(start_layers, rng).ok_or(Error::UnreachableStartNode(start))?,
    };

    let mut walk = Vec::with_capacity(full_walk_len(length));
    walk.push(start);
    let mut curr = start;

    for step in 0..length {
        let draw: f64 = rng.random();
        let layers = graph.layers(curr);
        if draw > p || !layers.contains(&layer) {
            match sample_one(layers, rng) {
                Some(next_layer) => layer = next_layer,
                None => {
                    debug!(
                        start,
                        node = curr,
                        completed = step,
                        requested = length,
                        "walk ended early: node has no layers"
                    );
                    break;
                }
            }
        }

        let nbrs = graph.neighbors(curr, layer).unwrap_or(&[]);
        let next = sample_one(nbrs, rng).ok_or(Error::EmptyAdjacency { user: curr, layer })?;
        walk.push(layer);
        walk.push(next);
        curr = next;
    }

    Ok(walk)
}

/// One walk per entry of `users`, in input order.
///
/// Repeat a user in `users` to get several walks from it.
pub fn create_walks<R: Rng>(
    graph: &LayeredGraph,
    users: &[UserId],
    length: usize,
    p: f64,
    rng: &mut R,
) -> Result<Vec<Walk>> {
    users
        .iter()
        .map(|&user| single_walk(graph, user, length, None, p, rng))
        .collect()
}
