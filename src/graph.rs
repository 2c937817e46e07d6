//! Layered (multiplex) adjacency index.
//!
//! Two levels: a hash map from user to a small per-node layer table, and for each
//! `(user, layer)` pair a contiguous neighbor slice. The per-node table keeps layer ids
//! and neighbor lists in matching positions, sorted by layer id, so the set of
//! layers at a node is a borrowed slice that can be sampled from directly.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

/// Node identifier.
pub type UserId = i64;

/// Layer identifier. Upstream allocates these disjoint from [`UserId`]s.
pub type LayerId = i64;

/// Every layer id that owns at least one non-empty adjacency list.
pub type LayerIdSet = BTreeSet<LayerId>;

/// Gap between the largest user id and the first layer id in [`layer_offset_ids`].
pub const LAYER_ID_OFFSET: i64 = 5;

/// Allocate `n_layers` layer ids that cannot collide with any user id `<= max_user_id`.
///
/// Layer `i` gets `max_user_id + LAYER_ID_OFFSET + i`, which keeps node and layer tokens
/// in one integer vocabulary without overlap.
pub fn layer_offset_ids(max_user_id: UserId, n_layers: usize) -> Vec<LayerId> {
    (0..n_layers as i64)
        .map(|i| max_user_id + LAYER_ID_OFFSET + i)
        .collect()
}

#[derive(Debug, Clone, Default)]
struct NodeLayers {
    layers: SmallVec<[LayerId; 4]>,
    adjacency: SmallVec<[Box<[UserId]>; 4]>,
}

impl NodeLayers {
    fn from_sorted(lists: impl IntoIterator<Item = (LayerId, Vec<UserId>)>) -> Self {
        let mut node = Self::default();
        for (layer, nbrs) in lists {
            node.layers.push(layer);
            node.adjacency.push(nbrs.into_boxed_slice());
        }
        node
    }

    fn position(&self, layer: LayerId) -> Option<usize> {
        self.layers.binary_search(&layer).ok()
    }
}

/// Read-only multiplex graph.
///
/// Built once through [`LayeredGraphBuilder`] or [`LayeredGraph::from_adjacency`]; there is
/// no mutation API afterwards, so a `&LayeredGraph` can be shared across worker threads.
#[derive(Debug, Clone, Default)]
pub struct LayeredGraph {
    nodes: FxHashMap<UserId, NodeLayers>,
    layer_ids: LayerIdSet,
}

impl LayeredGraph {
    /// Wrap a loader's nested `user -> layer -> neighbors` map as given.
    ///
    /// Unlike the builder, empty lists are kept: they violate the graph invariant and are
    /// reported by [`LayeredGraph::check_integrity`] or, at sampling time, by
    /// [`crate::Error::EmptyAdjacency`].
    pub fn from_adjacency<I, L>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (UserId, L)>,
        L: IntoIterator<Item = (LayerId, Vec<UserId>)>,
    {
        let mut nodes = FxHashMap::default();
        let mut layer_ids = LayerIdSet::new();
        for (user, lists) in adjacency {
            // Sort by layer id so layer order (and thus seeded output) does not depend on the
            // caller's map iteration order.
            let sorted: BTreeMap<LayerId, Vec<UserId>> = lists.into_iter().collect();
            layer_ids.extend(
                sorted
                    .iter()
                    .filter(|(_, nbrs)| !nbrs.is_empty())
                    .map(|(&layer, _)| layer),
            );
            nodes.insert(user, NodeLayers::from_sorted(sorted));
        }
        Self { nodes, layer_ids }
    }

    /// Number of registered users, including users without any layer.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.nodes.contains_key(&user)
    }

    /// Registered users, in unspecified order.
    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.nodes.keys().copied()
    }

    /// Layers on which `user` has an adjacency list, sorted by id.
    ///
    /// Unknown users have no layers.
    pub fn layers(&self, user: UserId) -> &[LayerId] {
        self.nodes
            .get(&user)
            .map(|n| n.layers.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_layer(&self, user: UserId, layer: LayerId) -> bool {
        self.nodes
            .get(&user)
            .is_some_and(|n| n.position(layer).is_some())
    }

    /// Neighbors of `user` on `layer`, or `None` if the pair has no entry.
    pub fn neighbors(&self, user: UserId, layer: LayerId) -> Option<&[UserId]> {
        let node = self.nodes.get(&user)?;
        let i = node.position(layer)?;
        Some(&node.adjacency[i])
    }

    pub fn layer_ids(&self) -> &LayerIdSet {
        &self.layer_ids
    }

    /// Total number of stored `(user, layer, neighbor)` entries.
    pub fn entry_count(&self) -> usize {
        self.nodes
            .values()
            .flat_map(|n| n.adjacency.iter())
            .map(|nbrs| nbrs.len())
            .sum()
    }

    /// Scan the whole structure for empty adjacency lists.
    ///
    /// This is a data-corruption guard for loaders, compiled only with `debug_assertions`
    /// or the `diagnostics` feature.
    #[cfg(any(debug_assertions, feature = "diagnostics"))]
    pub fn check_integrity(&self) -> crate::Result<()> {
        for (&user, node) in &self.nodes {
            for (&layer, nbrs) in node.layers.iter().zip(node.adjacency.iter()) {
                if nbrs.is_empty() {
                    return Err(crate::Error::EmptyAdjacency { user, layer });
                }
            }
        }
        Ok(())
    }
}

/// Incremental construction of a [`LayeredGraph`].
///
/// Empty neighbor lists are never stored: adding no neighbors only registers the user.
#[derive(Debug, Clone, Default)]
pub struct LayeredGraphBuilder {
    nodes: FxHashMap<UserId, BTreeMap<LayerId, Vec<UserId>>>,
}

impl LayeredGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, possibly without any layer.
    pub fn add_user(&mut self, user: UserId) -> &mut Self {
        self.nodes.entry(user).or_default();
        self
    }

    /// Append `neighbors` to the list of `user` on `layer`.
    pub fn add_neighbors(
        &mut self,
        user: UserId,
        layer: LayerId,
        neighbors: impl IntoIterator<Item = UserId>,
    ) -> &mut Self {
        let lists = self.nodes.entry(user).or_default();
        let mut neighbors = neighbors.into_iter().peekable();
        if neighbors.peek().is_some() {
            lists.entry(layer).or_default().extend(neighbors);
        }
        self
    }

    /// Add `a -- b` on `layer` in both directions.
    pub fn add_undirected_edge(&mut self, a: UserId, b: UserId, layer: LayerId) -> &mut Self {
        self.add_neighbors(a, layer, [b]);
        self.add_neighbors(b, layer, [a]);
        self
    }

    pub fn build(self) -> LayeredGraph {
        LayeredGraph::from_adjacency(self.nodes)
    }
}
