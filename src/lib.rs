//! `layerwalk`: layer-switching random walks over multiplex (layered) graphs.
//!
//! A node can be linked to other nodes through several independent relationship
//! layers. A walk follows one layer at a time and, at every step, keeps that
//! layer with probability `p` (when the layer is still usable at the current
//! node) or resamples a layer uniformly from the ones the node has.
//!
//! Walks are emitted as flat integer sequences alternating node and layer ids:
//! `[u0, l1, u1, l2, u2, ...]`.
//!
//! Public invariants (must not drift):
//! - **Read-only graph**: no sampling operation mutates a [`LayeredGraph`]; it is shared by
//!   reference across workers.
//! - **Explicit randomness**: every sampling call takes its RNG as a parameter. Parallel runs
//!   derive one seed per worker, so output is reproducible for a fixed seed and worker count.
//! - **Positional output**: batch results are concatenated in batch order, and walks within a
//!   batch follow the order of its start nodes.
//! - **No silent corruption**: an empty adjacency list is an error, never an early stop.

pub mod graph;
pub mod layer_seeded;
pub mod parallel;
pub mod random_walk;
pub mod sample;

pub use graph::{
    layer_offset_ids, LayerId, LayerIdSet, LayeredGraph, LayeredGraphBuilder, UserId,
    LAYER_ID_OFFSET,
};
pub use layer_seeded::{create_layer_seeded_walks, seeded_walk_len, LayerSeedConfig};
pub use parallel::{
    derive_worker_seeds, generate_layer_seeded_walks, generate_walks_parallel,
    generate_walks_parallel_with_seeds, partition, ParallelConfig, WalkRun,
};
pub use random_walk::{create_walks, full_walk_len, single_walk, Walk, WalkConfig};
pub use sample::sample_one;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("start node {0} has no layer memberships")]
    UnreachableStartNode(UserId),
    #[error("empty adjacency list for user {user} on layer {layer}")]
    EmptyAdjacency { user: UserId, layer: LayerId },
    #[error("layer {0} does not appear in the graph")]
    UnknownLayer(LayerId),
    #[error("no start node in the user list has edges on layer {0}")]
    NoLayerOwner(LayerId),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[cfg(feature = "parallel")]
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
