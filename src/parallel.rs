//! Batch orchestration: split start nodes into contiguous batches, walk each batch on its
//! own worker with its own RNG, and concatenate the results in batch order.
//!
//! Workers share only `&LayeredGraph`. With the `parallel` feature the batches run on a
//! dedicated rayon pool sized to the worker count; without it they run one after another
//! on the calling thread. Seeds are per batch, so both paths produce the same walks.

use crate::graph::{LayeredGraph, UserId};
use crate::layer_seeded::{create_layer_seeded_walks, LayerSeedConfig};
use crate::random_walk::{create_walks, full_walk_len, Walk, WalkConfig};
use crate::{Error, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::num::NonZeroUsize;
use tracing::{info, trace};

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelConfig {
    /// Number of batches, and of workers running them.
    pub n_workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self { n_workers: available_cores() }
    }
}

impl ParallelConfig {
    /// Half the available cores, leaving room for an interactive session.
    pub fn interactive() -> Self {
        Self { n_workers: (available_cores() / 2).max(1) }
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_workers == 0 {
            return Err(Error::InvalidParameter("n_workers must be at least 1".into()));
        }
        Ok(())
    }
}

fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct WalkRun {
    pub walks: Vec<Walk>,
    /// Walks that stopped before the requested length because they hit a node without layers.
    pub truncated: usize,
}

/// Split `users` into `n_workers` contiguous batches of `len / n_workers` entries; the last
/// batch also takes the remainder.
///
/// When there are fewer users than workers, every batch but the last is empty.
pub fn partition(users: &[UserId], n_workers: usize) -> Result<Vec<&[UserId]>> {
    if n_workers == 0 {
        return Err(Error::InvalidParameter("n_workers must be at least 1".into()));
    }
    let size = users.len() / n_workers;
    let mut batches = Vec::with_capacity(n_workers);
    for i in 0..n_workers - 1 {
        batches.push(&users[i * size..(i + 1) * size]);
    }
    batches.push(&users[(n_workers - 1) * size..]);
    Ok(batches)
}

fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}

/// One seed per worker, derived from a run seed.
pub fn derive_worker_seeds(seed: u64, n_workers: usize) -> Vec<u64> {
    (0..n_workers as u64).map(|i| mix64(seed ^ i)).collect()
}

/// Walk every entry of `users` across `parallel.n_workers` workers.
///
/// Output is reproducible for a fixed `(config.seed, n_workers)`.
pub fn generate_walks_parallel(
    graph: &LayeredGraph,
    users: &[UserId],
    config: &WalkConfig,
    parallel: &ParallelConfig,
) -> Result<WalkRun> {
    parallel.validate()?;
    let seeds = derive_worker_seeds(config.seed, parallel.n_workers);
    generate_walks_parallel_with_seeds(graph, users, config, &seeds)
}

/// Like [`generate_walks_parallel`], with one explicit seed per worker.
///
/// `seeds.len()` is the worker count. `config.seed` is ignored.
///
/// # Errors
/// The first error of any batch fails the whole run; no partial output is returned.
pub fn generate_walks_parallel_with_seeds(
    graph: &LayeredGraph,
    users: &[UserId],
    config: &WalkConfig,
    seeds: &[u64],
) -> Result<WalkRun> {
    config.validate()?;
    let batches = partition(users, seeds.len())?;
    info!(
        users = users.len(),
        workers = batches.len(),
        length = config.length,
        p = config.p,
        "generating walks"
    );

    let walks: Vec<Walk> = run_batches(graph, &batches, seeds, config)?
        .into_iter()
        .flatten()
        .collect();

    let full = full_walk_len(config.length);
    let truncated = walks.iter().filter(|w| w.len() < full).count();
    info!(walks = walks.len(), truncated, "walk generation finished");
    Ok(WalkRun { walks, truncated })
}

#[cfg(feature = "parallel")]
fn run_batches(
    graph: &LayeredGraph,
    batches: &[&[UserId]],
    seeds: &[u64],
    config: &WalkConfig,
) -> Result<Vec<Vec<Walk>>> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(batches.len())
        .thread_name(|i| format!("layerwalk-{i}"))
        .build()?;
    pool.install(|| {
        batches
            .par_iter()
            .zip(seeds.par_iter())
            .enumerate()
            .map(|(i, (batch, &seed))| run_batch(graph, i, batch, seed, config))
            .collect()
    })
}

#[cfg(not(feature = "parallel"))]
fn run_batches(
    graph: &LayeredGraph,
    batches: &[&[UserId]],
    seeds: &[u64],
    config: &WalkConfig,
) -> Result<Vec<Vec<Walk>>> {
    batches
        .iter()
        .zip(seeds.iter())
        .enumerate()
        .map(|(i, (batch, &seed))| run_batch(graph, i, batch, seed, config))
        .collect()
}

fn run_batch(
    graph: &LayeredGraph,
    index: usize,
    batch: &[UserId],
    seed: u64,
    config: &WalkConfig,
) -> Result<Vec<Walk>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let walks = create_walks(graph, batch, config.length, config.p, &mut rng)?;
    trace!(batch = index, walks = walks.len(), "batch finished");
    Ok(walks)
}

/// Seeded walks over every layer of `graph`, starting from nodes in `users`.
///
/// Runs on the calling thread: the layer set is small next to the node set.
pub fn generate_layer_seeded_walks(
    graph: &LayeredGraph,
    users: &[UserId],
    config: &WalkConfig,
    seeding: &LayerSeedConfig,
) -> Result<Vec<Walk>> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let walks = create_layer_seeded_walks(
        graph,
        graph.layer_ids().iter().copied(),
        users,
        config.length,
        seeding.walks_per_layer,
        config.p,
        &mut rng,
    )?;
    info!(
        layers = graph.layer_ids().len(),
        walks = walks.len(),
        "layer-seeded walks finished"
    );
    Ok(walks)
}
