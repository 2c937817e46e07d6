//! End-to-end sketch: multiplex graph → per-node walks + layer-seeded walks.
//!
//! Point it at a real edge list with
//!
//! ```bash
//! LAYERWALK_EDGELIST=/path/to/edges.txt RUST_LOG=layerwalk=debug \
//!     cargo run --release --example synthetic_multiplex
//! ```
//!
//! Format: `src dst layer_name` per line, undirected, `#` starts a comment. Without it, a
//! seeded synthetic population with five relationship layers is generated.

use layerwalk::{
    generate_layer_seeded_walks, generate_walks_parallel, layer_offset_ids, LayerSeedConfig,
    LayeredGraph, LayeredGraphBuilder, ParallelConfig, UserId, WalkConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const LAYERS: [&str; 5] = ["classmate", "household", "family", "colleague", "neighbor"];
const WALKS_PER_NODE: usize = 5;

fn from_layered_edgelist(path: &Path) -> Result<(LayeredGraph, Vec<UserId>), String> {
    let txt = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

    let mut edges: Vec<(UserId, UserId, String)> = Vec::new();
    for (line_no, line) in txt.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [a, b, layer] = fields[..] else {
            return Err(format!("line {}: expected `src dst layer`", line_no + 1));
        };
        let u: UserId = a
            .parse()
            .map_err(|e| format!("line {}: bad src '{a}': {e}", line_no + 1))?;
        let v: UserId = b
            .parse()
            .map_err(|e| format!("line {}: bad dst '{b}': {e}", line_no + 1))?;
        edges.push((u, v, layer.to_string()));
    }

    let max_user = edges.iter().map(|(u, v, _)| (*u).max(*v)).max().unwrap_or(0);
    let names: Vec<String> = {
        let mut names: Vec<String> = edges.iter().map(|(_, _, l)| l.clone()).collect();
        names.sort();
        names.dedup();
        names
    };
    let ids: BTreeMap<&str, i64> = names
        .iter()
        .map(String::as_str)
        .zip(layer_offset_ids(max_user, names.len()))
        .collect();

    let mut b = LayeredGraphBuilder::new();
    for (u, v, layer) in &edges {
        if u != v {
            b.add_undirected_edge(*u, *v, ids[layer.as_str()]);
        }
    }
    let g = b.build();
    let mut users: Vec<UserId> = g.users().collect();
    users.sort_unstable();
    Ok((g, users))
}

/// Households of 1-5 people, each household also in a family cluster; classmates,
/// colleagues and neighbors are sparse random links, so many people miss those layers.
fn synthetic_population(n: usize, seed: u64) -> (LayeredGraph, Vec<UserId>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let ids = layer_offset_ids(n as i64 - 1, LAYERS.len());
    let [classmate, household, family, colleague, neighbor] = [0, 1, 2, 3, 4].map(|i| ids[i]);
    let mut b = LayeredGraphBuilder::new();

    let mut start = 0usize;
    let mut households: Vec<(usize, usize)> = Vec::new();
    while start < n {
        let end = (start + rng.random_range(1..=5)).min(n);
        for i in start..end {
            b.add_user(i as i64);
            for j in (i + 1)..end {
                b.add_undirected_edge(i as i64, j as i64, household);
            }
        }
        households.push((start, end));
        start = end;
    }
    for pair in households.chunks(2) {
        if let [(a, _), (c, _)] = pair {
            b.add_undirected_edge(*a as i64, *c as i64, family);
        }
    }

    for (layer, links) in [(classmate, n / 3), (colleague, n / 2), (neighbor, n)] {
        for _ in 0..links {
            let u = rng.random_range(0..n) as i64;
            let v = rng.random_range(0..n) as i64;
            if u != v {
                b.add_undirected_edge(u, v, layer);
            }
        }
    }

    let g = b.build();
    // Only people with at least one relationship can start a walk.
    let mut users: Vec<UserId> = g.users().filter(|&u| !g.layers(u).is_empty()).collect();
    users.sort_unstable();
    (g, users)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (g, users) = if let Ok(path) = std::env::var("LAYERWALK_EDGELIST") {
        from_layered_edgelist(Path::new(&path)).expect("failed to load LAYERWALK_EDGELIST")
    } else {
        synthetic_population(20_000, 95359385252)
    };

    #[cfg(any(debug_assertions, feature = "diagnostics"))]
    g.check_integrity().expect("graph has empty adjacency lists");

    let config = WalkConfig { length: 20, ..WalkConfig::default() };
    let parallel = ParallelConfig::interactive();

    let starts: Vec<UserId> = users.repeat(WALKS_PER_NODE);
    let run = generate_walks_parallel(&g, &starts, &config, &parallel).expect("walk generation failed");
    let seeded = generate_layer_seeded_walks(&g, &users, &config, &LayerSeedConfig::default())
        .expect("seeded walk generation failed");

    println!(
        "graph: users={}, layers={}, entries={}",
        g.node_count(),
        g.layer_ids().len(),
        g.entry_count()
    );
    println!(
        "walks: {} from {} start nodes on {} workers, {} ended early",
        run.walks.len(),
        users.len(),
        parallel.n_workers,
        run.truncated
    );
    println!("layer-seeded walks: {}", seeded.len());

    println!();
    println!("first walks:");
    for w in run.walks.iter().take(3).chain(seeded.iter().take(2)) {
        let row: Vec<String> = w.iter().map(i64::to_string).collect();
        println!("  {}", row.join(","));
    }
}
