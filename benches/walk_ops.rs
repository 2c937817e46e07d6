//! Benchmarks for layered walk generation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use layerwalk::{
    create_walks, generate_walks_parallel, layer_offset_ids, LayeredGraph, LayeredGraphBuilder,
    ParallelConfig, UserId, WalkConfig,
};
use rand::prelude::*;
use rand::SeedableRng;
use std::hint::black_box;

/// Multiplex graph with one topology per layer:
/// - a ring (every node, degree 2),
/// - a preferential attachment layer (heavy-tailed degrees),
/// - a sparse block layer that leaves many nodes without edges.
fn multiplex(n: usize, seed: u64) -> (LayeredGraph, Vec<UserId>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let layers = layer_offset_ids(n as i64 - 1, 3);
    let mut b = LayeredGraphBuilder::new();

    for i in 0..n {
        b.add_undirected_edge(i as i64, ((i + 1) % n) as i64, layers[0]);
    }

    // Preferential attachment with m = 3, starting from a small clique.
    let m = 3usize;
    let mut targets: Vec<usize> = Vec::new();
    for i in 0..=m {
        for j in (i + 1)..=m {
            b.add_undirected_edge(i as i64, j as i64, layers[1]);
            targets.push(i);
            targets.push(j);
        }
    }
    for v in (m + 1)..n {
        let mut chosen: Vec<usize> = Vec::with_capacity(m);
        while chosen.len() < m {
            let u = targets[rng.random_range(0..targets.len())];
            if u != v && !chosen.contains(&u) {
                chosen.push(u);
            }
        }
        for &u in &chosen {
            b.add_undirected_edge(v as i64, u as i64, layers[1]);
            targets.push(u);
            targets.push(v);
        }
    }

    let blocks = 16usize;
    let bsz = n.div_ceil(blocks);
    for _ in 0..n / 4 {
        let i = rng.random_range(0..n);
        let block = i / bsz;
        let j = (block * bsz + rng.random_range(0..bsz)).min(n - 1);
        if i != j {
            b.add_undirected_edge(i as i64, j as i64, layers[2]);
        }
    }

    let users: Vec<UserId> = (0..n as i64).collect();
    (b.build(), users)
}

fn bench_walk_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("layered_walks");

    for n in [1_000usize, 10_000] {
        let (g, users) = multiplex(n, 123);
        let cfg = WalkConfig { length: 40, p: 0.8, seed: 123 };

        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |b, _| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(cfg.seed);
                let walks = create_walks(black_box(&g), &users, cfg.length, cfg.p, &mut rng)
                    .unwrap();
                black_box(walks);
            })
        });

        for n_workers in [2usize, 8] {
            let parallel = ParallelConfig { n_workers };
            group.bench_with_input(
                BenchmarkId::new(format!("parallel_{n_workers}"), n),
                &n,
                |b, _| {
                    b.iter(|| {
                        let run =
                            generate_walks_parallel(black_box(&g), &users, &cfg, &parallel)
                                .unwrap();
                        black_box(run);
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_walk_generation);
criterion_main!(benches);
