#[macro_use]
extern crate criterion;

use criterion::{Benchmark, Criterion};

use hospital_solver::config::{SearchConfig, Strategy};
use hospital_solver::{LoadLevel, Solve};

// allowing unused so i can bench just one or few
// and still notice other warnings if there are any
#[allow(unused)]
fn bench_onepush_bfs(c: &mut Criterion) {
    bench_level(c, Strategy::Bfs, "levels/onepush.lvl", 100);
}

#[allow(unused)]
fn bench_twoagents_bfs(c: &mut Criterion) {
    bench_level(c, Strategy::Bfs, "levels/twoagents.lvl", 50);
}

#[allow(unused)]
fn bench_twoagents_astar(c: &mut Criterion) {
    bench_level(c, Strategy::AStar, "levels/twoagents.lvl", 50);
}

#[allow(unused)]
fn bench_swap_exhaustive(c: &mut Criterion) {
    // unsolvable, measures full exploration of the state space
    bench_level(c, Strategy::Bfs, "levels/swap.lvl", 100);
}

fn bench_level(c: &mut Criterion, strategy: Strategy, level_path: &str, samples: usize) {
    let level = level_path.load_level().unwrap();
    let config = SearchConfig { strategy, ..SearchConfig::default() };

    c.bench(
        &format!("{}", strategy),
        Benchmark::new(level_path, move |b| {
            b.iter(|| {
                criterion::black_box(
                    level.solve(criterion::black_box(&config), criterion::black_box(false)),
                )
            })
        })
        .sample_size(samples),
    );
}

criterion_group!(
    benches,
    bench_onepush_bfs,
    bench_twoagents_bfs,
    bench_twoagents_astar,
    bench_swap_exhaustive,
);
criterion_main!(benches);
