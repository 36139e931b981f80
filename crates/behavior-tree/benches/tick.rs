//! Build and tick throughput for a wide, shallow tree.
//!
//! The tree is a selector over 63 sequences of 64 always-succeeding leaves,
//! so every tick walks one full sequence and stops at the selector's first
//! child.
//!
//! ## Usage
//!
//! ```bash
//! cargo bench --package behavior-tree --bench tick
//! open target/criterion/report/index.html
//! ```

use behavior_tree::{BehaviorTree, NodeIndex, Status, TreeConfig, action_fn};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const MAX_CHILDREN: usize = 64;

fn horizontal_shape(width: usize) -> (usize, usize) {
    let sequences = width - 1;
    let nodes = sequences * (width + 1) + 1;
    let edges = sequences * width + sequences;
    (nodes, edges)
}

/// Builds the horizontal tree into a fresh tree sized for it.
fn build_horizontal(width: usize) -> BehaviorTree<()> {
    let (nodes, edges) = horizontal_shape(width);
    let mut tree = BehaviorTree::new(TreeConfig::for_shape(nodes, edges));

    let mut sequences: Vec<NodeIndex> = Vec::with_capacity(width - 1);
    let mut leaves: Vec<NodeIndex> = Vec::with_capacity(width);
    for _ in 0..width - 1 {
        leaves.clear();
        for _ in 0..width {
            leaves.push(tree.action(action_fn(|_: &mut ()| Status::Success)));
        }
        sequences.push(tree.sequence(&leaves));
    }
    tree.selector(&sequences);
    tree
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("horizontal_tick");
    for width in [8, 32, MAX_CHILDREN] {
        let mut tree = build_horizontal(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| black_box(tree.tick(&mut ())))
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("horizontal_build");
    for width in [8, 32, MAX_CHILDREN] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| black_box(build_horizontal(width)))
        });
    }
    group.finish();
}

/// Rebuilding into an existing tree after `clear` reuses the arena instead
/// of allocating a new one.
fn bench_rebuild(c: &mut Criterion) {
    let mut tree = build_horizontal(MAX_CHILDREN);
    c.bench_function("horizontal_rebuild_after_clear", |b| {
        b.iter(|| {
            tree.clear();
            let mut sequences = Vec::with_capacity(MAX_CHILDREN - 1);
            for _ in 0..MAX_CHILDREN - 1 {
                let leaves: Vec<_> = (0..MAX_CHILDREN)
                    .map(|_| tree.action(action_fn(|_: &mut ()| Status::Success)))
                    .collect();
                sequences.push(tree.sequence(&leaves));
            }
            black_box(tree.selector(&sequences))
        })
    });
}

criterion_group!(benches, bench_tick, bench_build, bench_rebuild);
criterion_main!(benches);
