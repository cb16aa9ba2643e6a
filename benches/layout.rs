use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use sysviz::config::{ArchitectureConfig, WorkflowConfig};
use sysviz::layout::{compute_architecture_layout, compute_workflow_layout};
use sysviz::model::{ReadinessStatus, SelectionState, SystemNode, TestAsset};

/// Balanced tree: `branching ^ depth` leaves, no assets.
fn synthetic_tree(depth: usize, branching: usize, prefix: &str) -> SystemNode {
    let subsystems = if depth == 0 {
        Vec::new()
    } else {
        (0..branching)
            .map(|i| synthetic_tree(depth - 1, branching, &format!("{prefix}-{i}")))
            .collect()
    };
    SystemNode {
        id: prefix.to_string(),
        name: format!("System {prefix}"),
        owner: None,
        status: ReadinessStatus::NotMade,
        test_assets: Vec::new(),
        subsystems,
    }
}

/// Layered DAG: `layers` ranks of `width` assets, each depending on every
/// asset of the previous rank.
fn synthetic_dag(layers: usize, width: usize) -> SystemNode {
    let mut assets = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for slot in 0..width {
            let depends_on = if layer == 0 {
                Vec::new()
            } else {
                (0..width)
                    .map(|prev| format!("A-{}-{}", layer - 1, prev))
                    .collect()
            };
            assets.push(TestAsset {
                id: format!("A-{layer}-{slot}"),
                name: format!("Asset {layer}/{slot}"),
                description: String::new(),
                status: ReadinessStatus::InProgress,
                depends_on,
                owner: None,
            });
        }
    }
    SystemNode {
        id: "BENCH".to_string(),
        name: "Bench".to_string(),
        owner: None,
        status: ReadinessStatus::InProgress,
        test_assets: assets,
        subsystems: Vec::new(),
    }
}

fn bench_architecture(c: &mut Criterion) {
    let mut group = c.benchmark_group("architecture_layout");
    let config = ArchitectureConfig::default();
    let selection = SelectionState::default();
    for (name, depth, branching) in [("shallow", 3, 3), ("deep", 6, 2), ("wide", 2, 12)] {
        let root = synthetic_tree(depth, branching, "S");
        let expanded = root.all_ids();
        group.bench_with_input(BenchmarkId::from_parameter(name), &root, |b, root| {
            b.iter(|| {
                black_box(compute_architecture_layout(
                    black_box(root),
                    &expanded,
                    &selection,
                    &config,
                ))
            });
        });
    }
    group.finish();
}

fn bench_workflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("workflow_layout");
    let config = WorkflowConfig::default();
    let selection = SelectionState::default();
    for (name, layers, width) in [("chain", 40, 1), ("ladder", 10, 8), ("bus", 4, 40)] {
        let system = synthetic_dag(layers, width);
        group.bench_with_input(BenchmarkId::from_parameter(name), &system, |b, system| {
            b.iter(|| {
                black_box(
                    compute_workflow_layout(black_box(system), &selection, &config).unwrap(),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_architecture, bench_workflow);
criterion_main!(benches);
