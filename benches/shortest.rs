// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

mod fixtures;
mod profiler;

use postroute::query::{reachable, shortest_path, shortest_path_tree};

// Benchmark identity: `<group>/<case_id>` where case_id is `<shape>_<cols>x<rows>`.
const CASES: &[(&str, fixtures::GridParams)] = &[
    ("undirected_20x20", fixtures::GridParams::undirected(20, 20)),
    ("one_way_20x20", fixtures::GridParams::one_way(20, 20)),
    ("one_way_60x60", fixtures::GridParams::one_way(60, 60)),
];

fn bench_point_to_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest.path");
    group.sample_size(profiler::group_sample_size("shortest.path", 30));

    for (case_id, params) in CASES {
        let grid = fixtures::grid(*params);
        group.throughput(Throughput::Elements(params.edge_count() as u64));
        for reverse in [false, true] {
            let id = if reverse {
                format!("{case_id}_reverse")
            } else {
                (*case_id).to_owned()
            };
            group.bench_function(id, |b| {
                b.iter(|| {
                    let path = shortest_path(
                        black_box(&grid.graph),
                        black_box(grid.corner),
                        black_box(grid.opposite),
                        reverse,
                    )
                    .expect("path");
                    black_box(fixtures::checksum(&path))
                })
            });
        }
    }

    group.finish();
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest.tree");
    group.sample_size(profiler::group_sample_size("shortest.tree", 30));

    for (case_id, params) in CASES {
        let grid = fixtures::grid(*params);
        group.throughput(Throughput::Elements(params.edge_count() as u64));
        group.bench_function(*case_id, |b| {
            b.iter(|| {
                let tree = shortest_path_tree(black_box(&grid.graph), None, grid.corner, false);
                black_box(tree.reached().count())
            })
        });
    }

    group.finish();
}

fn bench_reachable(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest.reachable");
    group.sample_size(profiler::group_sample_size("shortest.reachable", 30));

    for (case_id, params) in CASES {
        let grid = fixtures::grid(*params);
        group.throughput(Throughput::Elements(params.edge_count() as u64));
        group.bench_function(*case_id, |b| {
            b.iter(|| {
                let reach = reachable(black_box(&grid.graph), grid.corner, grid.opposite)
                    .expect("reachable");
                black_box(reach.edges().len())
            })
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = bench_point_to_point, bench_tree, bench_reachable
}
criterion_main!(benches);
