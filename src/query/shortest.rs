// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::model::{EdgeId, Graph, Path, PathStep, VertexId};

/// Heap key: cumulative weight under a total order. Weights are finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source shortest paths, as produced by a full Dijkstra run.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    source: VertexId,
    reverse: bool,
    distances: BTreeMap<VertexId, f64>,
    previous: BTreeMap<VertexId, PathStep>,
}

impl ShortestPathTree {
    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    pub fn distance(&self, target: VertexId) -> Option<f64> {
        self.distances.get(&target).copied()
    }

    /// The walk from the source to `target` (backwards along edges for a reverse tree).
    pub fn path_to(&self, target: VertexId) -> Option<Path> {
        if !self.distances.contains_key(&target) {
            return None;
        }

        let mut steps = Vec::new();
        let mut at = target;
        while at != self.source {
            let step = self.previous.get(&at)?;
            steps.push(*step);
            at = step.from;
        }
        steps.reverse();
        Some(Path::from_steps(self.source, steps))
    }

    pub fn reached(&self) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.distances.iter().map(|(vertex, cost)| (*vertex, *cost))
    }
}

fn dijkstra(
    graph: &Graph,
    within: Option<&BTreeSet<EdgeId>>,
    source: VertexId,
    target: Option<VertexId>,
    reverse: bool,
) -> ShortestPathTree {
    let mut tree = ShortestPathTree {
        source,
        reverse,
        distances: BTreeMap::new(),
        previous: BTreeMap::new(),
    };
    if !graph.contains_vertex(source) {
        return tree;
    }

    let mut settled: BTreeSet<VertexId> = BTreeSet::new();
    // Sequence numbers make equal costs pop in discovery order.
    let mut sequence: u64 = 0;
    let mut heap: BinaryHeap<Reverse<(Cost, u64, VertexId)>> = BinaryHeap::new();

    tree.distances.insert(source, 0.0);
    heap.push(Reverse((Cost(0.0), sequence, source)));

    while let Some(Reverse((Cost(cost), _, vertex))) = heap.pop() {
        if !settled.insert(vertex) {
            continue;
        }
        if target == Some(vertex) {
            break;
        }

        for edge in graph.options(vertex, reverse) {
            if within.is_some_and(|within| !within.contains(&edge.id())) {
                continue;
            }
            let Some(next) = edge.other_end(vertex) else {
                continue;
            };
            if settled.contains(&next) {
                continue;
            }

            let next_cost = cost + edge.weight();
            let improves = tree
                .distances
                .get(&next)
                .map_or(true, |known| next_cost < *known);
            if !improves {
                continue;
            }

            tree.distances.insert(next, next_cost);
            tree.previous.insert(
                next,
                PathStep {
                    edge: edge.id(),
                    from: vertex,
                    to: next,
                    weight: edge.weight(),
                },
            );
            sequence += 1;
            heap.push(Reverse((Cost(next_cost), sequence, next)));
        }
    }

    tree
}

/// Shortest paths from `source` to every vertex it reaches, optionally restricted to an
/// edge subset.
pub fn shortest_path_tree(
    graph: &Graph,
    within: Option<&BTreeSet<EdgeId>>,
    source: VertexId,
    reverse: bool,
) -> ShortestPathTree {
    dijkstra(graph, within, source, None, reverse)
}

/// Minimum-weight walk from `start` to `end` that respects edge directions.
///
/// With `reverse` set the direction predicate is inverted and the returned steps walk
/// backwards along one-way edges; [`Path::reversed`] turns that into the forward walk from
/// `end` to `start`.
pub fn shortest_path(graph: &Graph, start: VertexId, end: VertexId, reverse: bool) -> Option<Path> {
    dijkstra(graph, None, start, Some(end), reverse).path_to(end)
}

pub fn shortest_path_within(
    graph: &Graph,
    within: &BTreeSet<EdgeId>,
    start: VertexId,
    end: VertexId,
    reverse: bool,
) -> Option<Path> {
    dijkstra(graph, Some(within), start, Some(end), reverse).path_to(end)
}
