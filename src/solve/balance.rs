// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::euler::WorkEdge;
use super::matching::{assignment, greedy_matching, min_weight_perfect_matching};
use crate::error::SolveError;
use crate::model::{Direction, Edge, Graph, Path, ShadowEdge, VertexId};
use crate::query::{odd_vertices, shortest_path_tree, Imbalance, Reachable, ShortestPathTree};

/// How unbalanced vertices are paired before duplicating shortest paths between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStrategy {
    /// Minimum-weight perfect matching (undirected) or optimal assignment (directed).
    #[default]
    Optimal,
    /// Pairs in discovery order (directed) or cheapest-first (undirected).
    Greedy,
}

impl BalanceStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Greedy => "greedy",
        }
    }
}

impl FromStr for BalanceStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "optimal" => Ok(Self::Optimal),
            "greedy" => Ok(Self::Greedy),
            other => Err(format!("unknown balance strategy: {other}")),
        }
    }
}

/// A balanced edge multiset: every reachable edge once, plus duplicated shortest paths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Balanced {
    pub edges: Vec<WorkEdge>,
    pub shadows: Vec<ShadowEdge>,
}

impl Balanced {
    fn duplicate(&mut self, path: &Path, direction: Direction) {
        for step in path.steps() {
            self.shadows.push(ShadowEdge {
                shadow_of: step.edge,
                from: step.from,
                to: step.to,
                direction,
                weight: step.weight,
            });
            self.edges.push(WorkEdge {
                edge: step.edge,
                v1: step.from,
                v2: step.to,
                directed: direction.is_directed(),
                weight: step.weight,
            });
        }
    }
}

/// Duplicates shortest paths until the reachable edges admit a trail from `start` to `end`.
///
/// Fully undirected sub-graphs are balanced by pairing odd vertices. Anything with a one-way
/// edge gets a direction for each undirected edge and is then balanced by pairing surplus with
/// deficit units; shadows there are always one-way. With the optimal strategy and at most
/// [`EXACT_ORIENTATION_LIMIT`] undirected edges every orientation is tried, which makes the
/// result minimal.
pub fn balance(
    graph: &Graph,
    reach: &Reachable,
    start: VertexId,
    end: VertexId,
    strategy: BalanceStrategy,
) -> Result<Balanced, SolveError> {
    let edges: Vec<&Edge> = reach
        .edges()
        .iter()
        .filter_map(|edge_id| graph.edge(*edge_id))
        .collect();

    if edges.iter().all(|edge| !edge.direction().is_directed()) {
        balance_undirected(graph, reach, &edges, start, end, strategy)
    } else {
        balance_directed(graph, reach, &edges, start, end, strategy)
    }
}

fn balance_undirected(
    graph: &Graph,
    reach: &Reachable,
    edges: &[&Edge],
    start: VertexId,
    end: VertexId,
    strategy: BalanceStrategy,
) -> Result<Balanced, SolveError> {
    let mut balanced = Balanced {
        edges: edges
            .iter()
            .map(|edge| WorkEdge {
                edge: edge.id(),
                v1: edge.v1(),
                v2: edge.v2(),
                directed: false,
                weight: edge.weight(),
            })
            .collect(),
        shadows: Vec::new(),
    };

    let odd = odd_vertices(edges.iter().map(|edge| (edge.v1(), edge.v2())), start, end);
    debug!(odd = odd.len(), strategy = strategy.as_str(), "balancing undirected edges");
    if odd.is_empty() {
        return Ok(balanced);
    }

    let trees: Vec<ShortestPathTree> = odd
        .iter()
        .map(|vertex| shortest_path_tree(graph, Some(reach.edges()), *vertex, false))
        .collect();
    let cost: Vec<Vec<f64>> = trees
        .iter()
        .map(|tree| {
            odd.iter()
                .map(|target| tree.distance(*target).unwrap_or(f64::INFINITY))
                .collect()
        })
        .collect();

    let pairs = match strategy {
        BalanceStrategy::Optimal => min_weight_perfect_matching(&cost),
        BalanceStrategy::Greedy => greedy_matching(&cost),
    };
    for (i, j) in pairs {
        let path = trees[i].path_to(odd[j]).ok_or(SolveError::NoBalancingPath {
            from: odd[i],
            to: odd[j],
        })?;
        balanced.duplicate(&path, Direction::Any);
    }
    Ok(balanced)
}

/// Largest number of undirected edges whose orientations are all tried on a mixed graph
/// (`2^n` assignments). Beyond it orientation is heuristic.
pub const EXACT_ORIENTATION_LIMIT: usize = 12;

/// Oriented copy of an edge: `From`/`To` keep their direction, `Any` starts as `v1 -> v2`.
#[derive(Debug, Clone, Copy)]
struct OrientedEdge {
    edge: WorkEdge,
    flexible: bool,
}

impl OrientedEdge {
    fn flip(&mut self) {
        std::mem::swap(&mut self.edge.v1, &mut self.edge.v2);
    }
}

fn orient(edges: &[&Edge]) -> Vec<OrientedEdge> {
    edges
        .iter()
        .map(|edge| {
            let (v1, v2) = match edge.direction() {
                Direction::To => (edge.v2(), edge.v1()),
                Direction::Any | Direction::From => (edge.v1(), edge.v2()),
            };
            OrientedEdge {
                edge: WorkEdge {
                    edge: edge.id(),
                    v1,
                    v2,
                    directed: true,
                    weight: edge.weight(),
                },
                flexible: !edge.direction().is_directed(),
            }
        })
        .collect()
}

/// Finds a chain of flexible arcs `x -> .. -> y` whose reversal lowers the total imbalance.
///
/// Reversing moves two units of excess from `x` to `y`; that helps when `x` has excess to
/// spare and `y` lacks it, and at least one side drops by two.
fn find_reversal(arcs: &[OrientedEdge], imbalance: &Imbalance) -> Option<Vec<usize>> {
    let mut forward: BTreeMap<VertexId, Vec<usize>> = BTreeMap::new();
    for (index, arc) in arcs.iter().enumerate() {
        if arc.flexible && arc.edge.v1 != arc.edge.v2 {
            forward.entry(arc.edge.v1).or_default().push(index);
        }
    }

    for source in imbalance.surplus().into_iter().collect::<BTreeSet<_>>() {
        let source_excess = imbalance.excess(source);
        let mut arrived_by: BTreeMap<VertexId, usize> = BTreeMap::new();
        let mut queue = VecDeque::from([source]);
        let mut seen = BTreeSet::from([source]);

        while let Some(at) = queue.pop_front() {
            let target_excess = imbalance.excess(at);
            if at != source && target_excess <= -1 && (source_excess >= 2 || target_excess <= -2) {
                let mut chain = Vec::new();
                let mut cursor = at;
                while cursor != source {
                    let index = *arrived_by.get(&cursor)?;
                    chain.push(index);
                    cursor = arcs[index].edge.v1;
                }
                return Some(chain);
            }
            for &index in forward.get(&at).map(Vec::as_slice).unwrap_or(&[]) {
                let next = arcs[index].edge.v2;
                if seen.insert(next) {
                    arrived_by.insert(next, index);
                    queue.push_back(next);
                }
            }
        }
    }
    None
}

fn imbalance_of(arcs: &[OrientedEdge], start: VertexId, end: VertexId) -> Imbalance {
    Imbalance::open_trail(arcs.iter().map(|arc| (arc.edge.v1, arc.edge.v2)), start, end)
}

/// Reverses improving chains of flexible arcs until none is left.
fn reorient(arcs: &mut [OrientedEdge], start: VertexId, end: VertexId) -> Imbalance {
    let mut imbalance = imbalance_of(arcs, start, end);
    let initial = imbalance.total();
    while let Some(chain) = find_reversal(arcs, &imbalance) {
        for index in chain {
            arcs[index].flip();
        }
        imbalance = imbalance_of(arcs, start, end);
    }
    debug!(before = initial, after = imbalance.total(), "oriented undirected edges");
    imbalance
}

/// Reverse shortest-path trees over the reachable edges, one per surplus vertex, built on
/// demand and shared by every orientation tried.
struct ReverseTrees<'g> {
    graph: &'g Graph,
    reach: &'g Reachable,
    trees: BTreeMap<VertexId, ShortestPathTree>,
}

impl<'g> ReverseTrees<'g> {
    fn new(graph: &'g Graph, reach: &'g Reachable) -> Self {
        Self {
            graph,
            reach,
            trees: BTreeMap::new(),
        }
    }

    fn prepare(&mut self, targets: &[VertexId]) {
        for target in targets {
            if !self.trees.contains_key(target) {
                let tree = shortest_path_tree(self.graph, Some(self.reach.edges()), *target, true);
                self.trees.insert(*target, tree);
            }
        }
    }

    fn distance(&self, from: VertexId, to: VertexId) -> Option<f64> {
        self.trees.get(&to).and_then(|tree| tree.distance(from))
    }

    /// Forward walk `from -> to`; `to` must have been prepared.
    fn path(&self, from: VertexId, to: VertexId) -> Option<Path> {
        self.trees
            .get(&to)
            .and_then(|tree| tree.path_to(from))
            .map(|path| path.reversed())
    }
}

/// Deficit/surplus pairs to join with duplicated paths, plus their summed distance.
#[derive(Debug, Clone, Default)]
struct Pairing {
    pairs: Vec<(VertexId, VertexId)>,
    cost: f64,
    complete: bool,
}

fn pair_units(
    imbalance: &Imbalance,
    trees: &mut ReverseTrees<'_>,
    strategy: BalanceStrategy,
) -> Pairing {
    let surplus = imbalance.surplus();
    let deficit = imbalance.deficit();
    trees.prepare(&surplus);

    let pairs: Vec<(VertexId, VertexId)> = match strategy {
        BalanceStrategy::Greedy => deficit.iter().copied().zip(surplus.iter().copied()).collect(),
        BalanceStrategy::Optimal => {
            let finite_max = deficit
                .iter()
                .flat_map(|from| surplus.iter().filter_map(|to| trees.distance(*from, *to)))
                .fold(0.0f64, f64::max);
            // Any assignment through a missing path costs more than all real paths together.
            let missing = (finite_max + 1.0) * (deficit.len() as f64 + 1.0);
            let cost: Vec<Vec<f64>> = deficit
                .iter()
                .map(|from| {
                    surplus
                        .iter()
                        .map(|to| trees.distance(*from, *to).unwrap_or(missing))
                        .collect()
                })
                .collect();
            assignment(&cost)
                .into_iter()
                .enumerate()
                .map(|(row, column)| (deficit[row], surplus[column]))
                .collect()
        }
    };

    let mut pairing = Pairing {
        complete: true,
        ..Pairing::default()
    };
    for (from, to) in pairs {
        match trees.distance(from, to) {
            Some(distance) => pairing.cost += distance,
            None => pairing.complete = false,
        }
        pairing.pairs.push((from, to));
    }
    pairing
}

/// Tries every orientation of the flexible arcs and keeps the one with the cheapest
/// balancing. Arcs are left in the winning orientation.
///
/// When no orientation can be balanced, the arcs keep their initial orientation and the
/// returned pairing is incomplete.
fn best_orientation(
    arcs: &mut [OrientedEdge],
    flexible: &[usize],
    start: VertexId,
    end: VertexId,
    trees: &mut ReverseTrees<'_>,
) -> Pairing {
    let mut best: Option<(u32, Pairing)> = None;
    let mut fallback: Option<Pairing> = None;

    for mask in 0..(1u32 << flexible.len()) {
        let mut oriented: Vec<(VertexId, VertexId)> =
            arcs.iter().map(|arc| (arc.edge.v1, arc.edge.v2)).collect();
        for (bit, &index) in flexible.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                let (v1, v2) = oriented[index];
                oriented[index] = (v2, v1);
            }
        }

        let imbalance = Imbalance::open_trail(oriented, start, end);
        let pairing = pair_units(&imbalance, trees, BalanceStrategy::Optimal);
        if !pairing.complete {
            fallback.get_or_insert(pairing);
            continue;
        }
        if best.as_ref().map_or(true, |(_, current)| pairing.cost < current.cost) {
            best = Some((mask, pairing));
        }
    }

    let Some((mask, pairing)) = best else {
        return fallback.unwrap_or_default();
    };
    for (bit, &index) in flexible.iter().enumerate() {
        if mask & (1 << bit) != 0 {
            arcs[index].flip();
        }
    }
    debug!(
        orientations = 1u64 << flexible.len(),
        cost = pairing.cost,
        "chose cheapest orientation"
    );
    pairing
}

fn balance_directed(
    graph: &Graph,
    reach: &Reachable,
    edges: &[&Edge],
    start: VertexId,
    end: VertexId,
    strategy: BalanceStrategy,
) -> Result<Balanced, SolveError> {
    let mut arcs = orient(edges);
    let flexible: Vec<usize> = arcs
        .iter()
        .enumerate()
        .filter(|(_, arc)| arc.flexible && arc.edge.v1 != arc.edge.v2)
        .map(|(index, _)| index)
        .collect();
    let mut trees = ReverseTrees::new(graph, reach);
    debug!(
        flexible = flexible.len(),
        strategy = strategy.as_str(),
        "balancing directed edges"
    );

    let pairing = match strategy {
        BalanceStrategy::Optimal if flexible.len() <= EXACT_ORIENTATION_LIMIT => {
            best_orientation(&mut arcs, &flexible, start, end, &mut trees)
        }
        BalanceStrategy::Optimal => {
            warn!(
                flexible = flexible.len(),
                limit = EXACT_ORIENTATION_LIMIT,
                "too many undirected edges to try every orientation; orienting heuristically"
            );
            let imbalance = reorient(&mut arcs, start, end);
            pair_units(&imbalance, &mut trees, strategy)
        }
        BalanceStrategy::Greedy => {
            let imbalance = reorient(&mut arcs, start, end);
            pair_units(&imbalance, &mut trees, strategy)
        }
    };

    // Shadows walk from a deficit unit (missing a way out) to a surplus unit (missing a way
    // in).
    let mut balanced = Balanced {
        edges: arcs.iter().map(|arc| arc.edge).collect(),
        shadows: Vec::new(),
    };
    for (from, to) in pairing.pairs {
        let path = trees
            .path(from, to)
            .ok_or(SolveError::NoBalancingPath { from, to })?;
        balanced.duplicate(&path, Direction::From);
    }
    Ok(balanced)
}

#[cfg(test)]
mod tests {
    use super::{balance, BalanceStrategy, EXACT_ORIENTATION_LIMIT};
    use crate::error::SolveError;
    use crate::model::fixtures::{
        directed_triangle, mixed_kite, mixed_square, square_with_chord, unit_square,
    };
    use crate::model::{Direction, EdgeId, Graph};
    use crate::query::{reachable, Imbalance};

    #[test]
    fn balanced_square_needs_no_shadows() {
        let (graph, v) = unit_square();
        let reach = reachable(&graph, v[0], v[0]).expect("reach");
        let balanced = balance(&graph, &reach, v[0], v[0], BalanceStrategy::Optimal).expect("ok");
        assert!(balanced.shadows.is_empty());
        assert_eq!(balanced.edges.len(), 4);
    }

    #[test]
    fn closed_chord_square_duplicates_the_chord() {
        let (graph, v) = square_with_chord();
        let reach = reachable(&graph, v[0], v[0]).expect("reach");
        let balanced = balance(&graph, &reach, v[0], v[0], BalanceStrategy::Optimal).expect("ok");
        assert_eq!(balanced.shadows.len(), 1);
        assert_eq!(balanced.shadows[0].shadow_of, EdgeId::new(4));
        assert_eq!(balanced.shadows[0].direction, Direction::Any);
    }

    #[test]
    fn open_chord_square_is_already_balanced() {
        let (graph, v) = square_with_chord();
        let reach = reachable(&graph, v[0], v[2]).expect("reach");
        let balanced = balance(&graph, &reach, v[0], v[2], BalanceStrategy::Optimal).expect("ok");
        assert!(balanced.shadows.is_empty());
    }

    #[test]
    fn directed_triangle_duplicates_the_return_edge() {
        let (graph, v) = directed_triangle();
        let reach = reachable(&graph, v[0], v[0]).expect("reach");
        let balanced = balance(&graph, &reach, v[0], v[0], BalanceStrategy::Optimal).expect("ok");
        assert_eq!(balanced.shadows.len(), 1);
        let shadow = balanced.shadows[0];
        assert_eq!((shadow.from, shadow.to), (v[2], v[0]));
        assert_eq!(shadow.direction, Direction::From);
        assert_eq!(shadow.shadow_of, EdgeId::new(2));
    }

    #[test]
    fn mixed_square_ends_up_balanced() {
        let (graph, v) = mixed_square();
        for strategy in [BalanceStrategy::Optimal, BalanceStrategy::Greedy] {
            let reach = reachable(&graph, v[0], v[0]).expect("reach");
            let balanced = balance(&graph, &reach, v[0], v[0], strategy).expect("ok");
            assert!(balanced.edges.iter().all(|edge| edge.directed));
            let imbalance =
                Imbalance::open_trail(balanced.edges.iter().map(|e| (e.v1, e.v2)), v[0], v[0]);
            assert!(imbalance.is_balanced(), "{strategy:?}");
        }
    }

    #[test]
    fn orientation_alone_can_balance_a_mixed_cycle() {
        // A->B one-way, then B-C and C-A undirected: orienting B->C->A closes the cycle.
        let mut graph = Graph::new();
        let a = graph.add_vertex(0.0, 0.0);
        let b = graph.add_vertex(1.0, 0.0);
        let c = graph.add_vertex(1.0, 1.0);
        graph.add_edge(a, b, Direction::From).expect("a->b");
        graph.add_edge(c, b, Direction::Any).expect("c-b");
        graph.add_edge(a, c, Direction::Any).expect("a-c");
        let reach = reachable(&graph, a, a).expect("reach");
        let balanced = balance(&graph, &reach, a, a, BalanceStrategy::Optimal).expect("ok");
        assert!(balanced.shadows.is_empty());
    }

    #[test]
    fn small_mixed_graphs_try_every_orientation() {
        let (graph, v) = mixed_kite();
        let reach = reachable(&graph, v[0], v[2]).expect("reach");

        let optimal = balance(&graph, &reach, v[0], v[2], BalanceStrategy::Optimal).expect("ok");
        let extra: f64 = optimal.shadows.iter().map(|shadow| shadow.weight).sum();
        assert_eq!(extra, 3.0);
        let imbalance =
            Imbalance::open_trail(optimal.edges.iter().map(|e| (e.v1, e.v2)), v[0], v[2]);
        assert!(imbalance.is_balanced());

        let greedy = balance(&graph, &reach, v[0], v[2], BalanceStrategy::Greedy).expect("ok");
        let greedy_extra: f64 = greedy.shadows.iter().map(|shadow| shadow.weight).sum();
        assert!(greedy_extra >= extra);
    }

    #[test]
    fn large_mixed_graphs_are_oriented_heuristically() {
        // A one-way ring with an undirected ladder of rungs above the enumeration limit.
        let mut graph = Graph::new();
        let rungs = EXACT_ORIENTATION_LIMIT + 2;
        let bottom: Vec<_> = (0..rungs).map(|i| graph.add_vertex(i as f64, 0.0)).collect();
        let top: Vec<_> = (0..rungs).map(|i| graph.add_vertex(i as f64, 1.0)).collect();
        for i in 1..rungs {
            graph.add_edge(bottom[i - 1], bottom[i], Direction::From).expect("bottom");
            graph.add_edge(top[i], top[i - 1], Direction::From).expect("top");
        }
        for i in 0..rungs {
            graph.add_edge(bottom[i], top[i], Direction::Any).expect("rung");
        }

        let start = bottom[0];
        let reach = reachable(&graph, start, start).expect("reach");
        let balanced = balance(&graph, &reach, start, start, BalanceStrategy::Optimal).expect("ok");
        let imbalance =
            Imbalance::open_trail(balanced.edges.iter().map(|e| (e.v1, e.v2)), start, start);
        assert!(imbalance.is_balanced());
    }

    #[test]
    fn missing_balancing_path_is_reported() {
        // A->B and A->C one-way with B-C undirected: C can never get back to A.
        let mut graph = Graph::new();
        let a = graph.add_vertex(0.0, 0.0);
        let b = graph.add_vertex(1.0, 0.0);
        let c = graph.add_vertex(1.0, 1.0);
        graph.add_edge(a, b, Direction::From).expect("a->b");
        graph.add_edge(a, c, Direction::From).expect("a->c");
        graph.add_edge(b, c, Direction::Any).expect("b-c");
        let reach = reachable(&graph, a, a).expect("reach");
        assert!(matches!(
            balance(&graph, &reach, a, a, BalanceStrategy::Optimal),
            Err(SolveError::NoBalancingPath { to, .. }) if to == a
        ));
    }
}
