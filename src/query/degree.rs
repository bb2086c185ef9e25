// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SolveError;
use crate::model::{EdgeId, Graph, VertexId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexDegree {
    pub in_degree: u64,
    pub out_degree: u64,
}

impl VertexDegree {
    /// `out - in`.
    pub fn imbalance(self) -> i64 {
        self.out_degree as i64 - self.in_degree as i64
    }
}

/// In/out degrees of every endpoint of an edge set, as permitted by edge directions.
///
/// An undirected edge counts toward both degrees at both of its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DegreeTable {
    degrees: BTreeMap<VertexId, VertexDegree>,
}

impl DegreeTable {
    pub fn get(&self, vertex: VertexId) -> VertexDegree {
        self.degrees.get(&vertex).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, VertexDegree)> + '_ {
        self.degrees.iter().map(|(vertex, degree)| (*vertex, *degree))
    }

    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Fails on the first vertex a covering walk could never enter or never leave.
    ///
    /// The start of an open walk needs no way in and its end needs no way out.
    pub fn check_travelable(&self, start: VertexId, end: VertexId) -> Result<(), SolveError> {
        let open = start != end;
        for (vertex, degree) in self.iter() {
            let stuck_outside = degree.in_degree == 0 && !(open && vertex == start);
            let stuck_inside = degree.out_degree == 0 && !(open && vertex == end);
            if stuck_outside || stuck_inside {
                return Err(SolveError::UnreachableVertex {
                    vertex,
                    in_degree: degree.in_degree,
                    out_degree: degree.out_degree,
                });
            }
        }
        Ok(())
    }
}

pub fn analyze(graph: &Graph, edges: &BTreeSet<EdgeId>) -> DegreeTable {
    let mut degrees: BTreeMap<VertexId, VertexDegree> = BTreeMap::new();
    for edge in edges.iter().filter_map(|edge_id| graph.edge(*edge_id)) {
        let far_end = (!edge.is_loop()).then_some(edge.v2());
        for at in std::iter::once(edge.v1()).chain(far_end) {
            let degree = degrees.entry(at).or_default();
            if edge.can_travel(at) {
                degree.out_degree = degree.out_degree.saturating_add(1);
            }
            if edge.can_enter(at) {
                degree.in_degree = degree.in_degree.saturating_add(1);
            }
        }
    }
    DegreeTable { degrees }
}

/// Per-vertex excess of an oriented edge multiset relative to a trail from `start` to `end`.
///
/// Excess is `out - in`, minus one at the start and plus one at the end of an open trail, so
/// a multiset admits the trail exactly when every excess is zero (and it is connected).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Imbalance {
    excess: BTreeMap<VertexId, i64>,
}

impl Imbalance {
    pub fn open_trail(
        arcs: impl IntoIterator<Item = (VertexId, VertexId)>,
        start: VertexId,
        end: VertexId,
    ) -> Self {
        let mut excess: BTreeMap<VertexId, i64> = BTreeMap::new();
        for (from, to) in arcs {
            *excess.entry(from).or_default() += 1;
            *excess.entry(to).or_default() -= 1;
        }
        if start != end {
            *excess.entry(start).or_default() -= 1;
            *excess.entry(end).or_default() += 1;
        }
        excess.retain(|_, value| *value != 0);
        Self { excess }
    }

    pub fn excess(&self, vertex: VertexId) -> i64 {
        self.excess.get(&vertex).copied().unwrap_or(0)
    }

    /// Vertices short of incoming arcs, repeated once per missing arc.
    pub fn surplus(&self) -> Vec<VertexId> {
        self.excess
            .iter()
            .filter(|(_, value)| **value > 0)
            .flat_map(|(vertex, value)| std::iter::repeat(*vertex).take(*value as usize))
            .collect()
    }

    /// Vertices short of outgoing arcs, repeated once per missing arc.
    pub fn deficit(&self) -> Vec<VertexId> {
        self.excess
            .iter()
            .filter(|(_, value)| **value < 0)
            .flat_map(|(vertex, value)| std::iter::repeat(*vertex).take(value.unsigned_abs() as usize))
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.excess.values().map(|value| value.unsigned_abs()).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.excess.is_empty()
    }
}

/// Vertices whose degree parity is wrong for an undirected trail from `start` to `end`.
///
/// Self-loops add two to a degree and never change parity.
pub fn odd_vertices(
    edges: impl IntoIterator<Item = (VertexId, VertexId)>,
    start: VertexId,
    end: VertexId,
) -> Vec<VertexId> {
    let mut odd: BTreeSet<VertexId> = BTreeSet::new();
    let mut toggle = |vertex: VertexId| {
        if !odd.remove(&vertex) {
            odd.insert(vertex);
        }
    };
    for (v1, v2) in edges {
        if v1 != v2 {
            toggle(v1);
            toggle(v2);
        }
    }
    if start != end {
        toggle(start);
        toggle(end);
    }
    odd.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{analyze, odd_vertices, Imbalance, VertexDegree};
    use crate::error::SolveError;
    use crate::model::fixtures::{
        directed_triangle, square_with_chord, square_with_source_spur, unit_square,
    };
    use crate::model::{Direction, EdgeId, Graph};

    fn all_edges(graph: &Graph) -> BTreeSet<EdgeId> {
        graph.edges().keys().copied().collect()
    }

    #[test]
    fn undirected_edges_count_both_ways() {
        let (graph, v) = unit_square();
        let table = analyze(&graph, &all_edges(&graph));
        for vertex in v {
            assert_eq!(
                table.get(vertex),
                VertexDegree {
                    in_degree: 2,
                    out_degree: 2
                }
            );
        }
        assert!(table.check_travelable(v[0], v[0]).is_ok());
    }

    #[test]
    fn one_way_edges_count_at_tail_and_head() {
        let (graph, v) = directed_triangle();
        let table = analyze(&graph, &all_edges(&graph));
        assert_eq!(table.get(v[0]).imbalance(), 1);
        assert_eq!(table.get(v[1]).imbalance(), 0);
        assert_eq!(table.get(v[2]).imbalance(), -1);
    }

    #[test]
    fn source_spur_is_untravelable() {
        let (graph, v) = square_with_source_spur();
        let table = analyze(&graph, &all_edges(&graph));
        assert_eq!(
            table.check_travelable(v[0], v[0]),
            Err(SolveError::UnreachableVertex {
                vertex: v[4],
                in_degree: 0,
                out_degree: 1
            })
        );
        // A walk that starts on the spur may leave it without returning.
        assert!(table.check_travelable(v[4], v[0]).is_ok());
    }

    #[test]
    fn sink_is_allowed_only_as_open_end() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(0.0, 0.0);
        let b = graph.add_vertex(1.0, 0.0);
        graph.add_edge(a, b, Direction::From).expect("a->b");
        let table = analyze(&graph, &all_edges(&graph));
        assert!(table.check_travelable(a, b).is_ok());
        assert!(matches!(
            table.check_travelable(a, a),
            Err(SolveError::UnreachableVertex { .. })
        ));
    }

    #[test]
    fn imbalance_reserves_trail_endpoints() {
        let (_, v) = unit_square();
        let path_arcs = [(v[0], v[1]), (v[1], v[2])];
        let open = Imbalance::open_trail(path_arcs, v[0], v[2]);
        assert!(open.is_balanced());

        let closed = Imbalance::open_trail(path_arcs, v[0], v[0]);
        assert_eq!(closed.surplus(), vec![v[0]]);
        assert_eq!(closed.deficit(), vec![v[2]]);
        assert_eq!(closed.total(), 2);
    }

    #[test]
    fn surplus_and_deficit_repeat_per_unit() {
        let (_, v) = unit_square();
        let arcs = [(v[0], v[1]), (v[0], v[2]), (v[3], v[1]), (v[3], v[2])];
        let imbalance = Imbalance::open_trail(arcs, v[0], v[0]);
        assert_eq!(imbalance.surplus(), vec![v[0], v[0], v[3], v[3]]);
        assert_eq!(imbalance.deficit(), vec![v[1], v[1], v[2], v[2]]);
        assert_eq!(imbalance.excess(v[1]), -2);
    }

    #[test]
    fn odd_vertices_toggle_open_endpoints() {
        let (graph, v) = square_with_chord();
        let endpoints: Vec<_> = graph.edges().values().map(|e| (e.v1(), e.v2())).collect();
        assert_eq!(
            odd_vertices(endpoints.iter().copied(), v[0], v[0]),
            vec![v[0], v[2]]
        );
        assert!(odd_vertices(endpoints.iter().copied(), v[0], v[2]).is_empty());
        assert_eq!(
            odd_vertices(endpoints.iter().copied(), v[1], v[3]),
            vec![v[0], v[1], v[2], v[3]]
        );
    }
}
