// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeSet, VecDeque};

use crate::error::SolveError;
use crate::model::{EdgeId, Graph, VertexId};

/// The part of a graph a walk from `start` can touch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reachable {
    vertices: BTreeSet<VertexId>,
    edges: BTreeSet<EdgeId>,
}

impl Reachable {
    pub fn vertices(&self) -> &BTreeSet<VertexId> {
        &self.vertices
    }

    pub fn edges(&self) -> &BTreeSet<EdgeId> {
        &self.edges
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    /// Sum of the weights of all reachable edges: a lower bound for any covering walk.
    pub fn total_weight(&self, graph: &Graph) -> f64 {
        self.edges
            .iter()
            .filter_map(|edge_id| graph.edge(*edge_id))
            .map(|edge| edge.weight())
            .sum()
    }
}

/// Vertices reachable from `start` along travelable edges, `start` included.
///
/// Returns an empty set when `start` is not part of the graph.
pub fn flood_fill(graph: &Graph, start: VertexId) -> BTreeSet<VertexId> {
    let mut visited: BTreeSet<VertexId> = BTreeSet::new();
    if !graph.contains_vertex(start) {
        return visited;
    }

    let mut queue: VecDeque<VertexId> = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(vertex) = queue.pop_front() {
        for edge in graph.options(vertex, false) {
            let Some(next) = edge.other_end(vertex) else {
                continue;
            };
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited
}

/// The sub-graph relevant to a walk from `start` to `end`.
///
/// Edges are the incident edges of every visited vertex, so an edge pointing into the
/// visited region from outside is included (and later rejected by the degree check).
pub fn reachable(graph: &Graph, start: VertexId, end: VertexId) -> Result<Reachable, SolveError> {
    for vertex in [start, end] {
        if !graph.contains_vertex(vertex) {
            return Err(SolveError::UnknownVertex { vertex });
        }
    }

    let vertices = flood_fill(graph, start);
    if !vertices.contains(&end) {
        return Err(SolveError::NotConnected { start, end });
    }

    let edges = vertices
        .iter()
        .flat_map(|vertex| graph.incident(*vertex))
        .map(|edge| edge.id())
        .collect();

    Ok(Reachable { vertices, edges })
}

#[cfg(test)]
mod tests {
    use super::{flood_fill, reachable};
    use crate::error::SolveError;
    use crate::model::fixtures::{square_with_source_spur, two_islands, unit_square};
    use crate::model::{Direction, Graph, VertexId};

    #[test]
    fn flood_fill_includes_start_and_follows_undirected_edges() {
        let (graph, v) = unit_square();
        let visited = flood_fill(&graph, v[0]);
        assert_eq!(visited.into_iter().collect::<Vec<_>>(), v.to_vec());
    }

    #[test]
    fn flood_fill_respects_one_way_edges() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(0.0, 0.0);
        let b = graph.add_vertex(1.0, 0.0);
        let c = graph.add_vertex(2.0, 0.0);
        graph.add_edge(a, b, Direction::From).expect("a->b");
        graph.add_edge(b, c, Direction::To).expect("c->b");

        let from_a = flood_fill(&graph, a);
        assert_eq!(from_a.into_iter().collect::<Vec<_>>(), vec![a, b]);
        let from_c = flood_fill(&graph, c);
        assert_eq!(from_c.into_iter().collect::<Vec<_>>(), vec![b, c]);
    }

    #[test]
    fn flood_fill_of_unknown_vertex_is_empty() {
        let (graph, _) = unit_square();
        assert!(flood_fill(&graph, VertexId::new(404)).is_empty());
    }

    #[test]
    fn reachable_fails_across_islands() {
        let (graph, v) = two_islands();
        assert_eq!(
            reachable(&graph, v[0], v[2]),
            Err(SolveError::NotConnected {
                start: v[0],
                end: v[2]
            })
        );
        let island = reachable(&graph, v[0], v[1]).expect("same island");
        assert_eq!(island.edges().len(), 1);
        assert_eq!(island.vertices().len(), 2);
    }

    #[test]
    fn reachable_rejects_unknown_endpoints() {
        let (graph, v) = unit_square();
        let ghost = VertexId::new(404);
        assert_eq!(
            reachable(&graph, v[0], ghost),
            Err(SolveError::UnknownVertex { vertex: ghost })
        );
    }

    #[test]
    fn reachable_keeps_edges_entering_from_outside() {
        let (graph, v) = square_with_source_spur();
        let reach = reachable(&graph, v[0], v[2]).expect("reachable");

        assert!(!reach.contains_vertex(v[4]));
        assert_eq!(reach.edges().len(), 5);
    }

    #[test]
    fn reachable_is_idempotent() {
        let (graph, v) = square_with_source_spur();
        let first = reachable(&graph, v[1], v[3]).expect("first");
        let second = reachable(&graph, v[1], v[3]).expect("second");
        assert_eq!(first, second);
        assert_eq!(first.total_weight(&graph), second.total_weight(&graph));
    }
}
