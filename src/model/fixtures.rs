// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::direction::Direction;
use super::graph::Graph;
use crate::error::GraphError;
#[cfg(test)]
use super::ids::VertexId;

/// A 3x2 block of streets with two one-way segments, used by the CLI `--demo` mode.
///
/// Vertices are numbered row by row starting at 0; the two one-way streets run along the
/// top row.
pub fn demo_graph() -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    let mut ids = Vec::new();
    for (x, y) in [
        (0.0, 0.0),
        (100.0, 0.0),
        (200.0, 0.0),
        (0.0, 80.0),
        (100.0, 80.0),
        (200.0, 80.0),
    ] {
        ids.push(graph.add_vertex(x, y));
    }

    let streets = [
        (0, 1, Direction::From),
        (1, 2, Direction::From),
        (3, 4, Direction::Any),
        (4, 5, Direction::Any),
        (0, 3, Direction::Any),
        (1, 4, Direction::Any),
        (2, 5, Direction::Any),
    ];
    for (a, b, direction) in streets {
        graph.add_edge(ids[a], ids[b], direction)?;
    }

    Ok(graph)
}

#[cfg(test)]
fn vertices(graph: &mut Graph, points: &[(f64, f64)]) -> Vec<VertexId> {
    points.iter().map(|&(x, y)| graph.add_vertex(x, y)).collect()
}

/// Unit square A-B-C-D-A with undirected edges of weight 1.
#[cfg(test)]
pub(crate) fn unit_square() -> (Graph, [VertexId; 4]) {
    let mut graph = Graph::new();
    let v = vertices(
        &mut graph,
        &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
    );
    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
        graph.add_edge(v[a], v[b], Direction::Any).expect("square edge");
    }
    (graph, [v[0], v[1], v[2], v[3]])
}

/// The unit square plus an undirected A-C chord, also of weight 1.
#[cfg(test)]
pub(crate) fn square_with_chord() -> (Graph, [VertexId; 4]) {
    let (mut graph, v) = unit_square();
    graph
        .add_edge_weighted(v[0], v[2], Direction::Any, 1.0)
        .expect("chord");
    (graph, v)
}

/// Directed triangle A->B->C->A plus a second one-way edge A->C, all weight 1.
#[cfg(test)]
pub(crate) fn directed_triangle() -> (Graph, [VertexId; 3]) {
    let mut graph = Graph::new();
    let v = vertices(&mut graph, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
    for (a, b) in [(0, 1), (1, 2), (2, 0), (0, 2)] {
        graph
            .add_edge_weighted(v[a], v[b], Direction::From, 1.0)
            .expect("triangle edge");
    }
    (graph, [v[0], v[1], v[2]])
}

/// The unit square with a spur vertex E whose only edge leaves it (`E -> A`).
#[cfg(test)]
pub(crate) fn square_with_source_spur() -> (Graph, [VertexId; 5]) {
    let (mut graph, v) = unit_square();
    let e = graph.add_vertex(-1.0, 0.0);
    graph
        .add_edge(e, v[0], Direction::From)
        .expect("spur edge");
    (graph, [v[0], v[1], v[2], v[3], e])
}

/// Two separate undirected segments A-B and C-D.
#[cfg(test)]
pub(crate) fn two_islands() -> (Graph, [VertexId; 4]) {
    let mut graph = Graph::new();
    let v = vertices(
        &mut graph,
        &[(0.0, 0.0), (1.0, 0.0), (10.0, 0.0), (11.0, 0.0)],
    );
    graph.add_edge(v[0], v[1], Direction::Any).expect("a-b");
    graph.add_edge(v[2], v[3], Direction::Any).expect("c-d");
    (graph, [v[0], v[1], v[2], v[3]])
}

/// A mixed graph: a square whose top side is one-way (D -> C, written as `To` on C-D) and
/// whose bottom side is one-way A -> B, plus an undirected chord B-D.
#[cfg(test)]
pub(crate) fn mixed_square() -> (Graph, [VertexId; 4]) {
    let mut graph = Graph::new();
    let v = vertices(
        &mut graph,
        &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
    );
    graph.add_edge(v[0], v[1], Direction::From).expect("a->b");
    graph.add_edge(v[1], v[2], Direction::Any).expect("b-c");
    graph.add_edge(v[2], v[3], Direction::To).expect("d->c");
    graph.add_edge(v[3], v[0], Direction::Any).expect("d-a");
    graph.add_edge(v[1], v[3], Direction::Any).expect("b-d");
    (graph, [v[0], v[1], v[2], v[3]])
}

/// One-way edges 0 -> 2, 3 -> 0 and 2 -> 1 with undirected 1-3 and 3-2. An open walk from
/// 0 to 2 is cheapest when 3-2 runs 2 -> 3, which no single improving reversal discovers.
#[cfg(test)]
pub(crate) fn mixed_kite() -> (Graph, [VertexId; 4]) {
    let mut graph = Graph::new();
    let v = vertices(
        &mut graph,
        &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
    );
    for (a, b, direction, weight) in [
        (1, 2, Direction::To, 3.0),
        (3, 0, Direction::From, 1.0),
        (1, 3, Direction::Any, 2.0),
        (3, 2, Direction::Any, 3.0),
        (0, 2, Direction::From, 1.0),
    ] {
        graph
            .add_edge_weighted(v[a], v[b], direction, weight)
            .expect("kite edge");
    }
    (graph, [v[0], v[1], v[2], v[3]])
}

#[cfg(test)]
mod tests {
    use super::demo_graph;
    use crate::model::{Direction, VertexId};
    use crate::query::reachable;

    #[test]
    fn demo_graph_is_one_connected_block() {
        let graph = demo_graph().expect("demo graph");
        assert_eq!(graph.vertices().len(), 6);
        assert_eq!(graph.edges().len(), 7);
        let one_way = graph
            .edges()
            .values()
            .filter(|edge| edge.direction() == Direction::From)
            .count();
        assert_eq!(one_way, 2);

        let reach = reachable(&graph, VertexId::new(0), VertexId::new(5)).expect("reach");
        assert_eq!(reach.edges().len(), 7);
    }
}
