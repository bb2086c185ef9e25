// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use crate::model::{EdgeId, Graph, PathStep, VertexId};
use crate::query::Reachable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CoverEdge {
    pub(crate) id: EdgeId,
    pub(crate) weight: f64,
}

/// An admissible move: traverse edge `index` and arrive at `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Move {
    pub(crate) index: usize,
    pub(crate) next: VertexId,
}

/// The reachable edges of a graph, densely indexed, with the moves open at every vertex.
///
/// Moves are ordered by ascending weight, then by edge id.
#[derive(Debug, Clone)]
pub(crate) struct CoverSpace {
    pub(crate) start: VertexId,
    pub(crate) end: VertexId,
    edges: Vec<CoverEdge>,
    moves: BTreeMap<VertexId, Vec<Move>>,
}

impl CoverSpace {
    pub(crate) fn new(graph: &Graph, reach: &Reachable, start: VertexId, end: VertexId) -> Self {
        let mut index_of: BTreeMap<EdgeId, usize> = BTreeMap::new();
        let mut edges = Vec::with_capacity(reach.edges().len());
        for edge in reach.edges().iter().filter_map(|edge_id| graph.edge(*edge_id)) {
            index_of.insert(edge.id(), edges.len());
            edges.push(CoverEdge {
                id: edge.id(),
                weight: edge.weight(),
            });
        }

        let mut moves: BTreeMap<VertexId, Vec<Move>> = BTreeMap::new();
        for &vertex in reach.vertices() {
            let mut open: Vec<Move> = graph
                .options(vertex, false)
                .filter_map(|edge| {
                    let index = *index_of.get(&edge.id())?;
                    let next = edge.other_end(vertex)?;
                    Some(Move { index, next })
                })
                .collect();
            open.sort_by(|a, b| {
                edges[a.index]
                    .weight
                    .total_cmp(&edges[b.index].weight)
                    .then(edges[a.index].id.cmp(&edges[b.index].id))
            });
            moves.insert(vertex, open);
        }

        Self {
            start,
            end,
            edges,
            moves,
        }
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn edge(&self, index: usize) -> CoverEdge {
        self.edges[index]
    }

    pub(crate) fn edges(&self) -> &[CoverEdge] {
        &self.edges
    }

    pub(crate) fn moves(&self, at: VertexId) -> &[Move] {
        self.moves.get(&at).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn step(&self, at: VertexId, next: Move) -> PathStep {
        let edge = self.edges[next.index];
        PathStep {
            edge: edge.id,
            from: at,
            to: next.next,
            weight: edge.weight,
        }
    }
}
