// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::ids::{EdgeId, VertexId};
use crate::error::GraphError;

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    id: VertexId,
    x: f64,
    y: f64,
    edges: Vec<EdgeId>,
}

impl Vertex {
    fn new(id: VertexId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            edges: Vec::new(),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Incident edges in insertion order. A self-loop is listed once.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    v1: VertexId,
    v2: VertexId,
    direction: Direction,
    weight: f64,
    shadow_of: Option<EdgeId>,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn v1(&self) -> VertexId {
        self.v1
    }

    pub fn v2(&self) -> VertexId {
        self.v2
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The edge this one duplicates, if it was committed from a balancing run.
    pub fn shadow_of(&self) -> Option<EdgeId> {
        self.shadow_of
    }

    pub fn is_loop(&self) -> bool {
        self.v1 == self.v2
    }

    pub fn can_travel(&self, at: VertexId) -> bool {
        self.direction.can_leave(self.v1, self.v2, at, false)
    }

    pub fn can_travel_with(&self, at: VertexId, reverse: bool) -> bool {
        self.direction.can_leave(self.v1, self.v2, at, reverse)
    }

    pub fn can_enter(&self, at: VertexId) -> bool {
        self.direction.can_enter(self.v1, self.v2, at)
    }

    /// The endpoint opposite `at`, or `None` when `at` is not an endpoint.
    pub fn other_end(&self, at: VertexId) -> Option<VertexId> {
        if at == self.v1 {
            Some(self.v2)
        } else if at == self.v2 {
            Some(self.v1)
        } else {
            None
        }
    }
}

/// A synthetic duplicate of an existing edge, produced while balancing a graph.
///
/// Shadows only live inside a solve call. [`Graph::commit_shadows`] turns them into real
/// edges when the caller asks for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowEdge {
    pub shadow_of: EdgeId,
    pub from: VertexId,
    pub to: VertexId,
    pub direction: Direction,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: VertexId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub v1: VertexId,
    pub v2: VertexId,
    #[serde(default)]
    pub direction: Direction,
    /// Explicit weight; the Euclidean endpoint distance is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_of: Option<EdgeId>,
}

/// Plain interchange form of a graph, as owned and persisted by the editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub vertices: Vec<VertexRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    vertices: BTreeMap<VertexId, Vertex>,
    edges: BTreeMap<EdgeId, Edge>,
    next_vertex_id: u64,
    next_edge_id: u64,
}

pub fn euclidean(a: &Vertex, b: &Vertex) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for vertex in &snapshot.vertices {
            graph.add_vertex_with_id(vertex.id, vertex.x, vertex.y)?;
        }
        for edge in &snapshot.edges {
            graph.insert_edge(
                edge.id,
                edge.v1,
                edge.v2,
                edge.direction,
                edge.weight,
                edge.shadow_of,
            )?;
        }
        Ok(graph)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            vertices: self
                .vertices
                .values()
                .map(|vertex| VertexRecord {
                    id: vertex.id,
                    x: vertex.x,
                    y: vertex.y,
                })
                .collect(),
            edges: self
                .edges
                .values()
                .map(|edge| EdgeRecord {
                    id: edge.id,
                    v1: edge.v1,
                    v2: edge.v2,
                    direction: edge.direction,
                    weight: Some(edge.weight),
                    shadow_of: edge.shadow_of,
                })
                .collect(),
        }
    }

    pub fn vertices(&self) -> &BTreeMap<VertexId, Vertex> {
        &self.vertices
    }

    pub fn edges(&self) -> &BTreeMap<EdgeId, Edge> {
        &self.edges
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Edges touching `vertex`, in insertion order.
    pub fn incident(&self, vertex: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.vertices
            .get(&vertex)
            .into_iter()
            .flat_map(|v| v.edges.iter())
            .filter_map(|edge_id| self.edges.get(edge_id))
    }

    /// Edges that may be left from `vertex` (with the direction predicate inverted when
    /// `reverse` is set).
    pub fn options(&self, vertex: VertexId, reverse: bool) -> impl Iterator<Item = &Edge> + '_ {
        self.incident(vertex)
            .filter(move |edge| edge.can_travel_with(vertex, reverse))
    }

    pub fn add_vertex(&mut self, x: f64, y: f64) -> VertexId {
        let id = VertexId::new(self.next_vertex_id);
        self.vertices.insert(id, Vertex::new(id, x, y));
        self.next_vertex_id = self.next_vertex_id.saturating_add(1);
        id
    }

    pub fn add_vertex_with_id(&mut self, id: VertexId, x: f64, y: f64) -> Result<VertexId, GraphError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GraphError::InvalidPosition { vertex: id });
        }
        if self.vertices.contains_key(&id) {
            return Err(GraphError::DuplicateVertex { vertex: id });
        }
        self.vertices.insert(id, Vertex::new(id, x, y));
        self.next_vertex_id = self.next_vertex_id.max(id.get().saturating_add(1));
        Ok(id)
    }

    /// Adds an edge weighted by the Euclidean distance of its endpoints.
    pub fn add_edge(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        direction: Direction,
    ) -> Result<EdgeId, GraphError> {
        let id = EdgeId::new(self.next_edge_id);
        self.insert_edge(id, v1, v2, direction, None, None)
    }

    pub fn add_edge_weighted(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        direction: Direction,
        weight: f64,
    ) -> Result<EdgeId, GraphError> {
        let id = EdgeId::new(self.next_edge_id);
        self.insert_edge(id, v1, v2, direction, Some(weight), None)
    }

    pub fn add_edge_with_id(
        &mut self,
        id: EdgeId,
        v1: VertexId,
        v2: VertexId,
        direction: Direction,
        weight: Option<f64>,
    ) -> Result<EdgeId, GraphError> {
        self.insert_edge(id, v1, v2, direction, weight, None)
    }

    /// Inserts balancing duplicates as real edges, returning their new ids.
    ///
    /// Each committed edge keeps the weight of its shadow and points back at the edge it
    /// duplicates through `shadow_of`.
    pub fn commit_shadows(&mut self, shadows: &[ShadowEdge]) -> Result<Vec<EdgeId>, GraphError> {
        let mut committed = Vec::with_capacity(shadows.len());
        for shadow in shadows {
            let id = EdgeId::new(self.next_edge_id);
            committed.push(self.insert_edge(
                id,
                shadow.from,
                shadow.to,
                shadow.direction,
                Some(shadow.weight),
                Some(shadow.shadow_of),
            )?);
        }
        Ok(committed)
    }

    fn insert_edge(
        &mut self,
        id: EdgeId,
        v1: VertexId,
        v2: VertexId,
        direction: Direction,
        weight: Option<f64>,
        shadow_of: Option<EdgeId>,
    ) -> Result<EdgeId, GraphError> {
        if self.edges.contains_key(&id) {
            return Err(GraphError::DuplicateEdge { edge: id });
        }
        let a = self
            .vertices
            .get(&v1)
            .ok_or(GraphError::UnknownVertex { vertex: v1 })?;
        let b = self
            .vertices
            .get(&v2)
            .ok_or(GraphError::UnknownVertex { vertex: v2 })?;

        let weight = weight.unwrap_or_else(|| euclidean(a, b));
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight { edge: id, weight });
        }

        self.edges.insert(
            id,
            Edge {
                id,
                v1,
                v2,
                direction,
                weight,
                shadow_of,
            },
        );
        if let Some(vertex) = self.vertices.get_mut(&v1) {
            vertex.edges.push(id);
        }
        if v1 != v2 {
            if let Some(vertex) = self.vertices.get_mut(&v2) {
                vertex.edges.push(id);
            }
        }
        self.next_edge_id = self.next_edge_id.max(id.get().saturating_add(1));
        Ok(id)
    }
}
