// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ids::{EdgeId, VertexId};

/// One traversal of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub edge: EdgeId,
    pub from: VertexId,
    pub to: VertexId,
    pub weight: f64,
}

impl PathStep {
    /// The same traversal walked the other way.
    pub fn flipped(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            ..self
        }
    }
}

/// An ordered walk: consecutive steps share their joining vertex.
///
/// Edges may repeat. Steps that traverse a balancing duplicate carry the id of the edge they
/// duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    start: VertexId,
    steps: Vec<PathStep>,
    weight: f64,
}

impl Path {
    pub fn empty(start: VertexId) -> Self {
        Self {
            start,
            steps: Vec::new(),
            weight: 0.0,
        }
    }

    pub fn from_steps(start: VertexId, steps: Vec<PathStep>) -> Self {
        let weight = steps.iter().map(|step| step.weight).sum();
        Self {
            start,
            steps,
            weight,
        }
    }

    pub fn push(&mut self, step: PathStep) {
        self.weight += step.weight;
        self.steps.push(step);
    }

    pub fn start(&self) -> VertexId {
        self.start
    }

    pub fn end(&self) -> VertexId {
        self.steps.last().map_or(self.start, |step| step.to)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.steps.iter().map(|step| step.edge).collect()
    }

    /// Visited vertices, starting with [`Path::start`].
    pub fn vertices(&self) -> Vec<VertexId> {
        std::iter::once(self.start)
            .chain(self.steps.iter().map(|step| step.to))
            .collect()
    }

    /// The walk from [`Path::end`] back to [`Path::start`].
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end(),
            steps: self.steps.iter().rev().map(|step| step.flipped()).collect(),
            weight: self.weight,
        }
    }

    pub fn is_contiguous(&self) -> bool {
        let mut at = self.start;
        for step in &self.steps {
            if step.from != at {
                return false;
            }
            at = step.to;
        }
        true
    }

    /// Whether every edge of `edges` is traversed at least once.
    pub fn covers(&self, edges: &BTreeSet<EdgeId>) -> bool {
        let traversed: BTreeSet<EdgeId> = self.steps.iter().map(|step| step.edge).collect();
        edges.is_subset(&traversed)
    }
}
