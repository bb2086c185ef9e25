// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use crate::error::SolveError;
use crate::model::{EdgeId, Path, PathStep, VertexId};
use crate::query::{odd_vertices, Imbalance};

/// One element of the balanced edge multiset a trail is extracted from.
///
/// A directed work edge is traversed `v1 -> v2` only. Duplicates carry the id of the edge
/// they repeat, so several work edges may share an `edge` id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkEdge {
    pub edge: EdgeId,
    pub v1: VertexId,
    pub v2: VertexId,
    pub directed: bool,
    pub weight: f64,
}

impl WorkEdge {
    fn leave(&self, at: VertexId) -> Option<VertexId> {
        if at == self.v1 {
            Some(self.v2)
        } else if !self.directed && at == self.v2 {
            Some(self.v1)
        } else {
            None
        }
    }
}

fn degrees_admit_trail(start: VertexId, end: VertexId, edges: &[WorkEdge]) -> bool {
    if edges.iter().all(|edge| edge.directed) {
        Imbalance::open_trail(edges.iter().map(|edge| (edge.v1, edge.v2)), start, end).is_balanced()
    } else if edges.iter().all(|edge| !edge.directed) {
        odd_vertices(edges.iter().map(|edge| (edge.v1, edge.v2)), start, end).is_empty()
    } else {
        // Mixed multisets are left to the walk and the checks after it.
        true
    }
}

/// Walks every work edge exactly once from `start` to `end` (iterative Hierholzer).
///
/// Fails with [`SolveError::NoEulerianTrail`] when the multiset does not admit such a trail.
pub fn extract_trail(start: VertexId, end: VertexId, edges: &[WorkEdge]) -> Result<Path, SolveError> {
    let no_trail = SolveError::NoEulerianTrail { start, end };
    if edges.is_empty() {
        return if start == end {
            Ok(Path::empty(start))
        } else {
            Err(no_trail)
        };
    }
    if !degrees_admit_trail(start, end, edges) {
        return Err(no_trail);
    }

    let mut leaving: BTreeMap<VertexId, Vec<usize>> = BTreeMap::new();
    for (index, edge) in edges.iter().enumerate() {
        leaving.entry(edge.v1).or_default().push(index);
        if !edge.directed && edge.v1 != edge.v2 {
            leaving.entry(edge.v2).or_default().push(index);
        }
    }
    let mut cursor: BTreeMap<VertexId, usize> = BTreeMap::new();
    let mut used = vec![false; edges.len()];

    // (vertex, edge used to arrive there)
    let mut stack: Vec<(VertexId, Option<usize>)> = vec![(start, None)];
    let mut trail: Vec<(VertexId, Option<usize>)> = Vec::with_capacity(edges.len() + 1);

    while let Some(&(at, _)) = stack.last() {
        let options = leaving.get(&at).map(Vec::as_slice).unwrap_or(&[]);
        let position = cursor.entry(at).or_insert(0);
        while *position < options.len() && used[options[*position]] {
            *position += 1;
        }

        match options.get(*position).copied() {
            Some(index) => {
                used[index] = true;
                let next = edges[index].leave(at).ok_or_else(|| no_trail.clone())?;
                stack.push((next, Some(index)));
            }
            None => {
                if let Some(done) = stack.pop() {
                    trail.push(done);
                }
            }
        }
    }
    trail.reverse();

    let mut path = Path::empty(start);
    for pair in trail.windows(2) {
        let (from, _) = pair[0];
        let (to, arrived_by) = pair[1];
        let index = arrived_by.ok_or_else(|| no_trail.clone())?;
        path.push(PathStep {
            edge: edges[index].edge,
            from,
            to,
            weight: edges[index].weight,
        });
    }

    let complete = path.len() == edges.len() && used.iter().all(|hit| *hit);
    if !complete || !path.is_contiguous() || path.start() != start || path.end() != end {
        return Err(no_trail);
    }
    Ok(path)
}
