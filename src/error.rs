// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Error types shared by the model and the solvers.

use crate::model::{EdgeId, VertexId};

/// Rejected graph construction (building from a snapshot or adding elements).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("vertex {vertex} does not exist")]
    UnknownVertex { vertex: VertexId },
    #[error("vertex id {vertex} is already taken")]
    DuplicateVertex { vertex: VertexId },
    #[error("edge id {edge} is already taken")]
    DuplicateEdge { edge: EdgeId },
    #[error("edge {edge} has invalid weight {weight} (must be finite and non-negative)")]
    InvalidWeight { edge: EdgeId, weight: f64 },
    #[error("vertex {vertex} has a non-finite position")]
    InvalidPosition { vertex: VertexId },
}

/// Why a solve produced no path.
///
/// No solver ever returns a partial path alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("vertex {vertex} is not part of the graph")]
    UnknownVertex { vertex: VertexId },
    #[error("end vertex {end} is not reachable from start vertex {start}")]
    NotConnected { start: VertexId, end: VertexId },
    /// A vertex of the relevant sub-graph can never be entered or never be left.
    #[error(
        "vertex {vertex} cannot be part of a covering walk (in-degree {in_degree}, out-degree {out_degree})"
    )]
    UnreachableVertex {
        vertex: VertexId,
        in_degree: u64,
        out_degree: u64,
    },
    #[error("no path from vertex {from} to vertex {to} to balance the graph with")]
    NoBalancingPath { from: VertexId, to: VertexId },
    /// The balanced edge multiset is inconsistent; this points at a balancing bug.
    #[error("balanced edge set admits no eulerian trail from {start} to {end}")]
    NoEulerianTrail { start: VertexId, end: VertexId },
    #[error("no covering walk found up to depth {max_depth}")]
    Exhausted { max_depth: u32 },
    #[error("none of {trials} random trials produced a covering walk")]
    NoCompletedTrial { trials: u64 },
    #[error("solve cancelled")]
    Cancelled,
    #[error("cannot start worker pool: {0}")]
    WorkerPool(String),
}
