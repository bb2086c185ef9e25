// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::balance::{balance, BalanceStrategy};
use super::euler::extract_trail;
use crate::error::SolveError;
use crate::model::{Graph, Path, ShadowEdge, VertexId};
use crate::query::{analyze, reachable};

/// A covering walk together with the duplicates that were needed to make it Eulerian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CppSolution {
    pub path: Path,
    pub shadows: Vec<ShadowEdge>,
}

pub fn solve_cpp_exact(graph: &Graph, start: VertexId, end: VertexId) -> Result<CppSolution, SolveError> {
    solve_cpp_exact_with(graph, start, end, BalanceStrategy::Optimal)
}

/// Reachability, degree check, balancing and trail extraction in one go.
///
/// Optimal for undirected and purely directed graphs, and for mixed graphs with at most
/// [`EXACT_ORIENTATION_LIMIT`](super::balance::EXACT_ORIENTATION_LIMIT) undirected edges.
/// Larger mixed graphs get their undirected edges oriented heuristically; the result is then a
/// valid cover, not necessarily the cheapest.
pub fn solve_cpp_exact_with(
    graph: &Graph,
    start: VertexId,
    end: VertexId,
    strategy: BalanceStrategy,
) -> Result<CppSolution, SolveError> {
    let reach = reachable(graph, start, end)?;
    debug!(
        vertices = reach.vertices().len(),
        edges = reach.edges().len(),
        "reachable sub-graph"
    );

    analyze(graph, reach.edges()).check_travelable(start, end)?;

    let balanced = balance(graph, &reach, start, end, strategy)?;
    debug!(
        work_edges = balanced.edges.len(),
        shadows = balanced.shadows.len(),
        "balanced edge multiset"
    );

    let path = extract_trail(start, end, &balanced.edges)?;
    info!(
        %start,
        %end,
        steps = path.len(),
        weight = path.weight(),
        shadows = balanced.shadows.len(),
        "covering walk found"
    );
    Ok(CppSolution {
        path,
        shadows: balanced.shadows,
    })
}
