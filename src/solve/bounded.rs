// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use tracing::{debug, info};

use super::cancel::CancelToken;
use super::space::CoverSpace;
use crate::error::SolveError;
use crate::model::{Graph, Path, PathStep, VertexId};
use crate::query::{analyze, reachable};

/// Largest edge count for which covered sets fit the transposition key.
const TABLE_EDGE_LIMIT: usize = 64;

struct SearchState {
    depth_limit: u32,
    counts: Vec<u32>,
    covered: usize,
    covered_mask: u64,
    uncovered_weight: f64,
    steps: Vec<PathStep>,
    best: f64,
    solutions: Vec<Path>,
    use_table: bool,
    // (vertex, covered set) -> cheapest (weight, depth) seen this iteration
    seen: HashMap<(VertexId, u64), (f64, u32)>,
}

impl SearchState {
    fn new(space: &CoverSpace) -> Self {
        Self {
            depth_limit: 0,
            counts: vec![0; space.edge_count()],
            covered: 0,
            covered_mask: 0,
            uncovered_weight: space.edges().iter().map(|edge| edge.weight).sum(),
            steps: Vec::new(),
            best: f64::INFINITY,
            solutions: Vec::new(),
            use_table: space.edge_count() <= TABLE_EDGE_LIMIT,
            seen: HashMap::new(),
        }
    }

    /// Whether an equal or better visit of this state already happened.
    fn dominated(&mut self, at: VertexId, weight: f64, depth: u32) -> bool {
        if !self.use_table {
            return false;
        }
        let key = (at, self.covered_mask);
        if let Some(&(known_weight, known_depth)) = self.seen.get(&key) {
            if known_weight <= weight && known_depth <= depth {
                return true;
            }
        }
        self.seen.insert(key, (weight, depth));
        false
    }
}

fn descend(
    space: &CoverSpace,
    cancel: &CancelToken,
    state: &mut SearchState,
    at: VertexId,
    weight: f64,
) -> Result<(), SolveError> {
    if cancel.is_cancelled() {
        return Err(SolveError::Cancelled);
    }

    if state.covered == space.edge_count() && at == space.end {
        if weight < state.best {
            state.best = weight;
            state
                .solutions
                .push(Path::from_steps(space.start, state.steps.clone()));
        }
        return Ok(());
    }

    let depth = state.steps.len() as u32;
    if depth >= state.depth_limit {
        return Ok(());
    }
    if weight + state.uncovered_weight >= state.best {
        return Ok(());
    }
    if state.dominated(at, weight, depth) {
        return Ok(());
    }

    for &next in space.moves(at) {
        let edge = space.edge(next.index);
        let saved_uncovered = state.uncovered_weight;
        let first_visit = state.counts[next.index] == 0;
        if first_visit {
            state.covered += 1;
            state.uncovered_weight -= edge.weight;
            if state.use_table {
                state.covered_mask |= 1u64 << next.index;
            }
        }
        state.counts[next.index] += 1;
        state.steps.push(space.step(at, next));

        let result = descend(space, cancel, state, next.next, weight + edge.weight);

        state.steps.pop();
        state.counts[next.index] -= 1;
        if first_visit {
            state.covered -= 1;
            state.uncovered_weight = saved_uncovered;
            if state.use_table {
                state.covered_mask &= !(1u64 << next.index);
            }
        }
        result?;
    }
    Ok(())
}

/// Every covering walk found by an iterative-deepening branch-and-bound search, cheapest first.
///
/// Depth limits run from the reachable edge count up to `max_depth`. Deepening stops once no
/// longer walk can beat the best one found: every extra step repeats an edge, so a walk of
/// `k` steps weighs at least the reachable total plus `k - edges` cheapest edge weights.
pub fn solve_bounded(
    graph: &Graph,
    start: VertexId,
    end: VertexId,
    max_depth: u32,
    cancel: &CancelToken,
) -> Result<Vec<Path>, SolveError> {
    let reach = reachable(graph, start, end)?;
    analyze(graph, reach.edges()).check_travelable(start, end)?;

    let space = CoverSpace::new(graph, &reach, start, end);
    let edge_count = u32::try_from(space.edge_count()).unwrap_or(u32::MAX);
    let total_weight: f64 = space.edges().iter().map(|edge| edge.weight).sum();
    let cheapest = space
        .edges()
        .iter()
        .map(|edge| edge.weight)
        .fold(f64::INFINITY, f64::min);

    let mut state = SearchState::new(&space);
    for limit in edge_count..=max_depth {
        state.depth_limit = limit;
        state.seen.clear();
        descend(&space, cancel, &mut state, start, 0.0)?;
        debug!(
            limit,
            solutions = state.solutions.len(),
            best = state.best,
            "bounded search iteration"
        );

        if !state.solutions.is_empty() {
            let floor = total_weight + f64::from(limit.saturating_add(1) - edge_count) * cheapest;
            if floor >= state.best {
                break;
            }
        }
    }

    let mut solutions = state.solutions;
    if solutions.is_empty() {
        return Err(SolveError::Exhausted { max_depth });
    }
    solutions.sort_by(|a, b| a.weight().total_cmp(&b.weight()));
    info!(
        edges = edge_count,
        steps = solutions[0].len(),
        weight = solutions[0].weight(),
        "bounded search finished"
    );
    Ok(solutions)
}

/// The cheapest covering walk within `max_depth` steps.
pub fn solve_cpp_bounded(
    graph: &Graph,
    start: VertexId,
    end: VertexId,
    max_depth: u32,
) -> Result<Path, SolveError> {
    solve_bounded(graph, start, end, max_depth, &CancelToken::new())?
        .into_iter()
        .next()
        .ok_or(SolveError::Exhausted { max_depth })
}
