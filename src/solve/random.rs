// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::mpsc::{self, Sender};
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use super::cancel::CancelToken;
use super::space::CoverSpace;
use crate::error::SolveError;
use crate::model::{Graph, Path, VertexId};
use crate::query::{analyze, reachable};

const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Trial counter of one worker, sent at roughly one-percent steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub worker: usize,
    pub completed: u64,
    pub total: u64,
}

#[derive(Debug, Clone)]
pub struct RandomOptions {
    /// Trials across all workers; rounded up to a multiple of `workers`.
    pub iterations: u64,
    pub workers: usize,
    pub seed: u64,
    /// A trial gives up after this many steps per reachable edge.
    pub max_steps_per_edge: usize,
    pub cancel: CancelToken,
}

impl Default for RandomOptions {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            workers: thread::available_parallelism().map_or(1, usize::from),
            seed: 0x5EED,
            max_steps_per_edge: 1_000,
            cancel: CancelToken::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RandomSolution {
    pub path: Path,
    /// Trials started across all workers.
    pub trials: u64,
    /// Trials that ended in a covering walk.
    pub completed: u64,
}

#[derive(Debug, Default)]
struct WorkerOutcome {
    best: Option<Path>,
    trials: u64,
    completed: u64,
}

/// One random walk: uniformly random admissible edges until every edge is covered and the
/// walk stands at the end vertex.
fn run_trial(space: &CoverSpace, rng: &mut StdRng, step_cap: usize) -> Option<Path> {
    let mut visited = vec![false; space.edge_count()];
    let mut covered = 0usize;
    let mut path = Path::empty(space.start);
    let mut at = space.start;

    while covered < space.edge_count() || at != space.end {
        if path.len() >= step_cap {
            return None;
        }
        let moves = space.moves(at);
        if moves.is_empty() {
            return None;
        }
        let next = moves[rng.gen_range(0..moves.len())];
        if !visited[next.index] {
            visited[next.index] = true;
            covered += 1;
        }
        path.push(space.step(at, next));
        at = next.next;
    }
    Some(path)
}

fn run_worker(
    space: &CoverSpace,
    options: &RandomOptions,
    worker: usize,
    trials: u64,
    progress: &Sender<Progress>,
) -> WorkerOutcome {
    let mut rng = StdRng::seed_from_u64(options.seed ^ (worker as u64).wrapping_mul(SEED_STRIDE));
    let step_cap = options
        .max_steps_per_edge
        .saturating_mul(space.edge_count());
    let chunk = (trials / 100).max(1);
    let mut outcome = WorkerOutcome::default();

    for _ in 0..trials {
        if options.cancel.is_cancelled() {
            break;
        }
        outcome.trials += 1;
        if let Some(path) = run_trial(space, &mut rng, step_cap) {
            outcome.completed += 1;
            if outcome
                .best
                .as_ref()
                .map_or(true, |best| path.weight() < best.weight())
            {
                outcome.best = Some(path);
            }
        }
        if outcome.trials % chunk == 0 || outcome.trials == trials {
            // The receiver only goes away once every worker has finished.
            let _ = progress.send(Progress {
                worker,
                completed: outcome.trials,
                total: trials,
            });
        }
    }

    debug!(
        worker,
        trials = outcome.trials,
        completed = outcome.completed,
        best = outcome.best.as_ref().map(Path::weight),
        "random worker finished"
    );
    outcome
}

/// Best of many random covering walks, run on a dedicated pool of `options.workers` threads.
///
/// `on_progress` runs on a coordinator thread for every progress message. When cancelled the
/// best walk found so far is returned, or [`SolveError::Cancelled`] if there is none.
pub fn solve_random<F>(
    graph: &Graph,
    start: VertexId,
    end: VertexId,
    options: &RandomOptions,
    mut on_progress: F,
) -> Result<RandomSolution, SolveError>
where
    F: FnMut(Progress) + Send,
{
    let reach = reachable(graph, start, end)?;
    analyze(graph, reach.edges()).check_travelable(start, end)?;
    let space = CoverSpace::new(graph, &reach, start, end);

    let workers = options.workers.max(1);
    let per_worker = options.iterations.saturating_add(workers as u64 - 1) / workers as u64;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("postroute-random-{index}"))
        .build()
        .map_err(|err| SolveError::WorkerPool(err.to_string()))?;

    let (sender, receiver) = mpsc::channel::<Progress>();
    let outcomes: Vec<WorkerOutcome> = thread::scope(|scope| {
        let forwarder = scope.spawn(move || {
            for progress in receiver {
                on_progress(progress);
            }
        });

        let outcomes = pool.install(|| {
            (0..workers)
                .into_par_iter()
                .map_with(sender, |sender, worker| {
                    run_worker(&space, options, worker, per_worker, sender)
                })
                .collect::<Vec<_>>()
        });

        if let Err(panic) = forwarder.join() {
            std::panic::resume_unwind(panic);
        }
        outcomes
    });

    let trials: u64 = outcomes.iter().map(|outcome| outcome.trials).sum();
    let completed: u64 = outcomes.iter().map(|outcome| outcome.completed).sum();
    let mut candidates: Vec<Path> = outcomes.into_iter().filter_map(|outcome| outcome.best).collect();
    candidates.sort_by(|a, b| a.weight().total_cmp(&b.weight()).then(a.len().cmp(&b.len())));

    match candidates.into_iter().next() {
        Some(path) => {
            info!(
                workers,
                trials,
                completed,
                steps = path.len(),
                weight = path.weight(),
                "random search finished"
            );
            Ok(RandomSolution {
                path,
                trials,
                completed,
            })
        }
        None if options.cancel.is_cancelled() => Err(SolveError::Cancelled),
        None => Err(SolveError::NoCompletedTrial { trials }),
    }
}

/// Cheapest covering walk out of `iterations` random trials on `workers` threads.
pub fn solve_cpp_random<F>(
    graph: &Graph,
    start: VertexId,
    end: VertexId,
    iterations: u64,
    workers: usize,
    on_progress: F,
) -> Result<Path, SolveError>
where
    F: FnMut(Progress) + Send,
{
    let options = RandomOptions {
        iterations,
        workers,
        ..RandomOptions::default()
    };
    solve_random(graph, start, end, &options, on_progress).map(|solution| solution.path)
}
