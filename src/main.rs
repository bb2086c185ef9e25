// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Postroute CLI entrypoint.
//!
//! Reads a graph snapshot as JSON from stdin (or uses the built-in demo graph with `--demo`),
//! solves it with the selected method and prints the walk as JSON on stdout.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::error::Error;
use std::io::Read;

use postroute::model::{demo_graph, Graph, GraphSnapshot, Path, ShadowEdge, VertexId};
use postroute::{Method, SolveError, Solver, SolverConfig};
use serde::Serialize;
use tracing_subscriber::{prelude::*, EnvFilter};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --start <id> [--end <id>] [--method exact|bounded|random|shortest] [options] < graph.json\n  {program} --demo --start <id> [--end <id>] [--method <method>] [options]\n\nOptions:\n  --max-depth <n>    step limit of the bounded search\n  --iterations <n>   random trials across all workers\n  --workers <n>      worker threads of the random search\n  --seed <n>         base seed of the random search\n  --reverse          walk one-way edges backwards (shortest only)\n\n--end defaults to --start (closed walk). Defaults for the numeric options come from\nPOSTROUTE_MAX_DEPTH, POSTROUTE_ITERATIONS, POSTROUTE_WORKERS and POSTROUTE_SEED."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    start: Option<VertexId>,
    end: Option<VertexId>,
    method: Option<Method>,
    max_depth: Option<u32>,
    iterations: Option<u64>,
    workers: Option<usize>,
    seed: Option<u64>,
    reverse: bool,
}

fn parse_value<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    slot: &Option<T>,
) -> Result<T, ()> {
    if slot.is_some() {
        return Err(());
    }
    let raw = args.next().ok_or(())?;
    raw.trim().parse().map_err(|_| ())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--reverse" => {
                if options.reverse {
                    return Err(());
                }
                options.reverse = true;
            }
            "--start" => options.start = Some(parse_value(&mut args, &options.start)?),
            "--end" => options.end = Some(parse_value(&mut args, &options.end)?),
            "--method" => options.method = Some(parse_value(&mut args, &options.method)?),
            "--max-depth" => options.max_depth = Some(parse_value(&mut args, &options.max_depth)?),
            "--iterations" => {
                options.iterations = Some(parse_value(&mut args, &options.iterations)?);
            }
            "--workers" => options.workers = Some(parse_value(&mut args, &options.workers)?),
            "--seed" => options.seed = Some(parse_value(&mut args, &options.seed)?),
            _ => return Err(()),
        }
    }

    if options.start.is_none() {
        return Err(());
    }

    if options.reverse && options.method != Some(Method::Shortest) {
        return Err(());
    }

    if options.workers == Some(0) || options.iterations == Some(0) || options.max_depth == Some(0) {
        return Err(());
    }

    Ok(options)
}

#[derive(Debug, Serialize)]
struct Report {
    method: Method,
    start: VertexId,
    end: VertexId,
    steps: usize,
    weight: f64,
    path: Path,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    shadows: Vec<ShadowEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trials: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_trials: Option<u64>,
}

impl Report {
    fn new(method: Method, start: VertexId, end: VertexId, path: Path) -> Self {
        Self {
            method,
            start,
            end,
            steps: path.len(),
            weight: path.weight(),
            path,
            shadows: Vec::new(),
            trials: None,
            completed_trials: None,
        }
    }
}

fn read_graph(demo: bool) -> Result<Graph, Box<dyn Error>> {
    if demo {
        return Ok(demo_graph()?);
    }
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    let snapshot: GraphSnapshot = serde_json::from_str(&raw)?;
    Ok(Graph::from_snapshot(&snapshot)?)
}

fn config_for(options: &CliOptions) -> SolverConfig {
    let defaults = SolverConfig::from_env();
    SolverConfig {
        max_depth: options.max_depth.unwrap_or(defaults.max_depth),
        iterations: options.iterations.unwrap_or(defaults.iterations),
        workers: options.workers.unwrap_or(defaults.workers),
        seed: options.seed.unwrap_or(defaults.seed),
        ..defaults
    }
}

fn run(
    solver: &Solver,
    method: Method,
    graph: &Graph,
    start: VertexId,
    end: VertexId,
    reverse: bool,
) -> Result<Report, SolveError> {
    match method {
        Method::Exact => {
            let solution = solver.exact(graph, start, end)?;
            let mut report = Report::new(method, start, end, solution.path);
            report.shadows = solution.shadows;
            Ok(report)
        }
        Method::Random => {
            let solution = solver.random(graph, start, end, |progress| {
                tracing::debug!(
                    worker = progress.worker,
                    completed = progress.completed,
                    total = progress.total,
                    "random search progress"
                );
            })?;
            let mut report = Report::new(method, start, end, solution.path);
            report.trials = Some(solution.trials);
            report.completed_trials = Some(solution.completed);
            Ok(report)
        }
        Method::Shortest if reverse => {
            for vertex in [start, end] {
                if !graph.contains_vertex(vertex) {
                    return Err(SolveError::UnknownVertex { vertex });
                }
            }
            let path = solver
                .shortest(graph, start, end, true)
                .ok_or(SolveError::NotConnected { start, end })?;
            Ok(Report::new(method, start, end, path))
        }
        Method::Bounded | Method::Shortest => {
            let path = solver.solve(method, graph, start, end)?;
            Ok(Report::new(method, start, end, path))
        }
    }
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .init();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "postroute".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let Some(start) = options.start else {
            print_usage(&program);
            std::process::exit(2);
        };
        let end = options.end.unwrap_or(start);

        let graph = read_graph(options.demo)?;
        let solver = Solver::new(config_for(&options));
        let method = options.method.unwrap_or_default();
        let report = run(&solver, method, &graph, start, end, options.reverse)?;

        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("postroute: {err}");
        std::process::exit(1);
    }
}
