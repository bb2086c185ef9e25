// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::bounded::solve_bounded;
use super::cancel::CancelToken;
use super::pipeline::{solve_cpp_exact_with, CppSolution};
use super::random::{solve_random, Progress, RandomSolution};
use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::model::{Graph, Path, VertexId};
use crate::query::shortest_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Exact,
    Bounded,
    Random,
    Shortest,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Bounded => "bounded",
            Self::Random => "random",
            Self::Shortest => "shortest",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMethodError {
    value: String,
}

impl fmt::Display for ParseMethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown method '{}' (expected exact, bounded, random or shortest)",
            self.value
        )
    }
}

impl std::error::Error for ParseMethodError {}

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "bounded" => Ok(Self::Bounded),
            "random" => Ok(Self::Random),
            "shortest" => Ok(Self::Shortest),
            _ => Err(ParseMethodError {
                value: value.to_owned(),
            }),
        }
    }
}

/// All solvers behind one configuration and one cancel flag.
///
/// The flag is shared with every clone of [`Solver::cancel_token`]; raising it stops any
/// bounded or random solve in flight.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
    cancel: CancelToken,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn exact(&self, graph: &Graph, start: VertexId, end: VertexId) -> Result<CppSolution, SolveError> {
        solve_cpp_exact_with(graph, start, end, self.config.balance)
    }

    pub fn bounded(&self, graph: &Graph, start: VertexId, end: VertexId) -> Result<Vec<Path>, SolveError> {
        solve_bounded(graph, start, end, self.config.max_depth, &self.cancel)
    }

    pub fn random<F>(
        &self,
        graph: &Graph,
        start: VertexId,
        end: VertexId,
        on_progress: F,
    ) -> Result<RandomSolution, SolveError>
    where
        F: FnMut(Progress) + Send,
    {
        let options = self.config.random_options(self.cancel.clone());
        solve_random(graph, start, end, &options, on_progress)
    }

    pub fn shortest(&self, graph: &Graph, start: VertexId, end: VertexId, reverse: bool) -> Option<Path> {
        shortest_path(graph, start, end, reverse)
    }

    /// Runs `method` and keeps only the resulting walk.
    pub fn solve(
        &self,
        method: Method,
        graph: &Graph,
        start: VertexId,
        end: VertexId,
    ) -> Result<Path, SolveError> {
        match method {
            Method::Exact => self.exact(graph, start, end).map(|solution| solution.path),
            Method::Bounded => self
                .bounded(graph, start, end)?
                .into_iter()
                .next()
                .ok_or(SolveError::Exhausted {
                    max_depth: self.config.max_depth,
                }),
            Method::Random => self
                .random(graph, start, end, |_| {})
                .map(|solution| solution.path),
            Method::Shortest => {
                for vertex in [start, end] {
                    if !graph.contains_vertex(vertex) {
                        return Err(SolveError::UnknownVertex { vertex });
                    }
                }
                self.shortest(graph, start, end, false)
                    .ok_or(SolveError::NotConnected { start, end })
            }
        }
    }
}
