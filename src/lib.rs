// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Postroute: covering walks over weighted mixed graphs (the Chinese Postman Problem).
//!
//! A [`model::Graph`] holds vertices and edges that are undirected or one-way. The solvers in
//! [`solve`] compute a walk from a start vertex to an end vertex that traverses every edge
//! reachable from the start at least once, at minimum (or near-minimum) total weight.

pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod solve;

pub use config::SolverConfig;
pub use error::{GraphError, SolveError};
pub use query::{reachable, shortest_path};
pub use solve::{solve_cpp_bounded, solve_cpp_exact, solve_cpp_random, Method, Solver};
