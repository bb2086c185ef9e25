// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Covering-walk solvers.
//!
//! - [`solve_cpp_exact`]: balance the reachable edges, then extract an Eulerian trail.
//! - [`solve_cpp_bounded`]: exhaustive branch-and-bound search up to a step limit.
//! - [`solve_cpp_random`]: best of many random walks on a worker pool.
//!
//! [`Solver`] bundles all of them behind one configuration and cancel flag.

pub mod balance;
pub mod bounded;
pub mod cancel;
pub mod euler;
pub mod matching;
pub mod pipeline;
pub mod random;
pub mod solver;
mod space;

pub use balance::{balance, BalanceStrategy, Balanced};
pub use bounded::{solve_bounded, solve_cpp_bounded};
pub use cancel::CancelToken;
pub use euler::{extract_trail, WorkEdge};
pub use pipeline::{solve_cpp_exact, solve_cpp_exact_with, CppSolution};
pub use random::{solve_cpp_random, solve_random, Progress, RandomOptions, RandomSolution};
pub use solver::{Method, ParseMethodError, Solver};
