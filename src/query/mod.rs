// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over a graph.
//!
//! Queries derive views (reachable sub-graph, shortest paths, degree balance) that the
//! solvers build on. None of them mutate the graph.

pub mod degree;
pub mod reach;
pub mod shortest;

pub use degree::{analyze, odd_vertices, DegreeTable, Imbalance, VertexDegree};
pub use reach::{flood_fill, reachable, Reachable};
pub use shortest::{shortest_path, shortest_path_tree, shortest_path_within, ShortestPathTree};
