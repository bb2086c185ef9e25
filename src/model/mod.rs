// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Graph snapshot types.
//!
//! A graph holds vertices with positions and edges with a direction and a fixed weight. The
//! solvers treat a graph as immutable input and return [`Path`]s over its edge ids.

pub mod direction;
pub(crate) mod fixtures;
pub mod graph;
pub mod ids;
pub mod path;

pub use direction::{Direction, ParseDirectionError};
pub use fixtures::demo_graph;
pub use graph::{
    euclidean, Edge, EdgeRecord, Graph, GraphSnapshot, ShadowEdge, Vertex, VertexRecord,
};
pub use ids::{EdgeId, Id, VertexId};
pub use path::{Path, PathStep};
