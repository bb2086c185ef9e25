// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use postroute::model::{Direction, Graph, Path, VertexId};

#[derive(Debug, Clone, Copy)]
pub struct GridParams {
    pub cols: usize,
    pub rows: usize,
    /// Rows alternate between eastbound and westbound one-way streets; columns stay two-way.
    pub one_way_rows: bool,
}

impl GridParams {
    pub const fn undirected(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            one_way_rows: false,
        }
    }

    pub const fn one_way(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            one_way_rows: true,
        }
    }

    pub fn edge_count(self) -> usize {
        self.rows * self.cols.saturating_sub(1) + self.cols * self.rows.saturating_sub(1)
    }
}

pub struct Grid {
    pub graph: Graph,
    pub corner: VertexId,
    pub opposite: VertexId,
}

/// `cols` x `rows` street grid with unit spacing, vertices laid out row by row.
pub fn grid(params: GridParams) -> Grid {
    let mut graph = Graph::new();
    let mut ids = Vec::with_capacity(params.cols * params.rows);
    for row in 0..params.rows {
        for col in 0..params.cols {
            ids.push(graph.add_vertex(col as f64, row as f64));
        }
    }
    let at = |col: usize, row: usize| ids[row * params.cols + col];

    for row in 0..params.rows {
        let direction = match (params.one_way_rows, row % 2) {
            (false, _) => Direction::Any,
            (true, 0) => Direction::From,
            (true, _) => Direction::To,
        };
        for col in 1..params.cols {
            graph
                .add_edge(at(col - 1, row), at(col, row), direction)
                .expect("row edge");
        }
    }
    for row in 1..params.rows {
        for col in 0..params.cols {
            graph
                .add_edge(at(col, row - 1), at(col, row), Direction::Any)
                .expect("column edge");
        }
    }

    Grid {
        corner: at(0, 0),
        opposite: at(params.cols - 1, params.rows - 1),
        graph,
    }
}

/// Keeps the optimizer from discarding a solved walk.
pub fn checksum(path: &Path) -> u64 {
    (path.len() as u64) ^ path.weight().to_bits()
}
