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

use super::ids::VertexId;

/// Which way an edge `(v1, v2)` may be traversed.
///
/// `From` permits `v1 -> v2` only, `To` permits `v2 -> v1` only and `Any` permits both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Any,
    From,
    To,
}

impl Direction {
    pub fn is_directed(self) -> bool {
        !matches!(self, Self::Any)
    }

    /// The direction that permits exactly the opposite traversals.
    pub fn reversed(self) -> Self {
        match self {
            Self::Any => Self::Any,
            Self::From => Self::To,
            Self::To => Self::From,
        }
    }

    /// Whether an edge `(v1, v2)` may be left from `at`.
    ///
    /// With `reverse` set the predicate is inverted, so a `From` edge may be left from `v2`.
    /// This lets a search walk "into" a vertex backwards along one-way edges.
    pub fn can_leave(self, v1: VertexId, v2: VertexId, at: VertexId, reverse: bool) -> bool {
        let direction = if reverse { self.reversed() } else { self };
        match direction {
            Self::Any => at == v1 || at == v2,
            Self::From => at == v1,
            Self::To => at == v2,
        }
    }

    /// Whether an edge `(v1, v2)` may be entered at `at` in a forward walk.
    pub fn can_enter(self, v1: VertexId, v2: VertexId, at: VertexId) -> bool {
        self.can_leave(v1, v2, at, true)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::From => "from",
            Self::To => "to",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError {
    value: String,
}

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction {:?} (expected any, from or to)", self.value)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "from" => Ok(Self::From),
            "to" => Ok(Self::To),
            other => Err(ParseDirectionError {
                value: other.to_owned(),
            }),
        }
    }
}
