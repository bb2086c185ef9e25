// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::marker::PhantomData;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A stable integer identifier for graph elements.
///
/// Ids are assigned by whoever builds the graph (usually the editor) and are only unique
/// within a single graph snapshot. The tag parameter keeps vertex and edge ids apart at the
/// type level; on the wire an id is a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub const fn get(self) -> u64 {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<u64> for Id<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self::new)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::new)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexIdTag {}
pub type VertexId = Id<VertexIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeIdTag {}
pub type EdgeId = Id<EdgeIdTag>;

#[cfg(test)]
mod tests {
    use super::{EdgeId, VertexId};

    #[test]
    fn id_parses_trimmed_decimal() {
        let id: VertexId = " 42 ".parse().expect("vertex id");
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn id_rejects_non_numeric() {
        assert!("v1".parse::<EdgeId>().is_err());
        assert!("".parse::<EdgeId>().is_err());
    }

    #[test]
    fn id_serializes_as_plain_number() {
        let id = EdgeId::new(7);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "7");
        let back: EdgeId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
