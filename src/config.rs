// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use crate::solve::{BalanceStrategy, CancelToken, RandomOptions};

pub const ENV_MAX_DEPTH: &str = "POSTROUTE_MAX_DEPTH";
pub const ENV_ITERATIONS: &str = "POSTROUTE_ITERATIONS";
pub const ENV_WORKERS: &str = "POSTROUTE_WORKERS";
pub const ENV_MAX_STEPS_PER_EDGE: &str = "POSTROUTE_MAX_STEPS_PER_EDGE";
pub const ENV_SEED: &str = "POSTROUTE_SEED";
pub const ENV_BALANCE: &str = "POSTROUTE_BALANCE";

/// Tunables shared by all solvers.
///
/// Missing fields in a serialized config fall back to [`SolverConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Step limit of the bounded search.
    pub max_depth: u32,
    /// Random trials across all workers.
    pub iterations: u64,
    pub workers: usize,
    pub max_steps_per_edge: usize,
    pub seed: u64,
    pub balance: BalanceStrategy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 24,
            iterations: 10_000,
            workers: std::thread::available_parallelism().map_or(1, usize::from),
            max_steps_per_edge: 1_000,
            seed: 0x5EED,
            balance: BalanceStrategy::Optimal,
        }
    }
}

fn lookup_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    lookup(name)
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl SolverConfig {
    /// Defaults overridden by `POSTROUTE_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`, clamping numbers to sane ranges. Unparsable values
    /// keep the current setting.
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            max_depth: lookup_parse(&lookup, ENV_MAX_DEPTH, self.max_depth).clamp(1, 64),
            iterations: lookup_parse(&lookup, ENV_ITERATIONS, self.iterations).clamp(1, 100_000_000),
            workers: lookup_parse(&lookup, ENV_WORKERS, self.workers).clamp(1, 512),
            max_steps_per_edge: lookup_parse(&lookup, ENV_MAX_STEPS_PER_EDGE, self.max_steps_per_edge)
                .clamp(1, 1_000_000),
            seed: lookup_parse(&lookup, ENV_SEED, self.seed),
            balance: lookup_parse(&lookup, ENV_BALANCE, self.balance),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn random_options(&self, cancel: CancelToken) -> RandomOptions {
        RandomOptions {
            iterations: self.iterations,
            workers: self.workers,
            seed: self.seed,
            max_steps_per_edge: self.max_steps_per_edge,
            cancel,
        }
    }
}
