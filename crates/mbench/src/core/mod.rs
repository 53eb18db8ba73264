// Dweve MBench - Benchmark Matrix Comparison
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core types shared by the enumerator, the engine and the reporters.
//!
//! - [`dimensions`]: static/dynamic dimension resolution and selection
//! - [`metrics`]: derived metric definitions
//! - [`config`]: run configuration and environment overrides

pub mod config;
pub mod dimensions;
pub mod metrics;

pub use config::{CompareConfig, EnvOverrides};
pub use dimensions::{
    discover_dynamic, BenchFn, Dimension, DimensionKind, DimensionRegistry, LibGroup, LibNode,
    LibTree, SampleCount, StaticDimensions,
};
pub use metrics::{Direction, Metric};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One point of the matrix: dimension name → value label, in dimension order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Combination(IndexMap<String, String>);

impl Combination {
    /// Creates an empty combination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`. Rebinding keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// The label bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of bound dimensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deterministic identity used for persistence and delta lookups.
    pub fn row_key(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Combination {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
