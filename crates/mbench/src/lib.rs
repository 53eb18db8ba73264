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

//! # MBench
//!
//! Benchmark comparison over a matrix of dimensions.
//!
//! A comparison is spanned by **static** dimensions (declared label → argument
//! mappings such as input sizes) and **dynamic** dimensions (the levels of a
//! tree of implementations, such as algorithm and library). Every combination
//! that has an implementation is sampled, derived metrics are computed, and
//! the result is printed as a table against either a previous run or the
//! first row of each group.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mbench::core::{CompareConfig, LibGroup, Metric, StaticDimensions};
//! use mbench::compare;
//! use num_traits::ToPrimitive;
//!
//! let dims = StaticDimensions::new()
//!     .with_dimension("size", [("1KB", 1024usize), ("1MB", 1024 * 1024)]);
//! let libs = LibGroup::new()
//!     .with_leaf("vec", |args: &[usize]| drop(vec![0u8; args[0]]))
//!     .with_leaf("boxed", |args: &[usize]| drop(vec![0u8; args[0]].into_boxed_slice()));
//! let config = CompareConfig::default()
//!     .with_metric(
//!         "Speed",
//!         Metric::new(|_, _, per_sec, args: &[usize]| {
//!             per_sec.to_f64().unwrap_or(0.0) * args[0] as f64 / (1024.0 * 1024.0)
//!         })
//!         .with_unit("MiB/s"),
//!     )
//!     .with_env();
//!
//! compare("Allocation", dims, libs, config).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: dimensions, metrics, configuration
//! - [`harness`]: enumeration, filtering, sampling, the run driver
//! - [`reporters`]: table and compact output
//! - [`persist`]: previous-run file format
//! - [`error`]: error type

pub mod core;
pub mod error;
pub mod harness;
pub mod persist;
pub mod reporters;

pub use crate::core::{Combination, CompareConfig, EnvOverrides, LibGroup, Metric, StaticDimensions};
pub use error::{MbenchError, Result};
pub use harness::{compare, Compare, Sampler, TimingSampler};
pub use persist::PersistedRun;
