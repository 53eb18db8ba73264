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

//! Inspect command - persisted run listing.

use colored::Colorize;
use mbench::harness::sampler::{format_duration, format_throughput};
use mbench::PersistedRun;
use std::path::Path;

/// Prints every row of a persisted run.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or is not a valid run.
///
/// # Output
///
/// ```text
/// Checksums and hashes
/// 2 rows
///
///   size=1KB-chunks=1-algorithm=checksum-library=wrapping
///     mean: 312ns  ops/sec: 3,205,128
///     metrics: 976.56
/// ```
pub fn inspect(file: impl AsRef<Path>) -> mbench::Result<()> {
    let run = PersistedRun::load(file.as_ref())?;

    println!("{}", run.title.bold());
    println!("{} rows", run.len());

    for (key, row) in &run.rows {
        println!();
        println!("  {}", key.yellow());
        println!(
            "    {} {}  {} {}",
            "mean:".cyan(),
            format_duration(&row.statistics.mean),
            "ops/sec:".cyan(),
            format_throughput(&row.throughput)
        );
        if !row.metric_values.is_empty() {
            let metrics = row
                .metric_values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("    {} {}", "metrics:".cyan(), metrics);
        }
    }

    Ok(())
}
