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

//! MBench command line interface.
//!
//! ```bash
//! # Run the built-in comparison
//! mbench demo --samples 20
//!
//! # Only 1KB inputs, keep the result for the next run
//! mbench demo --filter 1KB --prev-file bench.json --update
//!
//! # Show a stored run
//! mbench inspect bench.json
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use clap::Parser;
use mbench_cli::cli::Commands;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// MBench - benchmark matrix comparison
#[derive(Parser)]
#[command(name = "mbench")]
#[command(author, version, about = "MBench - benchmark matrix comparison", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mbench=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
