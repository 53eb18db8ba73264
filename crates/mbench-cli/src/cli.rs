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

//! Command definitions and argument parsing.

use crate::commands::{self, DemoOptions};
use clap::Subcommand;
use std::path::PathBuf;

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the built-in comparison matrix
    ///
    /// Compares checksum and hash implementations over input sizes and chunk
    /// counts. `MBENCH_*` environment variables are applied on top of the
    /// flags.
    Demo {
        /// Keep rows whose values contain these keywords (`a|b,c`)
        #[arg(short, long)]
        filter: Option<String>,

        /// Dimension order, slowest-varying first
        #[arg(short, long, value_delimiter = ',')]
        dims: Option<Vec<String>>,

        /// Print only the JSON result
        #[arg(long)]
        json: bool,

        /// Skip sampling and report zeros
        #[arg(long)]
        dry_run: bool,

        /// Vertical output
        #[arg(short, long)]
        compact: bool,

        /// Previous-run file
        #[arg(short, long, value_name = "FILE")]
        prev_file: Option<PathBuf>,

        /// Compare against the previous-run file
        #[arg(long, requires = "prev_file")]
        diff: bool,

        /// Store this run in the previous-run file
        #[arg(long, requires = "prev_file")]
        update: bool,

        /// In diff mode, also print rows below the threshold
        #[arg(long)]
        unchanged: bool,

        /// Minimum change in percent for a row to be printed in diff mode
        #[arg(long, value_name = "PERCENT")]
        threshold: Option<f64>,

        /// Samples per combination
        #[arg(short, long)]
        samples: Option<u64>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print a persisted run
    Inspect {
        /// Run file written by `demo --update`
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Commands {
    /// Executes the command.
    ///
    /// # Errors
    ///
    /// Configuration, I/O and parse errors from the comparison engine.
    pub fn execute(self) -> mbench::Result<()> {
        match self {
            Commands::Demo {
                filter,
                dims,
                json,
                dry_run,
                compact,
                prev_file,
                diff,
                update,
                unchanged,
                threshold,
                samples,
                no_color,
            } => commands::demo(DemoOptions {
                filter,
                dims,
                json,
                dry_run,
                compact,
                prev_file,
                diff,
                update,
                unchanged,
                threshold,
                samples,
                color: !no_color,
            }),
            Commands::Inspect { file } => commands::inspect(file),
        }
    }
}
