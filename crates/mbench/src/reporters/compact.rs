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

//! Compact reporter: one `label: value` line per field, rows separated by a
//! blank line. Useful for narrow terminals and for grepping.

use super::{Cell, Layout, Reporter};
use std::io::{self, Write};

/// Fixed label width for alignment.
pub const LABEL_WIDTH: usize = 15;

/// Renders rows vertically.
pub struct CompactReporter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> CompactReporter<W> {
    /// Creates a compact reporter writing to `out`.
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for CompactReporter<W> {
    fn header(&mut self, _layout: &Layout) -> io::Result<()> {
        writeln!(self.out)
    }

    fn row(&mut self, layout: &Layout, cells: &[Cell]) -> io::Result<()> {
        for (column, cell) in layout.columns.iter().zip(cells) {
            writeln!(
                self.out,
                "{:<width$.width$}: {}",
                column.header,
                cell.paint(self.color),
                width = LABEL_WIDTH
            )?;
        }
        writeln!(self.out)
    }

    fn finish(&mut self, _layout: &Layout) -> io::Result<()> {
        self.out.flush()
    }
}
