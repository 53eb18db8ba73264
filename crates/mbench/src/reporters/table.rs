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

//! Bordered table reporter.
//!
//! Dimension cells repeat only when they change, and horizontal rules are
//! drawn only when a slower-varying dimension changes, so related rows read
//! as one group:
//!
//! ```text
//! Size │Chunks │Speed MiB/s │...
//! ─────┼───────┼────────────┼...
//! 1KB  │2      │       93.2 │...
//!      │4      │      101.7 │...
//! ─────┼───────┼────────────┼...
//! 1MB  │2      │      811.4 │...
//! ```

use super::format::{capitalize, pad, paint, Cell, Tone};
use super::{Layout, Reporter};
use std::io::{self, Write};

const VERTICAL: char = '│';
const HORIZONTAL: char = '─';

/// Marks each dimension as changed relative to the previous printed row.
///
/// Once a dimension changed, every faster-varying dimension after it counts as
/// changed too. Without a previous row everything changed.
pub fn changed_flags<S: AsRef<str>>(current: &[S], prev: Option<&[String]>) -> Vec<bool> {
    let mut propagated = false;
    current
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let changed = propagated
                || prev.map_or(true, |p| p.get(i).map(String::as_str) != Some(value.as_ref()));
            propagated |= changed;
            changed
        })
        .collect()
}

/// Decides whether a rule is drawn above a row with the given changed flags.
///
/// No rule is drawn for single-dimension tables or when only the
/// fastest-varying dimension changed.
pub fn needs_separator(changed: &[bool]) -> bool {
    match changed.split_last() {
        Some((last, outer)) if !outer.is_empty() => !(*last && outer.iter().all(|c| !c)),
        _ => false,
    }
}

/// Builds a horizontal rule; columns not marked changed stay blank.
pub fn separator_line(widths: &[usize], changed: &[bool]) -> String {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let fill = if changed.get(i).copied().unwrap_or(true) {
                HORIZONTAL
            } else {
                ' '
            };
            fill.to_string().repeat(w + 1)
        })
        .collect::<Vec<_>>()
        .join(&VERTICAL.to_string());
    join_borders(&line)
}

fn join_borders(line: &str) -> String {
    line.replace("─│─", "─┼─")
        .replace("─│", "─┤")
        .replace("│─", "├─")
}

/// Renders rows as a bordered table.
pub struct TableReporter<W: Write> {
    out: W,
    color: bool,
    prev: Option<Vec<String>>,
}

impl<W: Write> TableReporter<W> {
    /// Creates a table reporter writing to `out`.
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            prev: None,
        }
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self, widths: &[usize], changed: &[bool]) -> io::Result<()> {
        let line = separator_line(widths, changed);
        writeln!(self.out, "{}", paint(&line, Tone::Neutral, self.color))
    }

    fn border(&self) -> String {
        paint(&VERTICAL.to_string(), Tone::Neutral, self.color)
    }
}

impl<W: Write> Reporter for TableReporter<W> {
    fn header(&mut self, layout: &Layout) -> io::Result<()> {
        let line = layout
            .columns
            .iter()
            .map(|c| format!("{} ", pad(&capitalize(&c.header), c.width, true)))
            .collect::<Vec<_>>()
            .join(&self.border());
        writeln!(self.out, "{}", line)
    }

    fn row(&mut self, layout: &Layout, cells: &[Cell]) -> io::Result<()> {
        let dims = layout.dimension_count;
        let dim_values: Vec<String> = cells.iter().take(dims).map(|c| c.text.clone()).collect();
        let mut changed = changed_flags(&dim_values, self.prev.as_deref());
        changed.resize(layout.columns.len(), true);

        let widths = layout.widths();
        if needs_separator(&changed[..dims]) {
            self.rule(&widths, &changed)?;
        }

        let line = cells
            .iter()
            .zip(&layout.columns)
            .enumerate()
            .map(|(i, (cell, column))| {
                let is_dim = i < dims;
                let text = if changed[i] { cell.text.as_str() } else { " " };
                paint(&pad(text, column.width + 1, is_dim), cell.tone, self.color)
            })
            .collect::<Vec<_>>()
            .join(&self.border());
        writeln!(self.out, "{}", line)?;

        self.prev = Some(dim_values);
        Ok(())
    }

    fn finish(&mut self, layout: &Layout) -> io::Result<()> {
        let widths = layout.widths();
        let all = vec![true; widths.len()];
        self.rule(&widths, &all)?;
        self.out.flush()
    }
}
