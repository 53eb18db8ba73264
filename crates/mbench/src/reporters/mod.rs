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

//! Report rendering.
//!
//! - [`table`]: bordered table with visual de-duplication of dimension cells
//! - [`compact`]: vertical `label: value` listing
//! - [`format`]: cell text, percent and color helpers

pub mod compact;
pub mod format;
pub mod table;

pub use compact::CompactReporter;
pub use format::{Cell, Tone};
pub use table::TableReporter;

use crate::core::{Dimension, Metric};
use indexmap::IndexMap;
use std::io;

/// Width of a percent column: `-100.01%`.
pub const PERCENT_WIDTH: usize = 8;

/// Fixed statistic columns with their minimum widths.
pub const STAT_COLUMNS: [(&str, usize); 4] = [
    ("Ops/sec", 10),
    ("Per op", 10),
    ("Diff %", PERCENT_WIDTH),
    ("Variability", 22),
];

/// A report column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header label.
    pub header: String,
    /// Content width without the trailing space.
    pub width: usize,
}

/// Column layout of a run: selected dimensions first, then metric and
/// statistic columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// All columns in order.
    pub columns: Vec<Column>,
    /// Number of leading dimension columns.
    pub dimension_count: usize,
}

impl Layout {
    /// Builds the layout for the selected dimensions and metrics.
    pub fn build<A>(selected: &[&Dimension], metrics: &IndexMap<String, Metric<A>>) -> Self {
        let mut columns: Vec<Column> = selected
            .iter()
            .map(|dim| Column {
                header: dim.name.clone(),
                width: dim.column_width(),
            })
            .collect();

        let mut extra = Vec::new();
        for (name, metric) in metrics {
            let width = metric.width.unwrap_or_else(|| name.chars().count());
            extra.push((metric.header(name), width));
            if metric.show_diff {
                extra.push((format!("{} %", name), PERCENT_WIDTH));
            }
        }
        extra.extend(STAT_COLUMNS.iter().map(|(h, w)| (h.to_string(), *w)));
        columns.extend(extra.into_iter().map(|(header, width)| Column {
            width: width.max(header.chars().count()),
            header,
        }));

        Self {
            columns,
            dimension_count: selected.len(),
        }
    }

    /// Column widths in order.
    pub fn widths(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.width).collect()
    }
}

/// Destination of rendered rows.
pub trait Reporter {
    /// Called once before the first row.
    fn header(&mut self, layout: &Layout) -> io::Result<()>;

    /// Renders one row; `cells` follows the layout's column order.
    fn row(&mut self, layout: &Layout, cells: &[Cell]) -> io::Result<()>;

    /// Called once after the last row.
    fn finish(&mut self, layout: &Layout) -> io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DimensionKind;

    fn dim(name: &str, values: &[&str]) -> Dimension {
        Dimension {
            name: name.to_string(),
            kind: DimensionKind::Static,
            values: values.iter().map(|s| s.to_string()).collect(),
            default: None,
        }
    }

    #[test]
    fn test_layout_columns() {
        let size = dim("size", &["1KB", "1024KB"]);
        let chunks = dim("chunks", &["2", "4"]);
        let mut metrics: IndexMap<String, Metric<u64>> = IndexMap::new();
        metrics.insert(
            "Speed".to_string(),
            Metric::new(|_, _, _, _| 0.0)
                .with_unit("MiB/s")
                .with_width(14)
                .with_diff(true),
        );
        metrics.insert("Ratio".to_string(), Metric::new(|_, _, _, _| 0.0));

        let layout = Layout::build(&[&size, &chunks], &metrics);
        let headers: Vec<_> = layout.columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(
            headers,
            vec![
                "size",
                "chunks",
                "Speed MiB/s",
                "Speed %",
                "Ratio",
                "Ops/sec",
                "Per op",
                "Diff %",
                "Variability"
            ]
        );
        assert_eq!(layout.widths(), vec![6, 6, 14, 8, 5, 10, 10, 8, 22]);
        assert_eq!(layout.dimension_count, 2);
    }

    #[test]
    fn test_header_wider_than_width() {
        let mut metrics: IndexMap<String, Metric<u64>> = IndexMap::new();
        metrics.insert(
            "Speed".to_string(),
            Metric::new(|_, _, _, _| 0.0).with_unit("MiB/s"),
        );
        let layout = Layout::build(&[], &metrics);
        assert_eq!(layout.columns[0].width, "Speed MiB/s".len());
    }
}
