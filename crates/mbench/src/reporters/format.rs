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

//! Cell formatting shared by the table and compact reporters.
//!
//! Cells carry their text and a [`Tone`] separately, so alignment is computed
//! on the visible text and colors are applied last.

use crate::core::Direction;
use colored::Colorize;
use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, Zero};

/// What a cell's color communicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// No color.
    Plain,
    /// The change went in the metric's better direction (green).
    Improved,
    /// The change went against the metric's better direction (red).
    Regressed,
    /// No change, no data, or table chrome (gray).
    Neutral,
    /// A measured value (blue).
    Value,
    /// A throughput figure (green).
    Throughput,
}

/// One rendered field of a report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Visible text.
    pub text: String,
    /// Color role.
    pub tone: Tone,
}

impl Cell {
    /// Creates a cell.
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    /// Creates an uncolored cell.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }

    /// Neutral placeholder for a delta without comparable prior data.
    pub fn no_prior() -> Self {
        Self::new("-", Tone::Neutral)
    }

    /// The text with its color applied when `color` is set.
    pub fn paint(&self, color: bool) -> String {
        paint(&self.text, self.tone, color)
    }
}

/// Applies the color for `tone`.
pub fn paint(text: &str, tone: Tone, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Plain => text.to_string(),
        Tone::Improved | Tone::Throughput => text.green().to_string(),
        Tone::Regressed => text.red().to_string(),
        Tone::Neutral => text.dimmed().to_string(),
        Tone::Value => text.blue().to_string(),
    }
}

/// Pads `text` with spaces to `width` visible characters.
pub fn pad(text: &str, width: usize, align_left: bool) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let padding = " ".repeat(width - len);
    if align_left {
        format!("{}{}", text, padding)
    } else {
        format!("{}{}", padding, text)
    }
}

/// Uppercases the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Percent change of `value` against `prior` as a colored cell.
///
/// The percentage is the truncated integer `(value - prior) * 100 / prior`.
/// Positive changes carry a `+`, zero carries no sign, a zero prior renders
/// `N/A`.
pub fn percent(value: &BigInt, prior: &BigInt, direction: Direction) -> Cell {
    if prior.is_zero() {
        return Cell::new("N/A", Tone::Neutral);
    }
    let change: BigInt = (value - prior) * 100 / prior;
    let tone = if change.is_zero() {
        Tone::Neutral
    } else if change.is_positive() == (direction == Direction::HigherIsBetter) {
        Tone::Improved
    } else {
        Tone::Regressed
    };
    let sign = if change.is_positive() { "+" } else { "" };
    Cell::new(format!("{}{}%", sign, change), tone)
}

/// [`percent`] for durations, where lower is better.
pub fn percent_duration(value: &BigUint, prior: &BigUint) -> Cell {
    percent(
        &BigInt::from(value.clone()),
        &BigInt::from(prior.clone()),
        Direction::LowerIsBetter,
    )
}

/// [`percent`] for metric values, compared at a resolution of 1/1000.
pub fn percent_metric(value: f64, prior: f64, direction: Direction) -> Cell {
    let scale = |v: f64| BigInt::from((v * 1000.0).round() as i128);
    percent(&scale(value), &scale(prior), direction)
}

/// Renders a metric value the way it was computed: `5`, `1684.21`.
pub fn format_metric(value: f64) -> String {
    format!("{}", value)
}
