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

//! Derived metrics.
//!
//! A metric turns the sampler output of one combination into a single scalar,
//! for example throughput in MiB/s computed from the mean duration and the
//! argument sizes. Metrics are rendered as extra columns and take part in the
//! change-percent computation.

use crate::harness::sampler::Statistics;
use num_bigint::BigUint;

use super::Combination;

/// Computes a metric value from (combination, statistics, throughput, arguments).
pub type ComputeFn<A> = Box<dyn Fn(&Combination, &Statistics, &BigUint, &[A]) -> f64>;

/// Which direction of change is an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Bigger values are better (speeds, throughput).
    #[default]
    HigherIsBetter,
    /// Smaller values are better (durations, sizes).
    LowerIsBetter,
}

/// A derived metric column.
pub struct Metric<A> {
    /// Unit appended to the column header, e.g. `MiB/s`.
    pub unit: String,
    /// Which direction of change is an improvement.
    pub direction: Direction,
    /// Column width; the metric name length when unset.
    pub width: Option<usize>,
    /// Whether a percent-change column is rendered next to the value.
    pub show_diff: bool,
    /// The compute function. A metric without one is rejected before the run.
    pub compute: Option<ComputeFn<A>>,
}

impl<A> Default for Metric<A> {
    fn default() -> Self {
        Self {
            unit: String::new(),
            direction: Direction::default(),
            width: None,
            show_diff: false,
            compute: None,
        }
    }
}

impl<A> Metric<A> {
    /// Creates a metric with the given compute function.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(&Combination, &Statistics, &BigUint, &[A]) -> f64 + 'static,
    {
        Self {
            compute: Some(Box::new(compute)),
            ..Self::default()
        }
    }

    /// Sets the unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the improvement direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the column width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Enables the percent-change column.
    pub fn with_diff(mut self, show_diff: bool) -> Self {
        self.show_diff = show_diff;
        self
    }

    /// Header label: `"{name} {unit}"`, or just the name without a unit.
    pub fn header(&self, name: &str) -> String {
        if self.unit.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", name, self.unit)
        }
    }

    /// Runs the compute function. Non-finite results are reported as `0.0`
    /// because they cannot be persisted.
    pub fn evaluate(
        &self,
        name: &str,
        combination: &Combination,
        stats: &Statistics,
        throughput: &BigUint,
        args: &[A],
    ) -> f64 {
        let Some(compute) = &self.compute else {
            return 0.0;
        };
        let value = compute(combination, stats, throughput, args);
        if value.is_finite() {
            value
        } else {
            tracing::warn!(metric = name, value, "non-finite metric value replaced with 0");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: u64) -> Statistics {
        Statistics {
            mean: BigUint::from(mean),
            rme: 0.0,
            formatted: String::new(),
        }
    }

    #[test]
    fn test_header() {
        let metric: Metric<u64> = Metric::new(|_, _, _, _| 1.0).with_unit("MiB/s");
        assert_eq!(metric.header("Speed"), "Speed MiB/s");
        let metric: Metric<u64> = Metric::new(|_, _, _, _| 1.0);
        assert_eq!(metric.header("Speed"), "Speed");
    }

    #[test]
    fn test_defaults() {
        let metric: Metric<u64> = Metric::new(|_, _, _, _| 1.0);
        assert_eq!(metric.direction, Direction::HigherIsBetter);
        assert!(!metric.show_diff);
        assert!(metric.width.is_none());
    }

    #[test]
    fn test_evaluate_uses_arguments() {
        let metric: Metric<u64> = Metric::new(|_, s, _, args| {
            args[0] as f64 / s.mean.to_string().parse::<f64>().unwrap()
        });
        let value = metric.evaluate(
            "Speed",
            &Combination::new(),
            &stats(4),
            &BigUint::from(0u32),
            &[8],
        );
        assert_eq!(value, 2.0);
    }

    #[test]
    fn test_evaluate_sanitizes_non_finite() {
        let metric: Metric<u64> = Metric::new(|_, _, _, _| f64::INFINITY);
        let value = metric.evaluate(
            "Speed",
            &Combination::new(),
            &stats(0),
            &BigUint::from(0u32),
            &[],
        );
        assert_eq!(value, 0.0);
    }
}
