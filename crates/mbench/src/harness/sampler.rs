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

//! Timing sampler interface.
//!
//! The engine treats timing as a collaborator: it hands a closure and a sample
//! count to a [`Sampler`] and receives statistics back. [`TimingSampler`] is a
//! plain wall-clock implementation; [`DryRunSampler`] returns zeros and is
//! used for dry runs.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::time::Instant;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Summary statistics of one sampled benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Mean duration per call in nanoseconds.
    #[serde(with = "crate::persist::tagged_bigint")]
    pub mean: BigUint,
    /// Relative margin of error in percent.
    pub rme: f64,
    /// Human readable variability summary.
    pub formatted: String,
}

/// Everything a sampler reports for one combination.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Duration statistics.
    pub stats: Statistics,
    /// Calls per second.
    pub per_sec: BigUint,
    /// Formatted calls per second.
    pub per_sec_str: String,
    /// Formatted duration per call.
    pub per_op_str: String,
}

impl Sample {
    /// The sample reported for dry runs.
    pub fn zero() -> Self {
        Self {
            stats: Statistics {
                mean: BigUint::zero(),
                rme: 0.0,
                formatted: String::new(),
            },
            per_sec: BigUint::zero(),
            per_sec_str: String::new(),
            per_op_str: "0ns".to_string(),
        }
    }
}

/// Runs a benchmark closure and summarizes its timings.
pub trait Sampler {
    /// Calls `bench` `samples` times and reports the statistics.
    fn sample(&mut self, bench: &mut dyn FnMut(), samples: u64) -> Sample;
}

/// Wall-clock sampler based on [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct TimingSampler {
    warmup: bool,
}

impl Default for TimingSampler {
    fn default() -> Self {
        Self { warmup: true }
    }
}

impl TimingSampler {
    /// Creates a sampler that runs one untimed warmup call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the warmup call.
    pub fn with_warmup(mut self, warmup: bool) -> Self {
        self.warmup = warmup;
        self
    }
}

impl Sampler for TimingSampler {
    fn sample(&mut self, bench: &mut dyn FnMut(), samples: u64) -> Sample {
        if self.warmup {
            bench();
        }
        let samples = samples.max(1);
        let mut timings = Vec::with_capacity(samples as usize);
        for _ in 0..samples {
            let start = Instant::now();
            bench();
            timings.push(start.elapsed().as_nanos());
        }
        summarize(&timings)
    }
}

/// Sampler that never runs the benchmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSampler;

impl Sampler for DryRunSampler {
    fn sample(&mut self, _bench: &mut dyn FnMut(), _samples: u64) -> Sample {
        Sample::zero()
    }
}

/// Builds a [`Sample`] from per-call timings in nanoseconds.
pub fn summarize(timings: &[u128]) -> Sample {
    if timings.is_empty() {
        return Sample::zero();
    }
    let n = timings.len() as f64;
    let total: BigUint = timings.iter().map(|&t| BigUint::from(t)).sum();
    let mean = total / BigUint::from(timings.len());

    let mean_f = mean.to_f64().unwrap_or(f64::MAX);
    let variance = timings
        .iter()
        .map(|&t| (t as f64 - mean_f).powi(2))
        .sum::<f64>()
        / (n - 1.0).max(1.0);
    let rme = if mean_f > 0.0 {
        1.96 * (variance.sqrt() / n.sqrt()) / mean_f * 100.0
    } else {
        0.0
    };

    let min = timings.iter().min().copied().unwrap_or_default();
    let max = timings.iter().max().copied().unwrap_or_default();
    let formatted = format!(
        "±{:.2}% (min: {}, max: {})",
        rme,
        format_duration(&BigUint::from(min)),
        format_duration(&BigUint::from(max))
    );

    let per_sec = if mean.is_zero() {
        BigUint::zero()
    } else {
        BigUint::from(NANOS_PER_SEC) / &mean
    };

    Sample {
        per_sec_str: format_throughput(&per_sec),
        per_op_str: format_duration(&mean),
        stats: Statistics {
            mean,
            rme,
            formatted,
        },
        per_sec,
    }
}

/// Formats a nanosecond duration with a readable unit: `850ns`, `1.25μs`,
/// `3.10ms`, `2.00s`.
pub fn format_duration(ns: &BigUint) -> String {
    let value = ns.to_f64().unwrap_or(f64::MAX);
    if value < 1_000.0 {
        format!("{}ns", ns)
    } else if value < 1_000_000.0 {
        format!("{:.2}μs", value / 1_000.0)
    } else if value < 1_000_000_000.0 {
        format!("{:.2}ms", value / 1_000_000.0)
    } else {
        format!("{:.2}s", value / 1_000_000_000.0)
    }
}

/// Formats an integer with thousands separators: `1234567` → `1,234,567`.
pub fn format_throughput(per_sec: &BigUint) -> String {
    let digits = per_sec.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(&BigUint::from(850u32)), "850ns");
        assert_eq!(format_duration(&BigUint::from(1_250u32)), "1.25μs");
        assert_eq!(format_duration(&BigUint::from(3_100_000u32)), "3.10ms");
        assert_eq!(format_duration(&BigUint::from(2_000_000_000u64)), "2.00s");
    }

    #[test]
    fn test_format_throughput_groups() {
        assert_eq!(format_throughput(&BigUint::from(0u32)), "0");
        assert_eq!(format_throughput(&BigUint::from(999u32)), "999");
        assert_eq!(format_throughput(&BigUint::from(1_000u32)), "1,000");
        assert_eq!(format_throughput(&BigUint::from(1_234_567u32)), "1,234,567");
    }

    #[test]
    fn test_summarize() {
        let sample = summarize(&[100, 200, 300]);
        assert_eq!(sample.stats.mean, BigUint::from(200u32));
        assert_eq!(sample.per_sec, BigUint::from(5_000_000u32));
        assert_eq!(sample.per_sec_str, "5,000,000");
        assert_eq!(sample.per_op_str, "200ns");
        assert!(sample.stats.rme > 0.0);
        assert!(sample.stats.formatted.contains("min: 100ns"));
    }

    #[test]
    fn test_summarize_constant_timings() {
        let sample = summarize(&[50, 50, 50, 50]);
        assert_eq!(sample.stats.rme, 0.0);
    }

    #[test]
    fn test_timing_sampler_calls_bench() {
        let mut calls = 0;
        let sample = TimingSampler::new().sample(&mut || calls += 1, 5);
        assert_eq!(calls, 6); // warmup + samples
        assert!(!sample.per_op_str.is_empty());
    }

    #[test]
    fn test_timing_sampler_without_warmup() {
        let mut calls = 0;
        TimingSampler::new()
            .with_warmup(false)
            .sample(&mut || calls += 1, 5);
        assert_eq!(calls, 5);
    }

    #[test]
    fn test_dry_run_sampler() {
        let mut calls = 0;
        let sample = DryRunSampler.sample(&mut || calls += 1, 5);
        assert_eq!(calls, 0);
        assert_eq!(sample, Sample::zero());
    }
}
