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

//! Comparison run driver.
//!
//! [`Compare`] walks the matrix of selected dimensions, samples every
//! combination that has an implementation, computes metrics and deltas, and
//! hands the rendered row to a reporter.
//!
//! Deltas are taken against one of two references:
//!
//! - the **previous run** loaded from the previous-run file, looked up by row
//!   key (a row missing there is compared with itself, i.e. unchanged);
//! - otherwise the **baseline**: the first measured row after the enumerator
//!   last wrapped, so every group of rows is compared with its first member.

use crate::core::config::CompareConfig;
use crate::core::dimensions::{DimensionRegistry, LibTree, Resolved, StaticDimensions};
use crate::core::{Combination, Dimension, DimensionKind};
use crate::error::Result;
use crate::harness::enumerator::{materialize, Odometer, Step};
use crate::harness::filter::{filter_values, Filter};
use crate::harness::sampler::{DryRunSampler, Sample, Sampler, TimingSampler};
use crate::persist::{PersistedRun, RawRow};
use crate::reporters::format::{format_metric, percent_duration, percent_metric};
use crate::reporters::{Cell, CompactReporter, Layout, Reporter, TableReporter, Tone};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::io::{self, Write};

/// Comparison reference of the current baseline segment.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineState {
    /// Throughput of the baseline row.
    pub ops_per_sec: BigUint,
    /// Mean duration of the baseline row.
    pub mean: BigUint,
    /// Metric values of the baseline row.
    pub metric_values: Vec<f64>,
}

/// The values a row is compared against.
#[derive(Debug, Clone, PartialEq)]
pub struct Prior {
    /// Prior mean duration.
    pub mean: BigUint,
    /// Prior metric values.
    pub metric_values: Vec<f64>,
    /// False when the row is compared with itself (baseline row, or no
    /// persisted row under its key).
    pub comparable: bool,
}

/// Mutable state of one run.
#[derive(Debug)]
struct RunState {
    baseline: Option<BaselineState>,
    results: PersistedRun,
}

/// A sampled combination ready for rendering.
#[derive(Debug)]
struct Measured {
    sample: Sample,
    metric_values: Vec<f64>,
    prior: Prior,
    print: bool,
}

/// Relative change of a duration in percent; a zero prior yields 0.
pub fn relative_change_duration(current: &BigUint, prior: &BigUint) -> f64 {
    if prior.is_zero() {
        return 0.0;
    }
    let diff = if current > prior {
        current - prior
    } else {
        prior - current
    };
    let scaled = (diff * 100u32).to_f64().unwrap_or(f64::MAX);
    scaled / prior.to_f64().unwrap_or(f64::MAX)
}

/// Relative change of a metric value in percent; a zero prior yields 0.
pub fn relative_change(current: f64, prior: f64) -> f64 {
    if prior == 0.0 {
        return 0.0;
    }
    ((current - prior).abs() * 100.0 / prior).abs()
}

/// Largest relative change over the mean duration and every metric.
pub fn change_percent(
    mean: &BigUint,
    metric_values: &[f64],
    prior_mean: &BigUint,
    prior_metrics: &[f64],
) -> f64 {
    metric_values
        .iter()
        .enumerate()
        .map(|(i, &v)| relative_change(v, prior_metrics.get(i).copied().unwrap_or(v)))
        .fold(relative_change_duration(mean, prior_mean), f64::max)
}

/// A benchmark comparison over a matrix of dimensions.
///
/// # Example
///
/// ```no_run
/// use mbench::core::{CompareConfig, LibGroup, StaticDimensions};
/// use mbench::harness::Compare;
///
/// let dims = StaticDimensions::new().with_dimension("n", [("10", 10u64), ("1000", 1000)]);
/// let libs = LibGroup::new()
///     .with_leaf("iter", |args: &[u64]| {
///         let _: u64 = (0..args[0]).sum();
///     })
///     .with_leaf("formula", |args: &[u64]| {
///         let _ = args[0] * (args[0] - 1) / 2;
///     });
/// let config = CompareConfig::default().with_dynamic_dimensions(["impl"]);
/// Compare::new("Sum", dims, libs, config).run().unwrap();
/// ```
pub struct Compare<A> {
    title: String,
    dimensions: StaticDimensions<A>,
    libs: LibTree<A>,
    config: CompareConfig<A>,
}

impl<A: Clone> Compare<A> {
    /// Creates a comparison.
    pub fn new(
        title: impl Into<String>,
        dimensions: StaticDimensions<A>,
        libs: LibTree<A>,
        config: CompareConfig<A>,
    ) -> Self {
        Self {
            title: title.into(),
            dimensions,
            libs,
            config,
        }
    }

    /// Runs with the wall-clock sampler and prints to stdout.
    pub fn run(&self) -> Result<PersistedRun> {
        let stdout = io::stdout();
        self.run_with(&mut TimingSampler::new(), stdout.lock())
    }

    /// Runs with the given sampler, writing the report to `out`.
    ///
    /// # Errors
    ///
    /// Configuration errors and previous-run load failures abort before any
    /// sampling. Output and save failures are reported after the matrix ran.
    pub fn run_with<W: Write>(&self, sampler: &mut dyn Sampler, mut out: W) -> Result<PersistedRun> {
        let cfg = &self.config;
        cfg.validate()?;
        let registry = DimensionRegistry::resolve(
            &self.dimensions,
            &self.libs,
            &cfg.dynamic_dimensions,
            &cfg.defaults,
        )?;
        let selected = registry.select(cfg.selected_dimensions.as_deref())?;
        let previous = cfg.load_path().map(PersistedRun::load).transpose()?;
        let filter = cfg.filter.as_deref().map(Filter::parse);

        let selected_dims: Vec<&Dimension> =
            selected.iter().filter_map(|name| registry.get(name)).collect();
        let values: Vec<Vec<String>> = selected_dims.iter().map(|d| d.values.clone()).collect();
        let layout = Layout::build(&selected_dims, &cfg.metrics);

        tracing::info!(
            title = %self.title,
            dimensions = selected.len(),
            diff = previous.is_some(),
            "starting comparison"
        );

        if !cfg.json_only {
            self.write_preamble(&mut out, &registry, &selected, previous.is_some())?;
        }

        let mut state = RunState {
            baseline: None,
            results: PersistedRun::new(self.title.clone()),
        };
        {
            let color = cfg.color;
            let mut reporter: Option<Box<dyn Reporter + '_>> = match (cfg.json_only, cfg.compact) {
                (true, _) => None,
                (false, true) => Some(Box::new(CompactReporter::new(&mut out, color))),
                (false, false) => Some(Box::new(TableReporter::new(&mut out, color))),
            };
            if let Some(reporter) = reporter.as_mut() {
                reporter.header(&layout)?;
            }

            let mut odometer = Odometer::new(values.iter().map(Vec::len).collect());
            while let Some(indices) = odometer.current() {
                let labels = materialize(&values, indices);
                if filter_values(filter.as_ref(), &labels) {
                    let measured =
                        self.measure(sampler, &selected, &labels, &mut state, previous.as_ref());
                    if let (Some(m), Some(reporter)) = (measured, reporter.as_mut()) {
                        if m.print {
                            reporter.row(&layout, &self.cells(&labels, &m))?;
                        }
                    }
                }
                if odometer.advance() == Step::Reset {
                    state.baseline = None;
                }
            }

            if let Some(reporter) = reporter.as_mut() {
                reporter.finish(&layout)?;
            }
        }

        if cfg.json_only {
            writeln!(out, "{}", state.results.to_json_line()?)?;
        }
        if let Some(path) = cfg.save_path() {
            state.results.save(path)?;
        }
        Ok(state.results)
    }

    fn write_preamble<W: Write>(
        &self,
        out: &mut W,
        registry: &DimensionRegistry,
        selected: &[String],
        diff: bool,
    ) -> io::Result<()> {
        writeln!(out, "{}", self.title)?;
        let available = registry
            .available()
            .map(|dim| {
                let mut flags = Vec::new();
                if dim.kind == DimensionKind::Dynamic {
                    flags.push("dyn");
                }
                if dim.default.is_some() {
                    flags.push("default");
                }
                if flags.is_empty() {
                    dim.name.clone()
                } else {
                    format!("{}({})", dim.name, flags.join(", "))
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "Available dimensions: {}", available)?;
        let values = registry
            .available()
            .map(|dim| format!("{}({})", dim.name, dim.values.join(", ")))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "Values: {}", values)?;
        writeln!(out, "Selected: {}", selected.join(", "))?;
        let mode = match (diff, self.config.save_path().is_some()) {
            (true, true) => "previous file (update)",
            (true, false) => "previous file",
            (false, _) => "first row",
        };
        writeln!(out, "Diff mode: {}", mode)
    }

    /// Merges defaults with the selected labels.
    fn combination(&self, selected: &[String], labels: &[&str]) -> Combination {
        let mut combination: Combination = self
            .config
            .defaults
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, label) in selected.iter().zip(labels) {
            combination.insert(name.clone(), *label);
        }
        combination
    }

    /// Static arguments in declaration order, then options, then the patcher.
    fn arguments(&self, combination: &Combination, resolved: &Resolved<'_, A>) -> Vec<A> {
        let mut args: Vec<A> = self
            .dimensions
            .names()
            .filter_map(|name| {
                let label = combination.get(name)?;
                self.dimensions.argument(name, label).cloned()
            })
            .collect();
        if let Some(options) = resolved.options {
            args.extend(options.iter().cloned());
        }
        match &self.config.argument_patcher {
            Some(patch) => patch(args, combination),
            None => args,
        }
    }

    fn measure(
        &self,
        sampler: &mut dyn Sampler,
        selected: &[String],
        labels: &[&str],
        state: &mut RunState,
        previous: Option<&PersistedRun>,
    ) -> Option<Measured> {
        let cfg = &self.config;
        let combination = self.combination(selected, labels);
        let key = combination.row_key();

        let path: Option<Vec<&str>> = cfg
            .dynamic_dimensions
            .iter()
            .map(|dim| combination.get(dim))
            .collect();
        let Some(resolved) = path.and_then(|p| self.libs.resolve(&p)) else {
            tracing::debug!(row = %key, "no implementation, skipping");
            return None;
        };
        if let Some(predicate) = &cfg.filter_predicate {
            if !predicate(&combination) {
                tracing::debug!(row = %key, "rejected by filter predicate");
                return None;
            }
        }

        let args = self.arguments(&combination, &resolved);
        let samples = resolved
            .samples
            .unwrap_or(&cfg.sample_count)
            .resolve(&args);
        let mut dry = DryRunSampler;
        let sampler: &mut dyn Sampler = if cfg.dry_run {
            &mut dry
        } else {
            sampler
        };
        tracing::debug!(row = %key, samples, dry_run = cfg.dry_run, "sampling");
        let bench = resolved.bench;
        let sample = sampler.sample(&mut || bench(args.as_slice()), samples);

        let metric_values: Vec<f64> = cfg
            .metrics
            .iter()
            .map(|(name, metric)| {
                metric.evaluate(name, &combination, &sample.stats, &sample.per_sec, &args)
            })
            .collect();

        let starts_segment = state.baseline.is_none();
        let baseline = state.baseline.get_or_insert_with(|| BaselineState {
            ops_per_sec: sample.per_sec.clone(),
            mean: sample.stats.mean.clone(),
            metric_values: metric_values.clone(),
        });
        if starts_segment {
            tracing::debug!(row = %key, ops_per_sec = %baseline.ops_per_sec, "new baseline");
        }

        let prior = match previous {
            Some(prev) => match prev.get(&key) {
                Some(row) => Prior {
                    mean: row.statistics.mean.clone(),
                    metric_values: row.metric_values.clone(),
                    comparable: true,
                },
                None => Prior {
                    mean: sample.stats.mean.clone(),
                    metric_values: metric_values.clone(),
                    comparable: false,
                },
            },
            None => Prior {
                mean: baseline.mean.clone(),
                metric_values: baseline.metric_values.clone(),
                comparable: !starts_segment,
            },
        };

        let change = change_percent(
            &sample.stats.mean,
            &metric_values,
            &prior.mean,
            &prior.metric_values,
        );
        let print = previous.is_none()
            || cfg.always_print_unchanged
            || change > cfg.change_threshold_percent;

        state.results.insert(
            key,
            RawRow {
                combination,
                statistics: sample.stats.clone(),
                throughput: sample.per_sec.clone(),
                metric_values: metric_values.clone(),
            },
        );

        Some(Measured {
            sample,
            metric_values,
            prior,
            print,
        })
    }

    fn cells(&self, labels: &[&str], m: &Measured) -> Vec<Cell> {
        let mut cells: Vec<Cell> = labels.iter().map(|l| Cell::plain(*l)).collect();
        for (i, (_, metric)) in self.config.metrics.iter().enumerate() {
            let value = m.metric_values[i];
            cells.push(Cell::new(format_metric(value), Tone::Value));
            if metric.show_diff {
                cells.push(if m.prior.comparable {
                    let prior = m.prior.metric_values.get(i).copied().unwrap_or(value);
                    percent_metric(value, prior, metric.direction)
                } else {
                    Cell::no_prior()
                });
            }
        }
        cells.push(Cell::new(m.sample.per_sec_str.clone(), Tone::Throughput));
        cells.push(Cell::new(format!("{}/op", m.sample.per_op_str), Tone::Value));
        cells.push(if m.prior.comparable {
            percent_duration(&m.sample.stats.mean, &m.prior.mean)
        } else {
            Cell::no_prior()
        });
        cells.push(Cell::plain(if m.sample.stats.rme >= 1.0 {
            m.sample.stats.formatted.clone()
        } else {
            String::new()
        }));
        cells
    }
}

/// Runs a comparison with the wall-clock sampler, printing to stdout.
pub fn compare<A: Clone>(
    title: impl Into<String>,
    dimensions: StaticDimensions<A>,
    libs: LibTree<A>,
    config: CompareConfig<A>,
) -> Result<PersistedRun> {
    Compare::new(title, dimensions, libs, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_change_symmetric() {
        let base = BigUint::from(100u32);
        assert_eq!(relative_change_duration(&BigUint::from(105u32), &base), 5.0);
        assert_eq!(relative_change_duration(&BigUint::from(95u32), &base), 5.0);
        assert_eq!(relative_change(105.0, 100.0), 5.0);
        assert_eq!(relative_change(95.0, 100.0), 5.0);
    }

    #[test]
    fn test_zero_prior_contributes_nothing() {
        assert_eq!(
            relative_change_duration(&BigUint::from(1_000u32), &BigUint::zero()),
            0.0
        );
        assert_eq!(relative_change(42.0, 0.0), 0.0);
    }

    #[test]
    fn test_change_percent_takes_maximum() {
        let change = change_percent(
            &BigUint::from(102u32),
            &[1.5, 10.0],
            &BigUint::from(100u32),
            &[1.0, 10.0],
        );
        assert_eq!(change, 50.0);
    }

    #[test]
    fn test_change_percent_missing_prior_metric() {
        let change = change_percent(&BigUint::from(100u32), &[3.0], &BigUint::from(100u32), &[]);
        assert_eq!(change, 0.0);
    }

    #[test]
    fn test_negative_prior_metric() {
        assert_eq!(relative_change(-90.0, -100.0), 10.0);
    }
}
