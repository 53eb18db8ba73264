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

//! Comparison run configuration.
//!
//! [`CompareConfig`] holds every recognized option with its default. The
//! environment can override a subset of them; [`EnvOverrides`] parses those
//! variables into a partial override without touching the configuration, so
//! the parsing stays a pure function of its input.

use super::dimensions::SampleCount;
use super::metrics::Metric;
use super::Combination;
use crate::error::{MbenchError, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Default change threshold in percent for printing rows in diff mode.
pub const DEFAULT_CHANGE_THRESHOLD: f64 = 5.0;

/// Default dynamic dimension name when none is configured.
pub const DEFAULT_DYNAMIC_DIMENSION: &str = "name";

/// Filter expression: `a|b,c` matches (a OR b) AND c.
pub const ENV_FILTER: &str = "MBENCH_FILTER";
/// Comma separated dimension order override.
pub const ENV_DIMS: &str = "MBENCH_DIMS";
/// Print only the single-line JSON result.
pub const ENV_JSON: &str = "MBENCH_JSON";
/// Skip sampling, render the table with zero statistics.
pub const ENV_DRY_RUN: &str = "MBENCH_DRY_RUN";
/// Vertical label/value output instead of a table.
pub const ENV_COMPACT: &str = "MBENCH_COMPACT";
/// Compare against the run stored in the previous-run file.
pub const ENV_DIFF: &str = "MBENCH_DIFF";
/// Store this run in the previous-run file.
pub const ENV_UPDATE: &str = "MBENCH_UPDATE";
/// Print rows even when they did not change beyond the threshold.
pub const ENV_UNCHANGED: &str = "MBENCH_UNCHANGED";

/// Caller predicate over a combination with defaults merged in.
pub type FilterFn = Box<dyn Fn(&Combination) -> bool>;

/// Rewrites the resolved argument list of a combination.
pub type PatchFn<A> = Box<dyn Fn(Vec<A>, &Combination) -> Vec<A>>;

/// Configuration of one comparison run.
///
/// # Example
///
/// ```no_run
/// use mbench::core::config::CompareConfig;
///
/// let config: CompareConfig<u64> = CompareConfig::default()
///     .with_dynamic_dimensions(["algorithm", "library"])
///     .with_filter("sha|blake,1KB")
///     .with_prev_file("bench.json");
/// ```
pub struct CompareConfig<A> {
    /// Dynamic dimension names, outermost tree level first.
    pub dynamic_dimensions: Vec<String>,
    /// Fixed values of dimensions that are not iterated.
    pub defaults: IndexMap<String, String>,
    /// Dimension order override.
    pub selected_dimensions: Option<Vec<String>>,
    /// Substring filter expression.
    pub filter: Option<String>,
    /// Caller predicate, run after the implementation lookup.
    pub filter_predicate: Option<FilterFn>,
    /// Print only the JSON result.
    pub json_only: bool,
    /// Do not sample; report zero statistics.
    pub dry_run: bool,
    /// Argument rewriting hook.
    pub argument_patcher: Option<PatchFn<A>>,
    /// Samples per combination unless the library tree overrides it.
    pub sample_count: SampleCount<A>,
    /// Vertical output.
    pub compact: bool,
    /// Derived metrics in column order.
    pub metrics: IndexMap<String, Metric<A>>,
    /// Previous-run file used for diffing and updating.
    pub prev_file: Option<PathBuf>,
    /// Diff against the previous-run file.
    pub load_previous: bool,
    /// Write this run to the previous-run file.
    pub save_previous: bool,
    /// Print rows below the change threshold in diff mode.
    pub always_print_unchanged: bool,
    /// Minimum change in percent for a row to be printed in diff mode.
    pub change_threshold_percent: f64,
    /// Colorize the report.
    pub color: bool,
}

impl<A> Default for CompareConfig<A> {
    fn default() -> Self {
        Self {
            dynamic_dimensions: vec![DEFAULT_DYNAMIC_DIMENSION.to_string()],
            defaults: IndexMap::new(),
            selected_dimensions: None,
            filter: None,
            filter_predicate: None,
            json_only: false,
            dry_run: false,
            argument_patcher: None,
            sample_count: SampleCount::default(),
            compact: false,
            metrics: IndexMap::new(),
            prev_file: None,
            load_previous: false,
            save_previous: false,
            always_print_unchanged: false,
            change_threshold_percent: DEFAULT_CHANGE_THRESHOLD,
            color: true,
        }
    }
}

impl<A> CompareConfig<A> {
    /// Sets the dynamic dimension names.
    pub fn with_dynamic_dimensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dynamic_dimensions = names.into_iter().map(Into::into).collect();
        self
    }

    /// Fixes `dimension` to `value` unless the dimension is selected.
    pub fn with_default(mut self, dimension: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(dimension.into(), value.into());
        self
    }

    /// Overrides the iterated dimensions and their order.
    pub fn with_selected_dimensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_dimensions = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the filter expression.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets the caller predicate.
    pub fn with_filter_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Combination) -> bool + 'static,
    {
        self.filter_predicate = Some(Box::new(predicate));
        self
    }

    /// Enables JSON-only output.
    pub fn with_json_only(mut self, json_only: bool) -> Self {
        self.json_only = json_only;
        self
    }

    /// Enables dry runs.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the argument rewriting hook.
    pub fn with_argument_patcher<F>(mut self, patcher: F) -> Self
    where
        F: Fn(Vec<A>, &Combination) -> Vec<A> + 'static,
    {
        self.argument_patcher = Some(Box::new(patcher));
        self
    }

    /// Sets the default sample count.
    pub fn with_sample_count(mut self, samples: SampleCount<A>) -> Self {
        self.sample_count = samples;
        self
    }

    /// Enables compact output.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Adds a metric column.
    pub fn with_metric(mut self, name: impl Into<String>, metric: Metric<A>) -> Self {
        self.metrics.insert(name.into(), metric);
        self
    }

    /// Sets the previous-run file.
    pub fn with_prev_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.prev_file = Some(path.into());
        self
    }

    /// Diff against the previous-run file.
    pub fn with_load_previous(mut self, load: bool) -> Self {
        self.load_previous = load;
        self
    }

    /// Store this run in the previous-run file.
    pub fn with_save_previous(mut self, save: bool) -> Self {
        self.save_previous = save;
        self
    }

    /// Print unchanged rows in diff mode.
    pub fn with_always_print_unchanged(mut self, always: bool) -> Self {
        self.always_print_unchanged = always;
        self
    }

    /// Sets the change threshold in percent.
    pub fn with_change_threshold(mut self, percent: f64) -> Self {
        self.change_threshold_percent = percent;
        self
    }

    /// Enables or disables colors.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Applies environment overrides on top of this configuration.
    pub fn with_overrides(mut self, overrides: EnvOverrides) -> Self {
        if let Some(filter) = overrides.filter {
            self.filter = Some(filter);
        }
        if let Some(dims) = overrides.dims {
            self.selected_dimensions = Some(dims);
        }
        if let Some(v) = overrides.json_only {
            self.json_only = v;
        }
        if let Some(v) = overrides.dry_run {
            self.dry_run = v;
        }
        if let Some(v) = overrides.compact {
            self.compact = v;
        }
        if let Some(v) = overrides.load_previous {
            self.load_previous = v;
        }
        if let Some(v) = overrides.save_previous {
            self.save_previous = v;
        }
        if let Some(v) = overrides.always_print_unchanged {
            self.always_print_unchanged = v;
        }
        self
    }

    /// Applies the process environment on top of this configuration.
    pub fn with_env(self) -> Self {
        self.with_overrides(EnvOverrides::from_env())
    }

    /// File to diff against, when diffing is enabled.
    pub fn load_path(&self) -> Option<&Path> {
        self.prev_file.as_deref().filter(|_| self.load_previous)
    }

    /// File to store the run in, when updating is enabled.
    pub fn save_path(&self) -> Option<&Path> {
        self.prev_file.as_deref().filter(|_| self.save_previous)
    }

    /// Checks the parts of the configuration that do not depend on the
    /// dimensions.
    ///
    /// # Errors
    ///
    /// - [`MbenchError::MetricWithoutCompute`] for a metric without compute fn
    /// - [`MbenchError::Config`] for a negative or NaN change threshold
    pub fn validate(&self) -> Result<()> {
        if let Some((name, _)) = self.metrics.iter().find(|(_, m)| m.compute.is_none()) {
            return Err(MbenchError::MetricWithoutCompute(name.clone()));
        }
        let threshold = self.change_threshold_percent;
        if threshold.is_nan() || threshold < 0.0 {
            return Err(MbenchError::config(
                "change_threshold_percent",
                "must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// Configuration overrides read from `MBENCH_*` environment variables.
///
/// `None` means the variable was not set (or empty). Flags are numeric:
/// any value that parses as a non-zero number is true.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    /// `MBENCH_FILTER`
    pub filter: Option<String>,
    /// `MBENCH_DIMS`
    pub dims: Option<Vec<String>>,
    /// `MBENCH_JSON`
    pub json_only: Option<bool>,
    /// `MBENCH_DRY_RUN`
    pub dry_run: Option<bool>,
    /// `MBENCH_COMPACT`
    pub compact: Option<bool>,
    /// `MBENCH_DIFF`
    pub load_previous: Option<bool>,
    /// `MBENCH_UPDATE`
    pub save_previous: Option<bool>,
    /// `MBENCH_UNCHANGED`
    pub always_print_unchanged: Option<bool>,
}

impl EnvOverrides {
    /// Parses overrides from key/value pairs. Unrelated keys are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut overrides = Self::default();
        for (key, value) in vars {
            let value = value.as_ref();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                ENV_FILTER => overrides.filter = Some(value.to_string()),
                ENV_DIMS => {
                    overrides.dims = Some(value.split(',').map(|s| s.trim().to_string()).collect())
                }
                ENV_JSON => overrides.json_only = Some(env_flag(value)),
                ENV_DRY_RUN => overrides.dry_run = Some(env_flag(value)),
                ENV_COMPACT => overrides.compact = Some(env_flag(value)),
                ENV_DIFF => overrides.load_previous = Some(env_flag(value)),
                ENV_UPDATE => overrides.save_previous = Some(env_flag(value)),
                ENV_UNCHANGED => overrides.always_print_unchanged = Some(env_flag(value)),
                _ => {}
            }
        }
        overrides
    }

    /// Reads overrides from the process environment. Variables whose name or
    /// value is not valid UTF-8 are ignored.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::vars_os().filter_map(|(key, value)| {
                Some((key.into_string().ok()?, value.into_string().ok()?))
            }),
        )
    }
}

fn env_flag(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|n| n != 0.0 && !n.is_nan())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_from_env_ignores_non_utf8_variables() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var("MBENCH_TEST_UNRELATED_BYTES", OsStr::from_bytes(&[0xff, 0xfe]));
        let overrides = EnvOverrides::from_env();
        std::env::remove_var("MBENCH_TEST_UNRELATED_BYTES");

        let filter = std::env::var(ENV_FILTER).ok().filter(|v| !v.is_empty());
        assert_eq!(overrides.filter, filter);
    }

    #[test]
    fn test_default_config() {
        let config: CompareConfig<u64> = CompareConfig::default();
        assert_eq!(config.dynamic_dimensions, vec!["name".to_string()]);
        assert_eq!(config.change_threshold_percent, 5.0);
        assert_eq!(config.sample_count.resolve(&[]), 10);
        assert!(config.color);
        assert!(config.load_path().is_none());
    }

    #[test]
    fn test_env_flags() {
        assert!(env_flag("1"));
        assert!(env_flag("2.5"));
        assert!(!env_flag("0"));
        assert!(!env_flag("yes"));
        assert!(!env_flag("NaN"));
    }

    #[test]
    fn test_overrides_from_vars() {
        let vars = [
            ("MBENCH_FILTER", "noble|stable,1KB"),
            ("MBENCH_DIMS", "size,name"),
            ("MBENCH_JSON", "1"),
            ("MBENCH_COMPACT", "0"),
            ("MBENCH_DRY_RUN", ""),
            ("HOME", "/root"),
        ];
        let overrides = EnvOverrides::from_vars(vars);
        assert_eq!(overrides.filter.as_deref(), Some("noble|stable,1KB"));
        assert_eq!(
            overrides.dims,
            Some(vec!["size".to_string(), "name".to_string()])
        );
        assert_eq!(overrides.json_only, Some(true));
        assert_eq!(overrides.compact, Some(false));
        assert_eq!(overrides.dry_run, None);
        assert_eq!(overrides.load_previous, None);
    }

    #[test]
    fn test_overrides_win_when_set() {
        let config: CompareConfig<u64> = CompareConfig::default()
            .with_filter("sha")
            .with_compact(true)
            .with_prev_file("bench.json");
        let overrides = EnvOverrides::from_vars([
            ("MBENCH_FILTER", "blake"),
            ("MBENCH_COMPACT", "0"),
            ("MBENCH_DIFF", "1"),
        ]);
        let config = config.with_overrides(overrides);
        assert_eq!(config.filter.as_deref(), Some("blake"));
        assert!(!config.compact);
        assert_eq!(config.load_path(), Some(Path::new("bench.json")));
        assert!(config.save_path().is_none());
    }

    #[test]
    fn test_validate_metric_without_compute() {
        let config: CompareConfig<u64> =
            CompareConfig::default().with_metric("Speed", Metric::default());
        assert_eq!(
            config.validate().unwrap_err(),
            MbenchError::MetricWithoutCompute("Speed".to_string())
        );
    }

    #[test]
    fn test_validate_threshold() {
        let config: CompareConfig<u64> = CompareConfig::default().with_change_threshold(-1.0);
        assert!(config.validate().is_err());
        let config: CompareConfig<u64> = CompareConfig::default().with_change_threshold(0.0);
        assert!(config.validate().is_ok());
    }
}
