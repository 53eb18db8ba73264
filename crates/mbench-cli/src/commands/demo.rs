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

//! Demo command: checksums and hashes over sizes and chunk counts.

use mbench::core::{
    CompareConfig, Direction, LibGroup, LibTree, Metric, SampleCount, StaticDimensions,
};
use mbench::harness::Compare;
use num_traits::ToPrimitive;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::hint::black_box;
use std::path::PathBuf;
use std::rc::Rc;

const KIB: usize = 1024;
const MIB: usize = 1024 * KIB;

/// Flag values of the `demo` command.
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    /// Filter expression.
    pub filter: Option<String>,
    /// Dimension order override.
    pub dims: Option<Vec<String>>,
    /// Print only the JSON result.
    pub json: bool,
    /// Skip sampling.
    pub dry_run: bool,
    /// Vertical output.
    pub compact: bool,
    /// Previous-run file.
    pub prev_file: Option<PathBuf>,
    /// Compare against the previous-run file.
    pub diff: bool,
    /// Store the run in the previous-run file.
    pub update: bool,
    /// Print rows below the threshold in diff mode.
    pub unchanged: bool,
    /// Change threshold in percent.
    pub threshold: Option<f64>,
    /// Samples per combination.
    pub samples: Option<u64>,
    /// Colorize the report.
    pub color: bool,
}

impl DemoOptions {
    /// Applies the flags to `config`.
    pub fn apply(self, mut config: CompareConfig<usize>) -> CompareConfig<usize> {
        config.filter = self.filter.or(config.filter);
        config.selected_dimensions = self.dims.or(config.selected_dimensions);
        config.prev_file = self.prev_file.or(config.prev_file);
        if let Some(threshold) = self.threshold {
            config.change_threshold_percent = threshold;
        }
        if let Some(samples) = self.samples {
            config.sample_count = SampleCount::Fixed(samples);
        }
        config
            .with_json_only(self.json)
            .with_dry_run(self.dry_run)
            .with_compact(self.compact)
            .with_load_previous(self.diff)
            .with_save_previous(self.update)
            .with_always_print_unchanged(self.unchanged)
            .with_color(self.color)
    }
}

/// Input sizes and chunk counts. Arguments are `[bytes, chunks]`.
pub fn demo_dimensions() -> StaticDimensions<usize> {
    StaticDimensions::new()
        .with_dimension("size", [("1KB", KIB), ("64KB", 64 * KIB), ("1MB", MIB)])
        .with_dimension("chunks", [("1", 1), ("16", 16)])
}

/// `algorithm` × `library` tree of implementations.
pub fn demo_libraries() -> LibTree<usize> {
    let data: Rc<[u8]> = (0..MIB).map(|i| (i % 251) as u8).collect();
    LibGroup::new()
        .with_group(
            "checksum",
            LibGroup::new()
                .with_leaf("wrapping", chunked(&data, wrapping_sum))
                .with_leaf("adler32", chunked(&data, adler32)),
        )
        .with_group(
            "hash",
            LibGroup::new()
                .with_leaf("siphash", chunked(&data, siphash))
                .with_leaf("fnv1a", chunked(&data, fnv1a)),
        )
}

/// Demo configuration before flags and environment overrides.
pub fn demo_config() -> CompareConfig<usize> {
    CompareConfig::default()
        .with_dynamic_dimensions(["algorithm", "library"])
        .with_metric(
            "Speed",
            Metric::new(|_, _, per_sec, args: &[usize]| {
                let mib_per_sec = per_sec.to_f64().unwrap_or(0.0) * args[0] as f64 / MIB as f64;
                (mib_per_sec * 100.0).round() / 100.0
            })
            .with_unit("MiB/s")
            .with_direction(Direction::HigherIsBetter)
            .with_diff(true),
        )
}

/// Runs the demo comparison.
///
/// # Errors
///
/// Any error reported by the comparison engine.
pub fn demo(options: DemoOptions) -> mbench::Result<()> {
    tracing::debug!(?options, "demo flags");
    let config = options.apply(demo_config()).with_env();
    Compare::new(
        "Checksums and hashes",
        demo_dimensions(),
        demo_libraries(),
        config,
    )
    .run()?;
    Ok(())
}

fn chunked(data: &Rc<[u8]>, f: fn(&[u8]) -> u64) -> impl Fn(&[usize]) + 'static {
    let data = Rc::clone(data);
    move |args: &[usize]| {
        let size = args[0].min(data.len());
        let chunk = (size / args[1].max(1)).max(1);
        for part in data[..size].chunks(chunk) {
            black_box(f(black_box(part)));
        }
    }
}

fn wrapping_sum(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| acc.wrapping_add(u64::from(b)))
}

fn adler32(bytes: &[u8]) -> u64 {
    const MOD: u32 = 65_521;
    let (mut a, mut b) = (1u32, 0u32);
    for chunk in bytes.chunks(5552) {
        for &byte in chunk {
            a += u32::from(byte);
            b += a;
        }
        a %= MOD;
        b %= MOD;
    }
    u64::from((b << 16) | a)
}

fn siphash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    hasher.finish()
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbench::core::DimensionRegistry;

    #[test]
    fn test_adler32_known_value() {
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn test_fnv1a_known_value() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_demo_matrix() {
        let config = demo_config();
        let registry = DimensionRegistry::resolve(
            &demo_dimensions(),
            &demo_libraries(),
            &config.dynamic_dimensions,
            &config.defaults,
        )
        .unwrap();
        let selected = registry.select(None).unwrap();
        assert_eq!(selected, vec!["size", "chunks", "algorithm", "library"]);
        let library = registry.get("library").unwrap();
        assert_eq!(
            library.values,
            vec!["wrapping", "adler32", "siphash", "fnv1a"]
        );
    }

    #[test]
    fn test_flags_applied() {
        let config = DemoOptions {
            filter: Some("1KB".to_string()),
            samples: Some(3),
            threshold: Some(1.5),
            json: true,
            ..DemoOptions::default()
        }
        .apply(demo_config());
        assert_eq!(config.filter.as_deref(), Some("1KB"));
        assert_eq!(config.sample_count.resolve(&[]), 3);
        assert_eq!(config.change_threshold_percent, 1.5);
        assert!(config.json_only);
        assert!(!config.color);
    }
}
