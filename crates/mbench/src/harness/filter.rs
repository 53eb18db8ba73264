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

//! Keyword filtering of combinations.
//!
//! `noble|stable,1KB|8KB` matches when some value contains `noble` or
//! `stable`, and some value contains `1KB` or `8KB`.

/// A parsed filter expression: facets are AND-ed, alternatives are OR-ed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    facets: Vec<Vec<String>>,
}

impl Filter {
    /// Parses a filter expression.
    pub fn parse(expr: &str) -> Self {
        let facets = expr
            .split(',')
            .map(|facet| facet.split('|').map(str::to_string).collect())
            .collect();
        Self { facets }
    }

    /// Returns true if every facet has an alternative contained in some value.
    pub fn matches<S: AsRef<str>>(&self, values: &[S]) -> bool {
        self.facets.iter().all(|alternatives| {
            values.iter().any(|value| {
                alternatives
                    .iter()
                    .any(|alt| value.as_ref().contains(alt.as_str()))
            })
        })
    }
}

/// Applies an optional filter; no filter always passes.
pub fn filter_values<S: AsRef<str>>(filter: Option<&Filter>, values: &[S]) -> bool {
    filter.map_or(true, |f| f.matches(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facets_and_alternatives() {
        let filter = Filter::parse("a|b,c");
        assert!(filter.matches(&["a", "c"]));
        assert!(filter.matches(&["b", "c"]));
        assert!(!filter.matches(&["a", "z"]));
    }

    #[test]
    fn test_substring_containment() {
        let filter = Filter::parse("KB");
        assert!(filter.matches(&["1KB", "noble"]));
        assert!(!filter.matches(&["1MB", "noble"]));
    }

    #[test]
    fn test_any_dimension_satisfies_facet() {
        let filter = Filter::parse("stable,unix");
        assert!(filter.matches(&["unix", "wasm", "stable-1"]));
    }

    #[test]
    fn test_no_filter_passes() {
        assert!(filter_values::<&str>(None, &[]));
        assert!(filter_values(None, &["anything"]));
    }

    #[test]
    fn test_empty_values_fail_non_empty_filter() {
        let filter = Filter::parse("a");
        assert!(!filter.matches::<&str>(&[]));
    }
}
