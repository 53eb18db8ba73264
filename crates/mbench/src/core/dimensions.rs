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

//! Dimension registry.
//!
//! A comparison matrix is spanned by two kinds of dimensions:
//!
//! - **Static** dimensions are declared up front as an ordered mapping of
//!   value labels to the argument value passed to the benchmark.
//! - **Dynamic** dimensions are discovered from the library tree: every depth
//!   level of the tree is one dimension, and the labels found at that depth
//!   (breadth-first, first discovery wins) are its values.
//!
//! The registry resolves both kinds into ordered label lists and decides which
//! dimensions are iterated by the enumerator.

use crate::error::{MbenchError, Result};
use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;

/// A benchmark implementation, called with the resolved argument list.
pub type BenchFn<A> = Box<dyn Fn(&[A])>;

/// Computes a sample count from the resolved argument list.
pub type SampleFn<A> = Box<dyn Fn(&[A]) -> u64>;

/// Number of samples taken for one combination.
pub enum SampleCount<A> {
    /// Same count for every combination.
    Fixed(u64),
    /// Count derived from the combination's arguments.
    Computed(SampleFn<A>),
}

impl<A> SampleCount<A> {
    /// Creates a computed sample count.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&[A]) -> u64 + 'static,
    {
        SampleCount::Computed(Box::new(f))
    }

    /// Resolves the count for the given arguments.
    pub fn resolve(&self, args: &[A]) -> u64 {
        match self {
            SampleCount::Fixed(n) => *n,
            SampleCount::Computed(f) => f(args),
        }
    }
}

impl<A> Default for SampleCount<A> {
    fn default() -> Self {
        SampleCount::Fixed(10)
    }
}

/// A node of the library tree.
pub enum LibNode<A> {
    /// An executable benchmark.
    Leaf(BenchFn<A>),
    /// An inner node whose children are labelled by the next dynamic dimension.
    Group(LibGroup<A>),
}

/// Inner library tree node with optional per-subtree configuration.
pub struct LibGroup<A> {
    /// Extra arguments appended after the static dimension arguments.
    pub options: Option<Vec<A>>,
    /// Sample count override for this subtree.
    pub samples: Option<SampleCount<A>>,
    /// Children in declaration order.
    pub children: IndexMap<String, LibNode<A>>,
}

/// The root of the library tree.
pub type LibTree<A> = LibGroup<A>;

impl<A> Default for LibGroup<A> {
    fn default() -> Self {
        Self {
            options: None,
            samples: None,
            children: IndexMap::new(),
        }
    }
}

impl<A> LibGroup<A> {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an executable benchmark under `label`.
    pub fn with_leaf<F>(mut self, label: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[A]) + 'static,
    {
        self.children.insert(label.into(), LibNode::Leaf(Box::new(f)));
        self
    }

    /// Adds a nested group under `label`.
    pub fn with_group(mut self, label: impl Into<String>, group: LibGroup<A>) -> Self {
        self.children.insert(label.into(), LibNode::Group(group));
        self
    }

    /// Sets the options appended to the arguments of every benchmark below.
    pub fn with_options(mut self, options: Vec<A>) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the sample count for every benchmark below.
    pub fn with_samples(mut self, samples: SampleCount<A>) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Looks up the implementation addressed by `path` (one label per dynamic
    /// dimension).
    ///
    /// Returns `None` unless the path ends on a leaf at exactly the last
    /// depth. Options and sample overrides are taken from the nearest group on
    /// the path that declares them.
    pub fn resolve(&self, path: &[&str]) -> Option<Resolved<'_, A>> {
        let mut group = self;
        let mut options = None;
        let mut samples = None;
        for (depth, label) in path.iter().enumerate() {
            if group.options.is_some() {
                options = group.options.as_deref();
            }
            if group.samples.is_some() {
                samples = group.samples.as_ref();
            }
            match (group.children.get(*label)?, depth + 1 == path.len()) {
                (LibNode::Leaf(bench), true) => {
                    return Some(Resolved {
                        bench,
                        options,
                        samples,
                    })
                }
                (LibNode::Group(child), false) => group = child,
                _ => return None,
            }
        }
        None
    }
}

/// A benchmark implementation together with its subtree configuration.
pub struct Resolved<'a, A> {
    /// The benchmark to run.
    pub bench: &'a BenchFn<A>,
    /// Options to append to the arguments.
    pub options: Option<&'a [A]>,
    /// Sample count override.
    pub samples: Option<&'a SampleCount<A>>,
}

/// Statically declared dimensions: name → ordered (label → argument value).
pub struct StaticDimensions<A> {
    dims: IndexMap<String, IndexMap<String, A>>,
}

impl<A> Default for StaticDimensions<A> {
    fn default() -> Self {
        Self {
            dims: IndexMap::new(),
        }
    }
}

impl<A> StaticDimensions<A> {
    /// Creates an empty set of static dimensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a dimension with its labelled argument values.
    pub fn with_dimension<L, I>(mut self, name: impl Into<String>, values: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, A)>,
    {
        let values = values.into_iter().map(|(l, v)| (l.into(), v)).collect();
        self.dims.insert(name.into(), values);
        self
    }

    /// Dimension names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dims.keys().map(String::as_str)
    }

    /// Returns true if `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.dims.contains_key(name)
    }

    /// Value labels of a dimension in declaration order.
    pub fn labels(&self, name: &str) -> Option<Vec<String>> {
        self.dims.get(name).map(|values| values.keys().cloned().collect())
    }

    /// The argument value bound to `label` in dimension `name`.
    pub fn argument(&self, name: &str, label: &str) -> Option<&A> {
        self.dims.get(name)?.get(label)
    }
}

/// Where a dimension's values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    /// Declared in the static dimension map.
    Static,
    /// Discovered from the library tree.
    Dynamic,
}

/// A named axis of variation with its ordered value labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    /// Dimension name.
    pub name: String,
    /// Static or dynamic.
    pub kind: DimensionKind,
    /// Value labels in iteration order.
    pub values: Vec<String>,
    /// Fixed value used when the dimension is not selected.
    pub default: Option<String>,
}

impl Dimension {
    /// Header-column width: longest of the name and every label.
    pub fn column_width(&self) -> usize {
        self.values
            .iter()
            .map(|v| v.chars().count())
            .chain(std::iter::once(self.name.chars().count()))
            .max()
            .unwrap_or(0)
    }
}

/// Discovers the labels of each dynamic dimension by walking the library tree
/// breadth-first.
///
/// Entry `d` of the result holds the distinct labels found at depth `d`, in
/// first-discovery order. The walk never descends past `depth` levels.
pub fn discover_dynamic<A>(tree: &LibTree<A>, depth: usize) -> Vec<Vec<String>> {
    let mut found: Vec<IndexSet<String>> = vec![IndexSet::new(); depth];
    if depth == 0 {
        return Vec::new();
    }
    let mut queue: VecDeque<(usize, &String, &LibNode<A>)> =
        tree.children.iter().map(|(k, v)| (0, k, v)).collect();
    while let Some((level, label, node)) = queue.pop_front() {
        found[level].insert(label.clone());
        if let LibNode::Group(group) = node {
            if level + 1 < depth {
                queue.extend(group.children.iter().map(|(k, v)| (level + 1, k, v)));
            }
        }
    }
    found.into_iter().map(|set| set.into_iter().collect()).collect()
}

/// Resolved static and dynamic dimensions of one run.
#[derive(Debug, Clone)]
pub struct DimensionRegistry {
    static_dims: Vec<Dimension>,
    dynamic_dims: Vec<Dimension>,
}

impl DimensionRegistry {
    /// Resolves every dimension of a run.
    ///
    /// # Errors
    ///
    /// - [`MbenchError::DimensionConflict`] if a dynamic name is also static
    /// - [`MbenchError::Config`] if no dynamic dimension is declared, or a
    ///   default names a label its static dimension does not have
    pub fn resolve<A>(
        statics: &StaticDimensions<A>,
        tree: &LibTree<A>,
        dynamic_names: &[String],
        defaults: &IndexMap<String, String>,
    ) -> Result<Self> {
        if dynamic_names.is_empty() {
            return Err(MbenchError::config(
                "dynamic_dimensions",
                "at least one library dimension is required",
            ));
        }
        if let Some(name) = dynamic_names.iter().find(|n| statics.contains(n)) {
            return Err(MbenchError::DimensionConflict(name.clone()));
        }

        let mut static_dims = Vec::new();
        for name in statics.names() {
            let values = statics.labels(name).unwrap_or_default();
            let default = defaults.get(name).cloned();
            if let Some(label) = &default {
                if !values.contains(label) {
                    return Err(MbenchError::config(
                        "defaults",
                        format!("'{}' is not a value of dimension '{}'", label, name),
                    ));
                }
            }
            static_dims.push(Dimension {
                name: name.to_string(),
                kind: DimensionKind::Static,
                values,
                default,
            });
        }

        let dynamic_dims = dynamic_names
            .iter()
            .zip(discover_dynamic(tree, dynamic_names.len()))
            .map(|(name, values)| Dimension {
                name: name.clone(),
                kind: DimensionKind::Dynamic,
                values,
                default: defaults.get(name).cloned(),
            })
            .collect();

        Ok(Self {
            static_dims,
            dynamic_dims,
        })
    }

    /// Looks up a dimension by name.
    pub fn get(&self, name: &str) -> Option<&Dimension> {
        self.static_dims
            .iter()
            .chain(&self.dynamic_dims)
            .find(|d| d.name == name)
    }

    /// Every dimension, dynamic ones first, as listed in the run preamble.
    pub fn available(&self) -> impl Iterator<Item = &Dimension> {
        self.dynamic_dims.iter().chain(&self.static_dims)
    }

    /// Picks the dimensions the enumerator iterates, in iteration order.
    ///
    /// Without an override this is every dimension lacking a default, static
    /// ones first. An override is honored as given, then every dimension that
    /// lacks a default is appended because its value could not be resolved
    /// otherwise.
    ///
    /// # Errors
    ///
    /// [`MbenchError::Config`] if the override names an unknown dimension.
    pub fn select(&self, overrides: Option<&[String]>) -> Result<Vec<String>> {
        let mut selected: IndexSet<String> = match overrides {
            Some(names) => {
                if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
                    return Err(MbenchError::config(
                        "selected_dimensions",
                        format!("unknown dimension '{}'", unknown),
                    ));
                }
                names.iter().cloned().collect()
            }
            None => self
                .static_dims
                .iter()
                .chain(&self.dynamic_dims)
                .filter(|d| d.default.is_none())
                .map(|d| d.name.clone())
                .collect(),
        };
        for dim in self.available().filter(|d| d.default.is_none()) {
            selected.insert(dim.name.clone());
        }
        Ok(selected.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> LibTree<u32> {
        LibGroup::new()
            .with_group(
                "add",
                LibGroup::new()
                    .with_group("js", LibGroup::new().with_leaf("unix", |_| {}))
                    .with_group(
                        "wasm",
                        LibGroup::new()
                            .with_leaf("unix", |_| {})
                            .with_leaf("mac", |_| {}),
                    ),
            )
            .with_group(
                "mul",
                LibGroup::new()
                    .with_options(vec![7])
                    .with_samples(SampleCount::Fixed(3))
                    .with_group("native", LibGroup::new().with_leaf("win", |_| {})),
            )
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_discover_breadth_first() {
        let found = discover_dynamic(&tree(), 3);
        assert_eq!(found[0], names(&["add", "mul"]));
        // siblings of every depth-1 node before descending
        assert_eq!(found[1], names(&["js", "wasm", "native"]));
        assert_eq!(found[2], names(&["unix", "mac", "win"]));
    }

    #[test]
    fn test_discover_respects_depth() {
        let found = discover_dynamic(&tree(), 1);
        assert_eq!(found, vec![names(&["add", "mul"])]);
        assert!(discover_dynamic(&tree(), 0).is_empty());
    }

    #[test]
    fn test_resolve_leaf_and_overrides() {
        let t = tree();
        let resolved = t.resolve(&["mul", "native", "win"]).unwrap();
        assert_eq!(resolved.options, Some(&[7][..]));
        assert_eq!(resolved.samples.map(|s| s.resolve(&[])), Some(3));

        let resolved = t.resolve(&["add", "js", "unix"]).unwrap();
        assert!(resolved.options.is_none());
        assert!(resolved.samples.is_none());
    }

    #[test]
    fn test_resolve_sparse_matrix() {
        let t = tree();
        assert!(t.resolve(&["add", "js", "mac"]).is_none());
        assert!(t.resolve(&["mul", "js", "unix"]).is_none());
        // group at the last depth is not an implementation
        assert!(t.resolve(&["add", "js"]).is_none());
        assert!(t.resolve(&[]).is_none());
    }

    #[test]
    fn test_static_and_dynamic_conflict() {
        let statics = StaticDimensions::new().with_dimension("algo", [("a", 1u32)]);
        let err = DimensionRegistry::resolve(&statics, &tree(), &names(&["algo"]), &IndexMap::new())
            .unwrap_err();
        assert_eq!(err, MbenchError::DimensionConflict("algo".to_string()));
    }

    #[test]
    fn test_default_must_be_declared_label() {
        let statics = StaticDimensions::new().with_dimension("size", [("1KB", 1u32)]);
        let mut defaults = IndexMap::new();
        defaults.insert("size".to_string(), "8KB".to_string());
        let err = DimensionRegistry::resolve(&statics, &tree(), &names(&["algo"]), &defaults)
            .unwrap_err();
        assert!(matches!(err, MbenchError::Config { .. }));
    }

    #[test]
    fn test_select_defaults_and_override() {
        let statics = StaticDimensions::new()
            .with_dimension("size", [("1KB", 1u32), ("1MB", 2)])
            .with_dimension("chunks", [("2", 2u32), ("4", 4)]);
        let mut defaults = IndexMap::new();
        defaults.insert("chunks".to_string(), "2".to_string());
        let registry = DimensionRegistry::resolve(
            &statics,
            &tree(),
            &names(&["algo", "platform", "library"]),
            &defaults,
        )
        .unwrap();

        assert_eq!(
            registry.select(None).unwrap(),
            names(&["size", "algo", "platform", "library"])
        );

        // override keeps its order, required dimensions are appended
        assert_eq!(
            registry.select(Some(&names(&["chunks", "library"]))).unwrap(),
            names(&["chunks", "library", "algo", "platform", "size"])
        );

        assert!(registry.select(Some(&names(&["nope"]))).is_err());
    }

    #[test]
    fn test_column_width() {
        let dim = Dimension {
            name: "size".to_string(),
            kind: DimensionKind::Static,
            values: names(&["1KB", "1024KB"]),
            default: None,
        };
        assert_eq!(dim.column_width(), 6);
    }
}
