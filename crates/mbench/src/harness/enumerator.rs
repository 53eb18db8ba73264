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

//! Odometer-style matrix enumeration.
//!
//! The last selected dimension varies fastest, the first one slowest, so rows
//! that share their outer dimensions are visited (and printed) together.
//! Every carry out of a position is reported as [`Step::Reset`]: the rows
//! after a wrap belong to a new baseline segment.

/// Outcome of advancing the odometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved to the next combination within the same segment.
    Next,
    /// Moved to the next combination after one or more positions wrapped.
    Reset,
    /// The matrix is exhausted.
    Done,
}

/// Index vector over the selected dimensions.
#[derive(Debug, Clone)]
pub struct Odometer {
    lengths: Vec<usize>,
    indices: Vec<usize>,
    done: bool,
}

impl Odometer {
    /// Creates an odometer over dimensions with the given value counts.
    ///
    /// A dimension without values makes the matrix empty. Zero dimensions
    /// yield exactly one (empty) combination.
    pub fn new(lengths: Vec<usize>) -> Self {
        let done = lengths.iter().any(|&len| len == 0);
        Self {
            indices: vec![0; lengths.len()],
            lengths,
            done,
        }
    }

    /// The current index vector, or `None` once the matrix is exhausted.
    pub fn current(&self) -> Option<&[usize]> {
        if self.done {
            None
        } else {
            Some(&self.indices)
        }
    }

    /// Increments the last index, carrying to the left on overflow.
    pub fn advance(&mut self) -> Step {
        if self.done {
            return Step::Done;
        }
        let mut wrapped = false;
        for pos in (0..self.indices.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < self.lengths[pos] {
                return if wrapped { Step::Reset } else { Step::Next };
            }
            if pos == 0 {
                break;
            }
            self.indices[pos] = 0;
            wrapped = true;
        }
        self.done = true;
        Step::Done
    }
}

/// Maps an index vector to the value labels it addresses.
pub fn materialize<'a>(values: &'a [Vec<String>], indices: &[usize]) -> Vec<&'a str> {
    values
        .iter()
        .zip(indices)
        .map(|(labels, &i)| labels[i].as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(lengths: Vec<usize>) -> Vec<(Vec<usize>, bool)> {
        let mut odometer = Odometer::new(lengths);
        let mut visited = Vec::new();
        let mut reset = false;
        while let Some(indices) = odometer.current() {
            visited.push((indices.to_vec(), reset));
            reset = odometer.advance() == Step::Reset;
        }
        visited
    }

    #[test]
    fn test_last_dimension_fastest() {
        let visited: Vec<_> = walk(vec![2, 3]).into_iter().map(|(i, _)| i).collect();
        assert_eq!(
            visited,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn test_reset_on_every_wrap() {
        let resets: Vec<_> = walk(vec![2, 2, 2])
            .into_iter()
            .filter(|(_, reset)| *reset)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(resets, vec![vec![0, 1, 0], vec![1, 0, 0], vec![1, 1, 0]]);
    }

    #[test]
    fn test_empty_dimension() {
        assert!(walk(vec![3, 0, 2]).is_empty());
    }

    #[test]
    fn test_no_dimensions() {
        assert_eq!(walk(vec![]), vec![(vec![], false)]);
    }

    #[test]
    fn test_single_dimension_never_resets() {
        let visited = walk(vec![4]);
        assert_eq!(visited.len(), 4);
        assert!(visited.iter().all(|(_, reset)| !reset));
    }

    #[test]
    fn test_materialize() {
        let values = vec![
            vec!["1KB".to_string(), "1MB".to_string()],
            vec!["2".to_string(), "4".to_string()],
        ];
        assert_eq!(materialize(&values, &[1, 0]), vec!["1MB", "2"]);
    }
}
