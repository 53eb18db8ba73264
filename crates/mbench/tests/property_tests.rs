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

//! Property-based tests for enumeration, filtering and the bigint codec.

use mbench::harness::enumerator::{Odometer, Step};
use mbench::harness::Filter;
use mbench::persist::BigIntCodec;
use num_bigint::BigUint;
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn odometer_visits_cartesian_product_once(lengths in prop::collection::vec(1usize..5, 0..5)) {
        let mut odometer = Odometer::new(lengths.clone());
        let mut seen = HashSet::new();
        let mut resets = 0usize;
        while let Some(indices) = odometer.current() {
            prop_assert!(indices.iter().zip(&lengths).all(|(i, len)| i < len));
            prop_assert!(seen.insert(indices.to_vec()));
            if odometer.advance() == Step::Reset {
                resets += 1;
            }
        }
        let expected: usize = lengths.iter().product();
        prop_assert_eq!(seen.len(), expected);

        // one reset per full turn of the fastest dimension, except the last
        let fastest = lengths.last().copied().unwrap_or(1);
        prop_assert_eq!(resets, expected / fastest - 1);
    }

    #[test]
    fn filter_of_own_values_matches(values in prop::collection::vec("[a-z0-9]{1,6}", 1..4)) {
        let expr = values.join(",");
        prop_assert!(Filter::parse(&expr).matches(&values));
    }

    #[test]
    fn bigint_codec_is_exact(digits in "[1-9][0-9]{0,60}") {
        let value: BigUint = digits.parse().unwrap();
        let encoded = BigIntCodec::encode(&value);
        prop_assert!(BigIntCodec::is_tagged(&encoded));
        prop_assert_eq!(BigIntCodec::decode(&encoded).unwrap(), value);
    }
}
