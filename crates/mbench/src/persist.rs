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

//! Persisted runs.
//!
//! A run is stored as one JSON document `{"title": ..., "rows": {...}}` keyed
//! by row key. Durations and throughputs are arbitrary-precision integers; they
//! are written as `{"__BigInt__": "<decimal digits>"}` so they survive the round
//! trip exactly instead of passing through a floating-point JSON number.

use crate::core::Combination;
use crate::error::{MbenchError, Result};
use crate::harness::sampler::Statistics;
use indexmap::IndexMap;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Key marking a tagged arbitrary-precision integer.
pub const BIGINT_TAG: &str = "__BigInt__";

/// Encoder/decoder for tagged arbitrary-precision integers.
pub struct BigIntCodec;

impl BigIntCodec {
    /// Wraps `value` as `{"__BigInt__": "<decimal>"}`.
    pub fn encode(value: &BigUint) -> Value {
        let mut tagged = serde_json::Map::with_capacity(1);
        tagged.insert(BIGINT_TAG.to_string(), Value::String(value.to_str_radix(10)));
        Value::Object(tagged)
    }

    /// Returns true if `value` carries the tag.
    pub fn is_tagged(value: &Value) -> bool {
        value
            .as_object()
            .map_or(false, |obj| obj.len() == 1 && obj.contains_key(BIGINT_TAG))
    }

    /// Reconstructs the integer wrapped by [`BigIntCodec::encode`].
    ///
    /// # Errors
    ///
    /// [`MbenchError::Codec`] if the tag is missing or the digits are invalid.
    pub fn decode(value: &Value) -> Result<BigUint> {
        if !Self::is_tagged(value) {
            return Err(MbenchError::codec(format!(
                "expected {{\"{}\": \"<digits>\"}}, found {}",
                BIGINT_TAG, value
            )));
        }
        let digits = value[BIGINT_TAG]
            .as_str()
            .ok_or_else(|| MbenchError::codec(format!("{} must hold a string", BIGINT_TAG)))?;
        BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| MbenchError::codec(format!("invalid integer digits '{}'", digits)))
    }
}

/// Serde adapter for `#[serde(with = "...")]` on `BigUint` fields.
pub mod tagged_bigint {
    use super::BigIntCodec;
    use num_bigint::BigUint;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    /// Serializes through [`BigIntCodec::encode`].
    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        BigIntCodec::encode(value).serialize(serializer)
    }

    /// Deserializes through [`BigIntCodec::decode`].
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let value = Value::deserialize(deserializer)?;
        BigIntCodec::decode(&value).map_err(D::Error::custom)
    }
}

/// Everything recorded for one combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// The combination, defaults included.
    pub combination: Combination,
    /// Sampler statistics.
    pub statistics: Statistics,
    /// Calls per second.
    #[serde(with = "tagged_bigint")]
    pub throughput: BigUint,
    /// Metric values in metric declaration order.
    pub metric_values: Vec<f64>,
}

/// A complete run indexed by row key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedRun {
    /// Run title.
    pub title: String,
    /// Rows in the order they were measured.
    pub rows: IndexMap<String, RawRow>,
}

impl PersistedRun {
    /// Creates an empty run.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: IndexMap::new(),
        }
    }

    /// Records a row under `key`.
    pub fn insert(&mut self, key: impl Into<String>, row: RawRow) {
        self.rows.insert(key.into(), row);
    }

    /// Looks up a row by key.
    pub fn get(&self, key: &str) -> Option<&RawRow> {
        self.rows.get(key)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the run has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serializes the run as a single line of JSON.
    pub fn to_json_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| MbenchError::parse(e.to_string()))
    }

    /// Parses a run from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MbenchError::parse(e.to_string()))
    }

    /// Loads a run from `path`. Any read or parse failure is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| MbenchError::io_error(path, e))?;
        let run = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), rows = run.len(), "loaded previous run");
        Ok(run)
    }

    /// Writes the run to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json_line()?;
        fs::write(path, json).map_err(|e| MbenchError::io_error(path, e))?;
        tracing::info!(path = %path.display(), rows = self.len(), "saved run");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(mean: BigUint) -> RawRow {
        RawRow {
            combination: [("size", "1KB"), ("chunks", "2")].into_iter().collect(),
            statistics: Statistics {
                mean,
                rme: 1.5,
                formatted: "±1.50%".to_string(),
            },
            throughput: BigUint::from(42u32),
            metric_values: vec![1684.21, 0.5],
        }
    }

    #[test]
    fn test_encode_shape() {
        let encoded = BigIntCodec::encode(&BigUint::from(123u32));
        assert_eq!(encoded, json!({"__BigInt__": "123"}));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(BigIntCodec::decode(&json!(123)).is_err());
        assert!(BigIntCodec::decode(&json!({"__BigInt__": 123})).is_err());
        assert!(BigIntCodec::decode(&json!({"__BigInt__": "12a"})).is_err());
        assert!(BigIntCodec::decode(&json!({"__BigInt__": "1", "x": 2})).is_err());
    }

    #[test]
    fn test_round_trip_beyond_u128() {
        let huge = BigUint::parse_bytes(b"340282366920938463463374607431768211457123", 10).unwrap();
        let mut run = PersistedRun::new("Test");
        run.insert("size=1KB-chunks=2", row(huge.clone()));

        let restored = PersistedRun::from_json(&run.to_json_line().unwrap()).unwrap();
        assert_eq!(restored, run);
        assert_eq!(restored.get("size=1KB-chunks=2").unwrap().statistics.mean, huge);
    }

    #[test]
    fn test_json_is_single_line() {
        let mut run = PersistedRun::new("Test");
        run.insert("a", row(BigUint::from(1u32)));
        let line = run.to_json_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains(r#""mean":{"__BigInt__":"1"}"#));
        assert!(line.starts_with(r#"{"title":"Test","rows":{"#));
    }

    #[test]
    fn test_parse_failure_is_fatal() {
        assert!(matches!(
            PersistedRun::from_json("{not json"),
            Err(MbenchError::Parse(_))
        ));
        assert!(matches!(
            PersistedRun::from_json(r#"{"title":"x","rows":{"a":{"combination":{},"statistics":{"mean":1,"rme":0,"formatted":""},"throughput":{"__BigInt__":"1"},"metric_values":[]}}}"#),
            Err(MbenchError::Parse(_))
        ));
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.json");
        let mut run = PersistedRun::new("Saved");
        run.insert("k", row(BigUint::from(7u32)));
        run.save(&path).unwrap();

        let loaded = PersistedRun::load(&path).unwrap();
        assert_eq!(loaded, run);

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            PersistedRun::load(&missing),
            Err(MbenchError::Io { .. })
        ));
    }
}
