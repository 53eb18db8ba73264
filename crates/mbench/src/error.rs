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

//! Error types for matrix comparison runs.
//!
//! Configuration and persisted-run problems are detected before any sampling
//! starts and abort the run. Missing implementations for a combination are not
//! errors; the engine skips them silently.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for comparison operations
pub type Result<T> = std::result::Result<T, MbenchError>;

/// Errors that can occur while preparing or executing a comparison run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MbenchError {
    /// A dimension name appears both in the static map and in the dynamic list.
    #[error("Dimension is static and dynamic at the same time: {0}")]
    DimensionConflict(String),

    /// A metric was registered without a compute function.
    #[error("Metric '{0}' missing compute function")]
    MetricWithoutCompute(String),

    /// Invalid configuration parameter.
    #[error("Invalid configuration parameter '{parameter}': {reason}")]
    Config {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },

    /// File read or write failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A persisted run could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A tagged arbitrary-precision value was malformed.
    #[error("Codec error: {0}")]
    Codec(String),

    /// Writing the report to the output stream failed.
    #[error("Output error: {0}")]
    Output(String),
}

impl MbenchError {
    /// Create a configuration error for `parameter`.
    pub fn config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a codec error.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }
}

impl From<io::Error> for MbenchError {
    fn from(err: io::Error) -> Self {
        Self::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MbenchError::DimensionConflict("name".to_string());
        assert_eq!(
            err.to_string(),
            "Dimension is static and dynamic at the same time: name"
        );

        let err = MbenchError::config("dims", "unknown dimension 'foo'");
        let msg = err.to_string();
        assert!(msg.contains("dims"));
        assert!(msg.contains("unknown dimension 'foo'"));

        let err = MbenchError::MetricWithoutCompute("Speed".to_string());
        assert_eq!(err.to_string(), "Metric 'Speed' missing compute function");
    }

    #[test]
    fn test_io_error_keeps_path() {
        let source = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err = MbenchError::io_error("bench.json", source);
        match err {
            MbenchError::Io { path, message } => {
                assert_eq!(path, PathBuf::from("bench.json"));
                assert!(message.contains("missing"));
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
