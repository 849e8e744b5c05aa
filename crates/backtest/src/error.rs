// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Errors raised while configuring or running a backtest.

use chrono::{DateTime, Utc};

/// A [`Result`] alias for backtest operations.
pub type BacktestResult<T> = Result<T, BacktestError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Missing tick bucket: no active liquidity registered at bucket {bucket} (pool tick {tick})")]
    MissingTickBucket { tick: i32, bucket: i32 },
    #[error("Invalid reference basis '{0}', expected one of: hodl, token0, token1")]
    InvalidReferenceBasis(String),
    #[error("Unknown fee tier {0}: no tick spacing defined")]
    UnknownFeeTier(u32),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("Non-finite value: {field}={value} at {timestamp}")]
    NonFiniteValue {
        field: &'static str,
        value: f64,
        timestamp: DateTime<Utc>,
    },
    #[error("Conversion error: {0}")]
    Conversion(String),
}

impl BacktestError {
    /// Returns a [`BacktestError::NonFiniteValue`] if `value` is NaN or infinite.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not finite.
    pub fn check_finite(
        field: &'static str,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> BacktestResult<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFiniteValue {
                field,
                value,
                timestamp,
            })
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_check_finite() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(BacktestError::check_finite("pnl", 1.5, ts), Ok(1.5));
        assert!(matches!(
            BacktestError::check_finite("apr", f64::INFINITY, ts),
            Err(BacktestError::NonFiniteValue { field: "apr", .. })
        ));
        assert!(BacktestError::check_finite("il", f64::NAN, ts).is_err());
    }

    #[rstest]
    fn test_display() {
        let err = BacktestError::MissingTickBucket {
            tick: 125,
            bucket: 120,
        };
        assert_eq!(
            err.to_string(),
            "Missing tick bucket: no active liquidity registered at bucket 120 (pool tick 125)"
        );
        assert_eq!(
            BacktestError::UnknownFeeTier(2500).to_string(),
            "Unknown fee tier 2500: no tick spacing defined"
        );
    }
}
