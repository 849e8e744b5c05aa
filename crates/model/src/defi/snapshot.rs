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

use std::fmt::{Display, Formatter};

use alloy_primitives::{Address, U160, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defi::{
    parsing::{
        deserialize_u128, deserialize_u160, deserialize_u256, serialize_u128, serialize_u160,
        serialize_u256,
    },
    tick_map::tick_math::{MAX_TICK, MIN_TICK},
};

/// One side of a pool's token pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolToken {
    /// The blockchain address of the token contract.
    pub address: Address,
    /// The token's ticker symbol.
    pub symbol: String,
    /// The number of decimal places used to represent fractional token amounts.
    pub decimals: u8,
}

impl PoolToken {
    /// Creates a new [`PoolToken`] instance.
    #[must_use]
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
        }
    }
}

impl Display for PoolToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.symbol, self.address)
    }
}

/// The state of a concentrated-liquidity pool at the close of one period.
///
/// OHLC prices are quoted in the indexer's `token0Price` frame, that is units of token0
/// per one token1. `token1_in_token0` carries the same frame for the period close and
/// `token0_in_token1` its reciprocal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Start of the period this snapshot closes.
    pub timestamp: DateTime<Utc>,
    /// The pool contract address, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_address: Option<Address>,
    /// The pool fee tier in hundredths of a basis point (3000 = 0.3%).
    pub fee_tier: u32,
    /// The current pool tick.
    pub tick: i32,
    /// The current sqrt price as a Q64.96 number.
    #[serde(serialize_with = "serialize_u160", deserialize_with = "deserialize_u160")]
    pub sqrt_price_x96: U160,
    /// Liquidity active at the current tick across all providers.
    #[serde(serialize_with = "serialize_u128", deserialize_with = "deserialize_u128")]
    pub liquidity: u128,
    /// Cumulative fee growth per unit of liquidity for token0 (Q128.128).
    #[serde(serialize_with = "serialize_u256", deserialize_with = "deserialize_u256")]
    pub fee_growth_global_0: U256,
    /// Cumulative fee growth per unit of liquidity for token1 (Q128.128).
    #[serde(serialize_with = "serialize_u256", deserialize_with = "deserialize_u256")]
    pub fee_growth_global_1: U256,
    pub token0: PoolToken,
    pub token1: PoolToken,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// USD price of one token0.
    pub token0_price_usd: f64,
    /// USD price of one token1.
    pub token1_price_usd: f64,
    /// Price of one token0 in units of token1.
    pub token0_in_token1: f64,
    /// Price of one token1 in units of token0.
    pub token1_in_token0: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvl_usd: Option<f64>,
}

impl PoolSnapshot {
    /// Checks the snapshot's numeric fields once, at ingestion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any OHLC price is zero, negative or non-finite.
    /// - `low` exceeds `high`.
    /// - A reference price is negative or non-finite.
    /// - The tick lies outside `[MIN_TICK, MAX_TICK]`.
    /// - The sqrt price is zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                anyhow::bail!("{self}: {name} price must be positive and finite, was {value}");
            }
        }

        if self.low > self.high {
            anyhow::bail!(
                "{self}: low price {} exceeds high price {}",
                self.low,
                self.high
            );
        }

        for (name, value) in [
            ("token0_price_usd", self.token0_price_usd),
            ("token1_price_usd", self.token1_price_usd),
            ("token0_in_token1", self.token0_in_token1),
            ("token1_in_token0", self.token1_in_token0),
        ] {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{self}: {name} must be non-negative and finite, was {value}");
            }
        }

        if !(MIN_TICK..=MAX_TICK).contains(&self.tick) {
            anyhow::bail!(
                "{self}: tick {} outside of [{MIN_TICK}, {MAX_TICK}]",
                self.tick
            );
        }

        if self.sqrt_price_x96.is_zero() {
            anyhow::bail!("{self}: sqrt price must be non-zero");
        }

        Ok(())
    }

    /// Checks that `snapshots` are individually valid and strictly ascending by timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error on the first invalid snapshot or out-of-order pair.
    pub fn validate_sequence(snapshots: &[Self]) -> anyhow::Result<()> {
        for snapshot in snapshots {
            snapshot.validate()?;
        }

        for pair in snapshots.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                anyhow::bail!(
                    "Snapshots not strictly ascending: {} followed by {}",
                    pair[0].timestamp,
                    pair[1].timestamp
                );
            }
        }

        Ok(())
    }
}

impl Display for PoolSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PoolSnapshot(timestamp={}, pair={}/{}, tick={}, close={})",
            self.timestamp.to_rfc3339(),
            self.token0.symbol,
            self.token1.symbol,
            self.tick,
            self.close,
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::stubs::{snapshot_at_hour, snapshot_series};

    #[rstest]
    fn test_stub_snapshot_is_valid() {
        assert!(snapshot_at_hour(0, 0).validate().is_ok());
    }

    #[rstest]
    #[case::zero_close(|s: &mut PoolSnapshot| s.close = 0.0)]
    #[case::nan_high(|s: &mut PoolSnapshot| s.high = f64::NAN)]
    #[case::inverted_range(|s: &mut PoolSnapshot| s.low = s.high * 2.0)]
    #[case::negative_usd(|s: &mut PoolSnapshot| s.token0_price_usd = -1.0)]
    #[case::tick_out_of_range(|s: &mut PoolSnapshot| s.tick = MAX_TICK + 1)]
    #[case::zero_sqrt_price(|s: &mut PoolSnapshot| s.sqrt_price_x96 = U160::ZERO)]
    fn test_validate_rejects(#[case] mutate: fn(&mut PoolSnapshot)) {
        let mut snapshot = snapshot_at_hour(0, 0);
        mutate(&mut snapshot);
        assert!(snapshot.validate().is_err());
    }

    #[rstest]
    fn test_validate_sequence_accepts_ascending() {
        let snapshots = snapshot_series(&[0, 0, 0]);
        assert!(PoolSnapshot::validate_sequence(&snapshots).is_ok());
    }

    #[rstest]
    fn test_validate_sequence_rejects_duplicate_timestamp() {
        let mut snapshots = snapshot_series(&[0, 0]);
        snapshots[1].timestamp = snapshots[0].timestamp;
        let err = PoolSnapshot::validate_sequence(&snapshots).unwrap_err();
        assert!(err.to_string().contains("not strictly ascending"));
    }

    #[rstest]
    fn test_serde_json_round_trip_keeps_fixed_point_values() {
        let snapshot = snapshot_at_hour(3, 60);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"fee_growth_global_0\":\""));
        let decoded: PoolSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.timestamp, snapshot.timestamp);
        assert_eq!(decoded.tick, snapshot.tick);
        assert_eq!(decoded.sqrt_price_x96, snapshot.sqrt_price_x96);
        assert_eq!(decoded.liquidity, snapshot.liquidity);
        assert_eq!(decoded.fee_growth_global_0, snapshot.fee_growth_global_0);
        assert_eq!(decoded.fee_growth_global_1, snapshot.fee_growth_global_1);
        assert_eq!(decoded.token0, snapshot.token0);
    }

    #[rstest]
    fn test_display() {
        let snapshot = snapshot_at_hour(0, 0);
        assert!(snapshot.to_string().starts_with("PoolSnapshot(timestamp=2024-01-01T00:00:00"));
    }
}
