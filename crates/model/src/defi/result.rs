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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defi::parsing::{deserialize_u128, serialize_u128};

/// The state of a backtested position at the close of one period.
///
/// Amounts and fees are decimal-scaled token units, prices are in the run's reference
/// basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// Timestamp of the period's closing snapshot.
    pub timestamp: DateTime<Utc>,
    pub amount0: f64,
    pub amount1: f64,
    /// Basis price of token0 used for this record.
    pub price0: f64,
    /// Basis price of token1 used for this record.
    pub price1: f64,
    /// The position liquidity.
    #[serde(serialize_with = "serialize_u128", deserialize_with = "deserialize_u128")]
    pub liquidity: u128,
    /// Position value excluding fees minus the frozen reference value.
    pub il: f64,
    /// Position value including accrued fees minus the frozen reference value.
    pub pnl: f64,
    /// Annualized percentage return since the first snapshot.
    pub apr: f64,
    /// Whether the pool tick was inside the range at the start of the period.
    pub position_active: bool,
    pub accum_fees0: f64,
    pub accum_fees1: f64,
    pub fees0: f64,
    pub fees1: f64,
}

impl Display for ResultRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ResultRecord(timestamp={}, amount0={}, amount1={}, pnl={}, il={}, apr={}, active={})",
            self.timestamp.to_rfc3339(),
            self.amount0,
            self.amount1,
            self.pnl,
            self.il,
            self.apr,
            self.position_active,
        )
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

    fn record() -> ResultRecord {
        ResultRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
            amount0: 1.5,
            amount1: 2.0,
            price0: 1.0,
            price1: 0.5,
            liquidity: 1000,
            il: 0.0,
            pnl: 0.25,
            apr: 10.0,
            position_active: true,
            accum_fees0: 0.5,
            accum_fees1: 0.0,
            fees0: 0.5,
            fees1: 0.0,
        }
    }

    #[rstest]
    fn test_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["accumFees0"], 0.5);
        assert_eq!(json["positionActive"], true);
        assert_eq!(json["liquidity"], "1000");
        assert!(json.get("accum_fees0").is_none());
    }

    #[rstest]
    fn test_deserializes_own_output() {
        let json = serde_json::to_string(&record()).unwrap();
        let decoded: ResultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record());
    }
}
