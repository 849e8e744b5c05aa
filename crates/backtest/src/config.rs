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

use std::{path::Path, str::FromStr};

use chrono::{DateTime, Utc};
use lpbt_model::{
    defi::{
        ActiveTickTable, PositionParams,
        parsing::{deserialize_u128, serialize_u128},
    },
    enums::{ActiveLiquidityConvention, ReferenceBasis},
};
use serde::{Deserialize, Serialize};

use crate::error::{BacktestError, BacktestResult};

/// Configuration for [`BacktestEngine`](crate::engine::BacktestEngine) runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestConfig {
    /// The lower tick boundary of the position.
    pub tick_lower: i32,
    /// The upper tick boundary of the position.
    pub tick_upper: i32,
    /// The position liquidity, held constant for the whole run.
    #[serde(serialize_with = "serialize_u128")]
    pub liquidity: u128,
    /// The APR time origin, defaults to the first snapshot's timestamp.
    pub first_timestamp: Option<DateTime<Utc>>,
    /// The valuation frame for PnL, impermanent loss and APR.
    pub reference_basis: ReferenceBasis,
    /// If period fees should be scaled by the position's share of the active liquidity.
    pub dilute_fees: bool,
    /// How bucket liquidity in the active tick table relates to the position.
    pub active_liquidity_convention: ActiveLiquidityConvention,
    /// Active liquidity per tick bucket, required when `dilute_fees` is set.
    pub active_tick_table: Option<ActiveTickTable>,
}

impl BacktestConfig {
    /// Creates a new [`BacktestConfig`] with fee dilution disabled.
    #[must_use]
    pub fn new(
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        reference_basis: ReferenceBasis,
    ) -> Self {
        Self {
            tick_lower,
            tick_upper,
            liquidity,
            first_timestamp: None,
            reference_basis,
            dilute_fees: false,
            active_liquidity_convention: ActiveLiquidityConvention::default(),
            active_tick_table: None,
        }
    }

    /// Sets the APR time origin.
    #[must_use]
    pub fn with_first_timestamp(mut self, first_timestamp: DateTime<Utc>) -> Self {
        self.first_timestamp = Some(first_timestamp);
        self
    }

    /// Enables fee dilution against `table`.
    #[must_use]
    pub fn with_dilution(
        mut self,
        table: ActiveTickTable,
        convention: ActiveLiquidityConvention,
    ) -> Self {
        self.dilute_fees = true;
        self.active_tick_table = Some(table);
        self.active_liquidity_convention = convention;
        self
    }

    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, names an unknown reference basis,
    /// or fails [`Self::validate`].
    pub fn from_toml_str(content: &str) -> BacktestResult<Self> {
        let file: BacktestConfigFile =
            toml::from_str(content).map_err(|e| BacktestError::InvalidConfig(e.to_string()))?;
        let config = Self::try_from(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or [`Self::from_toml_str`] fails.
    pub fn from_toml_file(path: &Path) -> BacktestResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BacktestError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Returns the position described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick range is invalid.
    pub fn position(&self) -> BacktestResult<PositionParams> {
        PositionParams::new(self.tick_lower, self.tick_upper, self.liquidity)
            .map_err(|e| BacktestError::InvalidConfig(e.to_string()))
    }

    /// Checks the configuration before any period is processed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tick range is inverted or out of bounds.
    /// - Fee dilution is enabled without an active tick table.
    pub fn validate(&self) -> BacktestResult<()> {
        self.position()?;

        if self.dilute_fees && self.active_tick_table.is_none() {
            return Err(BacktestError::InvalidConfig(
                "dilute_fees requires an active tick table".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parses a reference basis name, case-insensitively.
///
/// # Errors
///
/// Returns [`BacktestError::InvalidReferenceBasis`] for any name other than
/// `hodl`, `token0` or `token1`.
pub fn parse_reference_basis(value: &str) -> BacktestResult<ReferenceBasis> {
    ReferenceBasis::from_str(value.trim())
        .map_err(|_| BacktestError::InvalidReferenceBasis(value.to_string()))
}

/// The on-disk shape of a [`BacktestConfig`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BacktestConfigFile {
    tick_lower: i32,
    tick_upper: i32,
    #[serde(deserialize_with = "deserialize_u128")]
    liquidity: u128,
    #[serde(default)]
    first_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    reference_basis: Option<String>,
    #[serde(default)]
    dilute_fees: bool,
    #[serde(default)]
    active_liquidity_convention: ActiveLiquidityConvention,
    #[serde(default)]
    active_tick_table: Option<ActiveTickTable>,
}

impl TryFrom<BacktestConfigFile> for BacktestConfig {
    type Error = BacktestError;

    fn try_from(file: BacktestConfigFile) -> Result<Self, Self::Error> {
        let reference_basis = match file.reference_basis {
            Some(value) => parse_reference_basis(&value)?,
            None => ReferenceBasis::default(),
        };

        Ok(Self {
            tick_lower: file.tick_lower,
            tick_upper: file.tick_upper,
            liquidity: file.liquidity,
            first_timestamp: file.first_timestamp,
            reference_basis,
            dilute_fees: file.dilute_fees,
            active_liquidity_convention: file.active_liquidity_convention,
            active_tick_table: file.active_tick_table,
        })
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
    fn test_from_toml_minimal_uses_defaults() {
        let config = BacktestConfig::from_toml_str(
            r#"
            tickLower = -600
            tickUpper = 600
            liquidity = "1000"
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_lower, -600);
        assert_eq!(config.tick_upper, 600);
        assert_eq!(config.liquidity, 1000);
        assert_eq!(config.first_timestamp, None);
        assert_eq!(config.reference_basis, ReferenceBasis::Hodl);
        assert!(!config.dilute_fees);
        assert_eq!(
            config.active_liquidity_convention,
            ActiveLiquidityConvention::ExcludesPosition
        );
        assert!(config.active_tick_table.is_none());
    }

    #[rstest]
    fn test_from_toml_full() {
        let config = BacktestConfig::from_toml_str(
            r#"
            tickLower = 197700
            tickUpper = 198120
            liquidity = "3100000000000000"
            firstTimestamp = "2024-01-01T00:00:00Z"
            referenceBasis = "Token1"
            diluteFees = true
            activeLiquidityConvention = "includes-position"
            activeTickTable = [
                { tickIndex = 197700, activeLiquidity = "5000000000000000" },
                { tickIndex = 197760, activeLiquidity = 42 },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(config.liquidity, 3_100_000_000_000_000);
        assert_eq!(
            config.first_timestamp,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(config.reference_basis, ReferenceBasis::Token1);
        assert!(config.dilute_fees);
        assert_eq!(
            config.active_liquidity_convention,
            ActiveLiquidityConvention::IncludesPosition
        );
        let table = config.active_tick_table.unwrap();
        assert_eq!(table.get(197_700), Some(5_000_000_000_000_000));
        assert_eq!(table.get(197_760), Some(42));
    }

    #[rstest]
    fn test_from_toml_rejects_unknown_basis() {
        let err = BacktestConfig::from_toml_str(
            r#"
            tickLower = -60
            tickUpper = 60
            liquidity = 1
            referenceBasis = "usd"
            "#,
        )
        .unwrap_err();
        assert_eq!(err, BacktestError::InvalidReferenceBasis("usd".to_string()));
    }

    #[rstest]
    fn test_from_toml_rejects_unknown_field() {
        let result = BacktestConfig::from_toml_str(
            r#"
            tickLower = -60
            tickUpper = 60
            liquidity = 1
            rebalance = true
            "#,
        );
        assert!(matches!(result, Err(BacktestError::InvalidConfig(_))));
    }

    #[rstest]
    fn test_validate_rejects_inverted_range() {
        let config = BacktestConfig::new(60, -60, 1, ReferenceBasis::Hodl);
        assert!(matches!(
            config.validate(),
            Err(BacktestError::InvalidConfig(_))
        ));
    }

    #[rstest]
    fn test_validate_rejects_dilution_without_table() {
        let mut config = BacktestConfig::new(-60, 60, 1, ReferenceBasis::Hodl);
        config.dilute_fees = true;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("active tick table"));
    }

    #[rstest]
    fn test_with_dilution_is_valid() {
        let config = BacktestConfig::new(-60, 60, 1, ReferenceBasis::Token0).with_dilution(
            ActiveTickTable::new(),
            ActiveLiquidityConvention::ExcludesPosition,
        );
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case("hodl", ReferenceBasis::Hodl)]
    #[case(" Token0 ", ReferenceBasis::Token0)]
    #[case("token1", ReferenceBasis::Token1)]
    fn test_parse_reference_basis(#[case] input: &str, #[case] expected: ReferenceBasis) {
        assert_eq!(parse_reference_basis(input).unwrap(), expected);
    }
}
