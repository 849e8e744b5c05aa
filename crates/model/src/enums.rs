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

//! Enumerations for the backtest domain model.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The valuation frame used to derive PnL, impermanent loss and APR.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReferenceBasis {
    /// Holding the initial token split, revalued at each period's USD prices.
    #[default]
    Hodl,
    /// Everything denominated in token0.
    Token0,
    /// Everything denominated in token1.
    Token1,
}

/// How the liquidity registered at a tick bucket relates to the backtested position.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ActiveLiquidityConvention {
    /// Bucket liquidity is other providers only, the position competes on top of it.
    #[default]
    ExcludesPosition,
    /// Bucket liquidity already counts the position.
    IncludesPosition,
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    #[case("hodl", ReferenceBasis::Hodl)]
    #[case("token0", ReferenceBasis::Token0)]
    #[case("TOKEN1", ReferenceBasis::Token1)]
    fn test_reference_basis_from_str(#[case] input: &str, #[case] expected: ReferenceBasis) {
        assert_eq!(ReferenceBasis::from_str(input).unwrap(), expected);
    }

    #[rstest]
    fn test_reference_basis_rejects_unknown() {
        assert!(ReferenceBasis::from_str("usd").is_err());
    }

    #[rstest]
    fn test_reference_basis_display_round_trips() {
        for basis in ReferenceBasis::iter() {
            assert_eq!(ReferenceBasis::from_str(&basis.to_string()).unwrap(), basis);
        }
    }

    #[rstest]
    fn test_reference_basis_serde() {
        let json = serde_json::to_string(&ReferenceBasis::Token0).unwrap();
        assert_eq!(json, "\"token0\"");
        let basis: ReferenceBasis = serde_json::from_str("\"hodl\"").unwrap();
        assert_eq!(basis, ReferenceBasis::Hodl);
    }

    #[rstest]
    #[case("excludes-position", ActiveLiquidityConvention::ExcludesPosition)]
    #[case("includes-position", ActiveLiquidityConvention::IncludesPosition)]
    fn test_active_liquidity_convention_from_str(
        #[case] input: &str,
        #[case] expected: ActiveLiquidityConvention,
    ) {
        assert_eq!(ActiveLiquidityConvention::from_str(input).unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }
}
