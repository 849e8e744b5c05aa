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

//! Property-based tests for fee attribution.
//!
//! These tests verify properties that should hold for any price range and period:
//! - The overlap ratio is always a finite value within `[0, 1]`
//! - A period entirely inside the position range is fully attributed
//! - A period entirely outside the position range earns nothing
//! - The dilution factor is always within `[0, 1]`

use lpbt_backtest::fees::{DilutionModel, overlap_ratio};
use lpbt_model::{
    defi::{ActiveTick, ActiveTickTable},
    enums::ActiveLiquidityConvention,
    stubs::snapshot_at_hour,
};
use proptest::prelude::*;
use rstest::rstest;

fn price_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        0.000_001f64..1_000_000.0,
        Just(0.0),
        Just(f64::INFINITY),
        Just(f64::NAN),
    ]
}

fn ordered_pair() -> impl Strategy<Value = (f64, f64)> {
    (0.001f64..1000.0, 0.001f64..1000.0).prop_map(|(a, b)| (a.min(b), a.max(b)))
}

fn convention_strategy() -> impl Strategy<Value = ActiveLiquidityConvention> {
    prop_oneof![
        Just(ActiveLiquidityConvention::ExcludesPosition),
        Just(ActiveLiquidityConvention::IncludesPosition),
    ]
}

proptest! {
    /// Property: The overlap ratio is never NaN and always within [0, 1].
    #[rstest]
    fn overlap_ratio_is_bounded(
        price_lower in price_strategy(),
        price_upper in price_strategy(),
        low in price_strategy(),
        high in price_strategy(),
    ) {
        let ratio = overlap_ratio(price_lower, price_upper, low, high);
        prop_assert!(!ratio.is_nan());
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    /// Property: A period contained strictly inside the range is fully attributed.
    #[rstest]
    fn contained_period_is_fully_attributed(
        (low, high) in ordered_pair(),
        below in 0.0001f64..0.5,
        above in 0.0001f64..0.5,
    ) {
        let ratio = overlap_ratio(low * (1.0 - below), high * (1.0 + above), low, high);
        prop_assert_eq!(ratio, 1.0);
    }

    /// Property: A period strictly above or below the range earns nothing.
    #[rstest]
    fn disjoint_period_is_not_attributed(
        (price_lower, price_upper) in ordered_pair(),
        gap in 0.0001f64..10.0,
        width in 0.0f64..10.0,
        above in any::<bool>(),
    ) {
        let (low, high) = if above {
            (price_upper + gap, price_upper + gap + width)
        } else {
            (price_lower - gap - width, price_lower - gap)
        };
        prop_assert_eq!(overlap_ratio(price_lower, price_upper, low, high), 0.0);
    }

    /// Property: The dilution factor is within [0, 1] for any pool and position liquidity.
    #[rstest]
    fn dilution_factor_is_bounded(
        active_liquidity in any::<u128>(),
        position_liquidity in any::<u128>(),
        convention in convention_strategy(),
    ) {
        let tick = ActiveTick {
            tick_index: 0,
            active_liquidity,
        };
        let table: ActiveTickTable = std::iter::once(tick).collect();
        let model = DilutionModel::new(table, convention);
        let factor = model.factor(&snapshot_at_hour(0, 0), position_liquidity).unwrap();
        prop_assert!(factor.is_finite());
        prop_assert!((0.0..=1.0).contains(&factor));
    }
}
