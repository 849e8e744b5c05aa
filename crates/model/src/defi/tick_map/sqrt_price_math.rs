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

use alloy_primitives::{U160, U256};

use super::{full_math::FullMath, tick_math::get_sqrt_ratio_at_tick};

/// Calculates the amount of token0 between two sqrt price ratios for a given liquidity.
///
/// Computes `liquidity * (sqrt_b - sqrt_a) / (sqrt_a * sqrt_b)` with both ratios in Q64.96.
/// The ratios may be passed in either order.
///
/// # Errors
///
/// Returns an error if either ratio is zero or an intermediate result overflows.
pub fn get_amount0_delta(
    sqrt_ratio_ax96: U160,
    sqrt_ratio_bx96: U160,
    liquidity: u128,
    round_up: bool,
) -> anyhow::Result<U256> {
    let (sqrt_ratio_a, sqrt_ratio_b) = if sqrt_ratio_ax96 > sqrt_ratio_bx96 {
        (sqrt_ratio_bx96, sqrt_ratio_ax96)
    } else {
        (sqrt_ratio_ax96, sqrt_ratio_bx96)
    };

    if sqrt_ratio_a.is_zero() {
        anyhow::bail!("Sqrt ratio must be greater than zero");
    }

    let numerator1 = U256::from(liquidity) << 96;
    let numerator2 = U256::from(sqrt_ratio_b - sqrt_ratio_a);

    if round_up {
        let scaled = FullMath::mul_div_rounding_up(numerator1, numerator2, U256::from(sqrt_ratio_b))?;
        FullMath::div_rounding_up(scaled, U256::from(sqrt_ratio_a))
    } else {
        let scaled = FullMath::mul_div(numerator1, numerator2, U256::from(sqrt_ratio_b))?;
        Ok(scaled / U256::from(sqrt_ratio_a))
    }
}

/// Calculates the amount of token1 between two sqrt price ratios for a given liquidity.
///
/// Computes `liquidity * (sqrt_b - sqrt_a)` with both ratios in Q64.96.
/// The ratios may be passed in either order.
///
/// # Errors
///
/// Returns an error if an intermediate result overflows.
pub fn get_amount1_delta(
    sqrt_ratio_ax96: U160,
    sqrt_ratio_bx96: U160,
    liquidity: u128,
    round_up: bool,
) -> anyhow::Result<U256> {
    let (sqrt_ratio_a, sqrt_ratio_b) = if sqrt_ratio_ax96 > sqrt_ratio_bx96 {
        (sqrt_ratio_bx96, sqrt_ratio_ax96)
    } else {
        (sqrt_ratio_ax96, sqrt_ratio_bx96)
    };

    let liquidity = U256::from(liquidity);
    let sqrt_ratio_diff = U256::from(sqrt_ratio_b - sqrt_ratio_a);
    let q96 = U256::from(1u128) << 96;

    if round_up {
        FullMath::mul_div_rounding_up(liquidity, sqrt_ratio_diff, q96)
    } else {
        FullMath::mul_div(liquidity, sqrt_ratio_diff, q96)
    }
}

/// Calculates the raw token amounts held by `liquidity` over `[tick_lower, tick_upper]`.
///
/// The branch is chosen by the pool's `current_tick`:
/// - below the range the position is entirely token0,
/// - inside the range token0 covers `[sqrt_price, upper]` and token1 covers `[lower, sqrt_price]`,
/// - at or above the upper tick the position is entirely token1.
///
/// Amounts are rounded down, which is what a withdrawal would pay out.
///
/// # Errors
///
/// Returns an error if an intermediate result overflows.
///
/// # Panics
///
/// Panics if either tick bound is outside the valid tick range.
pub fn get_amounts_for_liquidity(
    sqrt_price_x96: U160,
    current_tick: i32,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> anyhow::Result<(U256, U256)> {
    if liquidity == 0 {
        return Ok((U256::ZERO, U256::ZERO));
    }

    let sqrt_ratio_lower = get_sqrt_ratio_at_tick(tick_lower);
    let sqrt_ratio_upper = get_sqrt_ratio_at_tick(tick_upper);

    if current_tick < tick_lower {
        let amount0 = get_amount0_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity, false)?;
        Ok((amount0, U256::ZERO))
    } else if current_tick < tick_upper {
        let amount0 = get_amount0_delta(sqrt_price_x96, sqrt_ratio_upper, liquidity, false)?;
        let amount1 = get_amount1_delta(sqrt_ratio_lower, sqrt_price_x96, liquidity, false)?;
        Ok((amount0, amount1))
    } else {
        let amount1 = get_amount1_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity, false)?;
        Ok((U256::ZERO, amount1))
    }
}

/// Expands an amount to 18 decimal places (multiplies by 10^18).
#[must_use]
pub fn expand_to_18_decimals(amount: u64) -> u128 {
    u128::from(amount) * 10u128.pow(18)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    // Reference values follow https://github.com/Uniswap/v3-core/blob/main/test/SqrtPriceMath.spec.ts
    use rstest::rstest;

    use super::*;
    use crate::defi::tick_map::full_math::Q96_U160;

    fn sqrt_ratio(value: &str) -> U160 {
        U160::from_str_radix(value, 10).unwrap()
    }

    #[rstest]
    fn test_amount0_delta_returns_zero_if_liquidity_is_zero() {
        let amount0 = get_amount0_delta(Q96_U160, sqrt_ratio("112045541949572279837463876454"), 0, true)
            .unwrap();
        assert_eq!(amount0, U256::ZERO);
    }

    #[rstest]
    fn test_amount0_delta_returns_zero_if_prices_are_equal() {
        let amount0 = get_amount0_delta(Q96_U160, Q96_U160, 1, true).unwrap();
        assert_eq!(amount0, U256::ZERO);
    }

    #[rstest]
    fn test_amount0_delta_for_price_of_1_to_1_21() {
        // sqrt(1.21) * 2^96
        let sqrt_b = sqrt_ratio("87150978765690771352898345369");
        let liquidity = expand_to_18_decimals(1);

        let rounded_up = get_amount0_delta(Q96_U160, sqrt_b, liquidity, true).unwrap();
        let rounded_down = get_amount0_delta(Q96_U160, sqrt_b, liquidity, false).unwrap();

        assert_eq!(rounded_up, U256::from(90909090909090910u128));
        assert_eq!(rounded_down, rounded_up - U256::from(1));
    }

    #[rstest]
    fn test_amount1_delta_for_price_of_1_to_1_21() {
        let sqrt_b = sqrt_ratio("87150978765690771352898345369");
        let liquidity = expand_to_18_decimals(1);

        let rounded_up = get_amount1_delta(Q96_U160, sqrt_b, liquidity, true).unwrap();
        let rounded_down = get_amount1_delta(Q96_U160, sqrt_b, liquidity, false).unwrap();

        assert_eq!(rounded_up, U256::from(100000000000000000u128));
        assert_eq!(rounded_down, rounded_up - U256::from(1));
    }

    #[rstest]
    fn test_amount_deltas_are_order_independent() {
        let sqrt_b = sqrt_ratio("87150978765690771352898345369");
        let liquidity = expand_to_18_decimals(3);
        assert_eq!(
            get_amount0_delta(Q96_U160, sqrt_b, liquidity, false).unwrap(),
            get_amount0_delta(sqrt_b, Q96_U160, liquidity, false).unwrap()
        );
        assert_eq!(
            get_amount1_delta(Q96_U160, sqrt_b, liquidity, false).unwrap(),
            get_amount1_delta(sqrt_b, Q96_U160, liquidity, false).unwrap()
        );
    }

    #[rstest]
    fn test_amounts_for_liquidity_zero_liquidity() {
        let (amount0, amount1) = get_amounts_for_liquidity(Q96_U160, 0, -60, 60, 0).unwrap();
        assert_eq!(amount0, U256::ZERO);
        assert_eq!(amount1, U256::ZERO);
    }

    #[rstest]
    fn test_amounts_for_liquidity_below_range_is_all_token0() {
        let sqrt_price = get_sqrt_ratio_at_tick(-120);
        let (amount0, amount1) =
            get_amounts_for_liquidity(sqrt_price, -120, -60, 60, expand_to_18_decimals(1))
                .unwrap();
        assert!(amount0 > U256::ZERO);
        assert_eq!(amount1, U256::ZERO);
    }

    #[rstest]
    fn test_amounts_for_liquidity_above_range_is_all_token1() {
        let sqrt_price = get_sqrt_ratio_at_tick(120);
        let (amount0, amount1) =
            get_amounts_for_liquidity(sqrt_price, 120, -60, 60, expand_to_18_decimals(1)).unwrap();
        assert_eq!(amount0, U256::ZERO);
        assert!(amount1 > U256::ZERO);
    }

    #[rstest]
    fn test_amounts_for_liquidity_at_upper_tick_is_all_token1() {
        let sqrt_price = get_sqrt_ratio_at_tick(60);
        let (amount0, amount1) =
            get_amounts_for_liquidity(sqrt_price, 60, -60, 60, expand_to_18_decimals(1)).unwrap();
        assert_eq!(amount0, U256::ZERO);
        assert!(amount1 > U256::ZERO);
    }

    #[rstest]
    fn test_amounts_for_liquidity_symmetric_range_at_midpoint() {
        // At tick 0 with a symmetric range both sides hold nearly the same raw amount
        let (amount0, amount1) =
            get_amounts_for_liquidity(Q96_U160, 0, -60, 60, expand_to_18_decimals(1)).unwrap();
        let diff = if amount0 > amount1 {
            amount0 - amount1
        } else {
            amount1 - amount0
        };
        assert!(amount0 > U256::ZERO);
        assert!(diff < amount0 / U256::from(100));
    }

    #[rstest]
    fn test_amounts_for_liquidity_full_range_sum_matches_sides() {
        let liquidity = expand_to_18_decimals(2);
        let below =
            get_amounts_for_liquidity(get_sqrt_ratio_at_tick(-100), -100, -60, 60, liquidity)
                .unwrap();
        let expected = get_amount0_delta(
            get_sqrt_ratio_at_tick(-60),
            get_sqrt_ratio_at_tick(60),
            liquidity,
            false,
        )
        .unwrap();
        assert_eq!(below.0, expected);
    }
}
