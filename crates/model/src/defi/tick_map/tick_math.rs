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

/// Minimum tick representable by a Uniswap V3-style pool.
pub const MIN_TICK: i32 = -887272;

/// Maximum tick representable by a Uniswap V3-style pool.
pub const MAX_TICK: i32 = -MIN_TICK;

/// Sqrt ratio at [`MIN_TICK`] as a Q64.96 number.
pub const MIN_SQRT_RATIO: U160 = U160::from_limbs([4295128739, 0, 0]);

/// Sqrt ratio at [`MAX_TICK`] as a Q64.96 number.
pub const MAX_SQRT_RATIO: U160 =
    U160::from_limbs([0x5d951d5263988d26, 0xefd1fc6a50648849, 0xfffd8963]);

/// Base of the tick price lattice, `price(tick) = 1.0001^tick`.
pub const TICK_BASE: f64 = 1.0001;

// Q128.128 values of 1 / sqrt(1.0001)^(2^i) for i = 1..=19. Bit 0 is handled separately.
const SQRT_RATIO_MULTIPLIERS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x09aa508b5b7a84e1c677de54f3e99bc9,
    0x005d6af8dedb81196699c329225ee604,
    0x00002216e584f5fa1ea926041bedfe98,
    0x00000000048a170391f7dc42444e8fa2,
];

const SQRT_RATIO_BIT0: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

/// Calculates `sqrt(1.0001^tick) * 2^96` exactly, rounded up.
///
/// # Panics
///
/// Panics if `tick` lies outside `[MIN_TICK, MAX_TICK]`.
#[must_use]
pub fn get_sqrt_ratio_at_tick(tick: i32) -> U160 {
    assert!(
        (MIN_TICK..=MAX_TICK).contains(&tick),
        "Tick {tick} outside of [{MIN_TICK}, {MAX_TICK}]"
    );

    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(SQRT_RATIO_BIT0)
    } else {
        U256::from(1u8) << 128usize
    };

    for (i, multiplier) in SQRT_RATIO_MULTIPLIERS.iter().enumerate() {
        if abs_tick & (1 << (i + 1)) != 0 {
            ratio = (ratio * U256::from(*multiplier)) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up so the inverse lookup is exact on grid ticks
    let remainder_mask = (U256::from(1u8) << 32usize) - U256::from(1);
    let remainder: U256 = ratio & remainder_mask;
    let round_up = if remainder.is_zero() {
        U256::ZERO
    } else {
        U256::from(1)
    };

    U160::from((ratio >> 32) + round_up)
}

/// Calculates the greatest tick whose sqrt ratio is less than or equal to `sqrt_price_x96`.
///
/// # Panics
///
/// Panics if `sqrt_price_x96` lies outside `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`.
#[must_use]
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U160) -> i32 {
    assert!(
        sqrt_price_x96 >= MIN_SQRT_RATIO && sqrt_price_x96 < MAX_SQRT_RATIO,
        "Sqrt price {sqrt_price_x96} outside of [MIN_SQRT_RATIO, MAX_SQRT_RATIO)"
    );

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if get_sqrt_ratio_at_tick(mid) <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    low
}

/// Returns the decimal-adjusted price of token0 denominated in token1 at `tick`.
#[must_use]
pub fn tick_to_price(tick: i32, token0_decimals: u8, token1_decimals: u8) -> f64 {
    let decimals_shift = i32::from(token0_decimals) - i32::from(token1_decimals);
    TICK_BASE.powf(f64::from(tick)) * 10f64.powi(decimals_shift)
}

/// Returns the `(lower, upper)` prices of a tick range quoted as token0 per one token1.
///
/// This is the frame of the indexer's period OHLC prices, so the tick bounds swap places:
/// the upper tick yields the lower price.
#[must_use]
pub fn range_prices(
    tick_lower: i32,
    tick_upper: i32,
    token0_decimals: u8,
    token1_decimals: u8,
) -> (f64, f64) {
    let price_lower = 1.0 / tick_to_price(tick_upper, token0_decimals, token1_decimals);
    let price_upper = 1.0 / tick_to_price(tick_lower, token0_decimals, token1_decimals);
    (price_lower, price_upper)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::defi::tick_map::full_math::Q96_U160;

    #[rstest]
    fn test_sqrt_ratio_at_zero_tick_is_q96() {
        assert_eq!(get_sqrt_ratio_at_tick(0), Q96_U160);
    }

    #[rstest]
    fn test_sqrt_ratio_at_min_tick() {
        assert_eq!(get_sqrt_ratio_at_tick(MIN_TICK), MIN_SQRT_RATIO);
        assert_eq!(MIN_SQRT_RATIO, U160::from(4295128739u64));
    }

    #[rstest]
    fn test_sqrt_ratio_at_max_tick() {
        assert_eq!(get_sqrt_ratio_at_tick(MAX_TICK), MAX_SQRT_RATIO);
        assert_eq!(
            MAX_SQRT_RATIO,
            U160::from_str_radix("1461446703485210103287273052203988822378723970342", 10)
                .unwrap()
        );
    }

    #[rstest]
    #[case(1, "79232123823359799118286999568")]
    #[case(-1, "79224201403219477170569942574")]
    #[case(60, "79466191966197645195421774833")]
    #[case(-60, "78990846045029531151608375686")]
    fn test_sqrt_ratio_reference_values(#[case] tick: i32, #[case] expected: &str) {
        let expected = U160::from_str_radix(expected, 10).unwrap();
        assert_eq!(get_sqrt_ratio_at_tick(tick), expected);
    }

    #[rstest]
    #[should_panic(expected = "outside of")]
    fn test_sqrt_ratio_panics_below_min_tick() {
        let _ = get_sqrt_ratio_at_tick(MIN_TICK - 1);
    }

    #[rstest]
    #[should_panic(expected = "outside of")]
    fn test_sqrt_ratio_panics_above_max_tick() {
        let _ = get_sqrt_ratio_at_tick(MAX_TICK + 1);
    }

    #[rstest]
    fn test_sqrt_ratio_is_monotonic() {
        let ticks = [-200_000, -50_000, -1, 0, 1, 50_000, 200_000];
        for pair in ticks.windows(2) {
            assert!(get_sqrt_ratio_at_tick(pair[0]) < get_sqrt_ratio_at_tick(pair[1]));
        }
    }

    #[rstest]
    #[case(MIN_TICK)]
    #[case(-197_700)]
    #[case(-1)]
    #[case(0)]
    #[case(1)]
    #[case(198_110)]
    #[case(MAX_TICK - 1)]
    fn test_tick_at_sqrt_ratio_inverts_on_grid(#[case] tick: i32) {
        assert_eq!(get_tick_at_sqrt_ratio(get_sqrt_ratio_at_tick(tick)), tick);
    }

    #[rstest]
    fn test_tick_at_sqrt_ratio_between_ticks_rounds_down() {
        let sqrt_ratio = get_sqrt_ratio_at_tick(100) + U160::from(1);
        assert_eq!(get_tick_at_sqrt_ratio(sqrt_ratio), 100);
    }

    #[rstest]
    fn test_tick_to_price_same_decimals() {
        assert!((tick_to_price(0, 18, 18) - 1.0).abs() < 1e-12);
        assert!((tick_to_price(10_000, 18, 18) - 1.0001f64.powi(10_000)).abs() < 1e-9);
    }

    #[rstest]
    fn test_range_prices_usdc_weth_frame() {
        // USDC (6) / WETH (18) pool around 2,500 USDC per WETH
        let (price_lower, price_upper) = range_prices(197_700, 198_110, 6, 18);
        assert!(price_lower < price_upper);
        assert!(price_lower > 2_400.0 && price_lower < 2_600.0);
        assert!(price_upper > 2_500.0 && price_upper < 2_700.0);
    }
}
