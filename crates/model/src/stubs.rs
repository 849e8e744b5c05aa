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

//! Type stubs to facilitate testing.

use alloy_primitives::{Address, U256, address};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::fixture;

use crate::defi::{
    ActiveTickTable, PoolSnapshot, PoolToken, PositionParams,
    tick_map::{
        full_math::Q128,
        tick_math::{TICK_BASE, get_sqrt_ratio_at_tick},
    },
};

/// Fee growth added per hour to each global accumulator, in Q128.128.
///
/// A position holding 1000 units of liquidity earns exactly one 18-decimal token per hour.
pub const STUB_FEE_GROWTH_PER_HOUR: u128 = 1_000_000_000_000_000;

/// USD price of the stub token0.
pub const STUB_TOKEN0_PRICE_USD: f64 = 2.0;

/// Pool-wide liquidity reported by every stub snapshot.
pub const STUB_POOL_LIQUIDITY: u128 = 1_000_000_000_000_000_000;

#[must_use]
pub fn stub_pool_address() -> Address {
    address!("8ad599c3a0ff1de082011efddc58f1908eb6e6d8")
}

#[fixture]
pub fn stub_token0() -> PoolToken {
    PoolToken::new(
        address!("1111111111111111111111111111111111111111"),
        "TKA",
        18,
    )
}

#[fixture]
pub fn stub_token1() -> PoolToken {
    PoolToken::new(
        address!("2222222222222222222222222222222222222222"),
        "TKB",
        18,
    )
}

/// Returns the start of the stub timeline, 2024-01-01T00:00:00Z.
///
/// # Panics
///
/// Never, the date is a valid constant.
#[must_use]
pub fn stub_start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Builds a 0.3% pool snapshot `hour` hours after [`stub_start_time`] with the pool at `tick`.
///
/// Both tokens have 18 decimals, so the token0-per-token1 close is `1.0001^-tick`. The period
/// range spans 1% either side of the close and fee growth rises by
/// [`STUB_FEE_GROWTH_PER_HOUR`] per hour for both tokens.
#[must_use]
pub fn snapshot_at_hour(hour: i64, tick: i32) -> PoolSnapshot {
    let close = 1.0 / TICK_BASE.powi(tick);
    let growth_hours = U256::from(u64::try_from(hour.max(0)).unwrap_or_default());
    let fee_growth = Q128 * U256::from(STUB_FEE_GROWTH_PER_HOUR) * growth_hours;

    PoolSnapshot {
        timestamp: stub_start_time() + Duration::hours(hour),
        pool_address: Some(stub_pool_address()),
        fee_tier: 3000,
        tick,
        sqrt_price_x96: get_sqrt_ratio_at_tick(tick),
        liquidity: STUB_POOL_LIQUIDITY,
        fee_growth_global_0: fee_growth,
        fee_growth_global_1: fee_growth,
        token0: stub_token0(),
        token1: stub_token1(),
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        token0_price_usd: STUB_TOKEN0_PRICE_USD,
        token1_price_usd: STUB_TOKEN0_PRICE_USD * close,
        token0_in_token1: 1.0 / close,
        token1_in_token0: close,
        volume_usd: Some(1_000_000.0),
        tvl_usd: Some(10_000_000.0),
    }
}

/// Builds hourly snapshots, one per entry of `ticks`, starting at hour zero.
#[must_use]
pub fn snapshot_series(ticks: &[i32]) -> Vec<PoolSnapshot> {
    ticks
        .iter()
        .zip(0i64..)
        .map(|(&tick, hour)| snapshot_at_hour(hour, tick))
        .collect()
}

/// Three hourly snapshots with the pool parked at tick zero.
#[fixture]
pub fn stub_snapshots() -> Vec<PoolSnapshot> {
    snapshot_series(&[0, 0, 0])
}

/// A position of 1000 liquidity units over `[-600, 600]`.
///
/// # Panics
///
/// Never, the tick range is a valid constant.
#[fixture]
pub fn stub_position_params() -> PositionParams {
    PositionParams::new(-600, 600, 1000).unwrap()
}

/// Active liquidity of `10^18` on every 60-tick bucket in `[-1200, 1200)`.
#[fixture]
pub fn stub_active_tick_table() -> ActiveTickTable {
    let mut table = ActiveTickTable::new();
    for tick in (-1200..1200).step_by(60) {
        table.insert(tick, STUB_POOL_LIQUIDITY);
    }
    table
}
