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

//! Conversion of subgraph response models into backtest domain types.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use lpbt_model::defi::{
    ActiveTickTable, InitializedTick, PoolSnapshot, PoolToken,
    fee::floor_tick,
    parsing::{parse_u128, parse_u160, parse_u256},
};

use crate::types::{PoolHourData, SubgraphTick, SubgraphToken, TokenHourData};

/// USD prices of one token keyed by period start in UNIX seconds.
pub type TokenPrices = BTreeMap<i64, f64>;

/// Converts UNIX seconds into a UTC timestamp.
///
/// # Errors
///
/// Returns an error if `secs` is out of the representable range.
pub fn parse_timestamp(secs: i64) -> anyhow::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| anyhow::anyhow!("Timestamp {secs} out of range"))
}

/// Parses a hex `address` as returned in subgraph entity ids.
///
/// # Errors
///
/// Returns an error if `address` is not a valid 20-byte hex address.
pub fn parse_address(address: &str) -> anyhow::Result<Address> {
    address
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address '{address}': {e}"))
}

fn parse_f64(field: &str, value: &str) -> anyhow::Result<f64> {
    let parsed: f64 = value
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {field} '{value}': {e}"))?;
    if !parsed.is_finite() {
        anyhow::bail!("Non-finite {field} '{value}'");
    }
    Ok(parsed)
}

/// Converts an embedded subgraph token into a [`PoolToken`].
///
/// # Errors
///
/// Returns an error if the address or decimals cannot be parsed.
pub fn parse_token(token: &SubgraphToken) -> anyhow::Result<PoolToken> {
    let decimals: u8 = token
        .decimals
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid decimals '{}' for {}: {e}", token.decimals, token.id))?;
    Ok(PoolToken::new(
        parse_address(&token.id)?,
        token.symbol.clone(),
        decimals,
    ))
}

/// Collects hourly token USD prices into a [`TokenPrices`] map.
///
/// # Errors
///
/// Returns an error if any price is not a finite number.
pub fn parse_token_hour_prices(datas: &[TokenHourData]) -> anyhow::Result<TokenPrices> {
    datas
        .iter()
        .map(|data| -> anyhow::Result<(i64, f64)> {
            Ok((data.period_start_unix, parse_f64("priceUSD", &data.price_usd)?))
        })
        .collect()
}

/// Converts one hourly pool record into a [`PoolSnapshot`].
///
/// Returns `Ok(None)` for records the backtest cannot use: a null tick, a zero OHLC price,
/// or no USD price for either token at the record's period start.
///
/// # Errors
///
/// Returns an error if a present field is malformed.
pub fn parse_pool_hour(
    hour: &PoolHourData,
    token0_prices: &TokenPrices,
    token1_prices: &TokenPrices,
) -> anyhow::Result<Option<PoolSnapshot>> {
    let period = hour.period_start_unix;

    let Some(tick) = hour.tick.as_deref() else {
        tracing::debug!("Skipping hour {period}: no tick recorded");
        return Ok(None);
    };

    let open = parse_f64("open", &hour.open)?;
    let high = parse_f64("high", &hour.high)?;
    let low = parse_f64("low", &hour.low)?;
    let close = parse_f64("close", &hour.close)?;
    if [open, high, low, close].contains(&0.0) {
        tracing::debug!("Skipping hour {period}: zero price in OHLC");
        return Ok(None);
    }

    let (Some(&token0_price_usd), Some(&token1_price_usd)) =
        (token0_prices.get(&period), token1_prices.get(&period))
    else {
        tracing::debug!("Skipping hour {period}: missing USD price");
        return Ok(None);
    };

    let fee_tier: u32 = hour
        .pool
        .fee_tier
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid feeTier '{}': {e}", hour.pool.fee_tier))?;
    let tick: i32 = tick
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid tick '{tick}': {e}"))?;

    Ok(Some(PoolSnapshot {
        timestamp: parse_timestamp(period)?,
        pool_address: Some(parse_address(&hour.pool.id)?),
        fee_tier,
        tick,
        sqrt_price_x96: parse_u160(&hour.sqrt_price)?,
        liquidity: parse_u128(&hour.liquidity)?,
        fee_growth_global_0: parse_u256(&hour.fee_growth_global_0_x128)?,
        fee_growth_global_1: parse_u256(&hour.fee_growth_global_1_x128)?,
        token0: parse_token(&hour.pool.token0)?,
        token1: parse_token(&hour.pool.token1)?,
        open,
        high,
        low,
        close,
        token0_price_usd,
        token1_price_usd,
        token0_in_token1: parse_f64("token1Price", &hour.token1_price)?,
        token1_in_token0: parse_f64("token0Price", &hour.token0_price)?,
        volume_usd: Some(parse_f64("volumeUSD", &hour.volume_usd)?),
        tvl_usd: Some(parse_f64("tvlUSD", &hour.tvl_usd)?),
    }))
}

/// Builds an ascending, validated snapshot sequence from hourly pool records in any order.
///
/// # Errors
///
/// Returns an error if a record is malformed or the resulting sequence fails validation.
pub fn build_snapshots(
    hours: &[PoolHourData],
    token0_prices: &TokenPrices,
    token1_prices: &TokenPrices,
) -> anyhow::Result<Vec<PoolSnapshot>> {
    let mut snapshots = hours
        .iter()
        .filter_map(|hour| parse_pool_hour(hour, token0_prices, token1_prices).transpose())
        .collect::<anyhow::Result<Vec<_>>>()?;

    snapshots.sort_by_key(|snapshot| snapshot.timestamp);
    snapshots.dedup_by_key(|snapshot| snapshot.timestamp);
    PoolSnapshot::validate_sequence(&snapshots)?;

    tracing::info!(
        "Built {} snapshots from {} hourly records ({} dropped)",
        snapshots.len(),
        hours.len(),
        hours.len() - snapshots.len()
    );
    Ok(snapshots)
}

/// Converts subgraph tick entities into [`InitializedTick`]s.
///
/// # Errors
///
/// Returns an error if a tick index or net liquidity cannot be parsed.
pub fn parse_ticks(ticks: &[SubgraphTick]) -> anyhow::Result<Vec<InitializedTick>> {
    ticks
        .iter()
        .map(|tick| -> anyhow::Result<InitializedTick> {
            Ok(InitializedTick {
                tick_idx: tick
                    .tick_idx
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid tickIdx '{}': {e}", tick.tick_idx))?,
                liquidity_net: tick.liquidity_net.parse().map_err(|e| {
                    anyhow::anyhow!("Invalid liquidityNet '{}': {e}", tick.liquidity_net)
                })?,
            })
        })
        .collect()
}

/// Derives an [`ActiveTickTable`] with an entry for every `tick_spacing` bucket between the
/// lowest and highest initialized tick.
///
/// Buckets between initialized ticks carry the active liquidity of the nearest initialized
/// tick at or below them.
///
/// The table holds `(highest - lowest) / tick_spacing + 1` entries regardless of how many
/// ticks are initialized. A spacing-1 pool with full-range liquidity near `±887272` expands
/// to roughly 1.77 million entries, so fetch ticks for narrow-spacing pools with care.
///
/// # Errors
///
/// Returns an error if `tick_spacing` is not positive or the running liquidity sum is
/// invalid.
pub fn build_active_tick_table(
    ticks: &[InitializedTick],
    tick_spacing: i32,
) -> anyhow::Result<ActiveTickTable> {
    if tick_spacing <= 0 {
        anyhow::bail!("Tick spacing must be positive, was {tick_spacing}");
    }

    let sparse = ActiveTickTable::from_initialized_ticks(ticks)?;
    let entries: Vec<_> = sparse.iter().collect();
    let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
        return Ok(sparse);
    };

    let mut table = ActiveTickTable::new();
    let mut next = 0;
    let mut active = 0;
    let mut bucket = floor_tick(first.tick_index, tick_spacing);
    while bucket <= last.tick_index {
        while let Some(entry) = entries.get(next).filter(|e| e.tick_index <= bucket) {
            active = entry.active_liquidity;
            next += 1;
        }
        table.insert(bucket, active);
        bucket += tick_spacing;
    }

    tracing::debug!(
        "Expanded {} initialized ticks into {} buckets",
        ticks.len(),
        table.len()
    );
    Ok(table)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
