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

//! Token holdings of a fixed-range position against a pool snapshot.

use lpbt_model::defi::{
    PoolSnapshot, PositionParams, math::scaled_u256_to_f64,
    tick_map::sqrt_price_math::get_amounts_for_liquidity,
};

use crate::error::{BacktestError, BacktestResult};

/// Decimal-scaled token amounts held by a position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionAmounts {
    pub amount0: f64,
    pub amount1: f64,
}

/// Computes the amounts `position` would hold at `snapshot`.
///
/// Amounts are derived in exact Q64.96 arithmetic from the snapshot's tick and sqrt price,
/// rounded down to integer base units, then scaled by each token's decimals.
///
/// # Errors
///
/// Returns [`BacktestError::Conversion`] if an amount overflows 256 bits or a token's
/// decimals are out of range.
pub fn compute_amounts(
    snapshot: &PoolSnapshot,
    position: &PositionParams,
) -> BacktestResult<PositionAmounts> {
    let (raw0, raw1) = get_amounts_for_liquidity(
        snapshot.sqrt_price_x96,
        snapshot.tick,
        position.tick_lower,
        position.tick_upper,
        position.liquidity,
    )
    .map_err(|e| BacktestError::Conversion(e.to_string()))?;

    let amount0 = scaled_u256_to_f64(raw0, snapshot.token0.decimals)
        .map_err(|e| BacktestError::Conversion(format!("amount0: {e}")))?;
    let amount1 = scaled_u256_to_f64(raw1, snapshot.token1.decimals)
        .map_err(|e| BacktestError::Conversion(format!("amount1: {e}")))?;

    Ok(PositionAmounts { amount0, amount1 })
}

/// Returns whether the pool tick at `prev` lay within the position's range, bounds included.
///
/// The preceding snapshot is used since its tick is where trading started in the period.
#[must_use]
pub fn is_active(prev: &PoolSnapshot, position: &PositionParams) -> bool {
    position.contains_tick(prev.tick)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
