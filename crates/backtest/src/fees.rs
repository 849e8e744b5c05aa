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

//! Per-period fee accrual for a fixed-range position.
//!
//! Fees for a period start from the growth of the pool's global fee accumulators. The growth
//! is optionally scaled by a dilution factor, the position's share of the liquidity active on
//! the bucket the period started in, and always weighted by how much of the period's traded
//! price range fell inside the position's range.

use alloy_primitives::U256;
use lpbt_model::{
    defi::{
        ActiveTickTable, PoolSnapshot, PositionParams,
        fee::{floor_tick, tick_spacing_for_fee_tier},
        math::scaled_u256_to_f64,
        tick_map::full_math::{FullMath, Q128},
    },
    enums::ActiveLiquidityConvention,
};

use crate::error::{BacktestError, BacktestResult};

/// Fees earned by the position over one period, in decimal-scaled token units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodFees {
    pub fees0: f64,
    pub fees1: f64,
}

/// Scales fee growth by the position's share of the liquidity active at the pool tick.
#[derive(Debug, Clone)]
pub struct DilutionModel {
    table: ActiveTickTable,
    convention: ActiveLiquidityConvention,
}

impl DilutionModel {
    /// Creates a new [`DilutionModel`] instance.
    #[must_use]
    pub fn new(table: ActiveTickTable, convention: ActiveLiquidityConvention) -> Self {
        Self { table, convention }
    }

    /// Returns the dilution factor for a period starting at `prev`.
    ///
    /// The pool tick is floored to the fee tier's tick spacing and the bucket's active
    /// liquidity `A` is looked up. With the default convention the factor is `A / (L + A)`
    /// for position liquidity `L`. When the table already counts the position it is
    /// `(A - L) / A`, saturating at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The fee tier has no known tick spacing.
    /// - The table has no entry for the bucket.
    pub fn factor(&self, prev: &PoolSnapshot, position_liquidity: u128) -> BacktestResult<f64> {
        let tick_spacing = tick_spacing_for_fee_tier(prev.fee_tier)
            .ok_or(BacktestError::UnknownFeeTier(prev.fee_tier))?;
        let bucket = floor_tick(prev.tick, tick_spacing);
        let active = self
            .table
            .get(bucket)
            .ok_or(BacktestError::MissingTickBucket {
                tick: prev.tick,
                bucket,
            })?;

        let factor = match self.convention {
            ActiveLiquidityConvention::ExcludesPosition => {
                let total = position_liquidity as f64 + active as f64;
                if total == 0.0 {
                    0.0
                } else {
                    active as f64 / total
                }
            }
            ActiveLiquidityConvention::IncludesPosition => {
                if active == 0 {
                    0.0
                } else {
                    active.saturating_sub(position_liquidity) as f64 / active as f64
                }
            }
        };

        tracing::trace!(
            "Dilution factor {factor} at tick {} (bucket {bucket}, active liquidity {active})",
            prev.tick
        );
        Ok(factor)
    }
}

/// Returns the share of `[low, high]` that overlaps `[price_lower, price_upper]`.
///
/// A zero-width period counts as fully inside when its single price lies strictly within
/// the position's bounds. Any non-overlapping or non-finite result yields zero, and the
/// ratio is always within `[0, 1]`.
#[must_use]
pub fn overlap_ratio(price_lower: f64, price_upper: f64, low: f64, high: f64) -> f64 {
    let overlaps = high > price_lower && low < price_upper;

    if high == low {
        return if overlaps { 1.0 } else { 0.0 };
    }

    let ratio = (high.min(price_upper) - low.max(price_lower)) / (high - low);
    if !overlaps || !ratio.is_finite() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

/// Computes each period's fee earnings for a fixed-range position.
#[derive(Debug, Clone, Default)]
pub struct FeeAccrualEngine {
    dilution: Option<DilutionModel>,
}

impl FeeAccrualEngine {
    /// Creates a new [`FeeAccrualEngine`], diluting fees when `dilution` is given.
    #[must_use]
    pub fn new(dilution: Option<DilutionModel>) -> Self {
        Self { dilution }
    }

    /// Returns whether fees are diluted by the active tick table.
    #[must_use]
    pub fn is_diluted(&self) -> bool {
        self.dilution.is_some()
    }

    /// Computes the fees `position` earned between `prev` and `current`.
    ///
    /// `price_lower` and `price_upper` are the position bounds in the OHLC price frame and
    /// are compared against the period range of `current`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Dilution is enabled and the bucket or fee tier lookup fails.
    /// - A fee amount overflows or a token's decimals are out of range.
    pub fn compute_period_fees(
        &self,
        prev: &PoolSnapshot,
        current: &PoolSnapshot,
        position: &PositionParams,
        price_lower: f64,
        price_upper: f64,
    ) -> BacktestResult<PeriodFees> {
        // Accumulators are allowed to overflow on-chain
        let delta0 = current
            .fee_growth_global_0
            .wrapping_sub(prev.fee_growth_global_0);
        let delta1 = current
            .fee_growth_global_1
            .wrapping_sub(prev.fee_growth_global_1);

        let dilution = match &self.dilution {
            Some(model) => model.factor(prev, position.liquidity)?,
            None => 1.0,
        };
        let ratio = overlap_ratio(price_lower, price_upper, current.low, current.high);

        let fees0 = Self::scale(delta0, position.liquidity, current.token0.decimals)?;
        let fees1 = Self::scale(delta1, position.liquidity, current.token1.decimals)?;

        Ok(PeriodFees {
            fees0: fees0 * dilution * ratio,
            fees1: fees1 * dilution * ratio,
        })
    }

    fn scale(fee_growth_delta: U256, liquidity: u128, decimals: u8) -> BacktestResult<f64> {
        let base_units = FullMath::mul_div(fee_growth_delta, U256::from(liquidity), Q128)
            .map_err(|e| BacktestError::Conversion(e.to_string()))?;
        scaled_u256_to_f64(base_units, decimals)
            .map_err(|e| BacktestError::Conversion(format!("fees: {e}")))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
