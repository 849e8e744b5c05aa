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

//! Valuation of position holdings against a frozen reference.

use chrono::{DateTime, Utc};
use lpbt_model::{defi::PoolSnapshot, enums::ReferenceBasis};

use crate::{
    accumulator::Baseline,
    error::{BacktestError, BacktestResult},
};

const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Prices of token0 and token1 in a reference basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisPrices {
    pub price0: f64,
    pub price1: f64,
}

/// PnL metrics for one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    /// Frozen baseline holdings valued in this period's frame.
    pub reference_value: f64,
    /// Position value excluding fees.
    pub current_value: f64,
    /// Position value including cumulative fees.
    pub current_value_with_fees: f64,
    pub pnl: f64,
    pub il: f64,
    pub apr: f64,
}

/// Values position holdings in a fixed [`ReferenceBasis`].
#[derive(Debug, Clone, Copy)]
pub struct ValuationEngine {
    basis: ReferenceBasis,
}

impl ValuationEngine {
    /// Creates a new [`ValuationEngine`] instance.
    #[must_use]
    pub const fn new(basis: ReferenceBasis) -> Self {
        Self { basis }
    }

    /// Returns the reference basis.
    #[must_use]
    pub const fn basis(&self) -> ReferenceBasis {
        self.basis
    }

    /// Returns the basis prices of both tokens at `snapshot`.
    ///
    /// - `hodl`: USD prices.
    /// - `token0`: token0 is 1, token1 is priced in token0.
    /// - `token1`: token1 is 1, token0 is priced in token1.
    #[must_use]
    pub fn basis_prices(&self, snapshot: &PoolSnapshot) -> BasisPrices {
        match self.basis {
            ReferenceBasis::Hodl => BasisPrices {
                price0: snapshot.token0_price_usd,
                price1: snapshot.token1_price_usd,
            },
            ReferenceBasis::Token0 => BasisPrices {
                price0: 1.0,
                price1: snapshot.token1_in_token0,
            },
            ReferenceBasis::Token1 => BasisPrices {
                price0: snapshot.token0_in_token1,
                price1: 1.0,
            },
        }
    }

    /// Returns the value of the frozen baseline in the frame of `prices`.
    ///
    /// Under `hodl` the baseline amounts are revalued at the current USD prices. Under a
    /// token basis the baseline's own prices are used, so the value never changes.
    #[must_use]
    pub fn reference_value(&self, baseline: &Baseline, prices: BasisPrices) -> f64 {
        match self.basis {
            ReferenceBasis::Hodl => {
                baseline.amount0 * prices.price0 + baseline.amount1 * prices.price1
            }
            ReferenceBasis::Token0 | ReferenceBasis::Token1 => {
                baseline.amount0 * baseline.price0 + baseline.amount1 * baseline.price1
            }
        }
    }

    /// Derives PnL, impermanent loss and APR for one period.
    ///
    /// `amounts` are the position holdings and `cumulative_fees` the fees accrued so far, both
    /// as `(token0, token1)` pairs. APR is annualized from `first_timestamp` to `timestamp`.
    /// A zero reference value yields zero PnL and APR, as does a non-positive elapsed time
    /// for APR.
    ///
    /// # Errors
    ///
    /// Returns [`BacktestError::NonFiniteValue`] if any derived value is NaN or infinite.
    pub fn value(
        &self,
        baseline: &Baseline,
        prices: BasisPrices,
        amounts: (f64, f64),
        cumulative_fees: (f64, f64),
        first_timestamp: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    ) -> BacktestResult<Valuation> {
        let reference_value = self.reference_value(baseline, prices);
        let current_value = amounts.0 * prices.price0 + amounts.1 * prices.price1;
        let current_value_with_fees = (amounts.0 + cumulative_fees.0) * prices.price0
            + (amounts.1 + cumulative_fees.1) * prices.price1;

        let il = current_value - reference_value;
        let pnl = if reference_value == 0.0 {
            0.0
        } else {
            current_value_with_fees - reference_value
        };

        let days_elapsed = (timestamp - first_timestamp).num_milliseconds() as f64
            / 1_000.0
            / SECONDS_PER_DAY;
        let apr = if reference_value == 0.0 || days_elapsed <= 0.0 {
            0.0
        } else {
            (pnl / reference_value) * (DAYS_PER_YEAR / days_elapsed) * 100.0
        };

        Ok(Valuation {
            reference_value: BacktestError::check_finite(
                "reference_value",
                reference_value,
                timestamp,
            )?,
            current_value: BacktestError::check_finite("current_value", current_value, timestamp)?,
            current_value_with_fees: BacktestError::check_finite(
                "current_value_with_fees",
                current_value_with_fees,
                timestamp,
            )?,
            pnl: BacktestError::check_finite("pnl", pnl, timestamp)?,
            il: BacktestError::check_finite("il", il, timestamp)?,
            apr: BacktestError::check_finite("apr", apr, timestamp)?,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
