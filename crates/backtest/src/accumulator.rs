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

//! State threaded through the backtest fold.

use crate::{fees::PeriodFees, position::PositionAmounts, valuation::BasisPrices};

/// Holdings and basis prices captured at the first period, never updated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub amount0: f64,
    pub amount1: f64,
    pub price0: f64,
    pub price1: f64,
}

impl Baseline {
    /// Creates a new [`Baseline`] from the first period's amounts and prices.
    #[must_use]
    pub fn new(amounts: PositionAmounts, prices: BasisPrices) -> Self {
        Self {
            amount0: amounts.amount0,
            amount1: amounts.amount1,
            price0: prices.price0,
            price1: prices.price1,
        }
    }
}

/// Cumulative fee totals and the frozen baseline carried from one period to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestAccumulator {
    pub cumulative_fees0: f64,
    pub cumulative_fees1: f64,
    baseline: Option<Baseline>,
}

impl BacktestAccumulator {
    /// Creates a new empty [`BacktestAccumulator`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one period's fees to the running totals.
    pub fn accrue(&mut self, fees: PeriodFees) {
        self.cumulative_fees0 += fees.fees0;
        self.cumulative_fees1 += fees.fees1;
    }

    /// Returns the frozen baseline, capturing it from `amounts` and `prices` on first call.
    pub fn baseline_or_freeze(
        &mut self,
        amounts: PositionAmounts,
        prices: BasisPrices,
    ) -> Baseline {
        *self
            .baseline
            .get_or_insert_with(|| Baseline::new(amounts, prices))
    }

    /// Returns the frozen baseline, if captured.
    #[must_use]
    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_accrue_sums_fees() {
        let mut accumulator = BacktestAccumulator::new();
        accumulator.accrue(PeriodFees {
            fees0: 1.0,
            fees1: 0.5,
        });
        accumulator.accrue(PeriodFees {
            fees0: 2.0,
            fees1: 0.25,
        });
        assert_eq!(accumulator.cumulative_fees0, 3.0);
        assert_eq!(accumulator.cumulative_fees1, 0.75);
    }

    #[rstest]
    fn test_baseline_is_frozen_on_first_call() {
        let mut accumulator = BacktestAccumulator::new();
        assert!(accumulator.baseline().is_none());

        let first = accumulator.baseline_or_freeze(
            PositionAmounts {
                amount0: 1.0,
                amount1: 2.0,
            },
            BasisPrices {
                price0: 1.0,
                price1: 3.0,
            },
        );
        let second = accumulator.baseline_or_freeze(
            PositionAmounts {
                amount0: 9.0,
                amount1: 9.0,
            },
            BasisPrices {
                price0: 9.0,
                price1: 9.0,
            },
        );

        assert_eq!(first, second);
        assert_eq!(accumulator.baseline(), Some(first));
        assert_eq!(first.amount1, 2.0);
        assert_eq!(first.price1, 3.0);
    }
}
