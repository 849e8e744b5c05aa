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

//! The backtest driver folding position, fee and valuation models across snapshots.

use chrono::{DateTime, Utc};
use lpbt_model::defi::{
    PoolSnapshot, PositionParams, ResultRecord, tick_map::tick_math::range_prices,
};

use crate::{
    accumulator::BacktestAccumulator,
    config::BacktestConfig,
    error::{BacktestError, BacktestResult},
    fees::{DilutionModel, FeeAccrualEngine},
    position::{compute_amounts, is_active},
    valuation::ValuationEngine,
};

/// Replays a fixed-range liquidity position over an ordered sequence of pool snapshots.
///
/// The engine holds only immutable configuration, so one instance can run any number of
/// sequences, including concurrently. Each run threads its own [`BacktestAccumulator`].
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    config: BacktestConfig,
    position: PositionParams,
    fees: FeeAccrualEngine,
    valuation: ValuationEngine,
}

impl BacktestEngine {
    /// Creates a new [`BacktestEngine`] from a validated `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: BacktestConfig) -> BacktestResult<Self> {
        config.validate()?;
        let position = config.position()?;

        let dilution = if config.dilute_fees {
            let table = config.active_tick_table.clone().ok_or_else(|| {
                BacktestError::InvalidConfig("dilute_fees requires an active tick table".into())
            })?;
            Some(DilutionModel::new(table, config.active_liquidity_convention))
        } else {
            None
        };

        Ok(Self {
            position,
            fees: FeeAccrualEngine::new(dilution),
            valuation: ValuationEngine::new(config.reference_basis),
            config,
        })
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Returns the backtested position.
    #[must_use]
    pub fn position(&self) -> &PositionParams {
        &self.position
    }

    /// Runs the backtest over `snapshots`, producing one record per consecutive pair.
    ///
    /// Fewer than two snapshots yield an empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The snapshots fail validation or are not strictly ascending.
    /// - Dilution is enabled and a tick bucket or fee tier lookup fails.
    /// - A derived value is non-finite or a fixed-point conversion overflows.
    pub fn run(&self, snapshots: &[PoolSnapshot]) -> BacktestResult<Vec<ResultRecord>> {
        let Some(first) = snapshots.first() else {
            return Ok(Vec::new());
        };

        PoolSnapshot::validate_sequence(snapshots)
            .map_err(|e| BacktestError::InvalidSnapshot(e.to_string()))?;

        let first_timestamp = self.config.first_timestamp.unwrap_or(first.timestamp);

        tracing::info!(
            "Running backtest over {} snapshots for {} with {} basis (dilute_fees={})",
            snapshots.len(),
            self.position,
            self.valuation.basis(),
            self.fees.is_diluted(),
        );

        let mut accumulator = BacktestAccumulator::new();
        let records = snapshots
            .windows(2)
            .map(|pair| self.step(&mut accumulator, &pair[0], &pair[1], first_timestamp))
            .collect::<BacktestResult<Vec<_>>>()?;

        tracing::info!(
            "Backtest complete: {} records, accumulated fees ({}, {})",
            records.len(),
            accumulator.cumulative_fees0,
            accumulator.cumulative_fees1,
        );

        Ok(records)
    }

    /// Processes one `(prev, current)` period, updating `accumulator`.
    ///
    /// # Errors
    ///
    /// Returns an error if fee accrual fails or a derived value is non-finite.
    pub fn step(
        &self,
        accumulator: &mut BacktestAccumulator,
        prev: &PoolSnapshot,
        current: &PoolSnapshot,
        first_timestamp: DateTime<Utc>,
    ) -> BacktestResult<ResultRecord> {
        let timestamp = current.timestamp;

        let amounts = compute_amounts(current, &self.position)?;
        let position_active = is_active(prev, &self.position);

        let (price_lower, price_upper) = range_prices(
            self.position.tick_lower,
            self.position.tick_upper,
            current.token0.decimals,
            current.token1.decimals,
        );
        let fees = self
            .fees
            .compute_period_fees(prev, current, &self.position, price_lower, price_upper)?;
        let fees0 = BacktestError::check_finite("fees0", fees.fees0, timestamp)?;
        let fees1 = BacktestError::check_finite("fees1", fees.fees1, timestamp)?;
        accumulator.accrue(fees);

        let prices = self.valuation.basis_prices(current);
        let baseline = accumulator.baseline_or_freeze(amounts, prices);
        let valuation = self.valuation.value(
            &baseline,
            prices,
            (amounts.amount0, amounts.amount1),
            (accumulator.cumulative_fees0, accumulator.cumulative_fees1),
            first_timestamp,
            timestamp,
        )?;

        tracing::debug!(
            "Period {}: tick={}, active={}, fees=({}, {}), pnl={}",
            timestamp,
            current.tick,
            position_active,
            fees0,
            fees1,
            valuation.pnl,
        );

        Ok(ResultRecord {
            timestamp,
            amount0: amounts.amount0,
            amount1: amounts.amount1,
            price0: prices.price0,
            price1: prices.price1,
            liquidity: self.position.liquidity,
            il: valuation.il,
            pnl: valuation.pnl,
            apr: valuation.apr,
            position_active,
            accum_fees0: accumulator.cumulative_fees0,
            accum_fees1: accumulator.cumulative_fees1,
            fees0,
            fees1,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use lpbt_model::{
        defi::ActiveTickTable,
        enums::{ActiveLiquidityConvention, ReferenceBasis},
        stubs::{snapshot_series, stub_snapshots},
    };
    use rstest::rstest;

    use super::*;

    fn engine(basis: ReferenceBasis) -> BacktestEngine {
        BacktestEngine::new(BacktestConfig::new(-600, 600, 1000, basis)).unwrap()
    }

    #[rstest]
    fn test_new_rejects_invalid_config() {
        let result = BacktestEngine::new(BacktestConfig::new(600, -600, 1000, ReferenceBasis::Hodl));
        assert!(matches!(result, Err(BacktestError::InvalidConfig(_))));
    }

    #[rstest]
    fn test_run_empty_and_single_snapshot() {
        let engine = engine(ReferenceBasis::Hodl);
        assert!(engine.run(&[]).unwrap().is_empty());
        assert!(engine.run(&snapshot_series(&[0])).unwrap().is_empty());
    }

    #[rstest]
    fn test_run_emits_one_record_per_pair(stub_snapshots: Vec<PoolSnapshot>) {
        let records = engine(ReferenceBasis::Token0).run(&stub_snapshots).unwrap();
        assert_eq!(records.len(), stub_snapshots.len() - 1);
        assert_eq!(records[0].timestamp, stub_snapshots[1].timestamp);
        assert_eq!(records[1].timestamp, stub_snapshots[2].timestamp);
        assert!(records.iter().all(|r| r.liquidity == 1000));
    }

    #[rstest]
    fn test_first_record_has_no_impermanent_loss(stub_snapshots: Vec<PoolSnapshot>) {
        let records = engine(ReferenceBasis::Hodl).run(&stub_snapshots).unwrap();
        assert_eq!(records[0].il, 0.0);
        assert!(records[0].pnl > 0.0);
    }

    #[rstest]
    fn test_run_rejects_unordered_snapshots(stub_snapshots: Vec<PoolSnapshot>) {
        let mut snapshots = stub_snapshots;
        snapshots.swap(0, 2);
        let result = engine(ReferenceBasis::Hodl).run(&snapshots);
        assert!(matches!(result, Err(BacktestError::InvalidSnapshot(_))));
    }

    #[rstest]
    fn test_run_propagates_missing_tick_bucket(stub_snapshots: Vec<PoolSnapshot>) {
        let config = BacktestConfig::new(-600, 600, 1000, ReferenceBasis::Hodl).with_dilution(
            ActiveTickTable::new(),
            ActiveLiquidityConvention::ExcludesPosition,
        );
        let result = BacktestEngine::new(config).unwrap().run(&stub_snapshots);
        assert_eq!(
            result.unwrap_err(),
            BacktestError::MissingTickBucket { tick: 0, bucket: 0 }
        );
    }

    #[rstest]
    fn test_first_timestamp_override_changes_apr_only(stub_snapshots: Vec<PoolSnapshot>) {
        let default_run = engine(ReferenceBasis::Token0).run(&stub_snapshots).unwrap();

        let earlier = stub_snapshots[0].timestamp - chrono::Duration::days(1);
        let config = BacktestConfig::new(-600, 600, 1000, ReferenceBasis::Token0)
            .with_first_timestamp(earlier);
        let shifted_run = BacktestEngine::new(config).unwrap().run(&stub_snapshots).unwrap();

        assert_eq!(default_run[1].pnl, shifted_run[1].pnl);
        assert!(shifted_run[1].apr < default_run[1].apr);
    }
}
