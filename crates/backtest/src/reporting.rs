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

//! Summary statistics and human-readable tables for backtest results.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use lpbt_model::defi::ResultRecord;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

/// Sums of the numeric record columns over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSums {
    pub amount0: f64,
    pub amount1: f64,
    pub price0: f64,
    pub price1: f64,
    pub il: f64,
    pub pnl: f64,
    pub apr: f64,
    pub accum_fees0: f64,
    pub accum_fees1: f64,
    pub fees0: f64,
    pub fees1: f64,
}

impl ColumnSums {
    fn add(&mut self, record: &ResultRecord) {
        self.amount0 += record.amount0;
        self.amount1 += record.amount1;
        self.price0 += record.price0;
        self.price1 += record.price1;
        self.il += record.il;
        self.pnl += record.pnl;
        self.apr += record.apr;
        self.accum_fees0 += record.accum_fees0;
        self.accum_fees1 += record.accum_fees1;
        self.fees0 += record.fees0;
        self.fees1 += record.fees1;
    }
}

/// Aggregate statistics over the records of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestSummary {
    pub periods: usize,
    pub active_periods: usize,
    /// Share of periods in which the position was in range.
    pub active_ratio: f64,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub total_fees0: f64,
    pub total_fees1: f64,
    pub final_amount0: f64,
    pub final_amount1: f64,
    pub final_pnl: f64,
    pub final_il: f64,
    pub final_apr: f64,
    pub max_pnl: f64,
    pub min_pnl: f64,
    pub sums: ColumnSums,
}

impl BacktestSummary {
    /// Summarizes `records`, which must be in run order.
    #[must_use]
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let mut sums = ColumnSums::default();
        let mut active_periods = 0;
        let mut max_pnl = f64::NEG_INFINITY;
        let mut min_pnl = f64::INFINITY;

        for record in records {
            sums.add(record);
            if record.position_active {
                active_periods += 1;
            }
            max_pnl = max_pnl.max(record.pnl);
            min_pnl = min_pnl.min(record.pnl);
        }

        let periods = records.len();
        let last = records.last();

        Self {
            periods,
            active_periods,
            active_ratio: if periods == 0 {
                0.0
            } else {
                active_periods as f64 / periods as f64
            },
            start: records.first().map(|r| r.timestamp),
            end: last.map(|r| r.timestamp),
            total_fees0: last.map_or(0.0, |r| r.accum_fees0),
            total_fees1: last.map_or(0.0, |r| r.accum_fees1),
            final_amount0: last.map_or(0.0, |r| r.amount0),
            final_amount1: last.map_or(0.0, |r| r.amount1),
            final_pnl: last.map_or(0.0, |r| r.pnl),
            final_il: last.map_or(0.0, |r| r.il),
            final_apr: last.map_or(0.0, |r| r.apr),
            max_pnl: if periods == 0 { 0.0 } else { max_pnl },
            min_pnl: if periods == 0 { 0.0 } else { min_pnl },
            sums,
        }
    }
}

#[derive(Tabled)]
struct RecordRow {
    timestamp: String,
    amount0: String,
    amount1: String,
    price0: String,
    price1: String,
    fees0: String,
    fees1: String,
    accum_fees0: String,
    accum_fees1: String,
    il: String,
    pnl: String,
    apr: String,
    active: bool,
}

impl From<&ResultRecord> for RecordRow {
    fn from(record: &ResultRecord) -> Self {
        Self {
            timestamp: record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            amount0: format!("{:.6}", record.amount0),
            amount1: format!("{:.6}", record.amount1),
            price0: format!("{:.6}", record.price0),
            price1: format!("{:.6}", record.price1),
            fees0: format!("{:.6}", record.fees0),
            fees1: format!("{:.6}", record.fees1),
            accum_fees0: format!("{:.6}", record.accum_fees0),
            accum_fees1: format!("{:.6}", record.accum_fees1),
            il: format!("{:.4}", record.il),
            pnl: format!("{:.4}", record.pnl),
            apr: format!("{:.2}", record.apr),
            active: record.position_active,
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    metric: &'static str,
    value: String,
}

impl SummaryRow {
    fn new(metric: &'static str, value: impl Display) -> Self {
        Self {
            metric,
            value: value.to_string(),
        }
    }
}

/// Return a [`String`] representation of `records` in a human-readable table format.
#[must_use]
pub fn render_records_table(records: &[ResultRecord]) -> String {
    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Return a [`String`] representation of `summary` in a human-readable table format.
#[must_use]
pub fn render_summary_table(summary: &BacktestSummary) -> String {
    let format_time = |time: Option<DateTime<Utc>>| {
        time.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
    };

    let rows = vec![
        SummaryRow::new("Periods", summary.periods),
        SummaryRow::new("Active periods", summary.active_periods),
        SummaryRow::new("Active ratio", format!("{:.2}%", summary.active_ratio * 100.0)),
        SummaryRow::new("Start", format_time(summary.start)),
        SummaryRow::new("End", format_time(summary.end)),
        SummaryRow::new("Total fees0", format!("{:.6}", summary.total_fees0)),
        SummaryRow::new("Total fees1", format!("{:.6}", summary.total_fees1)),
        SummaryRow::new("Final amount0", format!("{:.6}", summary.final_amount0)),
        SummaryRow::new("Final amount1", format!("{:.6}", summary.final_amount1)),
        SummaryRow::new("Final PnL", format!("{:.4}", summary.final_pnl)),
        SummaryRow::new("Final IL", format!("{:.4}", summary.final_il)),
        SummaryRow::new("Final APR", format!("{:.2}%", summary.final_apr)),
        SummaryRow::new("Max PnL", format!("{:.4}", summary.max_pnl)),
        SummaryRow::new("Min PnL", format!("{:.4}", summary.min_pnl)),
        SummaryRow::new("Sum fees0", format!("{:.6}", summary.sums.fees0)),
        SummaryRow::new("Sum fees1", format!("{:.6}", summary.sums.fees1)),
        SummaryRow::new("Sum PnL", format!("{:.4}", summary.sums.pnl)),
        SummaryRow::new("Sum IL", format!("{:.4}", summary.sums.il)),
    ];

    Table::new(rows).with(Style::rounded()).to_string()
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
