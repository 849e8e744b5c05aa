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

use lpbt_backtest::{
    config::{BacktestConfig, parse_reference_basis},
    engine::BacktestEngine,
    reporting::{BacktestSummary, render_records_table, render_summary_table},
    window::select_trailing_window,
};
use lpbt_model::{
    defi::{PoolSnapshot, ResultRecord},
    enums::ReferenceBasis,
};

use crate::{
    files::{read_json, write_json},
    opt::RunOpt,
    subgraph::PoolQuery,
};

/// Runs a backtest as described by `opt` and prints its results.
pub async fn run_backtest(opt: RunOpt) -> anyhow::Result<()> {
    let snapshots: Vec<PoolSnapshot> = match &opt.input {
        Some(path) => read_json(path)?,
        None => PoolQuery::try_from(&opt.subgraph)?.fetch_snapshots().await?,
    };

    let snapshots = match opt.days {
        Some(days) => select_trailing_window(&snapshots, days),
        None => &snapshots[..],
    };

    let mut config = build_config(&opt)?;
    if config.dilute_fees && config.active_tick_table.is_none() {
        tracing::info!("No active tick table given, fetching from subgraph");
        let table = PoolQuery::try_from(&opt.subgraph)?
            .fetch_active_ticks()
            .await?;
        config.active_tick_table = Some(table);
    }

    let engine = BacktestEngine::new(config)?;
    let records = engine.run(snapshots)?;

    print_records(&records, opt.rows);

    if let Some(path) = &opt.output {
        write_json(path, &records)?;
    }

    Ok(())
}

/// Builds the run configuration from the optional TOML file and flag overrides.
pub fn build_config(opt: &RunOpt) -> anyhow::Result<BacktestConfig> {
    let mut config = match &opt.config {
        Some(path) => BacktestConfig::from_toml_file(path)?,
        None => {
            let (Some(tick_lower), Some(tick_upper), Some(liquidity)) =
                (opt.tick_lower, opt.tick_upper, opt.liquidity)
            else {
                anyhow::bail!(
                    "--tick-lower, --tick-upper and --liquidity are required without --config"
                );
            };
            BacktestConfig::new(tick_lower, tick_upper, liquidity, ReferenceBasis::default())
        }
    };

    if let Some(tick_lower) = opt.tick_lower {
        config.tick_lower = tick_lower;
    }
    if let Some(tick_upper) = opt.tick_upper {
        config.tick_upper = tick_upper;
    }
    if let Some(liquidity) = opt.liquidity {
        config.liquidity = liquidity;
    }
    if let Some(basis) = &opt.basis {
        config.reference_basis = parse_reference_basis(basis)?;
    }
    if let Some(convention) = opt.convention {
        config.active_liquidity_convention = convention;
    }
    if let Some(path) = &opt.ticks {
        config.active_tick_table = Some(read_json(path)?);
    }
    if opt.dilute {
        config.dilute_fees = true;
    }

    Ok(config)
}

fn print_records(records: &[ResultRecord], rows: usize) {
    if records.is_empty() {
        tracing::warn!("Backtest produced no records, at least two snapshots are required");
        return;
    }

    let head = rows.min(records.len());
    println!("{}", render_records_table(&records[..head]));
    let tail_start = head.max(records.len().saturating_sub(rows));
    if tail_start < records.len() {
        println!("{}", render_records_table(&records[tail_start..]));
    }

    let summary = BacktestSummary::from_records(records);
    println!("{}", render_summary_table(&summary));
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
