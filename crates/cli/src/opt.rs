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

use std::path::PathBuf;

use alloy_primitives::Address;
use clap::Parser;
use lpbt_model::enums::ActiveLiquidityConvention;

/// Main CLI structure for parsing command-line arguments and options.
///
/// This is the entry point for the backtester command-line interface, providing access to
/// subgraph data fetching and backtest runs.
#[derive(Debug, Parser)]
#[clap(version, about, author)]
pub struct LpbtCli {
    #[clap(subcommand)]
    pub command: Commands,
}

/// Available top-level commands.
#[derive(Parser, Debug)]
pub enum Commands {
    Fetch(FetchOpt),
    Run(RunOpt),
}

/// Subgraph connection and pool selection options.
#[derive(Parser, Debug, Clone)]
pub struct SubgraphArgs {
    /// GraphQL endpoint of the Uniswap v3 subgraph.
    #[arg(long, env = "SUBGRAPH_ENDPOINT")]
    pub endpoint: Option<String>,
    /// The pool contract address.
    #[arg(long)]
    pub pool: Option<Address>,
    /// The pool's token0 contract address.
    #[arg(long)]
    pub token0: Option<Address>,
    /// The pool's token1 contract address.
    #[arg(long)]
    pub token1: Option<Address>,
    /// Maximum number of hourly records to fetch.
    #[arg(long, default_value_t = 1000)]
    pub max_records: usize,
}

/// Fetches pool snapshots from a subgraph and writes them as JSON.
#[derive(Parser, Debug, Clone)]
#[command(about = "Fetch pool snapshots from a subgraph", long_about = None)]
pub struct FetchOpt {
    #[clap(flatten)]
    pub subgraph: SubgraphArgs,
    /// Path of the snapshot JSON file to write.
    #[arg(long)]
    pub output: PathBuf,
    /// Path to additionally write the pool's active tick table to.
    #[arg(long)]
    pub ticks_output: Option<PathBuf>,
}

/// Runs a backtest over stored or freshly fetched snapshots.
#[derive(Parser, Debug, Clone)]
#[command(about = "Run a position backtest", long_about = None)]
pub struct RunOpt {
    /// Snapshot JSON file written by `fetch`, instead of querying the subgraph.
    #[arg(long)]
    pub input: Option<PathBuf>,
    #[clap(flatten)]
    pub subgraph: SubgraphArgs,
    /// TOML configuration file; flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Lower tick boundary of the position.
    #[arg(long, allow_negative_numbers = true)]
    pub tick_lower: Option<i32>,
    /// Upper tick boundary of the position.
    #[arg(long, allow_negative_numbers = true)]
    pub tick_upper: Option<i32>,
    /// Position liquidity.
    #[arg(long)]
    pub liquidity: Option<u128>,
    /// Reference basis for PnL and APR: hodl, token0 or token1.
    #[arg(long)]
    pub basis: Option<String>,
    /// Scale fees by the position's share of active liquidity.
    #[arg(long)]
    pub dilute: bool,
    /// How active tick liquidity relates to the position (excludes-position, includes-position).
    #[arg(long)]
    pub convention: Option<ActiveLiquidityConvention>,
    /// Active tick table JSON file used for fee dilution.
    #[arg(long)]
    pub ticks: Option<PathBuf>,
    /// Restrict the run to the trailing number of calendar days.
    #[arg(long)]
    pub days: Option<u32>,
    /// Number of leading and trailing records to print.
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
    /// Path to write all result records to as JSON.
    #[arg(long)]
    pub output: Option<PathBuf>,
}
