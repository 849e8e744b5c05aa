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

//! Command-line interface for the concentrated-liquidity backtester.
//!
//! Provides the `lpbt` binary's `fetch` and `run` commands.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]

mod backtest;
mod files;
pub mod opt;
mod subgraph;

use crate::{
    backtest::run_backtest,
    opt::{Commands, LpbtCli},
    subgraph::run_fetch,
};

/// Executes the parsed command.
///
/// # Errors
///
/// Returns an error if the command fails.
pub async fn run(opt: LpbtCli) -> anyhow::Result<()> {
    match opt.command {
        Commands::Fetch(fetch_opt) => run_fetch(fetch_opt).await?,
        Commands::Run(run_opt) => run_backtest(run_opt).await?,
    }
    Ok(())
}
