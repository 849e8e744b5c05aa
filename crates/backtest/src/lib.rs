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

//! Backtest engine for concentrated-liquidity positions.
//!
//! The `lpbt-backtest` crate replays a hypothetical fixed-range liquidity position over a
//! time-ordered sequence of pool snapshots and derives a result record per period:
//!
//! - Position amounts from exact tick and sqrt-price math.
//! - Period fees from fee growth deltas, optionally diluted by the active liquidity at the
//!   pool tick and weighted by the period's price range overlap.
//! - PnL, impermanent loss and APR against a baseline frozen at the first period, in a
//!   `hodl`, `token0` or `token1` reference basis.
//!
//! Runs are pure functions of the snapshots and the configuration. No I/O is performed.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod accumulator;
pub mod config;
pub mod engine;
pub mod error;
pub mod fees;
pub mod position;
pub mod reporting;
pub mod valuation;
pub mod window;
