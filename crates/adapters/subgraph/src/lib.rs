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

//! Uniswap v3 subgraph adapter for the concentrated-liquidity backtester.
//!
//! The `lpbt-subgraph` crate queries a Uniswap v3 subgraph over GraphQL and converts the
//! hourly pool and token data into the [`PoolSnapshot`](lpbt_model::defi::PoolSnapshot)
//! sequences and [`ActiveTickTable`](lpbt_model::defi::ActiveTickTable)s consumed by the
//! backtest engine.
//!
//! Network access lives in [`client`]. The conversions in [`parse`] are pure and operate
//! on the deserialized response models in [`types`].

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod client;
pub mod error;
pub mod parse;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
