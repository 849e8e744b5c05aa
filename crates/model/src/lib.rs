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

//! Domain model for the concentrated-liquidity position backtester.
//!
//! The `lpbt-model` crate provides the types exchanged between the data adapters and the
//! backtest engine, together with the exact fixed-point math used by Uniswap V3-style pools:
//!
//! - Pool snapshots with validation at ingestion.
//! - Position parameters and active-liquidity tick tables.
//! - Tick to sqrt-price conversion, 512-bit `mul_div` and liquidity to amount conversion.
//! - Result records produced by a backtest run.
//!
//! # Feature flags
//!
//! - `stubs`: Enables type stubs for use in testing scenarios.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod defi;
pub mod enums;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;
