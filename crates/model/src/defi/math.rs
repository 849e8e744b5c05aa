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

//! Conversions from fixed-point integers to decimal-scaled floats.
//!
//! Token amounts stay in integer base units for as long as possible and are only turned
//! into `f64` at the valuation boundary. The scaled conversion splits the value into its
//! integer and fractional parts before touching floating point, so the fraction keeps its
//! precision even when the integer part is too large to be exact.

use alloy_primitives::U256;
use anyhow::bail;

/// Maximum decimals such that 10^decimals fits in 256 bits.
const MAX_DECIMALS_FIT: u32 = 77;

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Computes 10^decimals as a [`U256`].
///
/// # Errors
///
/// Returns an error if `decimals` exceeds 77.
pub fn pow10_u256(decimals: u32) -> anyhow::Result<U256> {
    if decimals > MAX_DECIMALS_FIT {
        bail!("decimals={decimals} exceeds 10^d capacity for U256");
    }
    Ok(U256::from(10u8).pow(U256::from(decimals)))
}

/// Converts a [`U256`] into the nearest `f64`, folding over its limbs.
///
/// Values above 2^53 lose precision, values near `U256::MAX` still produce a finite float.
#[must_use]
pub fn u256_to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * TWO_POW_64 + *limb as f64)
}

/// Converts an integer amount of base units into a decimal-scaled `f64`.
///
/// For example an amount of `1_500_000` with 6 decimals yields `1.5`. Integer parts above
/// 2^53 are rounded to the nearest `f64`, the result is always finite.
///
/// # Errors
///
/// Returns an error if `decimals` exceeds the supported range.
pub fn scaled_u256_to_f64(amount: U256, decimals: u8) -> anyhow::Result<f64> {
    let decimals = u32::from(decimals);
    let denominator = pow10_u256(decimals)?;
    let int_part = amount / denominator;
    let frac_part = amount % denominator;

    let int_value = u256_to_f64(int_part);
    if frac_part.is_zero() {
        return Ok(int_value);
    }

    Ok(int_value + u256_to_f64(frac_part) / u256_to_f64(denominator))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
