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

//! Fee tier lookups.

/// Returns the tick spacing a pool of the given `fee_tier` is created with.
///
/// Fee tiers are expressed in hundredths of a basis point, so `3000` is a 0.3% pool.
#[must_use]
pub const fn tick_spacing_for_fee_tier(fee_tier: u32) -> Option<i32> {
    match fee_tier {
        10_000 => Some(200),
        3_000 => Some(60),
        500 => Some(10),
        100 => Some(1),
        _ => None,
    }
}

/// Floors `tick` to a multiple of `tick_spacing`, rounding toward negative infinity.
///
/// # Panics
///
/// Panics if `tick_spacing` is zero.
#[must_use]
pub const fn floor_tick(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing) * tick_spacing
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
