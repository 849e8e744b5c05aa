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

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::defi::{
    parsing::{deserialize_u128, serialize_u128},
    tick_map::tick_math::{MAX_TICK, MIN_TICK},
};

/// A hypothetical liquidity position held unchanged for the whole backtest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionParams {
    /// The lower tick boundary of the position.
    pub tick_lower: i32,
    /// The upper tick boundary of the position.
    pub tick_upper: i32,
    /// The amount of liquidity in the position.
    #[serde(serialize_with = "serialize_u128", deserialize_with = "deserialize_u128")]
    pub liquidity: u128,
}

impl PositionParams {
    /// Creates a new [`PositionParams`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick range is inverted, empty or outside `[MIN_TICK, MAX_TICK]`.
    pub fn new(tick_lower: i32, tick_upper: i32, liquidity: u128) -> anyhow::Result<Self> {
        let params = Self {
            tick_lower,
            tick_upper,
            liquidity,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks the tick range.
    ///
    /// # Errors
    ///
    /// Returns an error if `tick_lower >= tick_upper` or either bound is out of range.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_lower >= self.tick_upper {
            anyhow::bail!(
                "tick_lower {} must be less than tick_upper {}",
                self.tick_lower,
                self.tick_upper
            );
        }
        if self.tick_lower < MIN_TICK || self.tick_upper > MAX_TICK {
            anyhow::bail!(
                "Tick range [{}, {}] outside of [{MIN_TICK}, {MAX_TICK}]",
                self.tick_lower,
                self.tick_upper
            );
        }
        Ok(())
    }

    /// Returns whether `tick` lies within `[tick_lower, tick_upper]`, bounds included.
    #[must_use]
    pub fn contains_tick(&self, tick: i32) -> bool {
        (self.tick_lower..=self.tick_upper).contains(&tick)
    }
}

impl Display for PositionParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PositionParams(tick_lower={}, tick_upper={}, liquidity={})",
            self.tick_lower, self.tick_upper, self.liquidity
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_new_valid_range() {
        let params = PositionParams::new(-60, 60, 1000).unwrap();
        assert_eq!(params.tick_lower, -60);
        assert_eq!(params.tick_upper, 60);
        assert_eq!(params.liquidity, 1000);
    }

    #[rstest]
    #[case(60, -60)]
    #[case(60, 60)]
    #[case(MIN_TICK - 1, 0)]
    #[case(0, MAX_TICK + 1)]
    fn test_new_invalid_range(#[case] tick_lower: i32, #[case] tick_upper: i32) {
        assert!(PositionParams::new(tick_lower, tick_upper, 1).is_err());
    }

    #[rstest]
    #[case(-60, true)]
    #[case(0, true)]
    #[case(60, true)]
    #[case(-61, false)]
    #[case(61, false)]
    fn test_contains_tick_is_inclusive(#[case] tick: i32, #[case] expected: bool) {
        let params = PositionParams::new(-60, 60, 1).unwrap();
        assert_eq!(params.contains_tick(tick), expected);
    }

    #[rstest]
    fn test_display() {
        let params = PositionParams::new(-10, 10, 5).unwrap();
        assert_eq!(
            params.to_string(),
            "PositionParams(tick_lower=-10, tick_upper=10, liquidity=5)"
        );
    }
}
