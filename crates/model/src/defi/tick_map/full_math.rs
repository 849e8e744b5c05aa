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

use alloy_primitives::{U160, U256, U512};

/// 2^96 as a [`U256`], the Q64.96 fixed-point scale used by sqrt prices.
pub const Q96: U256 = U256::from_limbs([0, 1 << 32, 0, 0]);

/// 2^96 as a [`U160`].
pub const Q96_U160: U160 = U160::from_limbs([0, 1 << 32, 0]);

/// 2^128 as a [`U256`], the Q128.128 fixed-point scale used by fee growth accumulators.
pub const Q128: U256 = U256::from_limbs([0, 0, 1, 0]);

/// Multiplication and division with a full 512-bit intermediate product.
///
/// Mirrors the semantics of the Solidity `FullMath` library: `a * b / denominator` never
/// loses precision to an overflowing intermediate, and only fails when the final quotient
/// does not fit into 256 bits.
#[derive(Debug)]
pub struct FullMath;

impl FullMath {
    /// Calculates `floor(a * b / denominator)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `denominator` is zero or the result overflows 256 bits.
    pub fn mul_div(a: U256, b: U256, denominator: U256) -> anyhow::Result<U256> {
        let (quotient, _) = Self::mul_div_rem(a, b, denominator)?;
        Self::narrow(quotient)
    }

    /// Calculates `ceil(a * b / denominator)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `denominator` is zero or the result overflows 256 bits.
    pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> anyhow::Result<U256> {
        let (quotient, remainder) = Self::mul_div_rem(a, b, denominator)?;
        let quotient = Self::narrow(quotient)?;
        if remainder.is_zero() {
            return Ok(quotient);
        }
        quotient
            .checked_add(U256::from(1))
            .ok_or_else(|| anyhow::anyhow!("mul_div_rounding_up overflow"))
    }

    /// Calculates `ceil(a / b)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `b` is zero.
    pub fn div_rounding_up(a: U256, b: U256) -> anyhow::Result<U256> {
        if b.is_zero() {
            anyhow::bail!("Division by zero in div_rounding_up");
        }
        let quotient = a / b;
        if (a % b).is_zero() {
            Ok(quotient)
        } else {
            Ok(quotient + U256::from(1))
        }
    }

    fn mul_div_rem(a: U256, b: U256, denominator: U256) -> anyhow::Result<(U512, U512)> {
        if denominator.is_zero() {
            anyhow::bail!("Division by zero in mul_div");
        }
        let product: U512 = a.widening_mul(b);
        let denominator = U512::from(denominator);
        Ok((product / denominator, product % denominator))
    }

    fn narrow(value: U512) -> anyhow::Result<U256> {
        if value > U512::from(U256::MAX) {
            anyhow::bail!("mul_div overflow: result {value} exceeds 256 bits");
        }
        Ok(U256::from(value))
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
    fn test_constants() {
        assert_eq!(Q96, U256::from(1u128 << 96));
        assert_eq!(Q96_U160, U160::from(1u128 << 96));
        assert_eq!(Q128, U256::from(1u8) << 128usize);
    }

    #[rstest]
    fn test_mul_div_exact() {
        let result = FullMath::mul_div(U256::from(500), U256::from(6), U256::from(3)).unwrap();
        assert_eq!(result, U256::from(1000));
    }

    #[rstest]
    fn test_mul_div_with_overflowing_intermediate() {
        // Q128 * Q128 overflows 256 bits but the quotient fits
        let result = FullMath::mul_div(Q128, Q128, Q128).unwrap();
        assert_eq!(result, Q128);
    }

    #[rstest]
    fn test_mul_div_rounds_down() {
        let result = FullMath::mul_div(U256::from(7), U256::from(1), U256::from(2)).unwrap();
        assert_eq!(result, U256::from(3));
    }

    #[rstest]
    fn test_mul_div_rounding_up() {
        let result =
            FullMath::mul_div_rounding_up(U256::from(7), U256::from(1), U256::from(2)).unwrap();
        assert_eq!(result, U256::from(4));

        let exact =
            FullMath::mul_div_rounding_up(U256::from(8), U256::from(1), U256::from(2)).unwrap();
        assert_eq!(exact, U256::from(4));
    }

    #[rstest]
    fn test_mul_div_zero_denominator() {
        assert!(FullMath::mul_div(U256::from(1), U256::from(1), U256::ZERO).is_err());
    }

    #[rstest]
    fn test_mul_div_result_overflow() {
        assert!(FullMath::mul_div(U256::MAX, U256::MAX, U256::from(1)).is_err());
    }

    #[rstest]
    #[case(U256::from(10), U256::from(5), U256::from(2))]
    #[case(U256::from(11), U256::from(5), U256::from(3))]
    #[case(U256::ZERO, U256::from(5), U256::ZERO)]
    fn test_div_rounding_up(#[case] a: U256, #[case] b: U256, #[case] expected: U256) {
        assert_eq!(FullMath::div_rounding_up(a, b).unwrap(), expected);
    }
}
