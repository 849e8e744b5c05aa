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

//! Serde helpers for large integers carried as decimal strings.
//!
//! Indexers and hand-written configuration files spell fixed-point values as base-10
//! strings since they overflow JSON numbers. These helpers accept either a string or a
//! plain number and always serialize back to a decimal string.

use alloy_primitives::{U160, U256};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

/// Parses a decimal or `0x`-prefixed hex string into a [`U256`].
///
/// # Errors
///
/// Returns an error if the string is not a valid unsigned integer.
pub fn parse_u256(value: &str) -> anyhow::Result<U256> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(value, 10),
    };
    parsed.map_err(|e| anyhow::anyhow!("Invalid unsigned integer '{value}': {e}"))
}

/// Parses a decimal or `0x`-prefixed hex string into a [`U160`].
///
/// # Errors
///
/// Returns an error if the string is not a valid unsigned integer of at most 160 bits.
pub fn parse_u160(value: &str) -> anyhow::Result<U160> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => U160::from_str_radix(hex, 16),
        None => U160::from_str_radix(value, 10),
    };
    parsed.map_err(|e| anyhow::anyhow!("Invalid 160-bit unsigned integer '{value}': {e}"))
}

/// Parses a decimal string into a `u128`.
///
/// # Errors
///
/// Returns an error if the string is not a valid `u128`.
pub fn parse_u128(value: &str) -> anyhow::Result<u128> {
    value
        .trim()
        .parse::<u128>()
        .map_err(|e| anyhow::anyhow!("Invalid u128 '{value}': {e}"))
}

/// Custom deserializer for a `u128` given as a decimal string or a number.
pub fn deserialize_u128<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => parse_u128(&s).map_err(serde::de::Error::custom),
        StringOrNumber::Number(n) => Ok(u128::from(n)),
    }
}

/// Custom serializer writing a `u128` as a decimal string.
pub fn serialize_u128<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

/// Custom deserializer for a [`U256`] given as a decimal/hex string or a number.
pub fn deserialize_u256<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => parse_u256(&s).map_err(serde::de::Error::custom),
        StringOrNumber::Number(n) => Ok(U256::from(n)),
    }
}

/// Custom serializer writing a [`U256`] as a decimal string.
pub fn serialize_u256<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

/// Custom deserializer for a [`U160`] given as a decimal/hex string or a number.
pub fn deserialize_u160<'de, D>(deserializer: D) -> Result<U160, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => parse_u160(&s).map_err(serde::de::Error::custom),
        StringOrNumber::Number(n) => Ok(U160::from(n)),
    }
}

/// Custom serializer writing a [`U160`] as a decimal string.
pub fn serialize_u160<S>(value: &U160, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
