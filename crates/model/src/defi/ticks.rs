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

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::defi::parsing::{deserialize_u128, serialize_u128};

/// Active liquidity registered at one tick bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTick {
    /// The first tick of the bucket.
    pub tick_index: i32,
    /// Liquidity active across the bucket.
    #[serde(serialize_with = "serialize_u128", deserialize_with = "deserialize_u128")]
    pub active_liquidity: u128,
}

/// An initialized tick as reported by an indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InitializedTick {
    /// The tick index.
    pub tick_idx: i32,
    /// Net liquidity change when crossing this tick left to right.
    pub liquidity_net: i128,
}

/// Mapping from tick-bucket index to the liquidity active on that bucket.
///
/// Serializes as a list of [`ActiveTick`] entries in ascending tick order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ActiveTick>", into = "Vec<ActiveTick>")]
pub struct ActiveTickTable {
    buckets: BTreeMap<i32, u128>,
}

impl ActiveTickTable {
    /// Creates a new empty [`ActiveTickTable`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the table from a pool's initialized ticks.
    ///
    /// Each initialized tick starts a bucket whose active liquidity is the running sum of
    /// `liquidity_net` over all initialized ticks at or below it.
    ///
    /// # Errors
    ///
    /// Returns an error if the running sum goes negative or overflows, which means the
    /// tick list is incomplete or corrupt.
    pub fn from_initialized_ticks(ticks: &[InitializedTick]) -> anyhow::Result<Self> {
        let mut sorted = ticks.to_vec();
        sorted.sort_by_key(|tick| tick.tick_idx);

        let mut running: i128 = 0;
        let mut buckets = BTreeMap::new();
        for tick in sorted {
            running = running.checked_add(tick.liquidity_net).ok_or_else(|| {
                anyhow::anyhow!("Liquidity overflow at tick {}", tick.tick_idx)
            })?;
            let active = u128::try_from(running).map_err(|_| {
                anyhow::anyhow!(
                    "Negative active liquidity {running} at tick {}",
                    tick.tick_idx
                )
            })?;
            buckets.insert(tick.tick_idx, active);
        }

        Ok(Self { buckets })
    }

    /// Registers `active_liquidity` at `tick_index`, replacing any previous value.
    pub fn insert(&mut self, tick_index: i32, active_liquidity: u128) {
        self.buckets.insert(tick_index, active_liquidity);
    }

    /// Returns the active liquidity registered at exactly `tick_index`.
    #[must_use]
    pub fn get(&self, tick_index: i32) -> Option<u128> {
        self.buckets.get(&tick_index).copied()
    }

    /// Returns the number of registered buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns whether no buckets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns an iterator over the entries in ascending tick order.
    pub fn iter(&self) -> impl Iterator<Item = ActiveTick> + '_ {
        self.buckets
            .iter()
            .map(|(&tick_index, &active_liquidity)| ActiveTick {
                tick_index,
                active_liquidity,
            })
    }
}

impl From<Vec<ActiveTick>> for ActiveTickTable {
    fn from(entries: Vec<ActiveTick>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<ActiveTickTable> for Vec<ActiveTick> {
    fn from(table: ActiveTickTable) -> Self {
        table.iter().collect()
    }
}

impl FromIterator<ActiveTick> for ActiveTickTable {
    fn from_iter<T: IntoIterator<Item = ActiveTick>>(iter: T) -> Self {
        Self {
            buckets: iter
                .into_iter()
                .map(|entry| (entry.tick_index, entry.active_liquidity))
                .collect(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
