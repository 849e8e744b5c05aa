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

//! HTTP client for querying a Uniswap v3 subgraph over GraphQL.

use std::time::Duration;

use alloy_primitives::Address;
use anyhow::Context;
use lpbt_model::defi::{ActiveTickTable, PoolSnapshot, fee::tick_spacing_for_fee_tier};
use serde::de::DeserializeOwned;

use crate::{
    error::SubgraphError,
    parse::{
        TokenPrices, build_active_tick_table, build_snapshots, parse_address, parse_ticks,
        parse_token_hour_prices,
    },
    types::{
        GraphQlResponse, PoolData, PoolHourData, PoolHourDatasData, SubgraphTick, TicksData,
        TokenHourData, TokenHourDatasData,
    },
};

/// The maximum number of entities the subgraph returns per query.
pub const PAGE_SIZE: usize = 1000;

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for fetching pool history from a Uniswap v3 subgraph endpoint.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    /// The GraphQL endpoint URL.
    endpoint: String,
    http: reqwest::Client,
}

impl SubgraphClient {
    /// Creates a new [`SubgraphClient`] for the given GraphQL `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SubgraphError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(SubgraphError::from_reqwest)?;

        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    /// Returns the GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `query` and decodes the `data` member of the response into `T`.
    async fn query<T: DeserializeOwned>(&self, query: &str) -> Result<T, SubgraphError> {
        let body = serde_json::json!({ "query": query });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(SubgraphError::from_reqwest)?;
        let bytes = response.bytes().await.map_err(SubgraphError::from_reqwest)?;

        let parsed: GraphQlResponse<T> = serde_json::from_slice(&bytes)?;
        decode_response(parsed)
    }

    /// Fetches up to `max_records` of the most recent hourly records for `pool`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn fetch_pool_hour_datas(
        &self,
        pool: &Address,
        max_records: usize,
    ) -> Result<Vec<PoolHourData>, SubgraphError> {
        let pool_id = entity_id(pool);
        let mut records = Vec::new();
        let mut cursor = None;

        while records.len() < max_records {
            let first = (max_records - records.len()).min(PAGE_SIZE);
            let page: PoolHourDatasData = self
                .query(&pool_hour_datas_query(&pool_id, first, cursor))
                .await?;

            let count = page.pool_hour_datas.len();
            tracing::debug!("Fetched {count} pool hour records for {pool_id} (cursor={cursor:?})");
            cursor = page.pool_hour_datas.last().map(|hour| hour.period_start_unix);
            records.extend(page.pool_hour_datas);

            if count < first {
                break;
            }
        }

        tracing::info!("Fetched {} pool hour records for {pool_id}", records.len());
        Ok(records)
    }

    /// Fetches up to `max_records` of the most recent hourly USD prices for `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails or a price cannot be parsed.
    pub async fn fetch_token_hour_prices(
        &self,
        token: &Address,
        max_records: usize,
    ) -> Result<TokenPrices, SubgraphError> {
        let token_id = entity_id(token);
        let mut records: Vec<TokenHourData> = Vec::new();
        let mut cursor = None;

        while records.len() < max_records {
            let first = (max_records - records.len()).min(PAGE_SIZE);
            let page: TokenHourDatasData = self
                .query(&token_hour_datas_query(&token_id, first, cursor))
                .await?;

            let count = page.token_hour_datas.len();
            tracing::debug!("Fetched {count} token hour records for {token_id} (cursor={cursor:?})");
            cursor = page.token_hour_datas.last().map(|hour| hour.period_start_unix);
            records.extend(page.token_hour_datas);

            if count < first {
                break;
            }
        }

        tracing::info!("Fetched {} token hour prices for {token_id}", records.len());
        parse_token_hour_prices(&records).map_err(|e| SubgraphError::Parse(e.to_string()))
    }

    /// Fetches the hourly history of `pool` as an ascending, validated snapshot sequence.
    ///
    /// Records without a tick, with a zero OHLC price, or without USD prices for both
    /// tokens are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails or the records cannot be converted.
    pub async fn fetch_historic_states(
        &self,
        pool: &Address,
        token0: &Address,
        token1: &Address,
        max_records: usize,
    ) -> anyhow::Result<Vec<PoolSnapshot>> {
        let hours = self
            .fetch_pool_hour_datas(pool, max_records)
            .await
            .context("Failed to fetch pool hour data")?;

        if let Some(hour) = hours.first() {
            let pool_token0 = parse_address(&hour.pool.token0.id)?;
            let pool_token1 = parse_address(&hour.pool.token1.id)?;
            if (pool_token0, pool_token1) != (*token0, *token1) {
                tracing::warn!(
                    "Pool tokens ({pool_token0}, {pool_token1}) differ from requested ({token0}, {token1})"
                );
            }
        }

        let token0_prices = self
            .fetch_token_hour_prices(token0, max_records)
            .await
            .context("Failed to fetch token0 prices")?;
        let token1_prices = self
            .fetch_token_hour_prices(token1, max_records)
            .await
            .context("Failed to fetch token1 prices")?;

        build_snapshots(&hours, &token0_prices, &token1_prices)
    }

    /// Fetches all initialized ticks of `pool` and derives its [`ActiveTickTable`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A request fails.
    /// - The pool is unknown or has an unsupported fee tier.
    /// - The tick data is malformed or inconsistent.
    pub async fn fetch_active_ticks(&self, pool: &Address) -> anyhow::Result<ActiveTickTable> {
        let pool_id = entity_id(pool);

        let data: PoolData = self
            .query(&pool_fee_tier_query(&pool_id))
            .await
            .context("Failed to fetch pool fee tier")?;
        let fee_tier: u32 = data
            .pool
            .ok_or_else(|| anyhow::anyhow!("Pool {pool_id} not found"))?
            .fee_tier
            .parse()
            .context("Invalid pool fee tier")?;
        let tick_spacing = tick_spacing_for_fee_tier(fee_tier)
            .ok_or_else(|| anyhow::anyhow!("Unsupported fee tier {fee_tier}"))?;

        let mut ticks: Vec<SubgraphTick> = Vec::new();
        let mut cursor: Option<i32> = None;
        loop {
            let page: TicksData = self
                .query(&ticks_query(&pool_id, PAGE_SIZE, cursor))
                .await
                .context("Failed to fetch ticks")?;

            let count = page.ticks.len();
            tracing::debug!("Fetched {count} ticks for {pool_id} (cursor={cursor:?})");
            if let Some(last) = page.ticks.last() {
                cursor = Some(
                    last.tick_idx
                        .parse()
                        .with_context(|| format!("Invalid tickIdx '{}'", last.tick_idx))?,
                );
            }
            ticks.extend(page.ticks);

            if count < PAGE_SIZE {
                break;
            }
        }

        let table = build_active_tick_table(&parse_ticks(&ticks)?, tick_spacing)?;
        tracing::info!(
            "Derived {} active tick buckets from {} initialized ticks for {pool_id}",
            table.len(),
            ticks.len()
        );
        Ok(table)
    }
}

/// Extracts `data` from a GraphQL response, surfacing any reported errors.
///
/// # Errors
///
/// Returns an error if the response carries GraphQL errors or no data.
pub fn decode_response<T>(response: GraphQlResponse<T>) -> Result<T, SubgraphError> {
    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
        return Err(SubgraphError::GraphQl(messages.join("; ")));
    }
    response
        .data
        .ok_or_else(|| SubgraphError::Parse("Response missing both data and errors".to_string()))
}

/// Subgraph entity ids are lowercase hex addresses.
fn entity_id(address: &Address) -> String {
    address.to_string().to_lowercase()
}

fn pool_hour_datas_query(pool_id: &str, first: usize, before: Option<i64>) -> String {
    let cursor = before.map_or_else(String::new, |ts| format!(", periodStartUnix_lt: {ts}"));
    format!(
        r#"{{
  poolHourDatas(
    first: {first},
    orderBy: periodStartUnix,
    orderDirection: desc,
    where: {{pool: "{pool_id}"{cursor}}},
    subgraphError: allow
  ) {{
    periodStartUnix
    pool {{
      id
      feeTier
      token0 {{ id symbol name decimals }}
      token1 {{ id symbol name decimals }}
    }}
    liquidity
    sqrtPrice
    token0Price
    token1Price
    tick
    tvlUSD
    volumeUSD
    open
    high
    low
    close
    feeGrowthGlobal0X128
    feeGrowthGlobal1X128
  }}
}}"#
    )
}

fn token_hour_datas_query(token_id: &str, first: usize, before: Option<i64>) -> String {
    let cursor = before.map_or_else(String::new, |ts| format!(", periodStartUnix_lt: {ts}"));
    format!(
        r#"{{
  tokenHourDatas(
    first: {first},
    orderBy: periodStartUnix,
    orderDirection: desc,
    where: {{token: "{token_id}"{cursor}}},
    subgraphError: allow
  ) {{
    periodStartUnix
    priceUSD
  }}
}}"#
    )
}

fn ticks_query(pool_id: &str, first: usize, after: Option<i32>) -> String {
    let cursor = after.map_or_else(String::new, |tick| format!(", tickIdx_gt: {tick}"));
    format!(
        r#"{{
  ticks(
    first: {first},
    orderBy: tickIdx,
    orderDirection: asc,
    where: {{pool: "{pool_id}"{cursor}}},
    subgraphError: allow
  ) {{
    tickIdx
    liquidityNet
  }}
}}"#
    )
}

fn pool_fee_tier_query(pool_id: &str) -> String {
    format!(r#"{{ pool(id: "{pool_id}") {{ feeTier }} }}"#)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
