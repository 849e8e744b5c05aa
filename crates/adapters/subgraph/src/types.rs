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

//! Response models for the Uniswap v3 subgraph GraphQL schema.
//!
//! `BigInt` and `BigDecimal` fields arrive as JSON strings and are kept as such here;
//! conversion to domain types happens in [`crate::parse`].

use serde::Deserialize;

/// The envelope of every GraphQL response.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

/// A single error entry of a GraphQL response.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// A token as embedded in pool entities.
#[derive(Debug, Clone, Deserialize)]
pub struct SubgraphToken {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub decimals: String,
}

/// The pool fields embedded in each hourly record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphPool {
    pub id: String,
    pub fee_tier: String,
    pub token0: SubgraphToken,
    pub token1: SubgraphToken,
}

/// One `poolHourData` entity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolHourData {
    pub period_start_unix: i64,
    pub pool: SubgraphPool,
    pub liquidity: String,
    pub sqrt_price: String,
    /// Units of token0 per one token1.
    pub token0_price: String,
    /// Units of token1 per one token0.
    pub token1_price: String,
    pub tick: Option<String>,
    #[serde(rename = "tvlUSD")]
    pub tvl_usd: String,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    #[serde(rename = "feeGrowthGlobal0X128")]
    pub fee_growth_global_0_x128: String,
    #[serde(rename = "feeGrowthGlobal1X128")]
    pub fee_growth_global_1_x128: String,
}

/// One `tokenHourData` entity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHourData {
    pub period_start_unix: i64,
    #[serde(rename = "priceUSD")]
    pub price_usd: String,
}

/// One initialized `tick` entity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphTick {
    pub tick_idx: String,
    pub liquidity_net: String,
}

/// The fee tier of a pool entity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphPoolFeeTier {
    pub fee_tier: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolHourDatasData {
    pub pool_hour_datas: Vec<PoolHourData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHourDatasData {
    pub token_hour_datas: Vec<TokenHourData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicksData {
    pub ticks: Vec<SubgraphTick>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolData {
    pub pool: Option<SubgraphPoolFeeTier>,
}
