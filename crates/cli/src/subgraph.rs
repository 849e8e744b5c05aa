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

use alloy_primitives::Address;
use lpbt_model::defi::{ActiveTickTable, PoolSnapshot};
use lpbt_subgraph::client::SubgraphClient;

use crate::{
    files::write_json,
    opt::{FetchOpt, SubgraphArgs},
};

/// Subgraph arguments with every required value present.
#[derive(Debug)]
pub struct PoolQuery {
    pub client: SubgraphClient,
    pub pool: Address,
    pub token0: Address,
    pub token1: Address,
    pub max_records: usize,
}

impl TryFrom<&SubgraphArgs> for PoolQuery {
    type Error = anyhow::Error;

    fn try_from(args: &SubgraphArgs) -> anyhow::Result<Self> {
        let endpoint = args.endpoint.clone().ok_or_else(|| {
            anyhow::anyhow!("No endpoint provided via --endpoint or SUBGRAPH_ENDPOINT")
        })?;
        let (Some(pool), Some(token0), Some(token1)) = (args.pool, args.token0, args.token1)
        else {
            anyhow::bail!("--pool, --token0 and --token1 are required to query the subgraph");
        };

        tracing::info!("Using subgraph endpoint: '{endpoint}'");
        Ok(Self {
            client: SubgraphClient::new(endpoint)?,
            pool,
            token0,
            token1,
            max_records: args.max_records,
        })
    }
}

impl PoolQuery {
    pub async fn fetch_snapshots(&self) -> anyhow::Result<Vec<PoolSnapshot>> {
        self.client
            .fetch_historic_states(&self.pool, &self.token0, &self.token1, self.max_records)
            .await
    }

    pub async fn fetch_active_ticks(&self) -> anyhow::Result<ActiveTickTable> {
        self.client.fetch_active_ticks(&self.pool).await
    }
}

/// Fetches snapshots, and optionally the active tick table, and writes them to disk.
pub async fn run_fetch(opt: FetchOpt) -> anyhow::Result<()> {
    let query = PoolQuery::try_from(&opt.subgraph)?;

    let snapshots = query.fetch_snapshots().await?;
    if let (Some(first), Some(last)) = (snapshots.first(), snapshots.last()) {
        tracing::info!(
            "Fetched {} snapshots from {} to {}",
            snapshots.len(),
            first.timestamp,
            last.timestamp
        );
    } else {
        tracing::warn!("No usable snapshots for pool {}", query.pool);
    }
    write_json(&opt.output, &snapshots)?;

    if let Some(path) = &opt.ticks_output {
        let table = query.fetch_active_ticks().await?;
        write_json(path, &table)?;
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rstest::rstest;

    use super::*;
    use crate::opt::{Commands, LpbtCli};

    fn subgraph_args(args: &[&str]) -> SubgraphArgs {
        let mut argv = vec!["lpbt", "fetch", "--output", "out.json"];
        argv.extend_from_slice(args);
        match LpbtCli::try_parse_from(argv).unwrap().command {
            Commands::Fetch(opt) => opt.subgraph,
            Commands::Run(_) => unreachable!(),
        }
    }

    #[rstest]
    fn test_pool_query_requires_addresses() {
        let args = subgraph_args(&["--endpoint", "http://localhost:8000"]);
        let error = PoolQuery::try_from(&args).unwrap_err();
        assert!(error.to_string().contains("--pool"));
    }

    #[rstest]
    fn test_pool_query_from_args() {
        let args = subgraph_args(&[
            "--endpoint",
            "http://localhost:8000",
            "--pool",
            "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640",
            "--token0",
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            "--token1",
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "--max-records",
            "2500",
        ]);
        let query = PoolQuery::try_from(&args).unwrap();
        assert_eq!(query.client.endpoint(), "http://localhost:8000");
        assert_eq!(query.max_records, 2500);
        assert_eq!(
            query.pool.to_string().to_lowercase(),
            "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640"
        );
    }
}
