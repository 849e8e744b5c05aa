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

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Reads a JSON document from `path`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Writes `value` to `path` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use lpbt_model::{
        defi::{ActiveTickTable, PoolSnapshot},
        stubs::{stub_active_tick_table, stub_snapshots},
    };
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_snapshots_survive_file_round_trip(stub_snapshots: Vec<PoolSnapshot>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.json");

        write_json(&path, &stub_snapshots).unwrap();
        let loaded: Vec<PoolSnapshot> = read_json(&path).unwrap();

        assert_eq!(loaded.len(), stub_snapshots.len());
        for (loaded, original) in loaded.iter().zip(&stub_snapshots) {
            assert_eq!(loaded.timestamp, original.timestamp);
            assert_eq!(loaded.tick, original.tick);
            assert_eq!(loaded.sqrt_price_x96, original.sqrt_price_x96);
            assert_eq!(loaded.fee_growth_global_0, original.fee_growth_global_0);
        }
    }

    #[rstest]
    fn test_tick_table_file_round_trip(stub_active_tick_table: ActiveTickTable) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticks.json");

        write_json(&path, &stub_active_tick_table).unwrap();
        let loaded: ActiveTickTable = read_json(&path).unwrap();
        assert_eq!(loaded, stub_active_tick_table);
    }

    #[rstest]
    fn test_read_missing_file_names_path() {
        let error = read_json::<Vec<PoolSnapshot>>(Path::new("/nonexistent/snapshots.json"))
            .unwrap_err();
        assert!(error.to_string().contains("/nonexistent/snapshots.json"));
    }
}
