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

//! Selection of a trailing calendar window of snapshots.

use chrono::{Days, NaiveTime};
use lpbt_model::defi::PoolSnapshot;

/// Returns the trailing `days` calendar days of `snapshots`.
///
/// The window starts at midnight UTC of the date `days` days before the last snapshot's
/// date, so a 30-day window over hourly data ending mid-day keeps up to 30 full days plus
/// the partial last day. `snapshots` must be sorted ascending.
#[must_use]
pub fn select_trailing_window(snapshots: &[PoolSnapshot], days: u32) -> &[PoolSnapshot] {
    let Some(last) = snapshots.last() else {
        return snapshots;
    };

    let last_date = last.timestamp.date_naive();
    let Some(start_date) = last_date.checked_sub_days(Days::new(u64::from(days))) else {
        return snapshots;
    };
    let start = start_date.and_time(NaiveTime::MIN).and_utc();

    let first_index = snapshots.partition_point(|snapshot| snapshot.timestamp < start);
    tracing::debug!(
        "Selected trailing {days}-day window from {start}: {} of {} snapshots",
        snapshots.len() - first_index,
        snapshots.len()
    );
    &snapshots[first_index..]
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use lpbt_model::stubs::snapshot_at_hour;
    use rstest::rstest;

    use super::*;

    fn hourly(hours: i64) -> Vec<PoolSnapshot> {
        (0..hours).map(|hour| snapshot_at_hour(hour, 0)).collect()
    }

    #[rstest]
    fn test_empty_input() {
        assert!(select_trailing_window(&[], 30).is_empty());
    }

    #[rstest]
    fn test_window_starts_at_midnight() {
        // 2024-01-01T00:00 through 2024-01-05T11:00
        let snapshots = hourly(4 * 24 + 12);
        let window = select_trailing_window(&snapshots, 2);

        let expected_start = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        assert_eq!(window[0].timestamp, expected_start);
        assert_eq!(window.last().unwrap().timestamp, snapshots.last().unwrap().timestamp);
        assert_eq!(window.len(), 2 * 24 + 12);
    }

    #[rstest]
    fn test_zero_days_keeps_last_date() {
        let snapshots = hourly(30);
        let window = select_trailing_window(&snapshots, 0);
        // Hours 24..30 fall on 2024-01-02
        assert_eq!(window.len(), 6);
    }

    #[rstest]
    fn test_window_longer_than_history_keeps_everything() {
        let snapshots = hourly(48);
        assert_eq!(select_trailing_window(&snapshots, 365).len(), 48);
    }

    #[rstest]
    fn test_gap_before_window_start() {
        let mut snapshots = hourly(2);
        let mut late = snapshot_at_hour(0, 0);
        late.timestamp = snapshots[1].timestamp + Duration::days(10);
        snapshots.push(late);

        let window = select_trailing_window(&snapshots, 5);
        assert_eq!(window.len(), 1);
    }
}
