// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turns raw provider records into normalized daily-usage pairs.

use chrono::NaiveDate;

use crate::provider::ConsumptionRecord;

/// A normalized daily reading: one gas day, one usage value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyUsage {
    /// The gas day the usage covers.
    pub date: NaiveDate,
    /// Usage for that day, already scaled by the configured multiplier.
    pub usage: f64,
}

/// Normalizes raw records into `(date, usage)` pairs.
///
/// Records missing a date or a numeric usage are skipped with a log entry;
/// a partial payload still yields every well-formed reading. Provider
/// order is preserved.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gazpar_link::normalize::normalize;
/// use gazpar_link::provider::ConsumptionRecord;
///
/// let records = vec![ConsumptionRecord {
///     date: NaiveDate::from_ymd_opt(2023, 1, 2),
///     usage: Some(3.5),
///     ..ConsumptionRecord::default()
/// }];
///
/// let usages = normalize(&records, 1.0);
/// assert_eq!(usages.len(), 1);
/// assert!((usages[0].usage - 3.5).abs() < f64::EPSILON);
/// ```
#[must_use]
pub fn normalize(records: &[ConsumptionRecord], multiplier: f64) -> Vec<DailyUsage> {
    records
        .iter()
        .filter_map(|record| match (record.date, record.usage) {
            (Some(date), Some(usage)) => Some(DailyUsage {
                date,
                usage: usage * multiplier,
            }),
            _ => {
                tracing::debug!(?record, "Skipping malformed daily reading");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: Option<(i32, u32, u32)>, usage: Option<f64>) -> ConsumptionRecord {
        ConsumptionRecord {
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            usage,
            ..ConsumptionRecord::default()
        }
    }

    #[test]
    fn null_usage_produces_no_pair() {
        let usages = normalize(&[record(Some((2023, 1, 1)), None)], 1.0);
        assert!(usages.is_empty());
    }

    #[test]
    fn numeric_usage_produces_pair() {
        let usages = normalize(&[record(Some((2023, 1, 2)), Some(3.5))], 1.0);
        assert_eq!(
            usages,
            vec![DailyUsage {
                date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
                usage: 3.5,
            }]
        );
    }

    #[test]
    fn missing_date_skipped() {
        let usages = normalize(&[record(None, Some(3.5))], 1.0);
        assert!(usages.is_empty());
    }

    #[test]
    fn multiplier_applied() {
        let usages = normalize(&[record(Some((2023, 1, 2)), Some(3.5))], 1000.0);
        assert!((usages[0].usage - 3500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn provider_order_preserved() {
        let records = vec![
            record(Some((2023, 1, 3)), Some(1.0)),
            record(Some((2023, 1, 1)), Some(2.0)),
            record(Some((2023, 1, 2)), None),
            record(Some((2023, 1, 2)), Some(3.0)),
        ];
        let usages = normalize(&records, 1.0);
        let dates: Vec<_> = usages.iter().map(|u| u.date.to_string()).collect();
        assert_eq!(dates, ["2023-01-03", "2023-01-01", "2023-01-02"]);
    }
}
