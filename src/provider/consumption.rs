// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Date-ranged consumption fetch and the raw provider records it returns.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::error::{FetchError, ParseError, Result};
use crate::provider::Session;
use crate::types::PointId;

/// One daily reading as reported by the provider.
///
/// Every field is lenient: the portal intermittently sends `null` or
/// free-form strings where numbers belong, and a single bad entry must
/// not poison the whole payload. The normalizer decides what to do with
/// incomplete records.
///
/// # Examples
///
/// ```
/// use gazpar_link::provider::ConsumptionRecord;
///
/// let json = r#"{"journeeGaziere":"2023-01-02","energieConsomme":3.5}"#;
/// let record: ConsumptionRecord = serde_json::from_str(json).unwrap();
///
/// assert_eq!(record.usage, Some(3.5));
/// assert!(record.date.is_some());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsumptionRecord {
    /// The gas day the reading covers.
    #[serde(rename = "journeeGaziere", default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,

    /// Energy consumed that day (in kWh).
    #[serde(rename = "energieConsomme", default, deserialize_with = "lenient_f64")]
    pub usage: Option<f64>,

    /// Raw gas volume consumed (in m3).
    #[serde(
        rename = "volumeBrutConsomme",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub raw_volume: Option<f64>,

    /// Meter index at the start of the gas day (in m3).
    #[serde(rename = "indexDebut", default, deserialize_with = "lenient_f64")]
    pub start_index: Option<f64>,
}

/// Per-point section of the consumption payload.
#[derive(Debug, Deserialize)]
struct PointReadings {
    #[serde(rename = "releves", default)]
    readings: Vec<ConsumptionRecord>,
}

impl Session {
    /// Fetches the daily readings for `point_id` over `[start, end]`.
    ///
    /// Runs the authenticated-session probe first, then the date-ranged
    /// query. The payload is keyed by PCE; readings come back in provider
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on a non-success HTTP status or transport
    /// failure, and `ParseError` if the payload is not usable as a whole.
    pub async fn fetch_consumption(
        &self,
        point_id: &PointId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ConsumptionRecord>> {
        tracing::debug!(%point_id, %start, %end, "Fetching consumption");

        let probe = self
            .client
            .get(self.provider.probe_url())
            .send()
            .await
            .map_err(FetchError::Transport)?;
        if !probe.status().is_success() {
            return Err(FetchError::ProbeStatus(probe.status().as_u16()).into());
        }

        let response = self
            .client
            .get(self.provider.consumption_url(point_id, start, end))
            .send()
            .await
            .map_err(FetchError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()).into());
        }

        let body = response.text().await.map_err(FetchError::Transport)?;
        if self.provider.log_payloads() {
            tracing::debug!(body = %body, "Consumption response");
        }

        let payload: serde_json::Value = serde_json::from_str(&body).map_err(ParseError::Json)?;
        let section = payload
            .get(point_id.as_str())
            .cloned()
            .ok_or_else(|| ParseError::MissingPoint(point_id.to_string()))?;
        let readings: PointReadings =
            serde_json::from_value(section).map_err(ParseError::Json)?;

        tracing::debug!(count = readings.readings.len(), "Fetched daily readings");

        Ok(readings.readings)
    }
}

/// Accepts a number or a numeric string; anything else becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accepts a `YYYY-MM-DD` string; anything else becomes `None`.
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        _ => None,
    })
}
