//! Shared domain types.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Label stamped on every loaded row.
pub const SOURCE_LABEL: &str = "FRED_API";

/// Length of the trailing window in days.
///
/// Five "years" of 365 days each; leap days are not accounted for.
pub const LOOKBACK_DAYS: i64 = 5 * 365;

/// One active row of the indicator configuration table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorDescriptor {
    /// Internal identifier, written to the destination table.
    pub indicator_id: String,
    /// Series identifier understood by the external API.
    pub external_series_id: String,
}

impl IndicatorDescriptor {
    pub fn new(indicator_id: impl Into<String>, external_series_id: impl Into<String>) -> Self {
        Self {
            indicator_id: indicator_id.into(),
            external_series_id: external_series_id.into(),
        }
    }
}

/// A single `(date, value)` point from the API. `value` is `None` when the
/// API reports the observation as missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawObservation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl RawObservation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// A row in the shape of the destination table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub indicator_id: String,
    pub observation_date: NaiveDate,
    pub value: f64,
    pub source: String,
}

impl ObservationRow {
    pub fn new(indicator_id: impl Into<String>, observation_date: NaiveDate, value: f64) -> Self {
        Self {
            indicator_id: indicator_id.into(),
            observation_date,
            value,
            source: SOURCE_LABEL.to_string(),
        }
    }
}

/// Inclusive date range requested for every series in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// Window ending at `now` and reaching back `LOOKBACK_DAYS`.
    pub fn trailing(now: NaiveDateTime) -> Self {
        let start = now - Duration::days(LOOKBACK_DAYS);
        Self {
            start: start.date(),
            end: now.date(),
        }
    }
}
