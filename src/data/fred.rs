//! FRED API integration.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::FredConfig;
use crate::data::SeriesSource;
use crate::domain::{FetchWindow, RawObservation};
use crate::error::AppError;

/// FRED's per-request maximum.
const OBS_LIMIT: usize = 100_000;

pub struct FredClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FredClient {
    pub fn new(config: &FredConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

impl SeriesSource for FredClient {
    fn fetch_series(&self, series_id: &str, window: FetchWindow) -> Result<Vec<RawObservation>, AppError> {
        let start = window.start.to_string();
        let end = window.end.to_string();
        let limit = OBS_LIMIT.to_string();

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("observation_start", start.as_str()),
                ("observation_end", end.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .map_err(|e| AppError::fetch(format!("FRED request failed: {}", e.without_url())))?;

        let status = resp.status();
        if !status.is_success() {
            // FRED explains rejections (bad key, unknown series) in a JSON body.
            let detail = resp
                .json::<ErrorResponse>()
                .ok()
                .and_then(|body| body.error_message);
            return Err(AppError::fetch(match detail {
                Some(msg) => format!("FRED request failed with status {status}: {msg}"),
                None => format!("FRED request failed with status {status}."),
            }));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::fetch(format!("Failed to parse FRED response: {}", e.without_url())))?;

        body.observations
            .into_iter()
            .map(|obs| {
                let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
                    .map_err(|e| AppError::fetch(format!("Invalid FRED date '{}': {e}", obs.date)))?;
                Ok(RawObservation::new(date, parse_value(&obs.value)))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error_message: Option<String>,
}

/// FRED encodes missing observations as `"."`.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
