//! Time-series data sources.
//!
//! The loader only needs one capability from the outside world: "give me the
//! observations of series X between two dates". `SeriesSource` names that seam;
//! `fred::FredClient` is the production implementation.

use crate::domain::{FetchWindow, RawObservation};
use crate::error::AppError;

pub mod fred;

pub use fred::FredClient;

pub trait SeriesSource {
    /// Fetch every observation of `series_id` inside `window`, oldest first.
    fn fetch_series(&self, series_id: &str, window: FetchWindow) -> Result<Vec<RawObservation>, AppError>;
}
