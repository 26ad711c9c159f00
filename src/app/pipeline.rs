//! The fetch-and-load routine.
//!
//! One linear pass:
//! config read -> per-indicator fetch -> merge -> drop missing -> truncate -> insert -> commit
//!
//! Everything here is generic over `SeriesSource` and `Warehouse` so the whole
//! routine runs against in-memory fakes in tests.

use chrono::NaiveDateTime;
use tracing::{error, info, warn};

use crate::data::SeriesSource;
use crate::domain::{FetchWindow, IndicatorDescriptor, ObservationRow, RawObservation};
use crate::error::AppError;
use crate::warehouse::Warehouse;

/// Observations fetched for one indicator.
#[derive(Debug, Clone)]
pub struct IndicatorFetch {
    pub indicator: IndicatorDescriptor,
    pub observations: Vec<RawObservation>,
}

/// An indicator whose fetch failed; its data is left out of the run.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub indicator_id: String,
    pub series_id: String,
    pub error: AppError,
}

/// Merged rows after dropping missing values.
#[derive(Debug, Clone)]
pub struct CleanedRows {
    /// Row count before missing values were dropped.
    pub before: usize,
    pub rows: Vec<ObservationRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing to load; the destination table was not touched.
    Skipped,
    /// The destination table was truncated and reloaded.
    Loaded { rows: usize },
}

/// Summary of a single run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub window: FetchWindow,
    pub indicators: usize,
    /// `(indicator_id, observations fetched)` per successful fetch, in fetch order.
    pub fetched: Vec<(String, usize)>,
    pub failures: Vec<FetchFailure>,
    pub rows_before_clean: usize,
    pub rows_after_clean: usize,
    pub outcome: LoadOutcome,
}

/// Execute the routine with `now` anchoring the trailing window.
///
/// The warehouse is closed when the run succeeds. On a fatal error it is
/// simply dropped along with whatever work was in flight.
pub fn run<S, W>(source: &S, mut warehouse: W, now: NaiveDateTime) -> Result<RunReport, AppError>
where
    S: SeriesSource + ?Sized,
    W: Warehouse,
{
    // 1) Active indicators.
    let indicators = load_indicators(&mut warehouse)?;

    // 2) Window shared by every fetch.
    let window = FetchWindow::trailing(now);

    // 3) Fetch, tolerating per-indicator failures.
    let (fetches, failures) = fetch_all(source, &indicators, window);

    // 4) Merge + clean.
    let cleaned = merge_and_clean(&fetches);
    info!(
        before = cleaned.before,
        after = cleaned.rows.len(),
        "After removing missing values: {} rows remain",
        cleaned.rows.len()
    );

    // 5) Load.
    let outcome = load(&mut warehouse, &cleaned.rows)?;
    warehouse.close()?;

    Ok(RunReport {
        window,
        indicators: indicators.len(),
        fetched: fetches
            .iter()
            .map(|f| (f.indicator.indicator_id.clone(), f.observations.len()))
            .collect(),
        failures,
        rows_before_clean: cleaned.before,
        rows_after_clean: cleaned.rows.len(),
        outcome,
    })
}

pub fn load_indicators<W: Warehouse>(warehouse: &mut W) -> Result<Vec<IndicatorDescriptor>, AppError> {
    let indicators = warehouse.active_indicators()?;
    info!(count = indicators.len(), "Found {} active indicators to fetch", indicators.len());
    Ok(indicators)
}

/// Fetch every indicator in order. Failures are logged and collected, never propagated.
pub fn fetch_all<S>(
    source: &S,
    indicators: &[IndicatorDescriptor],
    window: FetchWindow,
) -> (Vec<IndicatorFetch>, Vec<FetchFailure>)
where
    S: SeriesSource + ?Sized,
{
    let mut fetches = Vec::with_capacity(indicators.len());
    let mut failures = Vec::new();

    for indicator in indicators {
        info!(
            indicator_id = %indicator.indicator_id,
            series_id = %indicator.external_series_id,
            "Fetching {} ({})...",
            indicator.indicator_id,
            indicator.external_series_id
        );

        match source.fetch_series(&indicator.external_series_id, window) {
            Ok(observations) => {
                info!(
                    indicator_id = %indicator.indicator_id,
                    count = observations.len(),
                    "Fetched {} observations",
                    observations.len()
                );
                fetches.push(IndicatorFetch {
                    indicator: indicator.clone(),
                    observations,
                });
            }
            Err(err) => {
                error!(
                    indicator_id = %indicator.indicator_id,
                    error = %err,
                    "Error fetching {}: {err}",
                    indicator.indicator_id
                );
                failures.push(FetchFailure {
                    indicator_id: indicator.indicator_id.clone(),
                    series_id: indicator.external_series_id.clone(),
                    error: err,
                });
            }
        }
    }

    (fetches, failures)
}

/// Concatenate fetches in order and drop observations without a value.
pub fn merge_and_clean(fetches: &[IndicatorFetch]) -> CleanedRows {
    let before = fetches.iter().map(|f| f.observations.len()).sum();

    let rows = fetches
        .iter()
        .flat_map(|fetch| {
            fetch.observations.iter().filter_map(move |obs| {
                obs.value
                    .filter(|v| v.is_finite())
                    .map(|v| ObservationRow::new(fetch.indicator.indicator_id.clone(), obs.date, v))
            })
        })
        .collect();

    CleanedRows { before, rows }
}

/// Replace the destination table with `rows`.
///
/// An empty `rows` leaves the table untouched. Otherwise the table is
/// truncated and each row inserted individually; the first failing insert
/// aborts the load.
pub fn load<W: Warehouse>(warehouse: &mut W, rows: &[ObservationRow]) -> Result<LoadOutcome, AppError> {
    if rows.is_empty() {
        warn!("No rows to load; FRED_INDICATORS left unchanged");
        return Ok(LoadOutcome::Skipped);
    }

    info!(rows = rows.len(), "Inserting {} total rows into FRED_INDICATORS...", rows.len());
    warehouse.truncate_observations()?;
    for row in rows {
        warehouse.insert_observation(row)?;
    }
    warehouse.commit()?;

    info!(rows = rows.len(), "Data loaded successfully");
    Ok(LoadOutcome::Loaded { rows: rows.len() })
}
