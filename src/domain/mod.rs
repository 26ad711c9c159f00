//! Domain types used throughout the loader.
//!
//! This module defines:
//!
//! - the indicator configuration rows read from the warehouse (`IndicatorDescriptor`)
//! - raw points as returned by the time-series API (`RawObservation`)
//! - the cleaned rows written to the destination table (`ObservationRow`)
//! - the trailing fetch window shared by every indicator in a run (`FetchWindow`)

pub mod types;

pub use types::*;
