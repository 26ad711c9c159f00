//! `fred-ingest` library crate.
//!
//! Loads macroeconomic series from the FRED API into the warehouse's
//! `FRED_INDICATORS` table, replacing its contents on every run.
//!
//! The binary (`fred-ingest`) is a thin wrapper around this library so that
//! the routine is testable without a live API or warehouse.

pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod logging;
pub mod warehouse;
