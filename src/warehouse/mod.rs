//! Warehouse access.
//!
//! The loader talks to the warehouse through `Warehouse` so the routine can be
//! exercised against an in-memory table in tests. `pg::PostgresWarehouse`
//! is the production backend.

use crate::domain::{IndicatorDescriptor, ObservationRow};
use crate::error::AppError;

pub mod pg;
pub(crate) mod sql;

pub use pg::PostgresWarehouse;

pub trait Warehouse {
    /// Read `(indicator_id, fred_series_id)` for every active configuration row,
    /// in whatever order the store returns them.
    fn active_indicators(&mut self) -> Result<Vec<IndicatorDescriptor>, AppError>;

    /// Remove every row from the destination table.
    fn truncate_observations(&mut self) -> Result<(), AppError>;

    /// Insert one row into the destination table.
    fn insert_observation(&mut self, row: &ObservationRow) -> Result<(), AppError>;

    /// Make the inserted rows durable.
    fn commit(&mut self) -> Result<(), AppError>;

    /// Release the connection.
    fn close(self) -> Result<(), AppError>
    where
        Self: Sized;
}
