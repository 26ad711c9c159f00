//! Warehouse backend speaking the Postgres wire protocol.

use postgres::{Client, Config, NoTls, Statement};
use tracing::debug;

use crate::config::WarehouseConfig;
use crate::domain::{IndicatorDescriptor, ObservationRow};
use crate::error::AppError;
use crate::warehouse::Warehouse;
use crate::warehouse::sql::{
    INSERT_OBSERVATION, SELECT_ACTIVE_INDICATORS, TRUNCATE_OBSERVATIONS, quote_ident,
};

pub struct PostgresWarehouse {
    client: Client,
    insert: Option<Statement>,
    in_transaction: bool,
}

impl PostgresWarehouse {
    pub fn connect(config: &WarehouseConfig) -> Result<Self, AppError> {
        let mut pg = Config::new();
        pg.host(&config.host)
            .port(config.port)
            .user(&config.user)
            .password(&config.password)
            .dbname(&config.database);
        if let Some(name) = &config.warehouse {
            pg.application_name(name);
        }

        let mut client = pg.connect(NoTls).map_err(|e| {
            AppError::warehouse(format!(
                "Failed to connect to warehouse at {}:{}: {e}",
                config.host, config.port
            ))
        })?;

        if let Some(role) = &config.role {
            client
                .batch_execute(&format!("SET ROLE {}", quote_ident(role)))
                .map_err(|e| AppError::warehouse(format!("Failed to assume role '{role}': {e}")))?;
        }
        if let Some(schema) = &config.schema {
            client
                .batch_execute(&format!("SET search_path TO {}", quote_ident(schema)))
                .map_err(|e| AppError::warehouse(format!("Failed to select schema '{schema}': {e}")))?;
        }

        debug!(host = %config.host, database = %config.database, "connected to warehouse");

        Ok(Self {
            client,
            insert: None,
            in_transaction: false,
        })
    }
}

impl Warehouse for PostgresWarehouse {
    fn active_indicators(&mut self) -> Result<Vec<IndicatorDescriptor>, AppError> {
        let rows = self
            .client
            .query(SELECT_ACTIVE_INDICATORS, &[])
            .map_err(|e| AppError::warehouse(format!("Failed to read SEED_INDICATORS: {e}")))?;

        rows.iter()
            .map(|row| {
                let indicator_id: String = row
                    .try_get(0)
                    .map_err(|e| AppError::warehouse(format!("Bad indicator_id in SEED_INDICATORS: {e}")))?;
                let series_id: String = row
                    .try_get(1)
                    .map_err(|e| AppError::warehouse(format!("Bad fred_series_id in SEED_INDICATORS: {e}")))?;
                Ok(IndicatorDescriptor::new(indicator_id, series_id))
            })
            .collect()
    }

    fn truncate_observations(&mut self) -> Result<(), AppError> {
        // Runs outside the insert transaction: the truncate is durable on its own.
        self.client
            .batch_execute(TRUNCATE_OBSERVATIONS)
            .map_err(|e| AppError::warehouse(format!("Failed to truncate FRED_INDICATORS: {e}")))
    }

    fn insert_observation(&mut self, row: &ObservationRow) -> Result<(), AppError> {
        if !self.in_transaction {
            self.client
                .batch_execute("BEGIN")
                .map_err(|e| AppError::warehouse(format!("Failed to open transaction: {e}")))?;
            self.in_transaction = true;
        }

        let statement = match &self.insert {
            Some(statement) => statement.clone(),
            None => {
                let statement = self
                    .client
                    .prepare(INSERT_OBSERVATION)
                    .map_err(|e| AppError::warehouse(format!("Failed to prepare insert: {e}")))?;
                self.insert = Some(statement.clone());
                statement
            }
        };

        self.client
            .execute(
                &statement,
                &[&row.indicator_id, &row.observation_date, &row.value, &row.source],
            )
            .map_err(|e| {
                AppError::warehouse(format!(
                    "Failed to insert {} @ {}: {e}",
                    row.indicator_id, row.observation_date
                ))
            })?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), AppError> {
        if !self.in_transaction {
            return Ok(());
        }
        self.client
            .batch_execute("COMMIT")
            .map_err(|e| AppError::warehouse(format!("Failed to commit: {e}")))?;
        self.in_transaction = false;
        Ok(())
    }

    fn close(self) -> Result<(), AppError> {
        self.client
            .close()
            .map_err(|e| AppError::warehouse(format!("Failed to close warehouse connection: {e}")))
    }
}
