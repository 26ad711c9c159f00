//! SQL text used by the warehouse backends.

/// `SEED_INDICATORS` lists the series to load; only active rows are fetched.
pub(crate) static SELECT_ACTIVE_INDICATORS: &str = "
    SELECT indicator_id, fred_series_id
    FROM SEED_INDICATORS
    WHERE is_active = TRUE
";

/// `FRED_INDICATORS` is fully replaced on every run.
pub(crate) static TRUNCATE_OBSERVATIONS: &str = "TRUNCATE TABLE FRED_INDICATORS";

pub(crate) static INSERT_OBSERVATION: &str = "
    INSERT INTO FRED_INDICATORS (indicator_id, observation_date, value, source)
    VALUES ($1, $2, $3, $4)
";

/// Quote an identifier for statements that cannot take bind parameters (`SET ROLE`, `search_path`).
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
