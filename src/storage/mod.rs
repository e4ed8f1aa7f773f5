pub mod postgres;
pub mod sqlite;
pub mod trait_def;

pub use postgres::PostgresStorage;
pub use sqlite::SqliteStorage;
pub use trait_def::{Storage, StorageAdmin, StorageError, StorageResult};

use crate::config::{DatabaseBackend, DatabaseConfig};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Connect to the configured backend. The schema is not touched.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn StorageAdmin>> {
    let storage: Arc<dyn StorageAdmin> = match config.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.url);
            Arc::new(
                SqliteStorage::new(&config.url, config.max_connections)
                    .await
                    .with_context(|| format!("Failed to open SQLite database at {}", config.url))?,
            )
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage");
            Arc::new(
                PostgresStorage::new(&config.url, config.max_connections)
                    .await
                    .context("Failed to connect to PostgreSQL")?,
            )
        }
    };

    Ok(storage)
}

/// Columns selected for every full [`crate::models::AddressRange`] row.
pub(crate) const RANGE_COLUMNS: &str = "ip_from, ip_to, proxy_type, country_code, country_name, \
     region_name, city_name, isp, domain, usage_type, asn, as_name";

/// Reject ranges whose bounds are inverted before they reach the table.
pub(crate) fn ensure_well_formed(ranges: &[crate::models::AddressRange]) -> Result<()> {
    if let Some(range) = ranges.iter().find(|r| r.from > r.to) {
        anyhow::bail!(
            "invalid range: from {} is greater than to {}",
            range.from,
            range.to
        );
    }
    Ok(())
}
