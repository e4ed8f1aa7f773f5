use crate::models::{AddressRange, IspCount, QueryFilter};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The lookup or aggregate matched no rows.
    #[error("no matching rows")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            other => StorageError::Other(other.into()),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Read-only queries over the address-range table.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Get the range whose `[from, to]` interval contains `address`
    async fn find_containing(&self, address: u32) -> StorageResult<AddressRange>;

    /// List ranges ordered by their lower bound, at most `limit` of them
    async fn list(&self, limit: i64, filter: &QueryFilter) -> StorageResult<Vec<AddressRange>>;

    /// Sum of addresses covered by every range of `country`
    async fn count_addresses_by_country(&self, country: &str) -> StorageResult<u64>;

    /// ISPs of `country` ranked by how many ranges they hold, largest first
    async fn top_isps_by_country(&self, top: i64, country: &str) -> StorageResult<Vec<IspCount>>;
}

/// Schema management and bulk loading, used by the server on startup and by
/// the admin CLI.
#[async_trait]
pub trait StorageAdmin: Storage {
    /// Initialize the storage (create table and indexes)
    async fn init(&self) -> Result<()>;

    /// Insert ranges in a single transaction, returning how many were written
    async fn insert_ranges(&self, ranges: &[AddressRange]) -> Result<u64>;

    /// View this backend through the read-only query interface
    fn into_storage(self: Arc<Self>) -> Arc<dyn Storage>;
}
