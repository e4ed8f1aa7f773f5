//! Request shaping over the address-range store.
//!
//! [`AddressService`] normalizes caller input (address text, country casing,
//! limits), hands it to a [`Storage`] and turns "no rows" into an empty
//! answer. It keeps no state between calls.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::conversion::{ipv4_to_decimal, NotIpv4};
use crate::models::{AddressRange, IspCount, QueryFilter};
use crate::storage::{Storage, StorageError};

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const DEFAULT_TOP_ISPS: i64 = 10;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    NotIpv4(#[from] NotIpv4),
    #[error(transparent)]
    Storage(anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Map a storage outcome, substituting `empty` when nothing matched.
fn or_empty<T>(result: Result<T, StorageError>, empty: T) -> ServiceResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(StorageError::NotFound) => Ok(empty),
        Err(StorageError::Other(e)) => Err(ServiceError::Storage(e)),
    }
}

pub struct AddressService {
    storage: Arc<dyn Storage>,
}

impl AddressService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Find the range covering `ip`, or `None` when no range does.
    pub async fn resolve_address(&self, ip: &str) -> ServiceResult<Option<AddressRange>> {
        let decimal = ipv4_to_decimal(ip)?;
        let result = self.storage.find_containing(decimal).await.map(Some);
        or_empty(result, None)
    }

    /// List ranges, optionally restricted to one country.
    ///
    /// A non-positive `limit` falls back to [`DEFAULT_LIST_LIMIT`].
    pub async fn list_addresses(
        &self,
        limit: i64,
        filter: QueryFilter,
    ) -> ServiceResult<Vec<AddressRange>> {
        let limit = if limit > 0 { limit } else { DEFAULT_LIST_LIMIT };
        let filter = QueryFilter {
            country: filter.country.as_deref().map(normalize_country),
        };

        or_empty(self.storage.list(limit, &filter).await, Vec::new())
    }

    /// Total number of addresses allocated to `country`.
    pub async fn count_by_country(&self, country: &str) -> ServiceResult<u64> {
        let country = normalize_country(country);
        or_empty(
            self.storage.count_addresses_by_country(&country).await,
            0,
        )
    }

    /// The `top` ISPs of `country`, in the order storage ranked them.
    pub async fn top_isps_by_country(
        &self,
        top: i64,
        country: &str,
    ) -> ServiceResult<Vec<IspCount>> {
        let top = if top > 0 { top } else { DEFAULT_TOP_ISPS };
        let country = normalize_country(country);
        or_empty(
            self.storage.top_isps_by_country(top, &country).await,
            Vec::new(),
        )
    }
}

/// Parameters of a range listing, taken from URL query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub limit: i64,
    pub filter: QueryFilter,
}

impl ListRequest {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            limit: parse_count(params.get("limit").map(String::as_str), DEFAULT_LIST_LIMIT),
            filter: QueryFilter::from_params(params),
        }
    }
}

/// Parse a positive count, falling back to `default` when the value is
/// missing, malformed, zero or negative.
pub fn parse_count(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

/// Country names are stored title-cased.
pub fn normalize_country(country: &str) -> String {
    title_case(country.trim())
}

/// Upper-case the first character of every whitespace-separated word and
/// lower-case the rest. Whitespace is kept as-is.
pub fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_whitespace() {
            output.push(c);
            at_word_start = true;
        } else if at_word_start {
            output.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            output.extend(c.to_lowercase());
        }
    }

    output
}
