//! Shared fixtures for integration tests

#![allow(dead_code)]

use ipgeo::conversion::ipv4_to_decimal;
use ipgeo::models::{AddressRange, Country};
use ipgeo::storage::{SqliteStorage, StorageAdmin};
use std::sync::Arc;

/// Helper to create an initialized in-memory SQLite storage
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_sqlite_storage() -> Arc<SqliteStorage> {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

pub fn range(from: &str, to: &str, country: (&str, &str), city: &str, isp: &str) -> AddressRange {
    AddressRange {
        from: ipv4_to_decimal(from).unwrap(),
        to: ipv4_to_decimal(to).unwrap(),
        proxy_type: "PUB".to_string(),
        country: Country {
            code: country.0.to_string(),
            name: country.1.to_string(),
            region: "-".to_string(),
            city: city.to_string(),
        },
        isp: isp.to_string(),
        domain: "-".to_string(),
        usage_type: "ISP".to_string(),
        asn: 7303,
        as_organization: isp.to_string(),
    }
}

pub const ARGENTINA: (&str, &str) = ("AR", "Argentina");
pub const SWITZERLAND: (&str, &str) = ("CH", "Switzerland");

/// Total addresses covered by `fixture_ranges` for Argentina
pub const ARGENTINA_ADDRESSES: u64 = 1280;
/// Total addresses covered by `fixture_ranges` for Switzerland
pub const SWITZERLAND_ADDRESSES: u64 = 32;

/// Argentina: Telecom holds 3 ranges, Telefonica 2, Level 3 1.
/// Inserted out of address order on purpose.
pub fn fixture_ranges() -> Vec<AddressRange> {
    vec![
        range("181.44.9.0", "181.44.9.255", ARGENTINA, "La Plata", "Telecom Argentina S.A."),
        range("190.48.1.0", "190.48.1.127", ARGENTINA, "Rosario", "Telefonica de Argentina"),
        range("181.44.10.0", "181.44.10.255", ARGENTINA, "La Plata", "Telecom Argentina S.A."),
        range("8.243.138.0", "8.243.138.255", ARGENTINA, "Buenos Aires", "Level 3"),
        range("181.167.120.0", "181.167.120.255", ARGENTINA, "Cordoba", "Telecom Argentina S.A."),
        range("190.48.0.0", "190.48.0.127", ARGENTINA, "Rosario", "Telefonica de Argentina"),
        range("85.0.0.0", "85.0.0.15", SWITZERLAND, "Zurich", "Swisscom"),
        range("85.1.0.0", "85.1.0.15", SWITZERLAND, "Geneva", "Swisscom"),
    ]
}

pub async fn seed(storage: &dyn StorageAdmin) {
    let inserted = storage.insert_ranges(&fixture_ranges()).await.unwrap();
    assert_eq!(inserted, fixture_ranges().len() as u64);
}
