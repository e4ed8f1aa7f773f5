use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One allocated IPv4 block with its geolocation and network metadata.
///
/// `from` and `to` are inclusive bounds in the integer key space produced by
/// [`crate::conversion::ipv4_to_decimal`]. Both backends store them as
/// `BIGINT`, so they are narrowed on the way out of the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AddressRange {
    #[sqlx(rename = "ip_from", try_from = "i64")]
    pub from: u32,
    #[sqlx(rename = "ip_to", try_from = "i64")]
    pub to: u32,
    pub proxy_type: String,
    #[sqlx(flatten)]
    pub country: Country,
    pub isp: String,
    pub domain: String,
    pub usage_type: String,
    pub asn: i64,
    #[sqlx(rename = "as_name")]
    pub as_organization: String,
}

impl AddressRange {
    pub fn contains(&self, address: u32) -> bool {
        self.from <= address && address <= self.to
    }

    /// Number of addresses covered by this range.
    pub fn address_count(&self) -> u64 {
        u64::from(self.to) - u64::from(self.from) + 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Country {
    #[sqlx(rename = "country_code")]
    pub code: String,
    #[sqlx(rename = "country_name")]
    pub name: String,
    #[sqlx(rename = "region_name")]
    pub region: String,
    #[sqlx(rename = "city_name")]
    pub city: String,
}

/// Ranking entry: how many ranges an ISP holds within a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct IspCount {
    pub isp: String,
    #[sqlx(try_from = "i64")]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(from: u32, to: u32) -> AddressRange {
        AddressRange {
            from,
            to,
            proxy_type: "-".to_string(),
            country: Country::default(),
            isp: String::new(),
            domain: String::new(),
            usage_type: String::new(),
            asn: 0,
            as_organization: String::new(),
        }
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = range(10, 20);
        assert!(r.contains(10));
        assert!(r.contains(15));
        assert!(r.contains(20));
        assert!(!r.contains(9));
        assert!(!r.contains(21));
    }

    #[test]
    fn test_address_count_includes_both_bounds() {
        assert_eq!(range(5, 5).address_count(), 1);
        assert_eq!(range(16777216, 16777471).address_count(), 256);
        assert_eq!(range(0, u32::MAX).address_count(), 1 << 32);
    }
}
