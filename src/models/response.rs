//! JSON payloads returned by the HTTP API.

use serde::Serialize;

use super::AddressRange;
use crate::conversion::decimal_to_ipv4;

/// Full metadata for a single resolved address.
#[derive(Debug, Serialize)]
pub struct AddressDetails {
    pub ip: String,
    pub ip_from: String,
    pub ip_to: String,
    pub proxy_type: String,
    pub country: CountryDetails,
    pub isp: String,
    pub domain: String,
    pub usage: String,
    pub asn: i64,
    #[serde(rename = "as")]
    pub as_organization: String,
}

#[derive(Debug, Serialize)]
pub struct CountryDetails {
    pub code: String,
    pub name: String,
    pub region: String,
    pub city: String,
}

impl AddressDetails {
    pub fn new(ip: &str, range: AddressRange) -> Self {
        Self {
            ip: ip.to_string(),
            ip_from: decimal_to_ipv4(range.from),
            ip_to: decimal_to_ipv4(range.to),
            proxy_type: range.proxy_type,
            country: CountryDetails {
                code: range.country.code,
                name: range.country.name,
                region: range.country.region,
                city: range.country.city,
            },
            isp: range.isp,
            domain: range.domain,
            usage: range.usage_type,
            asn: range.asn,
            as_organization: range.as_organization,
        }
    }
}

/// Listing entry: the range bounds rendered as addresses plus its location.
#[derive(Debug, Serialize)]
pub struct AddressSummary {
    pub ip_from: String,
    pub ip_to: String,
    pub country: CountrySummary,
}

#[derive(Debug, Serialize)]
pub struct CountrySummary {
    pub name: String,
    pub city: String,
}

impl From<AddressRange> for AddressSummary {
    fn from(range: AddressRange) -> Self {
        Self {
            ip_from: decimal_to_ipv4(range.from),
            ip_to: decimal_to_ipv4(range.to),
            country: CountrySummary {
                name: range.country.name,
                city: range.country.city,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountryQuantity {
    pub country: String,
    pub quantity: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Country;

    fn sample() -> AddressRange {
        AddressRange {
            from: 3039562166,
            to: 3039562200,
            proxy_type: "VPN".to_string(),
            country: Country {
                code: "AR".to_string(),
                name: "Argentina".to_string(),
                region: "Buenos Aires".to_string(),
                city: "La Plata".to_string(),
            },
            isp: "Telecom Argentina".to_string(),
            domain: "telecom.com.ar".to_string(),
            usage_type: "ISP".to_string(),
            asn: 7303,
            as_organization: "Telecom Argentina S.A.".to_string(),
        }
    }

    #[test]
    fn test_summary_renders_bounds_as_addresses() {
        let summary = AddressSummary::from(sample());
        assert_eq!(summary.ip_from, "181.44.9.182");
        assert_eq!(summary.ip_to, "181.44.9.216");
        assert_eq!(summary.country.name, "Argentina");
        assert_eq!(summary.country.city, "La Plata");
    }

    #[test]
    fn test_details_keep_requested_address() {
        let details = AddressDetails::new("181.44.9.190", sample());
        assert_eq!(details.ip, "181.44.9.190");
        assert_eq!(details.ip_from, "181.44.9.182");
        assert_eq!(details.asn, 7303);
        assert_eq!(details.usage, "ISP");
    }
}
