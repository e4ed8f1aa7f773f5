//! Conversion between dotted-decimal IPv4 text and its 32-bit integer form.
//!
//! The address-range table is keyed by integers, so every lookup goes
//! through [`ipv4_to_decimal`] and every rendered range goes back through
//! [`decimal_to_ipv4`].

use thiserror::Error;

/// Input text is not four dot-separated decimal octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not an IPv4 address")]
pub struct NotIpv4;

/// Convert dotted-decimal text into its big-endian integer value.
///
/// Exactly four segments are required and each one must be a decimal
/// number in `0..=255`. Anything else fails with [`NotIpv4`].
pub fn ipv4_to_decimal(ip: &str) -> Result<u32, NotIpv4> {
    let mut octets = [0u8; 4];
    let mut segments = ip.split('.');

    for octet in octets.iter_mut() {
        let segment = segments.next().ok_or(NotIpv4)?;
        *octet = parse_octet(segment)?;
    }

    if segments.next().is_some() {
        return Err(NotIpv4);
    }

    Ok(u32::from(octets[0]) << 24
        | u32::from(octets[1]) << 16
        | u32::from(octets[2]) << 8
        | u32::from(octets[3]))
}

/// Render an integer as dotted-decimal text, most significant byte first.
pub fn decimal_to_ipv4(decimal: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (decimal >> 24) & 0xff,
        (decimal >> 16) & 0xff,
        (decimal >> 8) & 0xff,
        decimal & 0xff
    )
}

fn parse_octet(segment: &str) -> Result<u8, NotIpv4> {
    // u8::from_str accepts a leading '+', which is not an address digit
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NotIpv4);
    }
    segment.parse::<u8>().map_err(|_| NotIpv4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_to_decimal_known_values() {
        assert_eq!(ipv4_to_decimal("181.44.9.182"), Ok(3039562166));
        assert_eq!(ipv4_to_decimal("181.167.120.9"), Ok(3047651337));
        assert_eq!(ipv4_to_decimal("0.0.0.0"), Ok(0));
        assert_eq!(ipv4_to_decimal("255.255.255.255"), Ok(u32::MAX));
        assert_eq!(ipv4_to_decimal("1.0.0.0"), Ok(16777216));
    }

    #[test]
    fn test_decimal_to_ipv4_known_values() {
        assert_eq!(decimal_to_ipv4(3039562166), "181.44.9.182");
        assert_eq!(decimal_to_ipv4(3047651337), "181.167.120.9");
        assert_eq!(decimal_to_ipv4(0), "0.0.0.0");
        assert_eq!(decimal_to_ipv4(u32::MAX), "255.255.255.255");
    }

    #[test]
    fn test_wrong_segment_count_is_rejected() {
        for input in ["181449182", "181.44.9", "181.44.9.182.1", "", "..."] {
            assert_eq!(ipv4_to_decimal(input), Err(NotIpv4), "input: {input:?}");
        }
    }

    #[test]
    fn test_non_numeric_segment_is_rejected() {
        for input in [
            "181.abc.120.9",
            "181.ab.9.182",
            "1..2.3",
            "1.2.3.-4",
            "1.2.3.+4",
            " 1.2.3.4",
            "1.2.3.4 ",
            "1.2.3.0x1",
        ] {
            assert_eq!(ipv4_to_decimal(input), Err(NotIpv4), "input: {input:?}");
        }
    }

    #[test]
    fn test_out_of_range_segment_is_rejected() {
        for input in ["256.0.0.0", "1.2.3.256", "1.999.3.4", "99999999999.1.1.1"] {
            assert_eq!(ipv4_to_decimal(input), Err(NotIpv4), "input: {input:?}");
        }
    }

    #[test]
    fn test_leading_zeros_parse_as_decimal() {
        assert_eq!(ipv4_to_decimal("010.000.000.001"), ipv4_to_decimal("10.0.0.1"));
    }

    #[test]
    fn test_round_trip_preserves_canonical_text() {
        for input in [
            "8.243.138.218",
            "10.0.0.1",
            "127.0.0.1",
            "192.168.255.0",
            "223.255.254.1",
        ] {
            let decimal = ipv4_to_decimal(input).unwrap();
            assert_eq!(decimal_to_ipv4(decimal), input);
        }
    }

    #[test]
    fn test_byte_order_is_big_endian() {
        let decimal = ipv4_to_decimal("1.2.3.4").unwrap();
        assert_eq!(decimal.to_be_bytes(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(NotIpv4.to_string(), "not an IPv4 address");
    }
}
