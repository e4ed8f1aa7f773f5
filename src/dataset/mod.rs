//! Reader for IP2Proxy PX7 CSV exports.
//!
//! Each row has twelve quoted columns and no header:
//! `ip_from, ip_to, proxy_type, country_code, country_name, region_name,
//! city_name, isp, domain, usage_type, asn, as`. Bounds are usually integers
//! but dotted-decimal text is accepted as well.

use anyhow::{Context, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::conversion::ipv4_to_decimal;
use crate::models::{AddressRange, Country};

pub const PX7_COLUMNS: usize = 12;

pub struct RangeReader<R> {
    reader: csv::Reader<R>,
    record: StringRecord,
}

impl RangeReader<File> {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<R: Read> RangeReader<R> {
    pub fn new(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        Self {
            reader,
            record: StringRecord::new(),
        }
    }

    /// Read up to `batch_size` ranges. An empty batch means the input is
    /// exhausted.
    pub fn read_batch(&mut self, batch_size: usize) -> Result<Vec<AddressRange>> {
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size
            && self
                .reader
                .read_record(&mut self.record)
                .context("Failed to read CSV record")?
        {
            batch.push(parse_record(&self.record)?);
        }

        Ok(batch)
    }
}

fn parse_record(record: &StringRecord) -> Result<AddressRange> {
    let line = record.position().map(|p| p.line()).unwrap_or_default();

    anyhow::ensure!(
        record.len() == PX7_COLUMNS,
        "line {line}: expected {PX7_COLUMNS} columns, found {}",
        record.len()
    );

    let field = |index: usize| record.get(index).unwrap_or_default().trim();
    let text = |index: usize| field(index).to_string();

    let from = parse_bound(field(0)).with_context(|| format!("line {line}: bad ip_from"))?;
    let to = parse_bound(field(1)).with_context(|| format!("line {line}: bad ip_to"))?;
    anyhow::ensure!(
        from <= to,
        "line {line}: ip_from {from} is greater than ip_to {to}"
    );

    let asn = match field(10) {
        "" | "-" => 0,
        value => value
            .parse::<i64>()
            .with_context(|| format!("line {line}: bad asn '{value}'"))?,
    };

    Ok(AddressRange {
        from,
        to,
        proxy_type: text(2),
        country: Country {
            code: text(3),
            name: text(4),
            region: text(5),
            city: text(6),
        },
        isp: text(7),
        domain: text(8),
        usage_type: text(9),
        asn,
        as_organization: text(11),
    })
}

fn parse_bound(value: &str) -> Result<u32> {
    if value.contains('.') {
        Ok(ipv4_to_decimal(value)?)
    } else {
        value
            .parse::<u32>()
            .with_context(|| format!("'{value}' is not a 32-bit address"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "\"16777216\",\"16777471\",\"DCH\",\"AU\",\"Australia\",\"Queensland\",\"Brisbane\",\"APNIC and Cloudflare DNS Resolver Project\",\"cloudflare.com\",\"CDN\",\"13335\",\"CloudFlare Inc.\"\n",
        "\"3039562166\",\"3039562200\",\"PUB\",\"AR\",\"Argentina\",\"Buenos Aires\",\"La Plata\",\"Telecom Argentina S.A.\",\"telecom.com.ar\",\"ISP/MOB\",\"-\",\"-\"\n",
        "\"181.167.120.0\",\"181.167.120.255\",\"VPN\",\"AR\",\"Argentina\",\"Cordoba\",\"Cordoba\",\"Telecom Argentina S.A.\",\"telecom.com.ar\",\"ISP\",\"7303\",\"Telecom Argentina S.A.\"\n",
    );

    #[test]
    fn test_reads_px7_rows() {
        let mut reader = RangeReader::new(SAMPLE.as_bytes());

        let batch = reader.read_batch(10).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].from, 16777216);
        assert_eq!(batch[0].to, 16777471);
        assert_eq!(batch[0].country.name, "Australia");
        assert_eq!(batch[0].asn, 13335);
        assert_eq!(batch[0].as_organization, "CloudFlare Inc.");
        assert_eq!(batch[1].asn, 0);
        assert_eq!(batch[1].usage_type, "ISP/MOB");
        assert_eq!(batch[2].from, 3047651328);
        assert_eq!(batch[2].to, 3047651583);
    }

    #[test]
    fn test_reads_in_batches() {
        let mut reader = RangeReader::new(SAMPLE.as_bytes());

        assert_eq!(reader.read_batch(2).unwrap().len(), 2);
        assert_eq!(reader.read_batch(2).unwrap().len(), 1);
        assert!(reader.read_batch(2).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_short_rows() {
        let mut reader = RangeReader::new("\"1\",\"2\",\"PUB\"\n".as_bytes());

        let err = reader.read_batch(10).unwrap_err();

        assert!(err.to_string().contains("expected 12 columns"));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let row = "\"20\",\"10\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\"\n";
        let mut reader = RangeReader::new(row.as_bytes());

        let err = reader.read_batch(10).unwrap_err();

        assert!(err.to_string().contains("greater than"));
    }

    #[test]
    fn test_rejects_malformed_bounds() {
        for row in [
            "\"1.2.3\",\"10\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\"\n",
            "\"4294967296\",\"4294967296\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\"\n",
            "\"1\",\"x\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\",\"-\"\n",
        ] {
            let mut reader = RangeReader::new(row.as_bytes());
            assert!(reader.read_batch(10).is_err(), "row: {row}");
        }
    }
}
