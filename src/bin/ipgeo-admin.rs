use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ipgeo::config::Config;
use ipgeo::conversion::decimal_to_ipv4;
use ipgeo::dataset::RangeReader;
use ipgeo::service::{normalize_country, AddressService, DEFAULT_TOP_ISPS};
use ipgeo::storage;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ipgeo-admin")]
#[command(about = "IP geolocation dataset management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the address-range table and indexes
    Init,
    /// Load an IP2Proxy PX7 CSV export into the database
    Import {
        /// Path to the CSV file
        path: PathBuf,
        /// Rows written per transaction
        #[arg(long, default_value_t = 1000)]
        batch_size: usize,
    },
    /// Resolve a single IPv4 address
    Lookup {
        /// Dotted-decimal address, e.g. 181.44.9.182
        ip: String,
    },
    /// Count the addresses allocated to a country
    Quantity {
        /// Country name, any casing
        country: String,
    },
    /// Rank the ISPs of a country
    TopIsps {
        /// Country name, any casing
        country: String,
        /// How many ISPs to show
        #[arg(long, default_value_t = DEFAULT_TOP_ISPS)]
        top: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let storage = storage::connect(&config.database).await?;

    // Ensure database is initialized
    storage.init().await?;

    match cli.command {
        Commands::Init => {
            println!("✓ Database schema is ready");
        }
        Commands::Import { path, batch_size } => {
            anyhow::ensure!(batch_size > 0, "--batch-size must be greater than zero");

            let mut reader = RangeReader::from_path(&path)?;
            let mut read = 0usize;
            let mut inserted = 0u64;

            loop {
                let batch = reader.read_batch(batch_size)?;
                if batch.is_empty() {
                    break;
                }
                read += batch.len();
                inserted += storage
                    .insert_ranges(&batch)
                    .await
                    .with_context(|| format!("Failed to insert batch ending at row {}", read))?;
                tracing::info!("Imported {} rows...", read);
            }

            println!(
                "✓ Read {} ranges from '{}', inserted {} ({} already present)",
                read,
                path.display(),
                inserted,
                read as u64 - inserted
            );
        }
        Commands::Lookup { ip } => {
            let service = AddressService::new(storage.into_storage());
            match service.resolve_address(&ip).await? {
                Some(range) => {
                    println!("{:<12} {}", "Address:", ip);
                    println!(
                        "{:<12} {} - {}",
                        "Range:",
                        decimal_to_ipv4(range.from),
                        decimal_to_ipv4(range.to)
                    );
                    println!(
                        "{:<12} {} ({}), {}, {}",
                        "Location:",
                        range.country.name,
                        range.country.code,
                        range.country.region,
                        range.country.city
                    );
                    println!("{:<12} {}", "ISP:", range.isp);
                    println!("{:<12} {}", "Domain:", range.domain);
                    println!("{:<12} {}", "Usage:", range.usage_type);
                    println!("{:<12} {}", "Proxy:", range.proxy_type);
                    println!("{:<12} AS{} {}", "ASN:", range.asn, range.as_organization);
                }
                None => println!("⚠ No range covers '{}'", ip),
            }
        }
        Commands::Quantity { country } => {
            let service = AddressService::new(storage.into_storage());
            let quantity = service.count_by_country(&country).await?;
            println!("{}: {}", normalize_country(&country), quantity);
        }
        Commands::TopIsps { country, top } => {
            let service = AddressService::new(storage.into_storage());
            let isps = service.top_isps_by_country(top, &country).await?;
            if isps.is_empty() {
                println!("No ISPs found for '{}'.", normalize_country(&country));
            } else {
                println!("{:<60} {}", "ISP", "Ranges");
                println!("{}", "-".repeat(70));
                for entry in isps {
                    println!("{:<60} {}", entry.isp, entry.total);
                }
            }
        }
    }

    Ok(())
}
