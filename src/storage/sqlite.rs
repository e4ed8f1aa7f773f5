use crate::models::{AddressRange, IspCount, QueryFilter};
use crate::storage::{
    ensure_well_formed, Storage, StorageAdmin, StorageError, StorageResult, RANGE_COLUMNS,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn find_containing(&self, address: u32) -> StorageResult<AddressRange> {
        let sql = format!(
            "SELECT {RANGE_COLUMNS} FROM ip2location_px7 \
             WHERE ip_from <= ? AND ip_to >= ? \
             ORDER BY ip_from DESC LIMIT 1"
        );
        let range = sqlx::query_as::<_, AddressRange>(&sql)
            .bind(i64::from(address))
            .bind(i64::from(address))
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(range)
    }

    async fn list(&self, limit: i64, filter: &QueryFilter) -> StorageResult<Vec<AddressRange>> {
        let ranges = if let Some(country) = filter.country.as_deref() {
            let sql = format!(
                "SELECT {RANGE_COLUMNS} FROM ip2location_px7 \
                 WHERE country_name = ? \
                 ORDER BY ip_from LIMIT ?"
            );
            sqlx::query_as::<_, AddressRange>(&sql)
                .bind(country)
                .bind(limit)
                .fetch_all(self.pool.as_ref())
                .await?
        } else {
            let sql = format!(
                "SELECT {RANGE_COLUMNS} FROM ip2location_px7 \
                 ORDER BY ip_from LIMIT ?"
            );
            sqlx::query_as::<_, AddressRange>(&sql)
                .bind(limit)
                .fetch_all(self.pool.as_ref())
                .await?
        };

        Ok(ranges)
    }

    async fn count_addresses_by_country(&self, country: &str) -> StorageResult<u64> {
        // SUM over zero rows is NULL
        let quantity = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT CAST(SUM(ip_to - ip_from + 1) AS BIGINT)
            FROM ip2location_px7
            WHERE country_name = ?
            "#,
        )
        .bind(country)
        .fetch_one(self.pool.as_ref())
        .await?
        .ok_or(StorageError::NotFound)?;

        u64::try_from(quantity).map_err(|e| StorageError::Other(e.into()))
    }

    async fn top_isps_by_country(&self, top: i64, country: &str) -> StorageResult<Vec<IspCount>> {
        let isps = sqlx::query_as::<_, IspCount>(
            r#"
            SELECT isp, COUNT(*) AS total
            FROM ip2location_px7
            WHERE country_name = ?
            GROUP BY isp
            ORDER BY total DESC, isp ASC
            LIMIT ?
            "#,
        )
        .bind(country)
        .bind(top)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(isps)
    }
}

#[async_trait]
impl StorageAdmin for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ip2location_px7 (
                ip_from INTEGER NOT NULL,
                ip_to INTEGER NOT NULL,
                proxy_type TEXT NOT NULL DEFAULT '-',
                country_code TEXT NOT NULL DEFAULT '-',
                country_name TEXT NOT NULL DEFAULT '-',
                region_name TEXT NOT NULL DEFAULT '-',
                city_name TEXT NOT NULL DEFAULT '-',
                isp TEXT NOT NULL DEFAULT '-',
                domain TEXT NOT NULL DEFAULT '-',
                usage_type TEXT NOT NULL DEFAULT '-',
                asn INTEGER NOT NULL DEFAULT 0,
                as_name TEXT NOT NULL DEFAULT '-',
                PRIMARY KEY (ip_from, ip_to)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_ip_to ON ip2location_px7(ip_to)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_country_name ON ip2location_px7(country_name)",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn insert_ranges(&self, ranges: &[AddressRange]) -> Result<u64> {
        ensure_well_formed(ranges)?;

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for range in ranges {
            let result = sqlx::query(
                r#"
                INSERT INTO ip2location_px7 (
                    ip_from, ip_to, proxy_type, country_code, country_name,
                    region_name, city_name, isp, domain, usage_type, asn, as_name
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT (ip_from, ip_to) DO NOTHING
                "#,
            )
            .bind(i64::from(range.from))
            .bind(i64::from(range.to))
            .bind(&range.proxy_type)
            .bind(&range.country.code)
            .bind(&range.country.name)
            .bind(&range.country.region)
            .bind(&range.country.city)
            .bind(&range.isp)
            .bind(&range.domain)
            .bind(&range.usage_type)
            .bind(range.asn)
            .bind(&range.as_organization)
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    fn into_storage(self: Arc<Self>) -> Arc<dyn Storage> {
        self
    }
}
