use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub api_server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl DatabaseConfig {
    const fn default_max_connections() -> u32 {
        10
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseBackend {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            "sqlite" => DatabaseBackend::Sqlite,
            other => {
                tracing::warn!(
                    "Unknown DATABASE_BACKEND '{other}', falling back to 'sqlite'. Supported values: sqlite, postgres"
                );
                DatabaseBackend::Sqlite
            }
        }
    }
}

impl Config {
    /// Load configuration from a `.env` file (if present) and the process
    /// environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("DATABASE_BACKEND")
            .map(|v| DatabaseBackend::parse(&v))
            .unwrap_or(DatabaseBackend::Sqlite);

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://./ipgeo.db?mode=rwc".to_string());

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse::<u32>().map_err(|e| {
                anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be a positive integer: {e}")
            })?,
            None => DatabaseConfig::default_max_connections(),
        };
        anyhow::ensure!(
            max_connections > 0,
            "DATABASE_MAX_CONNECTIONS must be greater than zero"
        );

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let api_port = lookup("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()?;

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
        })
    }
}
