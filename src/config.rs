use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the perfume catalog CSV file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Read the catalog once at startup instead of on every request
    #[serde(default)]
    pub catalog_preload: bool,

    /// Redis connection URL; sessions are kept in memory when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Lifetime of a questionnaire session in seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "luxury_perfumes.csv".to_string()
}

fn default_session_ttl_secs() -> u64 {
    3600
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.session_ttl_secs == 0 {
            anyhow::bail!("Failed to load config: SESSION_TTL_SECS must be greater than zero");
        }

        Ok(config)
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
