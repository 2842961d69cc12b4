use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::info;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

const DEFAULT_SPOONACULAR_URL: &str = "https://api.spoonacular.com";

/// Process configuration, read once at start-up and handed to the services
/// that need it.
#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub spoonacular_api_key: String,
    pub spoonacular_base_url: String,
    pub upstream_timeout: Duration,
    pub search_max_results: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("db_path", &self.db_path)
            .field("jwt_secret", &"<redacted>")
            .field("spoonacular_api_key", &"<redacted>")
            .field("spoonacular_base_url", &self.spoonacular_base_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("search_max_results", &self.search_max_results)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let or_default = |key: &str, default: &str| {
            var(key).unwrap_or_else(|| {
                info!("{} not set, using default: {}", key, default);
                default.to_string()
            })
        };

        let jwt_secret = var("LADLE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("LADLE_JWT_SECRET is unset or still a placeholder");
        }

        let spoonacular_api_key = var("SPOONACULAR_API_KEY")
            .filter(|v| !v.is_empty())
            .context("SPOONACULAR_API_KEY is not set")?;

        let host: IpAddr = or_default("LADLE_HOST", "0.0.0.0")
            .parse()
            .context("LADLE_HOST is not a valid IP address")?;
        let port: u16 = or_default("LADLE_PORT", "5000")
            .parse()
            .context("LADLE_PORT is not a valid port")?;
        let addr = SocketAddr::new(host, port);

        let upstream_timeout_secs: u64 = or_default("LADLE_UPSTREAM_TIMEOUT_SECS", "10")
            .parse()
            .context("LADLE_UPSTREAM_TIMEOUT_SECS is not a number")?;

        let search_max_results: u32 = or_default("LADLE_SEARCH_MAX_RESULTS", "100")
            .parse()
            .context("LADLE_SEARCH_MAX_RESULTS is not a number")?;
        if search_max_results == 0 {
            bail!("LADLE_SEARCH_MAX_RESULTS must be at least 1");
        }

        Ok(Self {
            addr,
            db_path: or_default("LADLE_DB_PATH", "ladle.db").into(),
            jwt_secret,
            spoonacular_api_key,
            spoonacular_base_url: or_default("SPOONACULAR_BASE_URL", DEFAULT_SPOONACULAR_URL),
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            search_max_results,
        })
    }
}
