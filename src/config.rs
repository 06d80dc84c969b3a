use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDb API key
    pub omdb_api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Location of the favorites collection file
    #[serde(default = "default_favorites_path")]
    pub favorites_path: PathBuf,

    /// Upper bound on a single provider search call, in seconds
    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_favorites_path() -> PathBuf {
    PathBuf::from("data/favorites.json")
}

fn default_search_timeout_secs() -> u64 {
    10
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
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.omdb_api_key.trim().is_empty() {
            anyhow::bail!("Failed to load config: OMDB_API_KEY must not be empty");
        }
        if self.search_timeout_secs == 0 {
            anyhow::bail!("Failed to load config: SEARCH_TIMEOUT_SECS must be positive");
        }
        Ok(())
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter::<_, Config>(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_pairs(&[("OMDB_API_KEY", "abc123")]).unwrap();

        assert_eq!(config.omdb_api_key, "abc123");
        assert_eq!(config.omdb_api_url, "https://www.omdbapi.com");
        assert_eq!(config.favorites_path, PathBuf::from("data/favorites.json"));
        assert_eq!(config.search_timeout(), Duration::from_secs(10));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_fails() {
        assert!(from_pairs(&[("PORT", "8080")]).is_err());
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let config = from_pairs(&[("OMDB_API_KEY", "   ")]).unwrap();
        assert!(config.validate().is_err());
    }
}
