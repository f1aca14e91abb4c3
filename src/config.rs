use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub scraping: ScrapingConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    pub sheets: SheetsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapingConfig {
    pub request_timeout_seconds: u64,
    /// Base delay between profile visits; a 0-1s jitter is added on top.
    pub page_delay_ms: u64,
    pub max_directory_pages: u32,
    /// Consecutive directory-page failures tolerated before the crawl stops.
    pub max_consecutive_failures: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetsConfig {
    pub enabled: bool,
    pub sheet_id: String,
    pub service_account_json: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraping: ScrapingConfig {
                request_timeout_seconds: 30,
                page_delay_ms: 1500,
                max_directory_pages: 60,
                max_consecutive_failures: 2,
                user_agent: "Mozilla/5.0 (compatible; EcwBrokerScraper/1.0)".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "out".to_string(),
            },
            sheets: SheetsConfig {
                enabled: false,
                sheet_id: String::new(),
                service_account_json: "service-account.json".to_string(),
            },
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load the config file or fall back to defaults. A failure is reported as
/// a message for the caller to log once logging is up, rather than logged
/// here, since this runs before the subscriber is installed.
pub async fn load_config_or_default(path: &str) -> (Config, Option<String>) {
    match load_config(path).await {
        Ok(config) => (config, None),
        Err(e) => (
            Config::default(),
            Some(format!("Failed to load {}: {}. Using defaults.", path, e)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults_with_reason() {
        let (config, warning) = load_config_or_default("no-such-config.yml").await;
        assert_eq!(config.scraping.page_delay_ms, 1500);
        assert_eq!(config.logging.level, "info");
        let warning = warning.unwrap();
        assert!(warning.contains("no-such-config.yml"));
        assert!(warning.contains("Using defaults"));
    }

    #[tokio::test]
    async fn valid_file_loads_cleanly() {
        let dir = std::env::temp_dir().join("ecw-scraper-config-test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("config.yml");
        tokio::fs::write(
            &path,
            concat!(
                "scraping:\n",
                "  request_timeout_seconds: 10\n",
                "  page_delay_ms: 250\n",
                "  max_directory_pages: 5\n",
                "  max_consecutive_failures: 3\n",
                "  user_agent: test-agent\n",
                "logging:\n",
                "  level: debug\n",
                "output:\n",
                "  directory: out\n",
                "sheets:\n",
                "  enabled: false\n",
                "  sheet_id: \"\"\n",
                "  service_account_json: sa.json\n",
            ),
        )
        .await
        .unwrap();

        let (config, warning) = load_config_or_default(path.to_str().unwrap()).await;
        assert!(warning.is_none());
        assert_eq!(config.scraping.page_delay_ms, 250);
        assert_eq!(config.scraping.max_consecutive_failures, 3);
        assert_eq!(config.logging.level, "debug");
    }
}
