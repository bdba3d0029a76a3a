// Storefront configuration, loaded with the 'config' crate and 'dotenv'

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://api.zapsell.ch/v1/marketplace/auto_eberhart";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_address: String,
    // Base of the remote listing API; `/car_lists/` is appended per request
    pub api_base_url: String,
    // Upper bound for a single listing API call
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Self::defaults()?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., APP_API_BASE_URL)
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("server_address", "127.0.0.1:3000")?
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("request_timeout_secs", 15)?
            .set_default("user_agent", concat!("storefront_rust/", env!("CARGO_PKG_VERSION")))?)
    }

    /// Endpoint for every listing call: paginated pages, the bulk dataset and single records.
    pub fn car_lists_url(&self) -> String {
        format!("{}/car_lists/", self.api_base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_hosted_marketplace() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server_address, "127.0.0.1:3000");
        assert_eq!(settings.request_timeout_secs, 15);
        assert_eq!(
            settings.car_lists_url(),
            "https://api.zapsell.ch/v1/marketplace/auto_eberhart/car_lists/"
        );
    }

    #[test]
    fn car_lists_url_tolerates_trailing_slash() {
        let settings = Settings {
            server_address: "127.0.0.1:0".into(),
            api_base_url: "http://localhost:9000/v1/".into(),
            request_timeout_secs: 1,
            user_agent: "test".into(),
        };
        assert_eq!(settings.car_lists_url(), "http://localhost:9000/v1/car_lists/");
    }
}
