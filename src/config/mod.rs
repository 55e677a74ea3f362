pub mod toml_config;

pub use toml_config::ClientConfig;

#[cfg(feature = "cli")]
use crate::core::DeliveryPolicy;
#[cfg(feature = "cli")]
use crate::utils::error::{FetchError, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "popsolar")]
#[command(about = "Fetch population and solar-resource data")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Override population.base_url")]
    pub population_base_url: Option<String>,

    #[arg(long, help = "Override solar.endpoint")]
    pub solar_endpoint: Option<String>,

    #[arg(long, help = "Override http.timeout_seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Report every failure instead of only logging it")]
    pub strict: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Today's and tomorrow's population for a country
    Population { country: String },
    /// Annual and monthly solar resource averages
    Solar {
        #[arg(long = "param", value_parser = parse_key_value, help = "Extra query parameter, key=value")]
        params: Vec<(String, String)>,
    },
}

#[cfg(feature = "cli")]
fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got {:?}", raw)),
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the file named by `--config` (or defaults) and applies the flag
    /// overrides on top.
    pub fn resolve(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path).map_err(|e| match e {
                FetchError::IoError(io) => FetchError::ConfigError {
                    message: format!("cannot read {}: {}", path, io),
                },
                other => other,
            })?,
            None => ClientConfig::default(),
        };

        if let Some(base_url) = &self.population_base_url {
            config.population.base_url = base_url.clone();
        }
        if let Some(endpoint) = &self.solar_endpoint {
            config.solar.endpoint = Some(endpoint.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            config.http.timeout_seconds = timeout;
        }
        if self.strict {
            config.delivery.policy = DeliveryPolicy::Strict;
        }

        Ok(config)
    }
}
