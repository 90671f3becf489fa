//! Service configuration
//!
//! Layered: optional `config/default` and `config/local` files, then
//! `FATIGUE__SECTION__KEY` environment variables.

use std::net::SocketAddr;

use advisor::AdvisorConfig;
use data_validator::ValidationConfig;
use fallback::FallbackConfig;
use fatigue_analysis::RiskPolicy;
use report::ReportConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::rate_limit::RateLimitConfig;

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),
    #[error("Invalid risk policy: {0}")]
    Policy(#[from] fatigue_analysis::PolicyError),
    #[error("Rate limit requires per_second > 0 and burst_size > 0")]
    RateLimit,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub advisor: AdvisorConfig,
    pub report: ReportConfig,
    pub policy: RiskPolicy,
    pub validation: ValidationConfig,
    pub fallback: FallbackConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("FATIGUE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load from an inline TOML document with key overrides
    pub fn load_from_str(toml: &str, overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.socket_addr()?;
        self.policy.validate()?;
        if self.rate_limit.enabled && (self.rate_limit.per_second == 0 || self.rate_limit.burst_size == 0) {
            return Err(ConfigValidationError::RateLimit);
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|_| ConfigValidationError::InvalidAddress(addr))
    }
}
