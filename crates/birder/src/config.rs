// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration
//!
//! Settings are layered with the `config` crate, later sources overriding
//! earlier ones:
//! 1. Default values
//! 2. Configuration file (`config.json`)
//! 3. Environment-specific file (`config.{env}.json`)
//! 4. Environment variables with the `BIRDER__` prefix

use std::{collections::HashMap, fmt, path::Path, time::Duration};

use anyhow::{Result, ensure};
use config::{Config, ConfigError, Environment as ConfigEnv, File};
use serde::{Deserialize, Deserializer, Serialize, de};
use x_api::{
    CookieJar, XApiConfig,
    config::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT},
};

use crate::error::BirderResult;

/// Prefix of the environment variables read by [`BirderConfig::load`]
pub const ENV_PREFIX: &str = "BIRDER";

const ENV_SEPARATOR: &str = "__";
const ENVIRONMENT_VAR: &str = "BIRDER__ENVIRONMENT";

/// A validated request timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Create a new `TimeoutSeconds`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if timeout is 0 or greater than 300 seconds
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(seconds != 0, "timeout must be greater than 0");
        ensure!(seconds <= 300, "timeout cannot exceed 300");
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Create a safe default timeout (30 seconds)
    pub const fn default_value() -> Self {
        Self(Duration::from_secs(30))
    }

    /// Get the timeout value
    pub fn value(&self) -> Duration {
        self.0
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for TimeoutSeconds {
    fn default() -> Self {
        Self::default_value()
    }
}

/// A validated timeline page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSize(u32);

impl PageSize {
    /// Largest page the remote timelines serve
    pub const MAX: u32 = 100;

    /// Create a new `PageSize` in `1..=100`
    ///
    /// # Errors
    ///
    /// Returns an error if the size is 0 or above [`PageSize::MAX`]
    pub fn new(size: u32) -> Result<Self> {
        ensure!(size != 0, "page size must be greater than 0");
        ensure!(size <= Self::MAX, "page size cannot exceed {}", Self::MAX);
        Ok(Self(size))
    }

    /// Get the page size
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let size = u32::deserialize(deserializer)?;
        Self::new(size).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(x_api::endpoints::DEFAULT_LIKES_PAGE_SIZE)
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Development environment
    Development,
    /// Testing environment
    Testing,
}

impl Environment {
    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Production => "info",
            Environment::Development | Environment::Testing => "debug",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}

/// Bot runtime configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct BirderConfig {
    /// Environment type
    pub environment: Environment,
    /// Session cookies, as JSON or base64-encoded JSON
    pub cookies: String,
    /// GraphQL endpoint root
    pub base_url: String,
    /// Browser user agent sent with every request
    pub user_agent: String,
    /// Request timeout in seconds (validated range: 1-300)
    pub timeout_seconds: TimeoutSeconds,
    /// Page size for likes timelines (validated range: 1-100)
    pub likes_page_size: PageSize,
    /// Posts returned by `/likes` when no limit is given
    pub likes_limit: usize,
}

impl fmt::Debug for BirderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BirderConfig")
            .field("environment", &self.environment)
            .field("cookies", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("likes_page_size", &self.likes_page_size)
            .field("likes_limit", &self.likes_limit)
            .finish()
    }
}

impl BirderConfig {
    /// Load configuration from the working directory and the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), None)
    }

    /// Load configuration files from `dir`
    ///
    /// `vars` replaces the process environment when given.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load_from(
        dir: &Path,
        vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let environment = vars
            .as_ref()
            .map_or_else(
                || std::env::var(ENVIRONMENT_VAR).ok(),
                |vars| vars.get(ENVIRONMENT_VAR).cloned(),
            )
            .unwrap_or_else(|| Environment::Development.to_string())
            .to_lowercase();

        let config = Config::builder()
            .set_default("environment", "development")?
            .set_default("cookies", "")?
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("timeout_seconds", 30)?
            .set_default(
                "likes_page_size",
                i64::from(x_api::endpoints::DEFAULT_LIKES_PAGE_SIZE),
            )?
            .set_default("likes_limit", 20)?
            .add_source(File::from(dir.join("config.json")).required(false))
            .add_source(File::from(dir.join(format!("config.{environment}.json"))).required(false))
            .add_source(
                ConfigEnv::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(vars),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Settings for the X client
    ///
    /// # Errors
    ///
    /// Fails when the cookies cannot be decoded or the base URL is invalid.
    pub fn to_x_api_config(&self) -> BirderResult<XApiConfig> {
        let cookies = CookieJar::decode(&self.cookies)?;

        Ok(XApiConfig::new(cookies)
            .with_base_url(&self.base_url)?
            .with_user_agent(self.user_agent.clone())
            .with_timeout_seconds(self.timeout_seconds.value().as_secs()))
    }
}
