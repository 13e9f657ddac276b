// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Compiled-in access-token secret, valid only in development mode.
const DEV_ACCESS_SECRET: &str = "merit-dev-access-secret-do-not-deploy";
/// Compiled-in refresh-token secret, valid only in development mode.
const DEV_REFRESH_SECRET: &str = "merit-dev-refresh-secret-do-not-deploy";

// =============================================================================
// ApiConfig
// =============================================================================

/// Configuration for the API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host address.
    pub host: IpAddr,
    /// Server port.
    pub port: u16,
    /// Development mode. Compiled-in token secrets are accepted only
    /// when this is set.
    pub development: bool,
    /// Token configuration.
    pub auth: AuthConfig,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Request timeout.
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// Graceful shutdown timeout.
    #[serde(with = "duration_secs")]
    pub shutdown_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            development: false,
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from defaults plus environment
    /// overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(host) = env_parse("MERIT_HOST") {
            config.host = host;
        }
        if let Some(port) = env_parse("MERIT_PORT") {
            config.port = port;
        }
        if let Ok(dev) = std::env::var("MERIT_DEV") {
            config.development = matches!(dev.as_str(), "1" | "true" | "yes");
        }
        config.auth.apply_env();

        config
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables development mode.
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Validates the configuration, refusing default or missing token
    /// secrets outside development mode.
    pub fn validate(&self) -> ApiResult<()> {
        self.auth.validate(self.development)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

// =============================================================================
// AuthConfig
// =============================================================================

/// Token issuance configuration.
///
/// Access and refresh secrets MUST differ; a leaked refresh token must
/// never verify as an access token. The compiled-in defaults exist so
/// a development checkout runs with zero setup, and are rejected at
/// startup everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Secret signing access tokens.
    #[serde(skip_serializing)]
    pub access_secret: String,
    /// Secret signing refresh tokens.
    #[serde(skip_serializing)]
    pub refresh_secret: String,
    /// Access-token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh-token lifetime in seconds.
    pub refresh_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: DEV_ACCESS_SECRET.to_string(),
            refresh_secret: DEV_REFRESH_SECRET.to_string(),
            access_ttl_secs: 86_400,       // 24 hours
            refresh_ttl_secs: 7 * 86_400,  // 7 days
        }
    }
}

impl AuthConfig {
    /// Applies `MERIT_ACCESS_SECRET` / `MERIT_REFRESH_SECRET`
    /// environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(secret) = std::env::var("MERIT_ACCESS_SECRET") {
            self.access_secret = secret;
        }
        if let Ok(secret) = std::env::var("MERIT_REFRESH_SECRET") {
            self.refresh_secret = secret;
        }
    }

    /// Validates the secrets.
    ///
    /// Outside development mode, startup fails fast on a missing or
    /// compiled-in secret instead of silently falling back.
    pub fn validate(&self, development: bool) -> ApiResult<()> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(ApiError::internal("token secrets are not configured"));
        }

        if self.access_secret == self.refresh_secret {
            return Err(ApiError::internal(
                "access and refresh secrets must differ",
            ));
        }

        let uses_default = self.access_secret == DEV_ACCESS_SECRET
            || self.refresh_secret == DEV_REFRESH_SECRET;
        if uses_default && !development {
            return Err(ApiError::internal(
                "refusing to start with development token secrets; \
                 set MERIT_ACCESS_SECRET and MERIT_REFRESH_SECRET",
            ));
        }

        if self.access_secret.len() < 32 || self.refresh_secret.len() < 32 {
            tracing::warn!("token secret is shorter than recommended (32 bytes)");
        }

        Ok(())
    }
}

// =============================================================================
// CorsConfig
// =============================================================================

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. `*` allows any origin.
    pub allowed_origins: Vec<String>,
    /// Allowed methods.
    pub allowed_methods: Vec<String>,
    /// Max age for preflight cache (seconds).
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            max_age: 3600,
        }
    }
}

// =============================================================================
// duration_secs module for Duration
// =============================================================================

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// =============================================================================
// Tests
// =============================================================================
