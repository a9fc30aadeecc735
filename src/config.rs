//! Server configuration
//!
//! Every option can be given on the command line or through a
//! `BB_WEBHOOKS_*` environment variable; the command line wins.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::{Parser, ValueEnum};

use crate::error::{Error, Result};

/// Default request body limit (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Paths taken by the status endpoints.
pub const RESERVED_PATHS: [&str; 3] = ["/health", "/status", "/metrics"];

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Bitbucket webhook receiver
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "bb-webhooks")]
#[command(version)]
#[command(about = "Receive Bitbucket Cloud webhooks and dispatch them by event key")]
pub struct ServerConfig {
    /// Host to bind to
    #[arg(short = 'H', long, env = "BB_WEBHOOKS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "BB_WEBHOOKS_PORT", default_value_t = 3001)]
    pub port: u16,

    /// Path the webhook endpoint is mounted on
    #[arg(long, env = "BB_WEBHOOKS_PATH", default_value = "/webhooks")]
    pub path: String,

    /// Largest accepted request body in bytes
    #[arg(long, env = "BB_WEBHOOKS_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Log output format
    #[arg(long, env = "BB_WEBHOOKS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            path: "/webhooks".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_format: LogFormat::Text,
            verbose: false,
        }
    }
}

impl ServerConfig {
    /// Check the configuration before binding anything.
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(Error::config(format!(
                "webhook path must start with '/': {}",
                self.path
            )));
        }
        if RESERVED_PATHS.contains(&self.path.as_str()) {
            return Err(Error::config(format!(
                "webhook path {} is taken by the status endpoints",
                self.path
            )));
        }
        if self.max_body_bytes == 0 {
            return Err(Error::config("max body size must be greater than zero"));
        }
        self.socket_addr()?;
        Ok(())
    }

    /// The address to bind. `localhost` resolves to the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|e| Error::config(format!("invalid host '{}': {}", self.host, e)))?
        };
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Default `tracing` filter directive for this configuration.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
