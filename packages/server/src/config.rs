//! Server configuration from command-line flags and `DENGON_*` environment variables.

use std::{net::SocketAddr, path::PathBuf};

use clap::{Parser, ValueEnum};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("endpoint '{endpoint}' has no {network} address")]
    NoAddressForNetwork { endpoint: String, network: Network },
}

/// Network family of the raw-stream listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Network {
    /// IPv4 or IPv6, whichever the endpoint resolves to first
    Tcp,
    Tcp4,
    Tcp6,
}

impl Network {
    fn accepts(&self, addr: &SocketAddr) -> bool {
        match self {
            Network::Tcp => true,
            Network::Tcp4 => addr.is_ipv4(),
            Network::Tcp6 => addr.is_ipv6(),
        }
    }

    fn unspecified_host(&self) -> &'static str {
        match self {
            Network::Tcp | Network::Tcp4 => "0.0.0.0",
            Network::Tcp6 => "[::]",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Network::Tcp => "tcp",
            Network::Tcp4 => "tcp4",
            Network::Tcp6 => "tcp6",
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "dengon-server")]
#[command(about = "Line-oriented channel relay server", long_about = None)]
pub struct Config {
    /// Raw TCP service endpoint; ":port" listens on every interface
    #[arg(short = 'e', long, env = "DENGON_ENDPOINT", default_value = ":3000")]
    pub endpoint: String,

    /// Network protocol of the raw listener
    #[arg(short = 'n', long, env = "DENGON_NETWORK", value_enum, default_value_t = Network::Tcp)]
    pub network: Network,

    /// Address of the HTTP / WebSocket bridge
    #[arg(short = 'l', long, env = "DENGON_LISTEN_ADDRESS", default_value = "127.0.0.1:8080")]
    pub listen_address: SocketAddr,

    /// Directory served as static files by the HTTP bridge
    #[arg(long, env = "DENGON_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Start the raw TCP listener at boot instead of waiting for `serverTcpOn`
    #[arg(
        long,
        env = "DENGON_TCP_ON_START",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub tcp_on_start: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'd', long, env = "DENGON_DEBUG")]
    pub debug: bool,
}

impl Config {
    pub fn log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

/// Settings of the raw TCP listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpListenerConfig {
    pub endpoint: String,
    pub network: Network,
}

impl TcpListenerConfig {
    pub fn new(endpoint: impl Into<String>, network: Network) -> Self {
        Self {
            endpoint: endpoint.into(),
            network,
        }
    }

    /// Resolve the endpoint to the first address of the configured family.
    pub async fn resolve(&self) -> Result<SocketAddr, ConfigError> {
        let host_port = if self.endpoint.starts_with(':') {
            format!("{}{}", self.network.unspecified_host(), self.endpoint)
        } else {
            self.endpoint.clone()
        };

        let addrs = tokio::net::lookup_host(&host_port).await.map_err(|source| {
            ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                source,
            }
        })?;

        addrs
            .into_iter()
            .find(|addr| self.network.accepts(addr))
            .ok_or_else(|| ConfigError::NoAddressForNetwork {
                endpoint: self.endpoint.clone(),
                network: self.network,
            })
    }
}

impl From<&Config> for TcpListenerConfig {
    fn from(config: &Config) -> Self {
        Self::new(config.endpoint.clone(), config.network)
    }
}
