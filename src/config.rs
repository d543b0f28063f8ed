// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the resolved [`ServeConfig`].
//! Command line flags take precedence; each flag falls back to the
//! environment variable listed here.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SECURE_SERVE_PORT` | Local listener port | `5002` |
//! | `SECURE_SERVE_HOST` | Local bind address | `127.0.0.1` |
//! | `SECURE_SERVE_TUNNEL_HOST` | Tunnel server base URL | `https://localtunnel.me` |
//! | `SECURE_SERVE_KEYS` | `auth:enc` key pair for `fetch` | none |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=info` |

use std::path::PathBuf;

use crate::mode::TrustMode;

/// Environment variable name for the local listener port.
pub const PORT_ENV: &str = "SECURE_SERVE_PORT";

/// Environment variable name for the local bind address.
pub const HOST_ENV: &str = "SECURE_SERVE_HOST";

/// Environment variable name for the tunnel server.
pub const TUNNEL_HOST_ENV: &str = "SECURE_SERVE_TUNNEL_HOST";

/// Environment variable holding the `auth:enc` pair for the companion client.
pub const KEYS_ENV: &str = "SECURE_SERVE_KEYS";

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_PORT: u16 = 5002;

/// Only the tunnel relay needs to reach the listener.
pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const DEFAULT_TUNNEL_HOST: &str = "https://localtunnel.me";

pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

/// How the local listener is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunnelConfig {
    /// Publish through a localtunnel-compatible server.
    LocalTunnel {
        host: String,
        subdomain: Option<String>,
    },
    /// Do not publish; the local listener address is handed out as-is.
    Disabled,
}

/// Fully resolved configuration for one `serve` invocation.
///
/// Built once from the command line and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// The single file to expose.
    pub file: PathBuf,
    pub host: String,
    /// `0` asks the OS for an ephemeral port.
    pub port: u16,
    pub mode: TrustMode,
    pub tunnel: TunnelConfig,
}

impl ServeConfig {
    pub fn new(file: impl Into<PathBuf>, mode: TrustMode) -> Self {
        Self {
            file: file.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            mode,
            tunnel: TunnelConfig::LocalTunnel {
                host: DEFAULT_TUNNEL_HOST.to_string(),
                subdomain: None,
            },
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_tunnel(mut self, tunnel: TunnelConfig) -> Self {
        self.tunnel = tunnel;
        self
    }

    /// File name shown in the download instructions.
    pub fn display_name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download".to_string())
    }
}
