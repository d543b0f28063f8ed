// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Tunnel Publishing
//!
//! A [`TunnelProvider`] exposes the local listener under a public URL. The
//! server only consumes [`Tunnel::url`]; how bytes reach the listener is the
//! provider's business.
//!
//! - [`LocalTunnel`]: a localtunnel-compatible relay (the default).
//! - [`Direct`]: no tunnel; hands out the listener address itself.
//!
//! Opening a tunnel either succeeds once or fails once. Failure is fatal to
//! startup and never retried.

pub mod localtunnel;

use std::future::Future;
use std::net::SocketAddr;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

pub use localtunnel::LocalTunnel;

#[derive(Debug, thiserror::Error)]
pub enum TunnelError {
    #[error("tunnel could not be established: {0}")]
    Request(#[from] reqwest::Error),
    #[error("tunnel server answered with HTTP {0}")]
    Rejected(reqwest::StatusCode),
    #[error("invalid tunnel host {host}: {reason}")]
    InvalidHost { host: String, reason: String },
}

/// A published listener.
///
/// Relay workers (if any) run until [`Tunnel::close`] or until the shutdown
/// token passed to [`TunnelProvider::open`] is cancelled.
#[derive(Debug)]
pub struct Tunnel {
    url: String,
    workers: JoinSet<()>,
}

impl Tunnel {
    pub fn new(url: impl Into<String>, workers: JoinSet<()>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            workers,
        }
    }

    /// Public base URL, without trailing slash.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Abort any relay still running and wait for it to finish.
    pub async fn close(mut self) {
        self.workers.shutdown().await;
    }
}

pub trait TunnelProvider {
    /// Publish `local` and return the public URL.
    fn open(
        &self,
        local: SocketAddr,
        shutdown: CancellationToken,
    ) -> impl Future<Output = Result<Tunnel, TunnelError>> + Send;
}

/// Serve without a tunnel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

impl TunnelProvider for Direct {
    async fn open(&self, local: SocketAddr, _shutdown: CancellationToken) -> Result<Tunnel, TunnelError> {
        Ok(Tunnel::new(format!("http://{local}"), JoinSet::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn direct_uses_listener_address() {
        let local: SocketAddr = "127.0.0.1:5002".parse().unwrap();
        let tunnel = Direct.open(local, CancellationToken::new()).await.unwrap();
        assert_eq!(tunnel.url(), "http://127.0.0.1:5002");
        tunnel.close().await;
    }

    #[test]
    fn tunnel_url_drops_trailing_slash() {
        let tunnel = Tunnel::new("https://abc.loca.lt/", JoinSet::new());
        assert_eq!(tunnel.url(), "https://abc.loca.lt");
    }
}
