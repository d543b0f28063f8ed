// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! localtunnel client.
//!
//! ## Protocol
//!
//! 1. `GET <host>/?new` (or `GET <host>/<subdomain>`) returns an assignment:
//!    `{"id", "port", "max_conn_count", "url"}`.
//! 2. The client keeps up to `max_conn_count` TCP sockets open to
//!    `<host>:<port>`. The server forwards each public HTTP connection down
//!    one of them.
//! 3. When a relay socket receives data, the client connects to the local
//!    listener and copies bytes both ways until either side closes, then
//!    opens a fresh relay socket.
//!
//! Relay sockets that are merely idle are dropped on shutdown; relays already
//! carrying a request run to completion so the response can drain.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use tokio::io;
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::{Tunnel, TunnelError, TunnelProvider};

/// Cap on relay sockets, whatever the server offers.
const MAX_RELAYS: usize = 10;

/// Pause before re-opening a relay socket that failed to connect.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Tunnel assignment returned by the server.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub id: String,
    pub port: u16,
    #[serde(default)]
    pub max_conn_count: Option<usize>,
    pub url: String,
}

impl Assignment {
    fn relay_count(&self) -> usize {
        self.max_conn_count.unwrap_or(1).clamp(1, MAX_RELAYS)
    }
}

/// localtunnel-compatible tunnel provider.
#[derive(Debug, Clone)]
pub struct LocalTunnel {
    host: Url,
    subdomain: Option<String>,
    client: reqwest::Client,
}

impl LocalTunnel {
    pub fn new(host: &str, subdomain: Option<String>) -> Result<Self, TunnelError> {
        let invalid = |reason: String| TunnelError::InvalidHost {
            host: host.to_string(),
            reason,
        };
        let host = Url::parse(host).map_err(|e| invalid(e.to_string()))?;
        if host.host_str().is_none() {
            return Err(invalid("missing host name".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            host,
            subdomain,
            client,
        })
    }

    /// URL of the assignment request.
    pub fn assignment_url(&self) -> Url {
        let mut url = self.host.clone();
        match &self.subdomain {
            Some(subdomain) => url.set_path(subdomain),
            None => {
                url.set_path("/");
                url.set_query(Some("new"));
            }
        }
        url
    }

    async fn request_assignment(&self) -> Result<Assignment, TunnelError> {
        let response = self.client.get(self.assignment_url()).send().await?;
        if !response.status().is_success() {
            return Err(TunnelError::Rejected(response.status()));
        }
        Ok(response.json::<Assignment>().await?)
    }
}

impl TunnelProvider for LocalTunnel {
    async fn open(&self, local: SocketAddr, shutdown: CancellationToken) -> Result<Tunnel, TunnelError> {
        let assignment = self.request_assignment().await?;
        let remote_host = self
            .host
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| TunnelError::InvalidHost {
                host: self.host.to_string(),
                reason: "missing host name".to_string(),
            })?;

        info!(
            id = %assignment.id,
            relays = assignment.relay_count(),
            "tunnel assigned"
        );

        let mut workers = JoinSet::new();
        for _ in 0..assignment.relay_count() {
            workers.spawn(relay_loop(
                remote_host.clone(),
                assignment.port,
                local,
                shutdown.clone(),
            ));
        }

        Ok(Tunnel::new(assignment.url, workers))
    }
}

/// Keep one relay socket alive until shutdown.
async fn relay_loop(remote_host: String, remote_port: u16, local: SocketAddr, shutdown: CancellationToken) {
    while !shutdown.is_cancelled() {
        let remote = tokio::select! {
            _ = shutdown.cancelled() => return,
            result = TcpStream::connect((remote_host.as_str(), remote_port)) => result,
        };

        let outcome = match remote {
            Ok(remote) => relay_once(remote, local, &shutdown).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(Some((to_local, to_remote))) => {
                debug!(to_local, to_remote, "relay closed");
            }
            Ok(None) => return,
            Err(err) => {
                warn!(error = %err, "tunnel relay failed");
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                }
            }
        }
    }
}

/// Wait for traffic on `remote`, then pipe it to the local listener.
///
/// Returns `Ok(None)` when shutdown arrives before any traffic.
async fn relay_once(
    mut remote: TcpStream,
    local: SocketAddr,
    shutdown: &CancellationToken,
) -> io::Result<Option<(u64, u64)>> {
    tokio::select! {
        _ = shutdown.cancelled() => return Ok(None),
        ready = remote.readable() => ready?,
    }

    let mut local = TcpStream::connect(local).await?;
    let copied = io::copy_bidirectional(&mut remote, &mut local).await?;
    Ok(Some(copied))
}
