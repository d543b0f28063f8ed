// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Serving Lifecycle
//!
//! ```text
//! Server::prepare   credentials → load + transform content
//!        │
//! Server::bind      local listener (nothing bound if prepare failed)
//!        │
//! BoundServer::run  spawn HTTP server → open tunnel → print instructions
//!                   → wait for shutdown → drain in-flight → close tunnel
//! ```
//!
//! Every step before serving is fatal on failure. Shutdown is driven by a
//! `CancellationToken`: the listener stops accepting, in-flight responses
//! complete, then the tunnel relays are torn down.

use std::future::IntoFuture;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use ring::rand::SystemRandom;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::router;
use crate::config::ServeConfig;
use crate::content::ServedContent;
use crate::credentials::CredentialPair;
use crate::error::StartupError;
use crate::instructions::{self, Retrieval};
use crate::state::{AppState, ServeContext};
use crate::tunnel::TunnelProvider;

/// Credentials minted and content loaded; nothing bound yet.
#[derive(Debug)]
pub struct Server {
    config: ServeConfig,
    state: AppState,
}

impl Server {
    pub fn prepare(config: ServeConfig) -> Result<Self, StartupError> {
        let rng = SystemRandom::new();
        let credentials = CredentialPair::generate(&rng)?;
        let content =
            ServedContent::load(&config.file, config.mode, &credentials.encryption_key, &rng)?;

        info!(
            file = %config.file.display(),
            mode = %config.mode,
            bytes = content.body().len(),
            "content loaded"
        );

        let state = AppState::new(ServeContext {
            mode: config.mode,
            credentials,
            content,
        });
        Ok(Self { config, state })
    }

    pub fn credentials(&self) -> &CredentialPair {
        self.state.credentials()
    }

    pub async fn bind(self) -> Result<BoundServer, StartupError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| StartupError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| StartupError::Bind { addr, source })?;

        info!(%local_addr, "listening");
        Ok(BoundServer {
            config: self.config,
            state: self.state,
            listener,
            local_addr,
        })
    }
}

/// Listener bound, not yet published.
#[derive(Debug)]
pub struct BoundServer {
    config: ServeConfig,
    state: AppState,
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl BoundServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn credentials(&self) -> &CredentialPair {
        self.state.credentials()
    }

    /// Serve until `shutdown` is cancelled.
    ///
    /// Fails without retry if the tunnel cannot be opened.
    pub async fn run<P: TunnelProvider>(
        self,
        provider: &P,
        shutdown: CancellationToken,
    ) -> Result<(), StartupError> {
        let app = router(self.state.clone());
        let server = tokio::spawn(
            axum::serve(self.listener, app)
                .with_graceful_shutdown(shutdown.clone().cancelled_owned())
                .into_future(),
        );

        let tunnel = match provider
            .open(relay_target(self.local_addr), shutdown.clone())
            .await
        {
            Ok(tunnel) => tunnel,
            Err(err) => {
                shutdown.cancel();
                let _ = server.await;
                return Err(err.into());
            }
        };
        info!(url = %tunnel.url(), "published");

        let file_name = self.config.display_name();
        println!(
            "{}",
            instructions::render(&Retrieval {
                mode: self.state.mode(),
                public_url: tunnel.url(),
                credentials: self.state.credentials(),
                file_name: &file_name,
            })
        );

        let served = server.await;
        tunnel.close().await;
        info!("server stopped");

        match served {
            Ok(result) => result.map_err(StartupError::Serve),
            Err(join) => Err(StartupError::Serve(io::Error::other(join))),
        }
    }
}

/// Address the tunnel relays should dial.
fn relay_target(local: SocketAddr) -> SocketAddr {
    match local {
        SocketAddr::V4(v4) if v4.ip().is_unspecified() => {
            SocketAddr::new(Ipv4Addr::LOCALHOST.into(), v4.port())
        }
        SocketAddr::V6(v6) if v6.ip().is_unspecified() => {
            SocketAddr::new(Ipv6Addr::LOCALHOST.into(), v6.port())
        }
        other => other,
    }
}

/// Cancel `token` on Ctrl-C or SIGTERM.
pub async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = token.cancelled() => return,
    }

    info!("shutdown signal received, draining in-flight requests");
    token.cancel();
}
