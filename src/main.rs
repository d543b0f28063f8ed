// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use secure_serve::cli::{Cli, Command, FetchArgs, ServeArgs};
use secure_serve::client::{Client, FetchError};
use secure_serve::config::{ServeConfig, TunnelConfig, LOG_FORMAT_ENV};
use secure_serve::error::StartupError;
use secure_serve::logging::{self, LogFormat};
use secure_serve::server::{shutdown_signal, Server};
use secure_serve::tunnel::{Direct, LocalTunnel, TunnelProvider};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(LogFormat::from_env_value(
        std::env::var(LOG_FORMAT_ENV).ok().as_deref(),
    ));

    let result = match cli.command {
        Command::Serve(args) => serve(args).await.map_err(|err| err.to_string()),
        Command::Fetch(args) => fetch(args).await.map_err(|err| err.to_string()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(args: ServeArgs) -> Result<(), StartupError> {
    let config = args.into_config();
    match config.tunnel.clone() {
        TunnelConfig::LocalTunnel { host, subdomain } => {
            let provider = LocalTunnel::new(&host, subdomain)?;
            publish(config, &provider).await
        }
        TunnelConfig::Disabled => publish(config, &Direct).await,
    }
}

async fn publish<P: TunnelProvider>(config: ServeConfig, provider: &P) -> Result<(), StartupError> {
    // Content must load before anything is bound.
    let bound = Server::prepare(config)?.bind().await?;

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    bound.run(provider, shutdown).await
}

#[derive(Debug, thiserror::Error)]
enum FetchCommandError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("could not write output: {0}")]
    Write(#[from] std::io::Error),
}

async fn fetch(args: FetchArgs) -> Result<(), FetchCommandError> {
    let plaintext = Client::new(args.keys)?.fetch(&args.url).await?;

    match args.output {
        Some(path) => std::fs::write(path, &plaintext)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&plaintext)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
