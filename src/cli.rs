// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Command line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    ServeConfig, TunnelConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TUNNEL_HOST, HOST_ENV, KEYS_ENV,
    PORT_ENV, TUNNEL_HOST_ENV,
};
use crate::credentials::CredentialPair;
use crate::mode::TrustMode;

/// Share one file over a public tunnel behind a single-use key.
#[derive(Debug, Parser)]
#[command(name = "secure-serve", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve a file until interrupted
    Serve(ServeArgs),
    /// Download and decrypt a file served in encrypted mode
    Fetch(FetchArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// File to share
    pub file: PathBuf,

    /// Port number to serve through on localhost
    #[arg(short, long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind the local listener to
    #[arg(long, env = HOST_ENV, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Allow passing the authorization key via ?t=... (least secure, plaintext)
    #[arg(short = 'u', long)]
    pub url_token: bool,

    /// Require the bearer header but serve plaintext
    #[arg(short = 'a', long = "auth-token")]
    pub header_auth_only: bool,

    /// localtunnel-compatible server to publish through
    #[arg(long, env = TUNNEL_HOST_ENV, default_value = DEFAULT_TUNNEL_HOST)]
    pub tunnel_host: String,

    /// Ask the tunnel server for a specific subdomain
    #[arg(long)]
    pub subdomain: Option<String>,

    /// Do not publish; print instructions for the local address.
    /// Any tunnel host (flag or env) is ignored.
    #[arg(long, conflicts_with = "subdomain")]
    pub no_tunnel: bool,
}

impl ServeArgs {
    pub fn into_config(self) -> ServeConfig {
        let mode = TrustMode::resolve(self.url_token, self.header_auth_only);
        let tunnel = if self.no_tunnel {
            TunnelConfig::Disabled
        } else {
            TunnelConfig::LocalTunnel {
                host: self.tunnel_host,
                subdomain: self.subdomain,
            }
        };
        ServeConfig::new(self.file, mode)
            .with_host(self.host)
            .with_port(self.port)
            .with_tunnel(tunnel)
    }
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Full URL of the served file, including the /get path
    pub url: String,

    /// Key pair as <authorization_key>:<encryption_key>
    #[arg(long, env = KEYS_ENV, hide_env_values = true)]
    pub keys: CredentialPair,

    /// Write the decrypted file here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("secure-serve").chain(args.iter().copied())).unwrap()
    }

    fn serve_config(args: &[&str]) -> ServeConfig {
        match parse(args).command {
            Command::Serve(args) => args.into_config(),
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults_to_encrypted() {
        let config = serve_config(&["serve", "notes.txt"]);
        assert_eq!(config.mode, TrustMode::Encrypted);
        assert_eq!(config.file, PathBuf::from("notes.txt"));
        assert!(matches!(config.tunnel, TunnelConfig::LocalTunnel { .. }));
    }

    #[test]
    fn serve_mode_flags() {
        assert_eq!(serve_config(&["serve", "f", "-u"]).mode, TrustMode::UrlToken);
        assert_eq!(serve_config(&["serve", "f", "-a"]).mode, TrustMode::HeaderToken);
        assert_eq!(serve_config(&["serve", "f", "-u", "-a"]).mode, TrustMode::UrlToken);
    }

    #[test]
    fn serve_port_and_tunnel_options() {
        let config = serve_config(&["serve", "f", "--port", "8000", "--no-tunnel"]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.tunnel, TunnelConfig::Disabled);

        let config = serve_config(&["serve", "f", "--subdomain", "share"]);
        assert_eq!(
            config.tunnel,
            TunnelConfig::LocalTunnel {
                host: DEFAULT_TUNNEL_HOST.to_string(),
                subdomain: Some("share".to_string())
            }
        );
    }

    #[test]
    fn no_tunnel_ignores_tunnel_host() {
        let config = serve_config(&[
            "serve",
            "f",
            "--tunnel-host",
            "https://lt.example",
            "--no-tunnel",
        ]);
        assert_eq!(config.tunnel, TunnelConfig::Disabled);
    }

    #[test]
    fn no_tunnel_conflicts_with_subdomain() {
        let result = Cli::try_parse_from([
            "secure-serve",
            "serve",
            "f",
            "--subdomain",
            "share",
            "--no-tunnel",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_requires_file() {
        assert!(Cli::try_parse_from(["secure-serve", "serve"]).is_err());
    }

    #[test]
    fn fetch_parses_key_pair() {
        let keys = "abc:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        match parse(&["fetch", "https://x.loca.lt/get", "--keys", keys]).command {
            Command::Fetch(args) => {
                assert_eq!(args.url, "https://x.loca.lt/get");
                assert_eq!(args.keys.authorization_key.as_str(), "abc");
                assert!(args.output.is_none());
            }
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn fetch_rejects_malformed_keys() {
        let result = Cli::try_parse_from([
            "secure-serve",
            "fetch",
            "https://x.loca.lt/get",
            "--keys",
            "missing-separator",
        ]);
        assert!(result.is_err());
    }
}
