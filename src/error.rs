// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::io;

use crate::content::ContentError;
use crate::credentials::CredentialError;
use crate::tunnel::TunnelError;

/// Anything that stops the process before or while serving.
///
/// None of these are retried; `main` prints them to stderr and exits
/// non-zero.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("could not generate credentials: {0}")]
    Credentials(#[from] CredentialError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Tunnel(#[from] TunnelError),
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn content_errors_keep_their_message() {
        let err = StartupError::from(ContentError::Empty {
            path: PathBuf::from("notes.txt"),
        });
        assert_eq!(
            err.to_string(),
            "file content was empty or file did not exist: notes.txt"
        );
    }

    #[test]
    fn bind_error_names_address() {
        let err = StartupError::Bind {
            addr: "127.0.0.1:5002".into(),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(err.to_string().starts_with("could not bind 127.0.0.1:5002"));
    }
}
