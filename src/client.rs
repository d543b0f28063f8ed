// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Companion client for encrypted mode.
//!
//! Performs the bearer-authenticated GET, then reverses the content
//! transform with the encryption key. Decryption happens only here, on the
//! consumer's machine.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use crate::content::cipher::{self, CipherError};
use crate::credentials::CredentialPair;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server rejected the authorization key")]
    Unauthorized,
    #[error("server answered with HTTP {0}")]
    Status(StatusCode),
    #[error("could not decrypt content: {0}")]
    Decrypt(#[from] CipherError),
}

/// Client holding both keys for one share.
#[derive(Debug, Clone)]
pub struct Client {
    credentials: CredentialPair,
    http: reqwest::Client,
}

impl Client {
    pub fn new(credentials: CredentialPair) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { credentials, http })
    }

    /// Download `url` and return the decrypted file bytes.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.credentials.authorization_key)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => return Err(FetchError::Unauthorized),
            status => return Err(FetchError::Status(status)),
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "encrypted payload received");
        Ok(cipher::open(&self.credentials.encryption_key, &body)?)
    }
}
