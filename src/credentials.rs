// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Credential Generation
//!
//! Every process mints one [`CredentialPair`] at startup:
//!
//! - an **authorization key**, a UUID built from 128 bits of system
//!   randomness, presented as a bearer token (or `?t=` in URL-token mode);
//! - an **encryption key**, 256 bits of system randomness rendered as
//!   URL-safe unpadded base64, used only in encrypted mode.
//!
//! Both live in memory for the lifetime of the process and are never
//! persisted. `Debug` output is redacted so they cannot leak into logs.
//! The textual pair form `auth:enc` is what the companion client consumes.

use std::fmt;
use std::str::FromStr;

use base64ct::{Base64UrlUnpadded, Encoding};
use ring::rand::SecureRandom;
use subtle::ConstantTimeEq;

/// Length of the AES-256 key in bytes.
pub const ENCRYPTION_KEY_LEN: usize = 32;

/// Separator used in the `auth:enc` textual form.
const PAIR_SEPARATOR: char = ':';

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("system random source unavailable")]
    RandomUnavailable,
    #[error("expected key pair in the form <authorization_key>:<encryption_key>")]
    MalformedPair,
    #[error("authorization key is empty")]
    EmptyAuthorizationKey,
    #[error("encryption key must be 32 bytes of URL-safe base64")]
    InvalidEncryptionKey,
}

/// Bearer credential required to retrieve the file.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationKey(String);

impl AuthorizationKey {
    pub fn generate(rng: &dyn SecureRandom) -> Result<Self, CredentialError> {
        let mut bytes = [0u8; 16];
        rng.fill(&mut bytes)
            .map_err(|_| CredentialError::RandomUnavailable)?;
        let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
        Ok(Self(id.hyphenated().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison against a presented credential.
    ///
    /// Runs in time independent of where the first mismatching byte is.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl FromStr for AuthorizationKey {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CredentialError::EmptyAuthorizationKey);
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for AuthorizationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AuthorizationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthorizationKey(<redacted>)")
    }
}

/// Symmetric key for the encrypted content representation.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; ENCRYPTION_KEY_LEN]);

impl EncryptionKey {
    pub fn generate(rng: &dyn SecureRandom) -> Result<Self, CredentialError> {
        let mut bytes = [0u8; ENCRYPTION_KEY_LEN];
        rng.fill(&mut bytes)
            .map_err(|_| CredentialError::RandomUnavailable)?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; ENCRYPTION_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ENCRYPTION_KEY_LEN] {
        &self.0
    }
}

impl FromStr for EncryptionKey {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded =
            Base64UrlUnpadded::decode_vec(s).map_err(|_| CredentialError::InvalidEncryptionKey)?;
        let bytes: [u8; ENCRYPTION_KEY_LEN] = decoded
            .try_into()
            .map_err(|_| CredentialError::InvalidEncryptionKey)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Base64UrlUnpadded::encode_string(&self.0))
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// The two keys minted for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub authorization_key: AuthorizationKey,
    pub encryption_key: EncryptionKey,
}

impl CredentialPair {
    /// Draw both keys independently from `rng`.
    ///
    /// A failing random source is fatal; there is no retry.
    pub fn generate(rng: &dyn SecureRandom) -> Result<Self, CredentialError> {
        Ok(Self {
            authorization_key: AuthorizationKey::generate(rng)?,
            encryption_key: EncryptionKey::generate(rng)?,
        })
    }
}

/// Renders as `auth:enc`.
impl fmt::Display for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{PAIR_SEPARATOR}{}",
            self.authorization_key, self.encryption_key
        )
    }
}

impl FromStr for CredentialPair {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (auth, enc) = s
            .trim()
            .split_once(PAIR_SEPARATOR)
            .ok_or(CredentialError::MalformedPair)?;
        Ok(Self {
            authorization_key: auth.parse()?,
            encryption_key: enc.parse()?,
        })
    }
}
