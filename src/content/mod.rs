// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Served Content
//!
//! The file is read exactly once at startup and transformed according to the
//! trust mode:
//!
//! - URL-token and header-token modes serve the raw bytes.
//! - Encrypted mode serves the base64 AES-256-GCM payload from [`cipher`].
//!
//! The result is immutable for the rest of the process and shared by every
//! request without copying.

pub mod cipher;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use ring::rand::SecureRandom;
use tracing::debug;

use crate::credentials::EncryptionKey;
use crate::mode::TrustMode;

pub use cipher::CipherError;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("file content was empty or file did not exist: {}", .path.display())]
    Empty { path: PathBuf },
    #[error("could not encrypt content: {0}")]
    Encrypt(#[from] CipherError),
}

/// How the served bytes relate to the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Plaintext,
    EncryptedBase64,
}

impl Representation {
    pub fn content_type(self) -> &'static str {
        match self {
            Representation::Plaintext => "application/octet-stream",
            Representation::EncryptedBase64 => "text/plain; charset=utf-8",
        }
    }
}

/// The response body, fixed at startup.
#[derive(Debug, Clone)]
pub struct ServedContent {
    body: Bytes,
    representation: Representation,
}

impl ServedContent {
    /// Read `path` and apply the transform selected by `mode`.
    ///
    /// An unreadable or empty file is rejected before anything is served.
    pub fn load(
        path: &Path,
        mode: TrustMode,
        key: &EncryptionKey,
        rng: &dyn SecureRandom,
    ) -> Result<Self, ContentError> {
        let raw = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ContentError::Empty {
                path: path.to_path_buf(),
            },
            _ => ContentError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        if raw.is_empty() {
            return Err(ContentError::Empty {
                path: path.to_path_buf(),
            });
        }
        Self::from_bytes(raw, mode, key, rng)
    }

    /// Apply the transform to bytes already in memory.
    pub fn from_bytes(
        raw: Vec<u8>,
        mode: TrustMode,
        key: &EncryptionKey,
        rng: &dyn SecureRandom,
    ) -> Result<Self, ContentError> {
        if raw.is_empty() {
            return Err(ContentError::Empty {
                path: PathBuf::new(),
            });
        }

        let content = if mode.encrypts_content() {
            let sealed = cipher::seal(key, &raw, rng)?;
            Self {
                body: Bytes::from(sealed),
                representation: Representation::EncryptedBase64,
            }
        } else {
            Self {
                body: Bytes::from(raw),
                representation: Representation::Plaintext,
            }
        };

        debug!(
            mode = %mode,
            bytes = content.body.len(),
            "content prepared"
        );
        Ok(content)
    }

    /// Cheap handle to the body; clones share the same allocation.
    pub fn body(&self) -> Bytes {
        self.body.clone()
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }
}
