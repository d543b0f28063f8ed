// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AES-256-GCM sealing of the served file.
//!
//! ## Payload Format
//!
//! ```text
//! base64( [VERSION(1)][NONCE(12)][CIPHERTEXT(N)][TAG(16)] )
//! ```
//!
//! - `VERSION` is [`PAYLOAD_VERSION`] and is bound as associated data.
//! - `NONCE` is 96 random bits drawn once when the file is sealed. The key
//!   is fresh per process and seals exactly one message, so nonce reuse
//!   cannot occur.
//! - The outer encoding is standard padded base64 so the body is text-safe.
//!
//! Any client holding the encryption key can reverse this with a stock
//! AES-256-GCM implementation; [`open`] is the reference.

use base64ct::{Base64, Encoding};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::error::Unspecified;
use ring::rand::SecureRandom;

use crate::credentials::EncryptionKey;

/// Current payload layout version.
pub const PAYLOAD_VERSION: u8 = 1;

const HEADER_LEN: usize = 1 + NONCE_LEN;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("system random source unavailable")]
    RandomUnavailable,
    #[error("failed to seal content")]
    Seal,
    #[error("payload is not valid base64")]
    Encoding,
    #[error("payload is too short")]
    Truncated,
    #[error("unsupported payload version {0}")]
    UnsupportedVersion(u8),
    /// Wrong key or modified ciphertext.
    #[error("payload failed authentication")]
    Authentication,
}

fn aead_key(key: &EncryptionKey) -> Result<LessSafeKey, Unspecified> {
    UnboundKey::new(&AES_256_GCM, key.as_bytes()).map(LessSafeKey::new)
}

/// Encrypt `plaintext` and return the base64 payload.
pub fn seal(
    key: &EncryptionKey,
    plaintext: &[u8],
    rng: &dyn SecureRandom,
) -> Result<String, CipherError> {
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill(&mut nonce)
        .map_err(|_| CipherError::RandomUnavailable)?;

    let mut in_out = plaintext.to_vec();
    aead_key(key)
        .and_then(|sealing| {
            sealing.seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce),
                Aad::from([PAYLOAD_VERSION]),
                &mut in_out,
            )
        })
        .map_err(|_| CipherError::Seal)?;

    let mut payload = Vec::with_capacity(HEADER_LEN + in_out.len());
    payload.push(PAYLOAD_VERSION);
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&in_out);
    Ok(Base64::encode_string(&payload))
}

/// Decode and decrypt a payload produced by [`seal`].
pub fn open(key: &EncryptionKey, encoded: &str) -> Result<Vec<u8>, CipherError> {
    let mut payload = Base64::decode_vec(encoded.trim()).map_err(|_| CipherError::Encoding)?;
    if payload.len() < HEADER_LEN + AES_256_GCM.tag_len() {
        return Err(CipherError::Truncated);
    }
    if payload[0] != PAYLOAD_VERSION {
        return Err(CipherError::UnsupportedVersion(payload[0]));
    }

    let nonce = Nonce::try_assume_unique_for_key(&payload[1..HEADER_LEN])
        .map_err(|_| CipherError::Truncated)?;
    let ciphertext = &mut payload[HEADER_LEN..];
    let plaintext_len = aead_key(key)
        .and_then(|opening| opening.open_in_place(nonce, Aad::from([PAYLOAD_VERSION]), ciphertext))
        .map_err(|_| CipherError::Authentication)?
        .len();

    let mut plaintext = payload.split_off(HEADER_LEN);
    plaintext.truncate(plaintext_len);
    Ok(plaintext)
}
