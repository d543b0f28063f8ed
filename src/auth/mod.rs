// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Single-secret bearer authorization for the file route.
//!
//! ## Flow
//!
//! 1. The consumer sends `Authorization: Bearer <authorization key>`, or in
//!    URL-token mode `GET /get?t=<authorization key>`
//! 2. The [`Authorized`] extractor:
//!    - parses the header against a case-insensitive `Bearer <token>` pattern
//!    - falls back to the `t` query parameter when the mode allows it
//!    - compares candidates to the key in constant time
//! 3. Any failure becomes `401` with the body `Unauthorized`
//!
//! ## Security
//!
//! - No rate limiting or lockout; the key space makes guessing impractical
//! - Presented credentials are never logged

pub mod authorizer;
pub mod error;
pub mod extractor;

pub use authorizer::{authorize, CredentialSource, TOKEN_QUERY_PARAM};
pub use error::AuthError;
pub use extractor::Authorized;
