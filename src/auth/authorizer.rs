// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential extraction and matching.
//!
//! Candidates are tried in order:
//!
//! 1. `Authorization: Bearer <token>` (scheme matched case-insensitively,
//!    exactly one space, token taken verbatim).
//! 2. The `t` query parameter, in URL-token mode only.
//!
//! The first candidate equal to the authorization key authorizes the request.
//! A malformed or wrong header does not block a valid query token.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use url::form_urlencoded;

use super::AuthError;
use crate::credentials::AuthorizationKey;
use crate::mode::TrustMode;

/// Query parameter carrying the key in URL-token mode.
pub const TOKEN_QUERY_PARAM: &str = "t";

/// Includes the single separating space.
const BEARER_PREFIX: &str = "Bearer ";

/// Where the matching credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Header,
    Query,
}

/// Header token, if the header has the `Bearer <token>` shape.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::MalformedAuthHeader)?;

    match value.split_at_checked(BEARER_PREFIX.len()) {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) && !token.is_empty() => {
            Ok(Some(token))
        }
        _ => Err(AuthError::MalformedAuthHeader),
    }
}

/// The `t` parameter. Repeated or empty values count as absent.
fn query_token(query: &str) -> Option<String> {
    let mut values = form_urlencoded::parse(query.as_bytes())
        .filter(|(name, _)| name == TOKEN_QUERY_PARAM)
        .map(|(_, value)| value);

    let first = values.next()?;
    if values.next().is_some() || first.is_empty() {
        return None;
    }
    Some(first.into_owned())
}

/// Decide a single request.
pub fn authorize(
    headers: &HeaderMap,
    query: Option<&str>,
    mode: TrustMode,
    key: &AuthorizationKey,
) -> Result<CredentialSource, AuthError> {
    let header = bearer_token(headers);
    if let Ok(Some(token)) = header {
        if key.matches(token) {
            return Ok(CredentialSource::Header);
        }
    }

    let query_candidate = if mode.accepts_query_token() {
        query.and_then(query_token)
    } else {
        None
    };
    if let Some(token) = &query_candidate {
        if key.matches(token) {
            return Ok(CredentialSource::Query);
        }
    }

    Err(match (header, query_candidate) {
        (Err(err), None) => err,
        (Ok(None), None) => AuthError::MissingCredential,
        _ => AuthError::InvalidCredential,
    })
}
