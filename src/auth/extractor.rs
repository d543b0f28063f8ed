// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor gating the file route.
//!
//! ```rust,ignore
//! async fn get_file(_auth: Authorized, State(state): State<AppState>) -> Response {
//!     // only reached with a valid credential
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use super::authorizer::{authorize, CredentialSource};
use super::AuthError;
use crate::state::AppState;

/// Proof that the request carried the authorization key.
///
/// Rejects with [`AuthError`], which always renders as `401 Unauthorized`.
#[derive(Debug, Clone, Copy)]
pub struct Authorized(pub CredentialSource);

impl FromRequestParts<AppState> for Authorized {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let outcome = authorize(
            &parts.headers,
            parts.uri.query(),
            state.mode(),
            &state.credentials().authorization_key,
        );

        match outcome {
            Ok(source) => Ok(Authorized(source)),
            Err(err) => {
                debug!(error_code = err.error_code(), "request rejected");
                Err(err)
            }
        }
    }
}
