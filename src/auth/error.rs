// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

/// Fixed body of every rejection. Nothing else is disclosed.
pub const UNAUTHORIZED_BODY: &str = "Unauthorized";

/// Why a request was turned away.
///
/// Every variant renders the same `401 Unauthorized` response; the variant
/// only feeds the diagnostic log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Neither a bearer header nor an accepted query token was presented
    MissingCredential,
    /// `Authorization` header present but not `Bearer <token>`
    MalformedAuthHeader,
    /// A credential was presented but does not match the authorization key
    InvalidCredential,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::MalformedAuthHeader => "malformed_auth_header",
            AuthError::InvalidCredential => "invalid_credential",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredential => write!(f, "No credential presented"),
            AuthError::MalformedAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidCredential => write!(f, "Credential does not match"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            UNAUTHORIZED_BODY,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn every_variant_returns_fixed_401() {
        for error in [
            AuthError::MissingCredential,
            AuthError::MalformedAuthHeader,
            AuthError::InvalidCredential,
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(body_bytes.as_ref(), UNAUTHORIZED_BODY.as_bytes());
        }
    }

    #[test]
    fn error_codes_are_distinct() {
        assert_eq!(AuthError::MissingCredential.error_code(), "missing_credential");
        assert_eq!(AuthError::MalformedAuthHeader.error_code(), "malformed_auth_header");
        assert_eq!(AuthError::InvalidCredential.error_code(), "invalid_credential");
    }
}
