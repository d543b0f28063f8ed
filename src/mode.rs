// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Trust mode selection.
//!
//! The trust mode decides how a consumer presents the authorization key and
//! whether the tunnel provider can read the served bytes.
//!
//! | Mode | Query `?t=` accepted | Content |
//! |------|----------------------|---------|
//! | [`TrustMode::UrlToken`] | yes | plaintext |
//! | [`TrustMode::HeaderToken`] | no | plaintext |
//! | [`TrustMode::Encrypted`] | no | AES-256-GCM, base64 |

use std::fmt;

/// The selected combination of credential channel and confidentiality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrustMode {
    /// Key may travel in the URL. Least secure.
    UrlToken,
    /// Key must travel in an `Authorization: Bearer` header.
    HeaderToken,
    /// Header auth plus encrypted content.
    #[default]
    Encrypted,
}

impl TrustMode {
    /// Resolve the operator's flags. `url_token` wins over
    /// `header_auth_only`; neither selects [`TrustMode::Encrypted`].
    pub fn resolve(url_token: bool, header_auth_only: bool) -> Self {
        if url_token {
            TrustMode::UrlToken
        } else if header_auth_only {
            TrustMode::HeaderToken
        } else {
            TrustMode::Encrypted
        }
    }

    /// Whether the `t` query parameter is checked by the authorizer.
    pub fn accepts_query_token(self) -> bool {
        matches!(self, TrustMode::UrlToken)
    }

    /// Whether the content transform encrypts the file at startup.
    pub fn encrypts_content(self) -> bool {
        matches!(self, TrustMode::Encrypted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrustMode::UrlToken => "url-token",
            TrustMode::HeaderToken => "header-token",
            TrustMode::Encrypted => "encrypted",
        }
    }
}

impl fmt::Display for TrustMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
