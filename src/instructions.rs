// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Console instructions for the remote consumer.
//!
//! Printed once to the operator's terminal after the tunnel is up. Nothing
//! here is sent over the network, and nothing here affects authorization.

use std::fmt::Write;

use crate::api::FILE_ROUTE;
use crate::auth::TOKEN_QUERY_PARAM;
use crate::config::KEYS_ENV;
use crate::credentials::CredentialPair;
use crate::mode::TrustMode;

/// Inputs for one instruction block.
#[derive(Debug, Clone, Copy)]
pub struct Retrieval<'a> {
    pub mode: TrustMode,
    /// Public base URL without trailing slash.
    pub public_url: &'a str,
    pub credentials: &'a CredentialPair,
    /// Suggested local file name for the download.
    pub file_name: &'a str,
}

/// Render the block for `retrieval.mode`.
pub fn render(retrieval: &Retrieval<'_>) -> String {
    let endpoint = format!("{}{FILE_ROUTE}", retrieval.public_url);
    let auth_key = &retrieval.credentials.authorization_key;
    let mut out = String::new();

    match retrieval.mode {
        TrustMode::UrlToken => {
            out.push_str("\nServing file successfully using least secure option.\n\n");
            out.push_str("To download elsewhere, use:\n\n");
            let _ = writeln!(out, "\t{endpoint}?{TOKEN_QUERY_PARAM}={auth_key}");
        }
        TrustMode::HeaderToken => {
            out.push_str(
                "\nServing file successfully. Note: plain text content is visible to the tunnel provider.\n\n",
            );
            out.push_str("To download elsewhere, run:\n\n");
            let _ = writeln!(
                out,
                "\tcurl -H \"Authorization: Bearer {auth_key}\" {endpoint} > \"{}\"",
                retrieval.file_name
            );
        }
        TrustMode::Encrypted => {
            let bin = env!("CARGO_PKG_NAME");
            out.push_str("\nServing file successfully. Content is encrypted.\n\n");
            out.push_str("To download elsewhere, run:\n\n");
            let _ = writeln!(
                out,
                "\t{KEYS_ENV}='{}' {bin} fetch {endpoint} > \"{}\"",
                retrieval.credentials, retrieval.file_name
            );
            let _ = writeln!(
                out,
                "\n\t(or pass the keys with --keys '<authorization_key>:<encryption_key>')"
            );
            out.push_str("\nManual recipe:\n\n");
            let _ = writeln!(
                out,
                "\t1. GET {endpoint} with header \"Authorization: Bearer <authorization_key>\""
            );
            out.push_str("\t2. base64-decode the body (standard alphabet, padded)\n");
            out.push_str(
                "\t3. layout: [version 0x01 (1 byte)][nonce (12 bytes)][ciphertext][tag (16 bytes)]\n",
            );
            out.push_str(
                "\t4. AES-256-GCM decrypt with key = base64url-decode(<encryption_key>), associated data = [0x01]\n",
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use ring::rand::SystemRandom;

    use super::*;

    fn render_for(mode: TrustMode, credentials: &CredentialPair) -> String {
        render(&Retrieval {
            mode,
            public_url: "https://brave-fox.loca.lt",
            credentials,
            file_name: "notes.txt",
        })
    }

    #[test]
    fn url_token_embeds_key_in_query() {
        let credentials = CredentialPair::generate(&SystemRandom::new()).unwrap();
        let text = render_for(TrustMode::UrlToken, &credentials);
        let expected = format!(
            "https://brave-fox.loca.lt/get?t={}",
            credentials.authorization_key
        );
        assert!(text.contains(&expected));
        assert!(!text.contains(&credentials.encryption_key.to_string()));
    }

    #[test]
    fn header_token_prints_curl_command() {
        let credentials = CredentialPair::generate(&SystemRandom::new()).unwrap();
        let text = render_for(TrustMode::HeaderToken, &credentials);
        let expected = format!(
            "curl -H \"Authorization: Bearer {}\" https://brave-fox.loca.lt/get > \"notes.txt\"",
            credentials.authorization_key
        );
        assert!(text.contains(&expected));
        assert!(!text.contains("?t="));
        assert!(!text.contains(&credentials.encryption_key.to_string()));
    }

    #[test]
    fn encrypted_prints_client_with_both_keys() {
        let credentials = CredentialPair::generate(&SystemRandom::new()).unwrap();
        let text = render_for(TrustMode::Encrypted, &credentials);
        assert!(text.contains(&format!("{KEYS_ENV}='{credentials}'")));
        assert!(text.contains("fetch https://brave-fox.loca.lt/get"));
        assert!(text.contains("AES-256-GCM"));
        assert!(!text.contains("?t="));
    }
}
