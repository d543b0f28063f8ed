// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! secure-serve - share one file over a public tunnel
//!
//! Exposes exactly one local file to one remote consumer, gated by a bearer
//! key minted at startup. By default the content is AES-256-GCM encrypted
//! with a second key so the tunnel provider never sees plaintext.
//!
//! ## Modules
//!
//! - `credentials` - per-process authorization and encryption keys
//! - `mode` - trust mode selection
//! - `content` - file loading and the encryption transform
//! - `auth` - bearer / query-token authorization (Axum extractor)
//! - `api` - the single `GET /get` route
//! - `tunnel` - public URL publishing (localtunnel)
//! - `instructions` - retrieval instructions for the operator
//! - `client` - companion client that downloads and decrypts
//! - `server` - startup and shutdown lifecycle

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod content;
pub mod credentials;
pub mod error;
pub mod instructions;
pub mod logging;
pub mod mode;
pub mod server;
pub mod state;
pub mod tunnel;
