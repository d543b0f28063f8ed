// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::content::ServedContent;
use crate::credentials::CredentialPair;
use crate::mode::TrustMode;

/// Everything a request needs, fixed at startup.
#[derive(Debug)]
pub struct ServeContext {
    pub mode: TrustMode,
    pub credentials: CredentialPair,
    pub content: ServedContent,
}

/// Router state. Read-only, so requests share it without locking.
#[derive(Clone, Debug)]
pub struct AppState {
    context: Arc<ServeContext>,
}

impl AppState {
    pub fn new(context: ServeContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }

    pub fn mode(&self) -> TrustMode {
        self.context.mode
    }

    pub fn credentials(&self) -> &CredentialPair {
        &self.context.credentials
    }

    pub fn content(&self) -> &ServedContent {
        &self.context.content
    }
}
