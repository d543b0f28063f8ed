// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{auth::Authorized, state::AppState};

/// Return the whole served content in one response.
///
/// The extractor has already rejected unauthorized requests with `401`.
pub async fn get_file(_auth: Authorized, State(state): State<AppState>) -> Response {
    let content = state.content();
    (
        StatusCode::OK,
        [(CONTENT_TYPE, content.representation().content_type())],
        content.body(),
    )
        .into_response()
}
