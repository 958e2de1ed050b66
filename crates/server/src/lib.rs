// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: Apache-2.0

//! HTTP intake for TCB-info documents.
//!
//! The route layer is the untrusted boundary: it turns wire bytes into the
//! structured records and hands them to `appraisal` for validation. A
//! document that fails any contract is rejected with the first violation's
//! description and must not be used for a trust decision by any caller.

#![warn(rust_2018_idioms, unused_lifetimes, unused_qualifications, clippy::all)]

use appraisal::{TcbInfo, TcbInfoVariant, Timestamp};

use axum::body::Bytes;
use axum::extract::TypedHeader;
use axum::headers::ContentType;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use tower_http::trace::{
    DefaultOnBodyChunk, DefaultOnEos, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse,
    TraceLayer,
};
use tower_http::LatencyUnit;
use tracing::{debug, warn, Level};

pub const DOCUMENT: &str = "application/json";

#[derive(Debug, Clone, Default)]
struct SpanMaker;

impl<B> tower_http::trace::MakeSpan<B> for SpanMaker {
    fn make_span(&mut self, request: &axum::http::request::Request<B>) -> tracing::span::Span {
        let reqid = uuid::Uuid::new_v4();
        tracing::span!(
            Level::INFO,
            "request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
            request_id = %reqid,
        )
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/validate", post(validate))
        .route("/", get(health))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(SpanMaker)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Micros),
                )
                .on_body_chunk(DefaultOnBodyChunk::new())
                .on_eos(
                    DefaultOnEos::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Micros),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Micros),
                ),
        )
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Receives a JSON TCB-info document.
/// Returns 200 with an empty body when every contract holds, or 400 carrying
/// the first violated contract.
async fn validate(
    TypedHeader(ct): TypedHeader<ContentType>,
    body: Bytes,
) -> Result<(), (StatusCode, String)> {
    match ct.to_string().as_ref() {
        DOCUMENT => (),
        other => {
            debug!("unsupported content type {other}");
            return Err((
                StatusCode::BAD_REQUEST,
                format!("unsupported content type {other}"),
            ));
        }
    }

    let tcb_info: TcbInfo = serde_json::from_slice(&body).map_err(|e| {
        debug!("malformed TCB info document: {e}");
        (
            StatusCode::BAD_REQUEST,
            format!("malformed TCB info document: {e}"),
        )
    })?;

    tcb_info.validate().map_err(|e| {
        debug!("rejected TCB info document: {e}");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    // Freshness is the caller's policy, not a validity contract.
    if let Some(TcbInfoVariant::Impl(info)) = &tcb_info.value {
        if let Some(next_update) = info.next_update.as_ref().and_then(Timestamp::to_datetime) {
            if next_update < Utc::now() {
                warn!("TCB info next_update {next_update} is in the past");
            }
        }
    }

    Ok(())
}
