//! HTTP request handlers for the Bill Split Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{allocate, build_expense_payload, recalculate_totals, RecalculationInput};
use crate::models::BillSnapshot;

use super::request::AllocationRequest;
use super::response::{AllocationResponse, ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/allocate", post(allocate_handler))
        .route("/recalculate", post(recalculate_handler))
        .route("/expense-payload", post(expense_payload_handler))
        .with_state(state)
}

/// Handler for POST /allocate.
///
/// Splits the bill across its people and returns the per-person breakdown
/// together with the reconciliation report.
async fn allocate_handler(
    State(state): State<AppState>,
    payload: Result<Json<AllocationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing allocation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let snapshot: BillSnapshot = request.into();
    if let Err(err) = snapshot.validate() {
        warn!(correlation_id = %correlation_id, error = %err, "Bill rejected");
        return error_response(err.into());
    }

    let config = state.config();
    let start_time = Instant::now();
    let result = allocate(&snapshot, config.amount_parser());
    let duration = start_time.elapsed();

    info!(
        correlation_id = %correlation_id,
        people_count = snapshot.people.len(),
        items_count = snapshot.items.len(),
        status = %result.reconciliation.status,
        all_items_total = %result.all_items_total,
        duration_us = duration.as_micros(),
        "Allocation completed successfully"
    );

    json_response(
        StatusCode::OK,
        AllocationResponse {
            calculation_id: correlation_id,
            timestamp: Utc::now(),
            engine_version: config.engine().version.clone(),
            result,
        },
    )
}

/// Handler for POST /recalculate.
///
/// Derives the tax amount and grand total from user-edited bill-level fields.
async fn recalculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecalculationInput>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing recalculation request");

    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let totals = recalculate_totals(&input, state.config().amount_parser());
    info!(
        correlation_id = %correlation_id,
        tax_amount = %totals.tax_amount,
        total = %totals.total,
        "Recalculation completed successfully"
    );

    json_response(StatusCode::OK, totals)
}

/// Handler for POST /expense-payload.
///
/// Builds the expense payload for a bill. The bill must be balanced.
async fn expense_payload_handler(
    State(state): State<AppState>,
    payload: Result<Json<AllocationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing expense payload request");

    let mut request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let receipt_path = request.receipt_path.take();
    let snapshot: BillSnapshot = request.into();
    if let Err(err) = snapshot.validate() {
        warn!(correlation_id = %correlation_id, error = %err, "Bill rejected");
        return error_response(err.into());
    }

    let parser = state.config().amount_parser();
    let allocation = allocate(&snapshot, parser);
    match build_expense_payload(&snapshot, &allocation, receipt_path.as_deref(), parser) {
        Ok(expense) => {
            info!(
                correlation_id = %correlation_id,
                participants = expense.participants.len(),
                total = %expense.total,
                "Expense payload built successfully"
            );
            json_response(StatusCode::OK, expense)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Expense payload refused"
            );
            error_response(err.into())
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    json_response(api_error.status, api_error.error)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}
