//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;

use super::request::{AdjustmentApplyRequest, ComplianceApplyRequest, CreateRunRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/runs", post(create_run_handler))
        .route("/runs/:id", get(get_run_handler).delete(delete_run_handler))
        .route("/runs/:id/calculate", post(calculate_handler))
        .route("/runs/:id/approve", post(approve_handler))
        .route("/runs/:id/lock", post(lock_handler))
        .route("/runs/:id/unlock", post(unlock_handler))
        .route("/runs/:id/compliance/preview", get(compliance_preview_handler))
        .route("/runs/:id/compliance/apply", post(compliance_apply_handler))
        .route("/runs/:id/adjustments/apply", post(adjustments_apply_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, &api_error.error)
}

/// Maps an axum JSON rejection to the shared error envelope.
fn json_rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
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
            ApiError::malformed_json(format!("Invalid JSON syntax: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}

/// Handler for POST /runs.
async fn create_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_error(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        company_id = %request.company_id,
        "Creating pay run"
    );

    match state.engine().create_run(
        request.company_id,
        request.period_start,
        request.period_end,
    ) {
        Ok(run) => json_response(StatusCode::CREATED, &run),
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Handler for GET /runs/:id.
async fn get_run_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.engine().get_run(run_id) {
        Ok(run) => json_response(StatusCode::OK, &run),
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Handler for DELETE /runs/:id.
async fn delete_run_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, run_id = %run_id, "Deleting pay run");
    match state.engine().delete_run(run_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Handler for POST /runs/:id/calculate.
async fn calculate_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, run_id = %run_id, "Calculating pay run");
    match state.engine().calculate(run_id) {
        Ok(run) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %run_id,
                employees = run.items.len(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, &run)
        }
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Handler for POST /runs/:id/approve.
async fn approve_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.engine().approve_run(run_id) {
        Ok(run) => json_response(StatusCode::OK, &run),
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Handler for POST /runs/:id/lock.
async fn lock_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.engine().lock_run(run_id) {
        Ok(run) => json_response(StatusCode::OK, &run),
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Handler for POST /runs/:id/unlock.
async fn unlock_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.engine().unlock_run(run_id) {
        Ok(run) => json_response(StatusCode::OK, &run),
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Query parameters for the compliance preview endpoint.
#[derive(Debug, Deserialize)]
struct PreviewParams {
    /// The state whose professional tax slab table applies.
    state: String,
}

/// Handler for GET /runs/:id/compliance/preview.
async fn compliance_preview_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    Query(params): Query<PreviewParams>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        run_id = %run_id,
        state = %params.state,
        "Building compliance preview"
    );
    match state.engine().build_preview(run_id, &params.state) {
        Ok(preview) => json_response(StatusCode::OK, &preview),
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Handler for POST /runs/:id/compliance/apply.
async fn compliance_apply_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    payload: Result<Json<ComplianceApplyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_error(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        run_id = %run_id,
        state = %request.state,
        "Applying statutory compliance"
    );

    match state.engine().apply_compliance(run_id, &request.state) {
        Ok(run) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %run_id,
                status = %run.status,
                "Compliance applied successfully"
            );
            json_response(StatusCode::OK, &run)
        }
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Handler for POST /runs/:id/adjustments/apply.
async fn adjustments_apply_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    payload: Result<Json<AdjustmentApplyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_error(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, run_id = %run_id, "Merging adjustments");

    match state.engine().apply_adjustments(run_id, request.window) {
        Ok(run) => json_response(StatusCode::OK, &run),
        Err(error) => engine_error_response(correlation_id, error),
    }
}
