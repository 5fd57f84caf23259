//! Geolocation API Server
//!
//! HTTP JSON API over the persisted records: create through the
//! enrichment pipeline, plus list, show, and delete.

use crate::application::{CreateOutcome, GeolocationService};
use crate::domain::ports::StoreError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Creation request body: `{"geolocation": {"address": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGeolocationRequest {
    pub geolocation: GeolocationParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeolocationParams {
    pub address: String,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// API server state.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<GeolocationService>,
}

/// HTTP API server for geolocation records.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, service: Arc<GeolocationService>) -> Self {
        Self {
            listen_addr,
            state: ApiState { service },
        }
    }

    /// Build the router. Exposed so integration tests can drive the API
    /// in-process without binding a socket.
    pub fn router(&self) -> Router {
        Router::new()
            // Health endpoint
            .route("/health", get(health_handler))
            // Record collection
            .route(
                "/api/v1/geolocations",
                get(list_handler).post(create_handler),
            )
            // Single record
            .route(
                "/api/v1/geolocations/:id",
                get(show_handler).delete(delete_handler),
            )
            .fallback(unknown_route_handler)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the API server.
    ///
    /// The final Ok(()) is excluded from coverage since axum::serve runs forever.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let app = self.router();

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("geolocation API listening on {}", self.listen_addr);

        axum::serve(listener, app).await?;
        Ok(())
    }
}

// Handler functions

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_handler(State(state): State<ApiState>) -> Response {
    match state.service.list().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn show_handler(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found_response();
    };

    match state.service.get(id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => not_found_response(),
        Err(e) => internal_error(e),
    }
}

async fn create_handler(
    State(state): State<ApiState>,
    payload: Result<Json<CreateGeolocationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request_response(&rejection),
    };

    match state.service.create(&request.geolocation.address).await {
        Ok(CreateOutcome::Created(record)) => {
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Ok(CreateOutcome::Invalid(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "errors": errors })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

async fn delete_handler(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found_response();
    };

    match state.service.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found_response(),
        Err(e) => internal_error(e),
    }
}

async fn unknown_route_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Api endpoint does not exist"
        })),
    )
        .into_response()
}

// Non-numeric ids fall out as not-found, same as unknown numeric ids
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Object not found"
        })),
    )
        .into_response()
}

fn bad_request_response(rejection: &JsonRejection) -> Response {
    let message = match rejection {
        JsonRejection::JsonDataError(_) => "Input parameters does not include all required data",
        _ => "Parse error of input parameters",
    };

    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn internal_error(e: StoreError) -> Response {
    tracing::error!("storage failure: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": "Internal server error"
        })),
    )
        .into_response()
}
