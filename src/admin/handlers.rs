use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;
use crate::load_balancer::{AddOutcome, Backend, RemoveOutcome, RouteEntry};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub groups: usize,
}

/// Body of `POST /admin/upstreams`.
#[derive(Debug, Deserialize, Serialize)]
pub struct AddUpstream {
    pub url_prefix: String,
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `DELETE /admin/upstreams`.
#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveUpstream {
    pub url_prefix: String,
    pub address: String,
}

#[derive(Serialize)]
struct AddResponse {
    outcome: AddOutcome,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        groups: state.gateway.registry().len(),
    })
}

pub async fn get_routes(State(state): State<AdminState>) -> Json<Vec<RouteEntry>> {
    Json(state.gateway.registry().routes())
}

pub async fn add_upstream(
    State(state): State<AdminState>,
    Json(req): Json<AddUpstream>,
) -> Response {
    let backend = match Backend::new(req.address, req.url_prefix, req.name) {
        Ok(b) => b,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let outcome = state.gateway.add(backend).await;
    let status = match outcome {
        AddOutcome::CreatedGroup => StatusCode::CREATED,
        AddOutcome::JoinedGroup => StatusCode::OK,
        AddOutcome::Unreachable => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(AddResponse { outcome })).into_response()
}

pub async fn remove_upstream(
    State(state): State<AdminState>,
    Json(req): Json<RemoveUpstream>,
) -> (StatusCode, Json<RemoveOutcome>) {
    let outcome = state
        .gateway
        .registry()
        .remove_address(&req.url_prefix, &req.address);
    let status = match outcome {
        RemoveOutcome::Removed { .. } | RemoveOutcome::GroupDeleted => StatusCode::OK,
        RemoveOutcome::UnknownPrefix | RemoveOutcome::UnknownAddress => StatusCode::NOT_FOUND,
    };
    (status, Json(outcome))
}
