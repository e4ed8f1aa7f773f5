use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{AddressDetails, AddressSummary, CountryQuantity, IspCount};
use crate::service::{
    normalize_country, parse_count, AddressService, ListRequest, ServiceError, DEFAULT_TOP_ISPS,
};

pub struct AppState {
    pub service: AddressService,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
pub struct CountryQuery {
    #[serde(default)]
    pub country: String,
}

#[derive(Deserialize)]
pub struct TopIspQuery {
    #[serde(default)]
    pub country: String,
    /// Kept as text so a malformed value falls back to the default
    pub top: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Malformed addresses are the caller's fault; anything else is logged and
/// reported without storage details.
fn service_error(context: &str, err: ServiceError) -> ApiError {
    match err {
        ServiceError::NotIpv4(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        ServiceError::Storage(e) => {
            tracing::error!("{}: {:#}", context, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

/// Resolve a single address to the range that covers it
pub async fn get_address(
    State(state): State<Arc<AppState>>,
    Path(ip): Path<String>,
) -> Result<Json<AddressDetails>, ApiError> {
    match state.service.resolve_address(&ip).await {
        Ok(Some(range)) => Ok(Json(AddressDetails::new(&ip, range))),
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            "IP address not found",
        )),
        Err(e) => Err(service_error("Failed to get IP address", e)),
    }
}

/// List address ranges, optionally filtered by country
pub async fn list_addresses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let request = ListRequest::from_params(&params);

    let ranges = state
        .service
        .list_addresses(request.limit, request.filter)
        .await
        .map_err(|e| service_error("Failed to list IP addresses", e))?;

    if ranges.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body: Vec<AddressSummary> = ranges.into_iter().map(AddressSummary::from).collect();
    Ok(Json(body).into_response())
}

/// Count the addresses allocated to a country
pub async fn count_by_country(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CountryQuery>,
) -> Result<Json<CountryQuantity>, ApiError> {
    let quantity = state
        .service
        .count_by_country(&query.country)
        .await
        .map_err(|e| service_error("Failed to get IP quantity by country", e))?;

    Ok(Json(CountryQuantity {
        country: normalize_country(&query.country),
        quantity,
    }))
}

/// Rank the ISPs of a country by how many ranges they hold
pub async fn top_isps_by_country(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopIspQuery>,
) -> Result<Json<Vec<IspCount>>, ApiError> {
    let top = parse_count(query.top.as_deref(), DEFAULT_TOP_ISPS);

    let isps = state
        .service
        .top_isps_by_country(top, &query.country)
        .await
        .map_err(|e| service_error("Failed to get top ISPs", e))?;

    Ok(Json(isps))
}

/// Liveness probe
pub async fn ping() -> &'static str {
    "pong"
}
