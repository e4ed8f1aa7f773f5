use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::service::AddressService;
use crate::storage::Storage;

use super::handlers::{
    count_by_country, get_address, list_addresses, ping, top_isps_by_country, AppState,
};

pub fn create_api_router(storage: Arc<dyn Storage>) -> Router {
    let state = Arc::new(AppState {
        service: AddressService::new(storage),
    });

    // Static segments win over `{ip}`, so `quantity` never reaches get_address
    Router::new()
        .route("/ping", get(ping))
        .route("/v1/ips", get(list_addresses))
        .route("/v1/ips/quantity", get(count_by_country))
        .route("/v1/ips/isps/top", get(top_isps_by_country))
        .route("/v1/ips/{ip}", get(get_address))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
