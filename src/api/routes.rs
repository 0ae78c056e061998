use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::handlers::{
    get_token_holders, get_token_list, get_token_report, get_token_trades, health,
};
use super::state::AppState;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(24 * 60 * 60))
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.1.allowed_origins);

    Router::new()
        .route("/health", get(health))
        .route("/api/tokens", get(get_token_list))
        .route("/api/token/:token_id", get(get_token_report))
        .route("/api/token/:token_id/holders", get(get_token_holders))
        .route("/api/token/:token_id/trades", get(get_token_trades))
        .layer(cors)
        .with_state(state)
}
