use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::error::ApiError;
use super::state::AppState;
use crate::services::report::{build_holders_page, build_token_list, build_token_report};
use crate::types::models::{HolderRowsPage, TokenList, TokenReport};

#[derive(Deserialize)]
pub struct HoldersParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct TokensParams {
    pub search: Option<String>,
}

// Ids are interpolated into upstream paths.
fn validate_token_id(token_id: &str) -> Result<(), ApiError> {
    let valid = !token_id.is_empty()
        && token_id.len() <= 64
        && token_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Invalid token id: {}", token_id)))
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn get_token_list(
    State((client, _config)): State<AppState>,
    params: Result<Query<TokensParams>, QueryRejection>,
) -> Result<Json<TokenList>, ApiError> {
    let Query(params) = params?;
    let list = build_token_list(&client, params.search.as_deref()).await?;
    Ok(Json(list))
}

pub async fn get_token_report(
    State((client, config)): State<AppState>,
    Path(token_id): Path<String>,
) -> Result<Json<TokenReport>, ApiError> {
    validate_token_id(&token_id)?;
    let report = build_token_report(&client, &config, &token_id).await?;
    Ok(Json(report))
}

pub async fn get_token_holders(
    State((client, config)): State<AppState>,
    Path(token_id): Path<String>,
    params: Result<Query<HoldersParams>, QueryRejection>,
) -> Result<Json<HolderRowsPage>, ApiError> {
    validate_token_id(&token_id)?;
    let Query(params) = params?;
    let page = build_holders_page(
        &client,
        &token_id,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(config.holders_page_size),
    )
    .await?;
    Ok(Json(page))
}

pub async fn get_token_trades(
    State((client, _config)): State<AppState>,
    Path(token_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    validate_token_id(&token_id)?;
    let trades = client.fetch_trades(&token_id).await?;
    Ok(Json(trades))
}
