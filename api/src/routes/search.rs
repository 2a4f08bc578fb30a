use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use outreach_core::error::ApiError;

use crate::error::AppError;
use crate::services::web_search::{self, SearchMode};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/search", get(web_search))
        .route("/v1/search/articles", get(article_search))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Search terms
    pub q: Option<String>,
    /// Provider date restriction token, e.g. `m6` for the last six months
    #[serde(rename = "dateRestrict")]
    pub date_restrict: Option<String>,
}

/// Web search, raw provider payload
#[utoipa::path(
    get,
    path = "/v1/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search provider payload", body = serde_json::Value),
        (status = 400, description = "Missing query parameter", body = ApiError),
        (status = 502, description = "Search provider failure", body = ApiError)
    ),
    tag = "search"
)]
pub async fn web_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    run(&state, SearchMode::Web, query).await
}

/// Web search restricted to article sites
#[utoipa::path(
    get,
    path = "/v1/search/articles",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search provider payload", body = serde_json::Value),
        (status = 400, description = "Missing query parameter", body = ApiError),
        (status = 502, description = "Search provider failure", body = ApiError)
    ),
    tag = "search"
)]
pub async fn article_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    run(&state, SearchMode::Articles, query).await
}

async fn run(state: &AppState, mode: SearchMode, query: SearchQuery) -> Result<Json<Value>, AppError> {
    let results = web_search::search(
        state.search.as_ref(),
        mode,
        query.q.as_deref(),
        query.date_restrict.as_deref(),
    )
    .await?;
    Ok(Json(results))
}
