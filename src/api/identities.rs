/// User identity API endpoints
use crate::{
    error::{IdentityError, IdentityResult},
    identity::{IdentitiesResult, ResolvedIdentity},
    AppContext,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::Query;
use serde::Deserialize;

/// GET /v1/users/identities/:sub
///
/// Display identity of one subject, 404 with an empty body when unknown
pub async fn get_identity(
    State(ctx): State<AppContext>,
    Path(sub): Path<String>,
) -> IdentityResult<Response> {
    match ctx.identity_service.get_identity(&sub).await? {
        Some(identity) => Ok(Json(identity).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// Query of GET /v1/users/identities
#[derive(Debug, Deserialize)]
pub struct GetIdentitiesParams {
    /// Either repeated (`subs=a&subs=b`) or comma-separated (`subs=a,b`)
    #[serde(default)]
    pub subs: Vec<String>,
}

impl GetIdentitiesParams {
    /// Requested subjects in request order, list elements trimmed and
    /// empty ones dropped
    pub fn subjects(&self) -> Vec<&str> {
        self.subs
            .iter()
            .flat_map(|s| s.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// GET /v1/users/identities?subs=a,b
///
/// Display identities of several subjects with per-subject errors
pub async fn get_identities(
    State(ctx): State<AppContext>,
    Query(params): Query<GetIdentitiesParams>,
) -> IdentityResult<Json<IdentitiesResult>> {
    let subs = params.subjects();
    if subs.is_empty() {
        return Err(IdentityError::Validation("subs cannot be empty".to_string()));
    }

    let result = ctx.identity_service.get_identities(subs.as_slice()).await?;

    Ok(Json(result))
}

/// PUT /v1/users/identities/:sub
///
/// Store the id token of a subject, the body is the raw token payload
pub async fn save_identity(
    State(ctx): State<AppContext>,
    Path(sub): Path<String>,
    idtoken: String,
) -> IdentityResult<Json<ResolvedIdentity>> {
    let identity = ctx.identity_service.save(&sub, &idtoken).await?;

    Ok(Json(identity))
}

/// Build identity API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/v1/users/identities", get(get_identities))
        .route(
            "/v1/users/identities/:sub",
            get(get_identity).put(save_identity),
        )
}
