use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRef, Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateBlogRequest, UpdateLikesRequest},
    repo_types::{Blog, BlogWithUser},
    services,
    stats::BlogStats,
};
use crate::{
    auth::{extractors::BearerToken, jwt::JwtKeys, services::authenticate},
    error::ApiError,
    state::AppState,
};

pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs).post(create_blog))
        .route("/blogs/stats", get(blog_stats))
        .route("/blogs/:id", put(update_likes).delete(delete_blog))
}

/// An id that does not parse cannot name a stored blog.
fn blog_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "unparseable blog id");
            Err(ApiError::NotFound("blog"))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_blogs(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogWithUser>>, ApiError> {
    let blogs = state.store.list_blogs().await?;
    Ok(Json(blogs))
}

// Body and path extraction may fail; those failures are only reported once
// the caller has been identified.
#[instrument(skip(state, token, payload))]
pub async fn create_blog(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    payload: Result<Json<CreateBlogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Blog>), ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let user = authenticate(state.store.as_ref(), &keys, token.as_deref()).await?;
    let Json(payload) = payload?;
    let blog = services::create_blog(state.store.as_ref(), &user, payload).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

#[instrument(skip(state, path, payload))]
pub async fn update_likes(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateLikesRequest>, JsonRejection>,
) -> Result<Json<Blog>, ApiError> {
    let id = blog_id(path)?;
    let Json(payload) = payload?;
    let blog = services::update_likes(state.store.as_ref(), id, payload).await?;
    Ok(Json(blog))
}

#[instrument(skip(state, token, path))]
pub async fn delete_blog(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let user = authenticate(state.store.as_ref(), &keys, token.as_deref()).await?;
    let id = blog_id(path)?;
    services::delete_blog(state.store.as_ref(), &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn blog_stats(
    State(state): State<AppState>,
) -> Result<Json<BlogStats<BlogWithUser>>, ApiError> {
    let stats = services::blog_stats(state.store.as_ref()).await?;
    Ok(Json(stats))
}
