use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{auth::guard::CurrentUser, error::ApiError, state::AppState};

use super::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};
use super::repo::Post;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/:id",
            get(get_post).patch(update_post).delete(delete_post),
        )
}

/// Mutation of a post is restricted to its creator. Comparison is by user
/// id only.
fn assert_owner(owner_id: i64, requester_id: i64) -> Result<(), ApiError> {
    if owner_id != requester_id {
        warn!(owner_id, requester_id, "ownership check failed");
        return Err(ApiError::NotOwner);
    }
    Ok(())
}

#[instrument(skip(state, user, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let post = Post::create(&state.db, user.id, &payload.title, &payload.content).await?;
    Ok((
        StatusCode::CREATED,
        Json(PostResponse::with_author(post, &user)),
    ))
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = Post::list(&state.db).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No post with id : {id}")))?;
    Ok(Json(PostResponse::from(post)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let existing = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No post with id : {id}")))?;
    assert_owner(existing.user_id, user.id)?;

    let updated = Post::update(
        &state.db,
        id,
        payload.title.as_deref(),
        payload.content.as_deref(),
    )
    .await?;
    Ok(Json(PostResponse::with_author(updated, &user)))
}

#[instrument(skip(state, user))]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PostResponse>, ApiError> {
    let existing = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No post with id : {id}")))?;
    assert_owner(existing.user_id, user.id)?;

    Post::delete(&state.db, id).await?;
    Ok(Json(PostResponse::from(existing)))
}
