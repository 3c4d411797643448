use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    Json,
};
use chrono::Local;
use serde_json::Value;
use tracing::info;

use crate::api::format::{documents_to_api_value, insert_ack_to_api_value};
use crate::app::AppState;
use crate::database::models::{NewPost, Post};
use crate::database::{FindQuery, StoreError};
use crate::error::ApiResult;
use crate::filter::{field_equals, object_id_filter};

use super::decode_body;

/// POST /posts - create a post stamped with the server's local time
pub async fn create_post(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<Value>> {
    let new_post: NewPost = decode_body(body)?;

    let document = bson::to_document(&Post::new(new_post, Local::now())).map_err(StoreError::from)?;
    let ack = state.posts().insert_one(document).await?;

    info!("Created post {}", ack.inserted_id);
    Ok(Json(insert_ack_to_api_value(&ack)))
}

/// GET /posts - every post
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    find_posts(&state, None).await
}

/// GET /posts/:pid
pub async fn get_post(State(state): State<AppState>, Path(pid): Path<String>) -> ApiResult<Json<Value>> {
    find_posts(&state, Some(&pid)).await
}

async fn find_posts(state: &AppState, pid: Option<&str>) -> ApiResult<Json<Value>> {
    let filter = object_id_filter(pid, state.id_policy())?;

    let documents = state.posts().find(FindQuery::new(filter)).await?;
    Ok(Json(documents_to_api_value(documents)))
}

/// GET /post/users/:uid - posts whose owner id is exactly `uid`
pub async fn posts_by_user(State(state): State<AppState>, Path(uid): Path<String>) -> ApiResult<Json<Value>> {
    let filter = field_equals(Post::USER_ID_FIELD, &uid);

    let documents = state.posts().find(FindQuery::new(filter)).await?;
    Ok(Json(documents_to_api_value(documents)))
}
