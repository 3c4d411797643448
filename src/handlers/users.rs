use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::api::format::{documents_to_api_value, insert_ack_to_api_value};
use crate::app::AppState;
use crate::auth::hash_password_blocking;
use crate::database::models::{NewUser, User};
use crate::database::{FindQuery, StoreError};
use crate::error::ApiResult;
use crate::filter::object_id_filter;

use super::decode_body;

/// POST /users - create a user, storing only the bcrypt hash of the password
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<Value>> {
    let mut new_user: NewUser = decode_body(body)?;

    let password = std::mem::take(&mut new_user.password);
    let hash = hash_password_blocking(password, state.config().security.bcrypt_cost).await?;

    let document = bson::to_document(&User::new(new_user, hash)).map_err(StoreError::from)?;
    let ack = state.users().insert_one(document).await?;

    info!("Created user {}", ack.inserted_id);
    Ok(Json(insert_ack_to_api_value(&ack)))
}

/// GET /users - every user
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    find_users(&state, None).await
}

/// GET /users/:uid - users matching the object id (all users if it is malformed, unless strict)
pub async fn get_user(State(state): State<AppState>, Path(uid): Path<String>) -> ApiResult<Json<Value>> {
    find_users(&state, Some(&uid)).await
}

async fn find_users(state: &AppState, uid: Option<&str>) -> ApiResult<Json<Value>> {
    let filter = object_id_filter(uid, state.id_policy())?;
    let query = FindQuery::new(filter).with_projection(User::public_projection());

    let documents = state.users().find(query).await?;
    Ok(Json(documents_to_api_value(documents)))
}
