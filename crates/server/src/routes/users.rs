//! `/user/*` handlers. Each one turns the service outcome into the status
//! code and body shape of its operation; nothing escapes as a bare error.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use tracing::warn;

use service::users::domain::{CreateUserInput, UserPatch};
use service::UserError;

use super::ServerState;
use crate::envelope::{reply, Envelope, Message, MessageWithData, StatusTag, TaggedMessage};

fn validation_failed() -> Response {
    reply(
        StatusCode::BAD_REQUEST,
        Envelope::failed(StatusTag::Invalid, "All fields are required", "Validation Error"),
    )
}

#[utoipa::path(
    post, path = "/user/details", tag = "users",
    request_body = crate::openapi::CreateUserRequest,
    responses(
        (status = 201, description = "User added; body carries every user"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Email already exists"),
        (status = 500, description = "Something went wrong")
    )
)]
pub async fn create_user(
    State(state): State<ServerState>,
    payload: Result<Json<CreateUserInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateUserInput::default(),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "create payload rejected");
            return validation_failed();
        }
    };

    match state.users.create(input).await {
        Ok(users) => reply(
            StatusCode::CREATED,
            Envelope { status: StatusTag::Success, message: "User added successfully", error: None, data: users },
        ),
        Err(UserError::Validation(_)) => validation_failed(),
        Err(UserError::DuplicateKey(msg)) => reply(
            StatusCode::CONFLICT,
            Envelope::failed(StatusTag::Failure, "Email already exists", msg),
        ),
        Err(e) => reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            Envelope::failed(StatusTag::Failure, "Something went wrong", e.to_string()),
        ),
    }
}

#[utoipa::path(
    get, path = "/user/details", tag = "users",
    responses(
        (status = 200, description = "Every user", body = [crate::openapi::UserDoc]),
        (status = 500, description = "Failed to fetch users")
    )
)]
pub async fn list_users(State(state): State<ServerState>) -> Response {
    match state.users.list_all().await {
        Ok(users) => reply(StatusCode::OK, users),
        Err(e) => reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            TaggedMessage { status: StatusTag::Failure, message: "Failed to fetch users", error: e.to_string() },
        ),
    }
}

#[utoipa::path(
    post, path = "/user/details/{id}", tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user", body = crate::openapi::UserDoc),
        (status = 404, description = "User not found"),
        (status = 500, description = "Fetch failed")
    )
)]
pub async fn get_user(State(state): State<ServerState>, Path(id): Path<String>) -> Response {
    match state.users.get_one(&id).await {
        Ok(user) => reply(StatusCode::OK, user),
        Err(UserError::NotFound) => reply(StatusCode::NOT_FOUND, Message::new("User not found")),
        Err(e) => reply(StatusCode::INTERNAL_SERVER_ERROR, Message::with_error("Fetch failed", e.to_string())),
    }
}

#[utoipa::path(
    put, path = "/user/update/{id}", tag = "users",
    params(("id" = String, Path, description = "User ID")),
    request_body = crate::openapi::UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully; data is null when no user matched"),
        (status = 400, description = "Malformed body"),
        (status = 500, description = "Update failed")
    )
)]
pub async fn update_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Response {
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(JsonRejection::MissingJsonContentType(_)) => UserPatch::default(),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "update payload rejected");
            return reply(StatusCode::BAD_REQUEST, Message::with_error("Update failed", rejection.body_text()));
        }
    };

    match state.users.update(&id, patch).await {
        Ok(data) => reply(StatusCode::OK, MessageWithData { message: "User updated successfully", data }),
        Err(e) => reply(StatusCode::INTERNAL_SERVER_ERROR, Message::with_error("Update failed", e.to_string())),
    }
}

#[utoipa::path(
    delete, path = "/user/delete/{id}", tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted successfully"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Error deleting user")
    )
)]
pub async fn delete_user(State(state): State<ServerState>, Path(id): Path<String>) -> Response {
    match state.users.delete(&id).await {
        Ok(()) => reply(StatusCode::OK, Message::new("User deleted successfully")),
        Err(UserError::NotFound) => reply(StatusCode::NOT_FOUND, Message::new("User not found")),
        Err(e) => reply(StatusCode::INTERNAL_SERVER_ERROR, Message::with_error("Error deleting user", e.to_string())),
    }
}
