use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Stored user as returned by the API.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profession: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// All four fields are required and must be non-empty.
#[derive(ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub profession: String,
    pub status: String,
}

/// Any subset of the user fields.
#[derive(ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub profession: Option<String>,
    pub status: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::create_user,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
    ),
    components(
        schemas(
            HealthResponse,
            UserDoc,
            CreateUserRequest,
            UpdateUserRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "users")
    )
)]
pub struct ApiDoc;
