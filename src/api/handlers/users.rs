//! User CRUD request handlers.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    ErrorResponse, ListUsersParams, PagedResponse, RecordResponse, UserRequest, UserResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{JsonBody, PathParam, ValidatedQuery};

/// Creates user-related routes.
///
/// Routes:
/// - GET    /users        - List users (paged, optional birthdate range)
/// - POST   /users        - Create a user
/// - GET    /users/{id}   - Get user by ID
/// - PUT    /users/{id}   - Replace every field of a user
/// - PATCH  /users/{id}   - Overwrite the supplied fields of a user
/// - DELETE /users/{id}   - Delete a user (idempotent)
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, patch_user, delete_user))
}

type UserRecord = RecordResponse<UserResponse>;

/// GET /users - List users page by page
#[utoipa::path(
    get,
    path = "/users",
    tag = USER_TAG,
    params(ListUsersParams),
    responses(
        (status = 200, description = "One page of users", body = PagedResponse<UserResponse>),
        (status = 400, description = "Invalid paging or range parameters", body = ErrorResponse)
    )
)]
async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListUsersParams>,
) -> AppResult<Json<PagedResponse<UserResponse>>> {
    let page = state.services.users.list_users(params.into_query()).await?;
    Ok(Json(PagedResponse::from(page)))
}

/// GET /users/{id} - Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = USER_TAG,
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = RecordResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<Json<UserRecord>> {
    let users = &state.services.users;
    let user = users.get_user(id).await?;
    Ok(Json(RecordResponse::ok(user.into(), users.location(id))))
}

/// POST /users - Create a user
///
/// Responds 201 with the stored record and a `Location` header.
#[utoipa::path(
    post,
    path = "/users",
    tag = USER_TAG,
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = RecordResponse<UserResponse>,
            headers(("location" = String, description = "URL of the new user"))),
        (status = 400, description = "Validation failed or email already taken", body = ErrorResponse)
    )
)]
async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UserRequest>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<UserRecord>)> {
    let users = &state.services.users;
    let user = users.create_user(payload.into_draft()).await?;
    let location = users.location(user.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location.clone())],
        Json(RecordResponse::created(user.into(), location)),
    ))
}

/// PUT /users/{id} - Replace a user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = USER_TAG,
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User replaced", body = RecordResponse<UserResponse>),
        (status = 400, description = "Validation failed or email already taken", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn update_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<UserRequest>,
) -> AppResult<Json<UserRecord>> {
    let users = &state.services.users;
    let user = users.update_user(id, payload.into_draft()).await?;
    Ok(Json(RecordResponse::ok(user.into(), users.location(id))))
}

/// PATCH /users/{id} - Update the supplied fields of a user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = USER_TAG,
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = RecordResponse<UserResponse>),
        (status = 400, description = "Validation failed or email already taken", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn patch_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<UserRequest>,
) -> AppResult<Json<UserRecord>> {
    let users = &state.services.users;
    let user = users.patch_user(id, payload.into_draft()).await?;
    Ok(Json(RecordResponse::ok(user.into(), users.location(id))))
}

/// DELETE /users/{id} - Delete a user
///
/// Responds 200 with an empty body whether or not the user existed.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = USER_TAG,
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted or never existed")
    )
)]
async fn delete_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<StatusCode> {
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::OK)
}
