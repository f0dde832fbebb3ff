// src/user_handlers.rs
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;
use crate::AppState;
use crate::auth::{ensure_admin, ensure_correct_user_or_admin, AuthService};
use crate::error::ApiResult;
use crate::handlers::ApiResponse;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub applied: i32,
}

/// POST /users (admin); unlike /auth/register this may create admins
pub async fn create_user(
    app_state: web::Data<Arc<AppState>>,
    auth_service: web::Data<Arc<AuthService>>,
    req: HttpRequest,
    body: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let claims = ensure_admin(&req)?;
    body.validate_all()?;

    let user = User::register(&app_state.db_pool, &auth_service, body.into_inner()).await?;
    let token = auth_service.generate_token(&user)?;
    log::info!("User {} created by {}", user.username, claims.username);

    Ok(HttpResponse::Created().json(ApiResponse::success(CreatedUserResponse { user, token })))
}

pub async fn get_users(
    app_state: web::Data<Arc<AppState>>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    ensure_admin(&req)?;
    let users = User::find_all(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

pub async fn get_user(
    app_state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let username = path.into_inner();
    ensure_correct_user_or_admin(&req, &username)?;

    let user = User::get(&app_state.db_pool, &username).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

pub async fn update_user(
    app_state: web::Data<Arc<AppState>>,
    auth_service: web::Data<Arc<AuthService>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let username = path.into_inner();
    ensure_correct_user_or_admin(&req, &username)?;
    body.validate()?;

    let user = User::update(&app_state.db_pool, &auth_service, &username, &body.to_field_map()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

pub async fn delete_user(
    app_state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let username = path.into_inner();
    let claims = ensure_correct_user_or_admin(&req, &username)?;

    User::remove(&app_state.db_pool, &username).await?;
    log::info!("User {} deleted by {}", username, claims.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        username,
        "User deleted successfully".to_string(),
    )))
}

/// POST /users/{username}/jobs/{id}
pub async fn apply_to_job(
    app_state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    path: web::Path<(String, i32)>,
) -> ApiResult<HttpResponse> {
    let (username, job_id) = path.into_inner();
    ensure_correct_user_or_admin(&req, &username)?;

    User::apply_to_job(&app_state.db_pool, &username, job_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ApplicationResponse { applied: job_id })))
}
