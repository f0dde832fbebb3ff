// src/auth_handlers.rs
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;
use crate::AppState;
use crate::auth::{AuthService, TokenResponse};
use crate::error::ApiResult;
use crate::handlers::ApiResponse;
use crate::models::{CreateUserRequest, LoginRequest, RegisterRequest, User};

/// POST /auth/token
pub async fn login(
    app_state: web::Data<Arc<AppState>>,
    auth_service: web::Data<Arc<AuthService>>,
    request: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    let user = User::authenticate(
        &app_state.db_pool,
        &auth_service,
        &request.username,
        &request.password,
    ).await?;

    let token = auth_service.generate_token(&user)?;
    log::info!("User {} logged in successfully", user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success(TokenResponse { token })))
}

/// POST /auth/register
pub async fn register(
    app_state: web::Data<Arc<AppState>>,
    auth_service: web::Data<Arc<AuthService>>,
    request: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request: CreateUserRequest = request.into_inner().into();
    request.validate_all()?;

    let user = User::register(&app_state.db_pool, &auth_service, request).await?;
    let token = auth_service.generate_token(&user)?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        TokenResponse { token },
        "User registered successfully".to_string(),
    )))
}
