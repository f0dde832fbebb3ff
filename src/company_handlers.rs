// src/company_handlers.rs
use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;
use crate::AppState;
use crate::auth::ensure_admin;
use crate::error::ApiResult;
use crate::handlers::{ApiResponse, SearchQuery};
use crate::models::{Company, CreateCompanyRequest, UpdateCompanyRequest};
use crate::validator::company_search_filters;
use log::info;

/// POST /companies (admin)
pub async fn create_company(
    app_state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    body: web::Json<CreateCompanyRequest>,
) -> ApiResult<HttpResponse> {
    let claims = ensure_admin(&req)?;
    body.validate_all()?;

    let company = Company::create(&app_state.db_pool, body.into_inner()).await?;
    info!("Company {} created by {}", company.handle, claims.username);

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        company,
        "Company created successfully".to_string(),
    )))
}

/// GET /companies?minEmployees=&maxEmployees=&nameLike=
pub async fn get_companies(
    app_state: web::Data<Arc<AppState>>,
    query: SearchQuery,
) -> ApiResult<HttpResponse> {
    let filters = company_search_filters(&query)?;
    let companies = Company::find_all(&app_state.db_pool, &filters).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(companies)))
}

pub async fn get_company(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let company = Company::get(&app_state.db_pool, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(company)))
}

/// PATCH /companies/{handle} (admin)
pub async fn update_company(
    app_state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdateCompanyRequest>,
) -> ApiResult<HttpResponse> {
    ensure_admin(&req)?;
    body.validate_all()?;

    let handle = path.into_inner();
    let company = Company::update(&app_state.db_pool, &handle, &body.to_field_map()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(company)))
}

pub async fn delete_company(
    app_state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let claims = ensure_admin(&req)?;
    let handle = path.into_inner();

    Company::remove(&app_state.db_pool, &handle).await?;
    info!("Company {} deleted by {}", handle, claims.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        handle,
        "Company deleted successfully".to_string(),
    )))
}
