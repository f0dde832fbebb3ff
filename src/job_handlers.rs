// src/job_handlers.rs
use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;
use crate::AppState;
use crate::auth::ensure_admin;
use crate::error::ApiResult;
use crate::handlers::{ApiResponse, SearchQuery};
use crate::models::{CreateJobRequest, Job, UpdateJobRequest};
use crate::validator::job_search_filters;
use log::info;

pub async fn create_job(
    app_state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    body: web::Json<CreateJobRequest>,
) -> ApiResult<HttpResponse> {
    let claims = ensure_admin(&req)?;
    body.validate_all()?;

    let job = Job::create(&app_state.db_pool, body.into_inner()).await?;
    info!("Job {} created by {}", job.id, claims.username);

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        job,
        "Job created successfully".to_string(),
    )))
}

/// GET /jobs?minSalary=&title=&hasEquity=
pub async fn get_jobs(
    app_state: web::Data<Arc<AppState>>,
    query: SearchQuery,
) -> ApiResult<HttpResponse> {
    let filters = job_search_filters(&query)?;
    let jobs = Job::find_all(&app_state.db_pool, &filters).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(jobs)))
}

pub async fn get_job(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let job = Job::get(&app_state.db_pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(job)))
}

pub async fn update_job(
    app_state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<UpdateJobRequest>,
) -> ApiResult<HttpResponse> {
    ensure_admin(&req)?;
    body.validate_all()?;

    let job = Job::update(&app_state.db_pool, path.into_inner(), &body.to_field_map()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(job)))
}

pub async fn delete_job(
    app_state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let claims = ensure_admin(&req)?;
    let id = path.into_inner();

    Job::remove(&app_state.db_pool, id).await?;
    info!("Job {} deleted by {}", id, claims.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        id,
        "Job deleted successfully".to_string(),
    )))
}
