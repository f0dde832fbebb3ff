// src/main.rs
use actix_web::{
    middleware::{Compress, DefaultHeaders, Logger},
    web, App, HttpServer,
};
use actix_web_httpauth::middleware::HttpAuthentication;
use actix_web::http::header;
use actix_cors::Cors;
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod auth_handlers;
mod company_handlers;
mod config;
mod db;
mod error;
mod handlers;
mod job_handlers;
mod models;
pub mod query_builders;
pub mod repositories;
mod user_handlers;
pub mod validator;

use auth::{authenticate_jwt, AuthService};
use config::{load_config, Config};

pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
}

// ==================== MAIN ====================

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--generate-secret") {
        println!("{}", config::generate_jwt_secret());
        return Ok(());
    }

    let config = load_config()?;
    setup_logging(&config)?;
    config.print_startup_info();

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let auth_service = Arc::new(AuthService::new(&config.auth));
    let app_state = Arc::new(AppState {
        db_pool: pool,
        config: config.clone(),
    });

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Starting server at http://{}", bind_address);

    let server_config = config.clone();
    let mut server = HttpServer::new(move || {
        let cors = setup_cors(&server_config.security.allowed_origins, server_config.is_production());
        let security_headers = setup_security_headers(&server_config.security);

        App::new()
            .wrap(HttpAuthentication::with_fn(authenticate_jwt))
            .wrap(cors)
            .wrap(security_headers)
            .wrap(Logger::default())
            .wrap(Compress::default())
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::JsonConfig::default().limit(server_config.security.max_request_size))
            .configure(configure_routes)
    })
        .keep_alive(std::time::Duration::from_secs(config.server.keep_alive))
        .client_request_timeout(std::time::Duration::from_secs(config.server.client_timeout));

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server failed to run")?;

    Ok(())
}

// ==================== ROUTES ====================

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(handlers::health_check))
        .service(
            web::scope("/auth")
                .route("/token", web::post().to(auth_handlers::login))
                .route("/register", web::post().to(auth_handlers::register))
        )
        .service(
            web::scope("/companies")
                .route("", web::post().to(company_handlers::create_company))
                .route("", web::get().to(company_handlers::get_companies))
                .route("/{handle}", web::get().to(company_handlers::get_company))
                .route("/{handle}", web::patch().to(company_handlers::update_company))
                .route("/{handle}", web::delete().to(company_handlers::delete_company))
        )
        .service(
            web::scope("/jobs")
                .route("", web::post().to(job_handlers::create_job))
                .route("", web::get().to(job_handlers::get_jobs))
                .route("/{id}", web::get().to(job_handlers::get_job))
                .route("/{id}", web::patch().to(job_handlers::update_job))
                .route("/{id}", web::delete().to(job_handlers::delete_job))
        )
        .service(
            web::scope("/users")
                .route("", web::post().to(user_handlers::create_user))
                .route("", web::get().to(user_handlers::get_users))
                .route("/{username}", web::get().to(user_handlers::get_user))
                .route("/{username}", web::patch().to(user_handlers::update_user))
                .route("/{username}", web::delete().to(user_handlers::delete_user))
                .route("/{username}/jobs/{id}", web::post().to(user_handlers::apply_to_job))
        );
}

// ==================== HELPER FUNCTIONS ====================

pub fn setup_cors(allowed_origins: &[String], is_production: bool) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .max_age(3600);

    if allowed_origins.iter().any(|origin| origin == "*") {
        if is_production {
            log::error!("Wildcard CORS origin (*) ignored in production");
        } else {
            log::warn!("Using wildcard CORS (*) in development mode");
            return cors.allow_any_origin();
        }
    }

    for origin in allowed_origins.iter().filter(|o| !o.is_empty() && o.as_str() != "*") {
        cors = cors.allowed_origin(origin);
    }
    cors
}

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let level = config.logging.level.as_str();
            tracing_subscriber::EnvFilter::new(level)
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(())
}

fn setup_security_headers(config: &config::SecurityConfig) -> DefaultHeaders {
    let mut headers = DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"));

    if config.require_https {
        headers = headers.add((
            "Strict-Transport-Security",
            "max-age=31536000; includeSubDomains"
        ));
    }

    headers
}
