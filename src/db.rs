// src/db.rs - Connection pool and schema setup

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use anyhow::{Context, Result};

use crate::config::DatabaseConfig;

pub async fn create_pool(db_config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.connect_timeout))
        .idle_timeout(Duration::from_secs(db_config.idle_timeout))
        .connect(&db_config.url)
        .await
        .context("Failed to connect to database")?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
            name TEXT UNIQUE NOT NULL,
            num_employees INTEGER CHECK (num_employees >= 0),
            description TEXT NOT NULL,
            logo_url TEXT
        )
        "#,
    )
        .execute(pool)
        .await
        .context("Failed to create companies table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            salary INTEGER CHECK (salary >= 0),
            equity NUMERIC CHECK (equity <= 1.0),
            company_handle VARCHAR(25) NOT NULL
                REFERENCES companies ON DELETE CASCADE
        )
        "#,
    )
        .execute(pool)
        .await
        .context("Failed to create jobs table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username VARCHAR(25) PRIMARY KEY,
            password TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL CHECK (position('@' IN email) > 1),
            is_admin BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    )
        .execute(pool)
        .await
        .context("Failed to create users table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS applications (
            username VARCHAR(25)
                REFERENCES users ON DELETE CASCADE,
            job_id INTEGER
                REFERENCES jobs ON DELETE CASCADE,
            PRIMARY KEY (username, job_id)
        )
        "#,
    )
        .execute(pool)
        .await
        .context("Failed to create applications table")?;

    // Filter columns
    for index in [
        "CREATE INDEX IF NOT EXISTS idx_companies_num_employees ON companies (num_employees)",
        "CREATE INDEX IF NOT EXISTS idx_jobs_company_handle ON jobs (company_handle)",
        "CREATE INDEX IF NOT EXISTS idx_jobs_salary ON jobs (salary)",
    ] {
        sqlx::query(index).execute(pool).await?;
    }

    log::info!("Database migrations completed");
    Ok(())
}
