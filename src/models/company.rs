// src/models/company.rs
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::{Validate, ValidateUrl};

use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::models::nullable;
use crate::query_builders::{ColumnMap, CompanyFilterBuilder, FieldMap, FilterSet, FilterValue};
use crate::repositories::CrudRepository;
use crate::validator::{FieldValidator, ValidationResult};

// ==================== COMPANY ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Job as listed under its company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyWithJobs {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 25, message = "Handle must be between 1 and 25 characters"))]
    pub handle: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 0, message = "Number of employees cannot be negative"))]
    pub num_employees: Option<i32>,

    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,
}

impl CreateCompanyRequest {
    pub fn validate_all(&self) -> ApiResult<()> {
        self.validate()?;
        let mut result = ValidationResult::new();
        result.check("handle", FieldValidator::handle(&self.handle));
        result.into_result()
    }
}

#[derive(Debug, Deserialize, Validate, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Number of employees cannot be negative"))]
    pub num_employees: Option<i32>,

    /// `null` clears the logo
    #[serde(default, deserialize_with = "nullable")]
    pub logo_url: Option<Option<String>>,
}

impl UpdateCompanyRequest {
    pub fn validate_all(&self) -> ApiResult<()> {
        self.validate()?;
        let mut result = ValidationResult::new();
        if let Some(Some(ref url)) = self.logo_url {
            if !url.validate_url() {
                result.add_error("logo_url", "Logo URL must be a valid URL");
            }
        }
        result.into_result()
    }

    /// Supplied fields only, keyed by their request names
    pub fn to_field_map(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Some(ref v) = self.name { fields.insert("name".into(), v.as_str().into()); }
        if let Some(ref v) = self.description { fields.insert("description".into(), v.as_str().into()); }
        if let Some(v) = self.num_employees { fields.insert("numEmployees".into(), v.into()); }
        match self.logo_url {
            Some(Some(ref v)) => { fields.insert("logoUrl".into(), v.as_str().into()); }
            Some(None) => { fields.insert("logoUrl".into(), FilterValue::null()); }
            None => {}
        }
        fields
    }
}

// ==================== REPOSITORY ====================

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

pub struct CompanyRepository;

impl CrudRepository for CompanyRepository {
    type Entity = Company;

    fn table_name(&self) -> &'static str {
        "companies"
    }

    fn key_field(&self) -> &'static str {
        "handle"
    }

    fn columns(&self) -> &'static str {
        COMPANY_COLUMNS
    }

    fn column_map(&self) -> ColumnMap<'static> {
        ColumnMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")])
    }

    fn not_found(&self, key: &FilterValue) -> ApiError {
        ApiError::company_not_found(&key.to_string_value())
    }
}

impl Company {
    /// Fails with BadRequest when the handle is taken
    pub async fn create(pool: &PgPool, request: CreateCompanyRequest) -> ApiResult<Company> {
        let result = sqlx::query_as::<_, Company>(&format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            COMPANY_COLUMNS
        ))
            .bind(&request.handle)
            .bind(&request.name)
            .bind(&request.description)
            .bind(request.num_employees)
            .bind(&request.logo_url)
            .fetch_one(pool)
            .await;

        match result {
            Ok(company) => Ok(company),
            Err(err) if is_unique_violation(&err) => Err(ApiError::duplicate("company", &request.handle)),
            Err(err) => Err(err.into()),
        }
    }

    /// Companies matching `filters`, ordered by name
    pub async fn find_all(pool: &PgPool, filters: &FilterSet) -> ApiResult<Vec<Company>> {
        let clause = CompanyFilterBuilder::build(filters)?;
        let query = format!(
            "SELECT {} FROM companies {} ORDER BY name",
            COMPANY_COLUMNS, clause.sql
        );
        tracing::debug!(sql = %query, params = clause.values.len(), "company search");

        let companies = sqlx::query_as_with::<_, Company, _>(&query, clause.arguments())
            .fetch_all(pool)
            .await?;
        Ok(companies)
    }

    pub async fn get(pool: &PgPool, handle: &str) -> ApiResult<CompanyWithJobs> {
        let company = CompanyRepository.get(pool, handle.into()).await?;

        let jobs = sqlx::query_as::<_, CompanyJob>(
            "SELECT id, title, salary, equity::TEXT AS equity
             FROM jobs
             WHERE company_handle = $1
             ORDER BY id"
        )
            .bind(handle)
            .fetch_all(pool)
            .await?;

        Ok(CompanyWithJobs { company, jobs })
    }

    pub async fn update(pool: &PgPool, handle: &str, fields: &FieldMap) -> ApiResult<Company> {
        CompanyRepository.update(pool, handle.into(), fields).await
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> ApiResult<()> {
        CompanyRepository.remove(pool, handle.into()).await
    }
}
