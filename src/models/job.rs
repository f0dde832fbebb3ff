// src/models/job.rs
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{is_foreign_key_violation, ApiError, ApiResult};
use crate::query_builders::{ColumnMap, FieldMap, FilterSet, FilterValue, JobFilterBuilder};
use crate::repositories::CrudRepository;
use crate::validator::{FieldValidator, ValidationResult};

// ==================== JOB ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    /// NUMERIC read back as text so no precision is lost
    pub equity: Option<String>,
    pub company_handle: String,
}

#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(range(min = 0, message = "Salary cannot be negative"))]
    pub salary: Option<i32>,

    pub equity: Option<String>,

    #[validate(length(min = 1, max = 25, message = "Company handle must be between 1 and 25 characters"))]
    pub company_handle: String,
}

impl CreateJobRequest {
    pub fn validate_all(&self) -> ApiResult<()> {
        self.validate()?;
        let mut result = ValidationResult::new();
        if let Some(ref equity) = self.equity {
            result.check("equity", FieldValidator::equity(equity).map(|_| ()));
        }
        result.into_result()
    }
}

/// Company handle and id are fixed once a job exists
#[derive(Debug, Deserialize, Validate, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateJobRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[validate(range(min = 0, message = "Salary cannot be negative"))]
    pub salary: Option<i32>,

    pub equity: Option<String>,
}

impl UpdateJobRequest {
    pub fn validate_all(&self) -> ApiResult<()> {
        self.validate()?;
        let mut result = ValidationResult::new();
        if let Some(ref equity) = self.equity {
            result.check("equity", FieldValidator::equity(equity).map(|_| ()));
        }
        result.into_result()
    }

    /// Equity is bound as an exact decimal; an unparsable value fails here too
    pub fn to_field_map(&self) -> ApiResult<FieldMap> {
        let mut fields = FieldMap::new();
        if let Some(ref v) = self.title { fields.insert("title".into(), v.as_str().into()); }
        if let Some(v) = self.salary { fields.insert("salary".into(), v.into()); }
        if let Some(ref v) = self.equity {
            let equity = FieldValidator::equity(v).map_err(ApiError::ValidationError)?;
            fields.insert("equity".into(), equity.into());
        }
        Ok(fields)
    }
}

// ==================== REPOSITORY ====================

const JOB_COLUMNS: &str = "id, title, salary, equity::TEXT AS equity, company_handle";

pub struct JobRepository;

impl CrudRepository for JobRepository {
    type Entity = Job;

    fn table_name(&self) -> &'static str {
        "jobs"
    }

    fn key_field(&self) -> &'static str {
        "id"
    }

    fn columns(&self) -> &'static str {
        JOB_COLUMNS
    }

    fn column_map(&self) -> ColumnMap<'static> {
        ColumnMap::new(&[("companyHandle", "company_handle")])
    }

    fn not_found(&self, key: &FilterValue) -> ApiError {
        match key {
            FilterValue::Integer(id) => ApiError::job_not_found(*id as i32),
            other => ApiError::NotFound(format!("No job with ID: {}", other.to_string_value())),
        }
    }
}

impl Job {
    /// Unknown company handle is a client error
    pub async fn create(pool: &PgPool, request: CreateJobRequest) -> ApiResult<Job> {
        let company_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM companies WHERE handle = $1)"
        )
            .bind(&request.company_handle)
            .fetch_one(pool)
            .await?;

        if !company_exists {
            return Err(ApiError::bad_request(&format!(
                "No company: {}",
                request.company_handle
            )));
        }

        let result = sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ($1, $2, $3::NUMERIC, $4)
             RETURNING {}",
            JOB_COLUMNS
        ))
            .bind(&request.title)
            .bind(request.salary)
            .bind(&request.equity)
            .bind(&request.company_handle)
            .fetch_one(pool)
            .await;

        let job = match result {
            Ok(job) => job,
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(ApiError::bad_request(&format!("No company: {}", request.company_handle)));
            }
            Err(err) => return Err(err.into()),
        };

        log::info!("Job {} created for company {}", job.id, job.company_handle);
        Ok(job)
    }

    /// Jobs matching `filters`, ordered by title
    pub async fn find_all(pool: &PgPool, filters: &FilterSet) -> ApiResult<Vec<Job>> {
        let clause = JobFilterBuilder::build(filters);
        let query = format!("SELECT {} FROM jobs {} ORDER BY title", JOB_COLUMNS, clause.sql);
        tracing::debug!(sql = %query, params = clause.values.len(), "job search");

        let jobs = sqlx::query_as_with::<_, Job, _>(&query, clause.arguments())
            .fetch_all(pool)
            .await?;
        Ok(jobs)
    }

    pub async fn get(pool: &PgPool, id: i32) -> ApiResult<Job> {
        JobRepository.get(pool, id.into()).await
    }

    pub async fn update(pool: &PgPool, id: i32, fields: &FieldMap) -> ApiResult<Job> {
        JobRepository.update(pool, id.into(), fields).await
    }

    pub async fn remove(pool: &PgPool, id: i32) -> ApiResult<()> {
        JobRepository.remove(pool, id.into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builders::PartialUpdateBuilder;
    use rust_decimal::Decimal;

    #[test]
    fn test_update_request_field_map() {
        let request = UpdateJobRequest {
            title: Some("New".into()),
            equity: Some("0.5".into()),
            ..Default::default()
        };
        assert!(request.validate_all().is_ok());

        let fields = request.to_field_map().unwrap();
        let clause = PartialUpdateBuilder::build(&fields, &JobRepository.column_map()).unwrap();
        assert_eq!(clause.sql, "\"title\"=$1, \"equity\"=$2");
        assert_eq!(
            clause.values,
            vec![FilterValue::string("New"), FilterValue::decimal(Decimal::new(5, 1))]
        );
        assert_eq!(clause.next_placeholder(), 3);
    }

    #[test]
    fn test_update_equity_is_exact() {
        let request = UpdateJobRequest {
            equity: Some("0.123456789012345678901".into()),
            ..Default::default()
        };
        let fields = request.to_field_map().unwrap();
        assert_eq!(fields["equity"].to_string_value(), "0.123456789012345678901");
    }

    #[test]
    fn test_equity_out_of_range() {
        let request = UpdateJobRequest {
            equity: Some("1.5".into()),
            ..Default::default()
        };
        assert!(request.validate_all().is_err());

        let request = UpdateJobRequest {
            equity: Some("lots".into()),
            ..Default::default()
        };
        assert!(request.validate_all().is_err());
    }

    #[test]
    fn test_company_handle_not_updatable() {
        let result = serde_json::from_value::<UpdateJobRequest>(serde_json::json!({
            "companyHandle": "c2"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let request: CreateJobRequest = serde_json::from_value(serde_json::json!({
            "title": "",
            "salary": -5,
            "companyHandle": "c1"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("salary"));
    }

    #[test]
    fn test_not_found_message() {
        let err = JobRepository.not_found(&FilterValue::integer(0));
        assert_eq!(err.to_string(), "Not Found: No job with ID: 0");
    }
}
