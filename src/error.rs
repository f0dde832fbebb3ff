// src/error.rs
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::query_builders::ClauseError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    InternalServerError(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
    AuthError(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::DatabaseError(err) => write!(f, "Database Error: {}", err),
            ApiError::AuthError(msg) => write!(f, "Auth Error: {}", msg),
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse {
            success: false,
            message: self.to_string(),
        };

        match self {
            ApiError::BadRequest(_) => HttpResponse::BadRequest().json(error_response),
            ApiError::NotFound(_) => HttpResponse::NotFound().json(error_response),
            ApiError::Unauthorized(_) => HttpResponse::Unauthorized().json(error_response),
            ApiError::Forbidden(_) => HttpResponse::Forbidden().json(error_response),
            // Schema failures are client input errors, same as a malformed body
            ApiError::ValidationError(_) => HttpResponse::BadRequest().json(error_response),
            ApiError::DatabaseError(err) => {
                log::error!("Database error: {}", err);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    success: false,
                    message: "Internal Server Error".to_string(),
                })
            }
            ApiError::AuthError(_) => HttpResponse::Unauthorized().json(error_response),
            ApiError::InternalServerError(_) => HttpResponse::InternalServerError().json(error_response),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl From<ClauseError> for ApiError {
    fn from(err: ClauseError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        ApiError::BadRequest(msg.to_string())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    pub fn company_not_found(handle: &str) -> Self {
        ApiError::NotFound(format!("No company: {}", handle))
    }

    pub fn job_not_found(id: i32) -> Self {
        ApiError::NotFound(format!("No job with ID: {}", id))
    }

    pub fn user_not_found(username: &str) -> Self {
        ApiError::NotFound(format!("No user: {}", username))
    }

    pub fn duplicate(kind: &str, key: &str) -> Self {
        ApiError::BadRequest(format!("Duplicate {}: {}", kind, key))
    }
}

/// Unique-constraint violations surface as 400 instead of 500.
fn has_sqlstate(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(code),
        _ => false,
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, "23505")
}

/// Referenced row vanished between an existence check and the insert
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, "23503")
}

pub fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("x").error_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized().error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::user_not_found("u1").error_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::ValidationError("title: required".into()).error_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::DatabaseError(sqlx::Error::RowNotFound).error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_clause_error_is_client_error() {
        let err: ApiError = ClauseError::NoData.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.to_string(), "Bad Request: No data");
    }

    #[test]
    fn test_not_found_messages() {
        assert_eq!(ApiError::job_not_found(7).to_string(), "Not Found: No job with ID: 7");
        assert_eq!(ApiError::company_not_found("c1").to_string(), "Not Found: No company: c1");
    }

    #[test]
    fn test_unique_violation_only_for_database_errors() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[derive(Debug)]
    struct PgError {
        code: &'static str,
        constraint: &'static str,
    }

    impl fmt::Display for PgError {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "violates constraint {}", self.constraint)
        }
    }

    impl std::error::Error for PgError {}

    impl sqlx::error::DatabaseError for PgError {
        fn message(&self) -> &str {
            "constraint violation"
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(self.code.into())
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.code {
                "23503" => sqlx::error::ErrorKind::ForeignKeyViolation,
                "23505" => sqlx::error::ErrorKind::UniqueViolation,
                _ => sqlx::error::ErrorKind::Other,
            }
        }
    }

    #[test]
    fn test_foreign_key_violation() {
        let err = sqlx::Error::Database(Box::new(PgError {
            code: "23503",
            constraint: "applications_job_id_fkey",
        }));
        assert!(is_foreign_key_violation(&err));
        assert!(!is_unique_violation(&err));
        assert_eq!(violated_constraint(&err), Some("applications_job_id_fkey"));

        let dup = sqlx::Error::Database(Box::new(PgError {
            code: "23505",
            constraint: "users_pkey",
        }));
        assert!(is_unique_violation(&dup));
        assert!(!is_foreign_key_violation(&dup));

        assert!(!is_foreign_key_violation(&sqlx::Error::RowNotFound));
        assert_eq!(violated_constraint(&sqlx::Error::RowNotFound), None);
    }
}
