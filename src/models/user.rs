// src/models/user.rs
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::auth::AuthService;
use crate::error::{is_foreign_key_violation, is_unique_violation, violated_constraint, ApiError, ApiResult};
use crate::query_builders::{ColumnMap, FieldMap, FilterValue};
use crate::repositories::CrudRepository;
use crate::validator::{FieldValidator, ValidationResult};

// ==================== USER ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(sqlx::FromRow)]
struct UserCredentials {
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    email: String,
    is_admin: bool,
}

impl From<UserCredentials> for User {
    fn from(row: UserCredentials) -> Self {
        Self {
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            is_admin: row.is_admin,
        }
    }
}

/// User plus the ids of the jobs they applied to
#[derive(Debug, Serialize)]
pub struct UserWithApplications {
    #[serde(flatten)]
    pub user: User,
    pub jobs: Vec<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 25, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Self sign-up; cannot grant admin
#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 25, message = "Username must be 1-25 characters"))]
    pub username: String,
    #[validate(length(min = 5, max = 20, message = "Password must be 5-20 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 30, message = "First name must be 1-30 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 30, message = "Last name must be 1-30 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Admin-created user
#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 25, message = "Username must be 1-25 characters"))]
    pub username: String,
    #[validate(length(min = 5, max = 20, message = "Password must be 5-20 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 30, message = "First name must be 1-30 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 30, message = "Last name must be 1-30 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl From<RegisterRequest> for CreateUserRequest {
    fn from(request: RegisterRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            is_admin: false,
        }
    }
}

impl CreateUserRequest {
    pub fn validate_all(&self) -> ApiResult<()> {
        self.validate()?;
        let mut result = ValidationResult::new();
        result.check("username", FieldValidator::username(&self.username));
        result.into_result()
    }
}

#[derive(Debug, Deserialize, Validate, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[validate(length(min = 5, max = 20, message = "Password must be 5-20 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 30, message = "First name must be 1-30 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 30, message = "Last name must be 1-30 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Password is carried as plain text; `User::update` hashes it
    pub fn to_field_map(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Some(ref v) = self.first_name { fields.insert("firstName".into(), v.as_str().into()); }
        if let Some(ref v) = self.last_name { fields.insert("lastName".into(), v.as_str().into()); }
        if let Some(ref v) = self.password { fields.insert("password".into(), v.as_str().into()); }
        if let Some(ref v) = self.email { fields.insert("email".into(), v.as_str().into()); }
        fields
    }
}

// ==================== REPOSITORY ====================

const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

pub struct UserRepository;

impl CrudRepository for UserRepository {
    type Entity = User;

    fn table_name(&self) -> &'static str {
        "users"
    }

    fn key_field(&self) -> &'static str {
        "username"
    }

    fn columns(&self) -> &'static str {
        USER_COLUMNS
    }

    fn column_map(&self) -> ColumnMap<'static> {
        ColumnMap::new(&[
            ("firstName", "first_name"),
            ("lastName", "last_name"),
            ("isAdmin", "is_admin"),
        ])
    }

    fn not_found(&self, key: &FilterValue) -> ApiError {
        ApiError::user_not_found(&key.to_string_value())
    }
}

impl User {
    /// Same error for unknown user and wrong password
    pub async fn authenticate(
        pool: &PgPool,
        auth: &AuthService,
        username: &str,
        password: &str,
    ) -> ApiResult<User> {
        let row = sqlx::query_as::<_, UserCredentials>(
            "SELECT username, password, first_name, last_name, email, is_admin
             FROM users
             WHERE username = $1"
        )
            .bind(username)
            .fetch_optional(pool)
            .await?;

        if let Some(row) = row {
            if auth.verify_password(password, &row.password)? {
                return Ok(row.into());
            }
        }

        log::warn!("Failed login attempt for user: {}", username);
        Err(ApiError::Unauthorized("Invalid username/password".to_string()))
    }

    /// Fails with BadRequest when the username is taken
    pub async fn register(
        pool: &PgPool,
        auth: &AuthService,
        request: CreateUserRequest,
    ) -> ApiResult<User> {
        let password_hash = auth.hash_password(&request.password)?;

        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        ))
            .bind(&request.username)
            .bind(&password_hash)
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(&request.email)
            .bind(request.is_admin)
            .fetch_one(pool)
            .await;

        match result {
            Ok(user) => {
                log::info!("User registered: {}", user.username);
                Ok(user)
            }
            Err(err) if is_unique_violation(&err) => Err(ApiError::duplicate("username", &request.username)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_all(pool: &PgPool) -> ApiResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY username",
            USER_COLUMNS
        ))
            .fetch_all(pool)
            .await?;
        Ok(users)
    }

    pub async fn get(pool: &PgPool, username: &str) -> ApiResult<UserWithApplications> {
        let user = UserRepository.get(pool, username.into()).await?;

        let jobs: Vec<i32> = sqlx::query_scalar(
            "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id"
        )
            .bind(username)
            .fetch_all(pool)
            .await?;

        Ok(UserWithApplications { user, jobs })
    }

    pub async fn update(
        pool: &PgPool,
        auth: &AuthService,
        username: &str,
        fields: &FieldMap,
    ) -> ApiResult<User> {
        let mut fields = fields.clone();
        if let Some(password) = fields.get_mut("password") {
            if let Some(plain) = password.as_str() {
                *password = FilterValue::string(auth.hash_password(plain)?);
            }
        }

        UserRepository.update(pool, username.into(), &fields).await
    }

    pub async fn remove(pool: &PgPool, username: &str) -> ApiResult<()> {
        UserRepository.remove(pool, username.into()).await
    }

    /// Applying twice is a no-op
    pub async fn apply_to_job(pool: &PgPool, username: &str, job_id: i32) -> ApiResult<()> {
        let job_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM jobs WHERE id = $1)")
            .bind(job_id)
            .fetch_one(pool)
            .await?;
        if !job_exists {
            return Err(ApiError::job_not_found(job_id));
        }

        let user_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await?;
        if !user_exists {
            return Err(ApiError::user_not_found(username));
        }

        let result = sqlx::query(
            "INSERT INTO applications (username, job_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING"
        )
            .bind(username)
            .bind(job_id)
            .execute(pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => {
                match violated_constraint(&err) {
                    Some("applications_username_fkey") => Err(ApiError::user_not_found(username)),
                    _ => Err(ApiError::job_not_found(job_id)),
                }
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builders::PartialUpdateBuilder;

    #[test]
    fn test_unmapped_field_passes_through() {
        let mut fields = FieldMap::new();
        fields.insert("firstName".into(), "Aliya".into());
        fields.insert("age".into(), FilterValue::integer(32));

        let clause = PartialUpdateBuilder::build(&fields, &UserRepository.column_map()).unwrap();
        assert_eq!(clause.sql, "\"first_name\"=$1, \"age\"=$2");
        assert_eq!(clause.values, vec![FilterValue::string("Aliya"), FilterValue::integer(32)]);
    }

    #[test]
    fn test_update_request_field_map() {
        let request = UpdateUserRequest {
            last_name: Some("New".into()),
            email: Some("new@email.com".into()),
            ..Default::default()
        };
        let fields = request.to_field_map();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["lastName", "email"]);
    }

    #[test]
    fn test_register_cannot_set_admin() {
        let result = serde_json::from_value::<RegisterRequest>(serde_json::json!({
            "username": "new",
            "password": "password",
            "firstName": "first",
            "lastName": "last",
            "email": "new@email.com",
            "isAdmin": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_defaults_to_non_admin() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "new",
            "password": "password",
            "firstName": "first",
            "lastName": "last",
            "email": "new@email.com"
        }))
        .unwrap();
        assert!(!request.is_admin);
        assert!(request.validate_all().is_ok());
    }

    #[test]
    fn test_create_request_validation() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "new user",
            "password": "pw",
            "firstName": "first",
            "lastName": "last",
            "email": "not-an-email"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_user_json_hides_password() {
        let user: User = UserCredentials {
            username: "u1".into(),
            password: "$2b$04$hash".into(),
            first_name: "U1F".into(),
            last_name: "U1L".into(),
            email: "user1@user.com".into(),
            is_admin: false,
        }
        .into();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["firstName"], "U1F");
        assert_eq!(json["isAdmin"], false);
    }
}
