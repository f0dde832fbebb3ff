use bcrypt::{hash, verify};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use chrono::{Duration, Utc};
use actix_web::web;
use actix_web::HttpMessage;
use actix_web::{HttpRequest, dev::ServiceRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use crate::config::AuthConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::User;

// ======== CLAIMS ========

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ======== AUTH SERVICE ========

pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiration_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_expiration_hours: config.token_expiration_hours,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    pub fn hash_password(&self, password: &str) -> ApiResult<String> {
        hash(password, self.bcrypt_cost).map_err(|err| {
            log::error!("Password hashing failed: {}", err);
            ApiError::InternalServerError("Failed to hash password".to_string())
        })
    }

    /// A malformed stored hash counts as a mismatch
    pub fn verify_password(&self, password: &str, hash: &str) -> ApiResult<bool> {
        match verify(password, hash) {
            Ok(valid) => Ok(valid),
            Err(err) => {
                log::warn!("Password verification failed: {}", err);
                Ok(false)
            }
        }
    }

    pub fn generate_token(&self, user: &User) -> ApiResult<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_expiration_hours);

        let claims = Claims {
            username: user.username.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| ApiError::AuthError("Failed to generate token".to_string()))
    }

    pub fn verify_token(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::default();
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                match err.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature =>
                        ApiError::AuthError("Token expired".to_string()),
                    jsonwebtoken::errors::ErrorKind::InvalidToken =>
                        ApiError::AuthError("Invalid token".to_string()),
                    _ =>
                        ApiError::AuthError("Token verification failed".to_string()),
                }
            })
    }
}

// ======== GUARDS ========

pub fn get_current_user(req: &HttpRequest) -> Option<Claims> {
    req.extensions().get::<Claims>().cloned()
}

/// Any valid token
pub fn ensure_logged_in(req: &HttpRequest) -> ApiResult<Claims> {
    get_current_user(req).ok_or_else(ApiError::unauthorized)
}

pub fn ensure_admin(req: &HttpRequest) -> ApiResult<Claims> {
    let claims = ensure_logged_in(req)?;
    if !claims.is_admin {
        return Err(ApiError::unauthorized());
    }
    Ok(claims)
}

/// The user named in the route, or any admin
pub fn ensure_correct_user_or_admin(req: &HttpRequest, username: &str) -> ApiResult<Claims> {
    let claims = ensure_logged_in(req)?;
    if !claims.is_admin && claims.username != username {
        return Err(ApiError::unauthorized());
    }
    Ok(claims)
}

// ======== JWT MIDDLEWARE ========

/// Stores the claims of a valid bearer token; anything else passes through anonymous
pub async fn authenticate_jwt(
    req: ServiceRequest,
    credentials: Option<BearerAuth>,
) -> Result<ServiceRequest, (actix_web::Error, ServiceRequest)> {
    let Some(credentials) = credentials else {
        return Ok(req);
    };

    let auth_service = match req.app_data::<web::Data<std::sync::Arc<AuthService>>>() {
        Some(svc) => svc,
        None => {
            log::error!("AuthService not found in app data");
            return Err((
                ApiError::InternalServerError("Auth service not available".to_string()).into(),
                req,
            ));
        }
    };

    match auth_service.verify_token(credentials.token()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
        }
        Err(err) => {
            log::debug!("Ignoring bearer token: {}", err);
        }
    }
    Ok(req)
}
