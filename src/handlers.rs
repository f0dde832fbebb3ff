// src/handlers.rs
use actix_web::{web, HttpResponse};
use serde::Serialize;

// ==================== COMMON STRUCTURES ====================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
        }
    }
}

/// Raw query string pairs in request order
pub type SearchQuery = web::Query<Vec<(String, String)>>;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_shape() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": [1, 2], "message": null }));

        let json = serde_json::to_value(ApiResponse::success_with_message("x", "Done".to_string())).unwrap();
        assert_eq!(json["message"], "Done");
    }

    #[test]
    fn test_search_query_keeps_order() {
        let query = SearchQuery::from_query("nameLike=net&minEmployees=2&maxEmployees=9").unwrap();
        let keys: Vec<&str> = query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["nameLike", "minEmployees", "maxEmployees"]);
    }
}
