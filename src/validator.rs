// src/validator.rs - Field checks and search query parsing
use std::collections::BTreeMap;
use serde::Serialize;
use regex::Regex;
use lazy_static::lazy_static;
use rust_decimal::Decimal;

use crate::error::{ApiError, ApiResult};
use crate::query_builders::utils::like_pattern;
use crate::query_builders::{CompanyFilter, FilterSet, FilterValue, JobFilter};

lazy_static! {
    static ref HANDLE_REGEX: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap();
}

// ==================== VALIDATION RESULT ====================

/// Field errors collected across several checks
#[derive(Debug, Default, Serialize)]
pub struct ValidationResult {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Records `check` under `field` when it fails
    pub fn check(&mut self, field: &str, check: Result<(), String>) {
        if let Err(message) = check {
            self.add_error(field, message);
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        let message = self.errors
            .iter()
            .map(|(field, errors)| format!("{}: {}", field, errors.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");

        ApiError::ValidationError(message)
    }

    pub fn into_result(self) -> ApiResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.to_api_error())
        }
    }
}

// ==================== FIELD VALIDATORS ====================

pub struct FieldValidator;

impl FieldValidator {
    /// Lowercase letters, digits and dashes
    pub fn handle(value: &str) -> Result<(), String> {
        if !HANDLE_REGEX.is_match(value) {
            return Err("Handle may only contain lowercase letters, digits and dashes".to_string());
        }
        Ok(())
    }

    pub fn username(value: &str) -> Result<(), String> {
        if !USERNAME_REGEX.is_match(value) {
            return Err("Username may only contain letters, digits, '.', '_' and '-'".to_string());
        }
        Ok(())
    }

    /// Decimal fraction between 0 and 1 inclusive, exact to the last digit
    pub fn equity(value: &str) -> Result<Decimal, String> {
        let equity = Decimal::from_str_exact(value.trim())
            .map_err(|_| format!("Equity must be a decimal number, got '{}'", value))?;

        if equity < Decimal::ZERO || equity > Decimal::ONE {
            return Err("Equity must be between 0 and 1".to_string());
        }
        Ok(equity)
    }

    pub fn integer(value: &str, field: &str) -> Result<i64, String> {
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("{} must be an integer", field))
    }
}

// ==================== SEARCH QUERIES ====================

/// Company search parameters, in the order they appeared in the query string
pub fn company_search_filters(params: &[(String, String)]) -> ApiResult<FilterSet> {
    let mut result = ValidationResult::new();
    let mut filters = FilterSet::new();

    for (name, raw) in params {
        match name.parse::<CompanyFilter>() {
            Ok(CompanyFilter::MinEmployees) | Ok(CompanyFilter::MaxEmployees) => {
                match FieldValidator::integer(raw, name) {
                    Ok(n) if n < 0 => result.add_error(name.as_str(), format!("{} cannot be negative", name)),
                    Ok(n) => { filters.insert(name.clone(), FilterValue::integer(n)); }
                    Err(message) => result.add_error(name.as_str(), message),
                }
            }
            Ok(CompanyFilter::NameLike) => {
                filters.insert(name.clone(), FilterValue::string(like_pattern(raw)));
            }
            Err(_) => result.add_error(name.as_str(), format!("Unsupported filter: {}", name)),
        }
    }

    let bound = |filter: CompanyFilter| -> Option<i64> {
        let key: &str = filter.as_ref();
        match filters.get(key) {
            Some(FilterValue::Integer(n)) => Some(*n),
            _ => None,
        }
    };
    if let (Some(min), Some(max)) = (bound(CompanyFilter::MinEmployees), bound(CompanyFilter::MaxEmployees)) {
        if min > max {
            result.add_error("minEmployees", "minEmployees cannot be greater than maxEmployees");
        }
    }

    result.into_result()?;
    Ok(filters)
}

/// Job search parameters; `title` and `hasEquity` are passed through as given
pub fn job_search_filters(params: &[(String, String)]) -> ApiResult<FilterSet> {
    let mut result = ValidationResult::new();
    let mut filters = FilterSet::new();

    for (name, raw) in params {
        match name.parse::<JobFilter>() {
            Ok(JobFilter::MinSalary) => match FieldValidator::integer(raw, name) {
                Ok(n) => { filters.insert(name.clone(), FilterValue::integer(n)); }
                Err(message) => result.add_error(name.as_str(), message),
            },
            Ok(JobFilter::Title) => {
                filters.insert(name.clone(), FilterValue::string(raw.as_str()));
            }
            Ok(JobFilter::HasEquity) => {
                filters.insert(name.clone(), FilterValue::string(raw.as_str()));
            }
            Err(_) => result.add_error(name.as_str(), format!("Unsupported filter: {}", name)),
        }
    }

    result.into_result()?;
    Ok(filters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_handle() {
        assert!(FieldValidator::handle("c1-new").is_ok());
        assert!(FieldValidator::handle("C1").is_err());
        assert!(FieldValidator::handle("bad handle").is_err());
        assert!(FieldValidator::handle("").is_err());
    }

    #[test]
    fn test_equity() {
        assert!(FieldValidator::equity("0").is_ok());
        assert!(FieldValidator::equity("0.25").is_ok());
        assert!(FieldValidator::equity("1").is_ok());
        assert!(FieldValidator::equity("1.01").is_err());
        assert!(FieldValidator::equity("-0.1").is_err());
        assert!(FieldValidator::equity("NaN").is_err());
        assert!(FieldValidator::equity("half").is_err());
        assert_eq!(
            FieldValidator::equity("0.123456789012345678901").unwrap().to_string(),
            "0.123456789012345678901"
        );
    }

    #[test]
    fn test_company_filters_keep_query_order() {
        let filters = company_search_filters(&params(&[
            ("nameLike", "net"),
            ("minEmployees", "10"),
        ]))
        .unwrap();
        assert_eq!(filters.keys().collect::<Vec<_>>(), vec!["nameLike", "minEmployees"]);
        assert_eq!(filters["nameLike"], FilterValue::string("%net%"));
        assert_eq!(filters["minEmployees"], FilterValue::integer(10));
    }

    #[test]
    fn test_company_filters_keep_explicit_wildcards() {
        let filters = company_search_filters(&params(&[("nameLike", "c%")])).unwrap();
        assert_eq!(filters["nameLike"], FilterValue::string("c%"));
    }

    #[test]
    fn test_company_filters_rejected() {
        assert!(company_search_filters(&params(&[("nope", "nope")])).is_err());
        assert!(company_search_filters(&params(&[("minEmployees", "ten")])).is_err());
        assert!(company_search_filters(&params(&[("maxEmployees", "-1")])).is_err());
        assert!(company_search_filters(&params(&[
            ("minEmployees", "10"),
            ("maxEmployees", "2"),
        ]))
        .is_err());
    }

    #[test]
    fn test_company_filters_empty() {
        assert!(company_search_filters(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_job_filters() {
        let filters = job_search_filters(&params(&[
            ("title", "%J1%"),
            ("hasEquity", "false"),
            ("minSalary", "1"),
        ]))
        .unwrap();
        assert_eq!(filters["title"], FilterValue::string("%J1%"));
        assert_eq!(filters["hasEquity"], FilterValue::string("false"));
        assert_eq!(filters["minSalary"], FilterValue::integer(1));
    }

    #[test]
    fn test_job_title_is_not_wrapped() {
        let filters = job_search_filters(&params(&[("title", "J3")])).unwrap();
        assert_eq!(filters["title"], FilterValue::string("J3"));
    }

    #[test]
    fn test_job_filters_rejected() {
        let err = job_search_filters(&params(&[("nope", "nope")])).unwrap_err();
        assert!(err.to_string().contains("Unsupported filter: nope"));
        assert!(job_search_filters(&params(&[("minSalary", "lots")])).is_err());
    }

    #[test]
    fn test_validation_result() {
        let mut result = ValidationResult::new();
        assert!(result.is_valid());
        result.check("equity", FieldValidator::equity("2").map(|_| ()));
        result.check("handle", FieldValidator::handle("ok"));
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 1);
        assert!(result.into_result().is_err());
    }
}
