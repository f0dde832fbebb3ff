// src/query_builders/filters/company.rs
//! Company search filters
//!
//! Conditions follow the order in which the caller supplied the filters.

use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::query_builders::utils::{placeholder, where_clause};
use crate::query_builders::{ClauseError, FilterSet, SqlClause};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum CompanyFilter {
    MaxEmployees,
    MinEmployees,
    NameLike,
}

impl CompanyFilter {
    /// Condition for this filter bound to `$position`
    pub fn condition(&self, position: usize) -> String {
        let param = placeholder(position);
        match self {
            CompanyFilter::MaxEmployees => format!("num_employees <= {}", param),
            CompanyFilter::MinEmployees => format!("num_employees >= {}", param),
            CompanyFilter::NameLike => format!("name ILIKE {}", param),
        }
    }
}

pub struct CompanyFilterBuilder;

impl CompanyFilterBuilder {
    /// `{maxEmployees: 40, nameLike: "%a%"}` -> `WHERE num_employees <= $1 AND name ILIKE $2`
    ///
    /// Every filter binds exactly one value. A name outside [`CompanyFilter`]
    /// fails the whole build.
    pub fn build(filters: &FilterSet) -> Result<SqlClause, ClauseError> {
        if filters.is_empty() {
            return Ok(SqlClause::default());
        }

        let mut conditions = Vec::with_capacity(filters.len());
        let mut values = Vec::with_capacity(filters.len());

        for (idx, (name, value)) in filters.iter().enumerate() {
            let filter = CompanyFilter::from_str(name)
                .map_err(|_| ClauseError::UnsupportedFilter(name.clone()))?;
            conditions.push(filter.condition(idx + 1));
            values.push(value.clone());
        }

        Ok(SqlClause::new(where_clause(&conditions), values))
    }
}
