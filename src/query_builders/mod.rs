// src/query_builders/mod.rs
//! SQL fragment builders for partial updates and search filters.
//!
//! Column names come only from fixed vocabularies (column maps and filter
//! enums). Values never reach the SQL text; they travel in
//! [`SqlClause::values`] and are bound to `$N` placeholders.

pub mod filters;
pub mod sql;
pub mod utils;

pub use filters::{CompanyFilter, CompanyFilterBuilder, FilterValue, JobFilter, JobFilterBuilder};
pub use sql::{ColumnMap, PartialUpdateBuilder};

use indexmap::IndexMap;
use sqlx::postgres::PgArguments;
use std::fmt;

/// Field name -> value, in insertion order. Order decides placeholder numbering.
pub type FieldMap = IndexMap<String, FilterValue>;

/// Filter name -> value, in the order the caller supplied them
pub type FilterSet = IndexMap<String, FilterValue>;

// ==================== CLAUSE ====================

/// Clause text plus the values for its placeholders.
///
/// The Nth value belongs to `$N`; the text holds exactly `values.len()`
/// placeholders numbered from 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlClause {
    pub sql: String,
    pub values: Vec<FilterValue>,
}

impl SqlClause {
    pub fn new(sql: impl Into<String>, values: Vec<FilterValue>) -> Self {
        Self { sql: sql.into(), values }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Position for a parameter appended after this clause's values
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Positional arguments in placeholder order
    pub fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        for value in &self.values {
            value.add_to(&mut args);
        }
        args
    }
}

// ==================== ERRORS ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseError {
    /// Partial update called with nothing to set
    NoData,
    /// Filter name outside the builder's vocabulary
    UnsupportedFilter(String),
}

impl fmt::Display for ClauseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "No data"),
            Self::UnsupportedFilter(name) => write!(f, "Unsupported filter: {}", name),
        }
    }
}

impl std::error::Error for ClauseError {}
