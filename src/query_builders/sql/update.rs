// src/query_builders/sql/update.rs
//! Partial UPDATE: turns a sparse field map into a parameterized SET list

use crate::query_builders::{ClauseError, FieldMap, SqlClause};
use crate::query_builders::utils::placeholder;

/// External field name -> table column.
///
/// Fields without an entry map to themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnMap<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> ColumnMap<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    /// Column for `field`, falling back to the field name itself
    pub fn column<'s>(&'s self, field: &'s str) -> &'s str {
        self.entries
            .iter()
            .find(|(from, _)| *from == field)
            .map(|(_, to)| *to)
            .unwrap_or(field)
    }
}

pub struct PartialUpdateBuilder;

impl PartialUpdateBuilder {
    /// `{firstName: "Aliya", age: 32}` -> `"first_name"=$1, "age"=$2` with `["Aliya", 32]`
    pub fn build(fields: &FieldMap, columns: &ColumnMap<'_>) -> Result<SqlClause, ClauseError> {
        if fields.is_empty() {
            return Err(ClauseError::NoData);
        }

        let set_cols = fields
            .keys()
            .enumerate()
            .map(|(idx, field)| format!("\"{}\"={}", columns.column(field), placeholder(idx + 1)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(SqlClause::new(set_cols, fields.values().cloned().collect()))
    }
}
