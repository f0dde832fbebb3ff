// src/query_builders/filters/job.rs
//! Job search filters
//!
//! Checked in a fixed order (hasEquity, minSalary, title) whatever order the
//! caller supplied them in.

use strum::{AsRefStr, Display, EnumString};

use crate::query_builders::utils::{placeholder, where_clause};
use crate::query_builders::{FilterSet, FilterValue, SqlClause};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum JobFilter {
    HasEquity,
    MinSalary,
    Title,
}

impl JobFilter {
    fn lookup<'f>(&self, filters: &'f FilterSet) -> Option<&'f FilterValue> {
        let name: &str = self.as_ref();
        filters.get(name)
    }
}

pub struct JobFilterBuilder;

impl JobFilterBuilder {
    /// `{minSalary: 40, title: "%J4%", hasEquity: "true"}`
    /// -> `WHERE equity > 0 AND salary >= $1 AND title ILIKE $2`
    ///
    /// `hasEquity` never binds a value; anything but the string `"true"`
    /// leaves it out entirely. Names outside [`JobFilter`] are ignored.
    pub fn build(filters: &FilterSet) -> SqlClause {
        if filters.is_empty() {
            return SqlClause::default();
        }

        let mut conditions = Vec::new();
        let mut values = Vec::new();
        let mut idx = 1;

        if let Some(has_equity) = JobFilter::HasEquity.lookup(filters) {
            if has_equity.as_str() == Some("true") {
                conditions.push("equity > 0".to_string());
            }
        }

        if let Some(min_salary) = JobFilter::MinSalary.lookup(filters) {
            conditions.push(format!("salary >= {}", placeholder(idx)));
            values.push(min_salary.clone());
            idx += 1;
        }

        if let Some(title) = JobFilter::Title.lookup(filters) {
            conditions.push(format!("title ILIKE {}", placeholder(idx)));
            values.push(title.clone());
        }

        SqlClause::new(where_clause(&conditions), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(entries: &[(&str, FilterValue)]) -> FilterSet {
        entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_no_filters() {
        let clause = JobFilterBuilder::build(&FilterSet::new());
        assert_eq!(clause, SqlClause::default());
    }

    #[test]
    fn test_min_salary() {
        let clause = JobFilterBuilder::build(&filters(&[("minSalary", FilterValue::integer(40))]));
        assert_eq!(clause.sql, "WHERE salary >= $1");
        assert_eq!(clause.values, vec![FilterValue::integer(40)]);
    }

    #[test]
    fn test_title() {
        let clause = JobFilterBuilder::build(&filters(&[("title", FilterValue::string("%J4%"))]));
        assert_eq!(clause.sql, "WHERE title ILIKE $1");
        assert_eq!(clause.values, vec![FilterValue::string("%J4%")]);
    }

    #[test]
    fn test_has_equity_true() {
        let clause = JobFilterBuilder::build(&filters(&[("hasEquity", FilterValue::string("true"))]));
        assert_eq!(clause.sql, "WHERE equity > 0");
        assert!(clause.values.is_empty());
    }

    #[test]
    fn test_has_equity_false_is_noop() {
        let clause = JobFilterBuilder::build(&filters(&[("hasEquity", FilterValue::string("false"))]));
        assert_eq!(clause.sql, "");
        assert!(clause.values.is_empty());
    }

    #[test]
    fn test_has_equity_only_matches_literal_true() {
        for value in [FilterValue::boolean(true), FilterValue::string("TRUE"), FilterValue::integer(1)] {
            let clause = JobFilterBuilder::build(&filters(&[("hasEquity", value)]));
            assert_eq!(clause.sql, "");
        }
    }

    #[test]
    fn test_all_filters_use_fixed_order() {
        let clause = JobFilterBuilder::build(&filters(&[
            ("minSalary", FilterValue::integer(40)),
            ("title", FilterValue::string("%J4%")),
            ("hasEquity", FilterValue::string("true")),
        ]));
        assert_eq!(clause.sql, "WHERE equity > 0 AND salary >= $1 AND title ILIKE $2");
        assert_eq!(clause.values, vec![FilterValue::integer(40), FilterValue::string("%J4%")]);
    }

    #[test]
    fn test_reversed_input_order_gives_same_clause() {
        let forward = JobFilterBuilder::build(&filters(&[
            ("hasEquity", FilterValue::string("true")),
            ("minSalary", FilterValue::integer(1)),
            ("title", FilterValue::string("%J1%")),
        ]));
        let reversed = JobFilterBuilder::build(&filters(&[
            ("title", FilterValue::string("%J1%")),
            ("minSalary", FilterValue::integer(1)),
            ("hasEquity", FilterValue::string("true")),
        ]));
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_false_equity_does_not_shift_numbering() {
        let clause = JobFilterBuilder::build(&filters(&[
            ("title", FilterValue::string("%J%")),
            ("hasEquity", FilterValue::string("false")),
        ]));
        assert_eq!(clause.sql, "WHERE title ILIKE $1");
        assert_eq!(clause.values, vec![FilterValue::string("%J%")]);
    }

    #[test]
    fn test_unknown_names_ignored() {
        let clause = JobFilterBuilder::build(&filters(&[("nope", FilterValue::string("nope"))]));
        assert_eq!(clause, SqlClause::default());
    }
}
