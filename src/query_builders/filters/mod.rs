// src/query_builders/filters/mod.rs
//! WHERE-clause builders for company and job searches

pub mod company;
pub mod job;
pub mod value;

pub use company::{CompanyFilter, CompanyFilterBuilder};
pub use job::{JobFilter, JobFilterBuilder};
pub use value::FilterValue;
