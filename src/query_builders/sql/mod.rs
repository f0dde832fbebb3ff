// src/query_builders/sql/mod.rs
//! SET-clause builders

pub mod update;

pub use update::{ColumnMap, PartialUpdateBuilder};
