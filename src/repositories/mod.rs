// src/repositories/mod.rs
//! Shared CRUD plumbing for single-table models

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPool, PgRow};

use crate::error::{ApiError, ApiResult};
use crate::query_builders::{ColumnMap, FieldMap, FilterValue, PartialUpdateBuilder};

fn key_arguments(key: &FilterValue) -> PgArguments {
    let mut args = PgArguments::default();
    key.add_to(&mut args);
    args
}

/// Base trait for get / partial update / delete by primary key
#[async_trait]
pub trait CrudRepository: Send + Sync {
    type Entity: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin;

    /// Table name
    fn table_name(&self) -> &'static str;

    /// Primary key column
    fn key_field(&self) -> &'static str;

    /// SELECT / RETURNING list producing `Entity`
    fn columns(&self) -> &'static str;

    /// Request field -> column translations used by `update`
    fn column_map(&self) -> ColumnMap<'static> {
        ColumnMap::empty()
    }

    fn not_found(&self, key: &FilterValue) -> ApiError;

    async fn get(&self, pool: &PgPool, key: FilterValue) -> ApiResult<Self::Entity> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            self.columns(),
            self.table_name(),
            self.key_field()
        );

        sqlx::query_as_with::<_, Self::Entity, _>(&query, key_arguments(&key))
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| self.not_found(&key))
    }

    /// Sets only the supplied fields; an empty map is a client error
    async fn update(&self, pool: &PgPool, key: FilterValue, fields: &FieldMap) -> ApiResult<Self::Entity> {
        let set = PartialUpdateBuilder::build(fields, &self.column_map())?;
        let query = format!(
            "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
            self.table_name(),
            set.sql,
            self.key_field(),
            set.next_placeholder(),
            self.columns()
        );
        tracing::debug!(table = self.table_name(), sql = %query, params = set.values.len() + 1, "partial update");

        let mut args = set.arguments();
        key.add_to(&mut args);
        sqlx::query_as_with::<_, Self::Entity, _>(&query, args)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| self.not_found(&key))
    }

    async fn remove(&self, pool: &PgPool, key: FilterValue) -> ApiResult<()> {
        let query = format!(
            "DELETE FROM {} WHERE {} = $1",
            self.table_name(),
            self.key_field()
        );

        let result = sqlx::query_with(&query, key_arguments(&key))
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.not_found(&key));
        }

        Ok(())
    }
}
