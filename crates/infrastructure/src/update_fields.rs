//! Compiles a sparse column → value mapping into a parameterized UPDATE.
//!
//! Only column names from a fixed per-table allowlist are ever interpolated
//! into SQL text; every value travels as a bound parameter. The row
//! identifier is appended as the last parameter.

use chrono::NaiveDate;
use registar_core::{AppError, AppResult};
use sqlx::{Postgres, QueryBuilder};

/// A single bindable update value.
#[derive(Debug, Clone)]
pub(crate) enum SqlParam {
    /// Non-null integer column.
    Int(i32),
    /// Nullable integer column; `None` writes SQL NULL.
    NullableInt(Option<i32>),
    /// Text column.
    Text(String),
    /// Date column.
    Date(NaiveDate),
}

/// Ordered set of columns to update on one table.
#[derive(Debug)]
pub(crate) struct UpdateFieldSet {
    table: &'static str,
    allowed: &'static [&'static str],
    fields: Vec<(&'static str, SqlParam)>,
}

impl UpdateFieldSet {
    /// Creates an empty field set for a table with its updatable columns.
    pub(crate) fn new(table: &'static str, allowed: &'static [&'static str]) -> Self {
        Self {
            table,
            allowed,
            fields: Vec::new(),
        }
    }

    /// Adds a column assignment; columns outside the allowlist are refused.
    pub(crate) fn set(&mut self, column: &'static str, value: SqlParam) -> AppResult<()> {
        if !self.allowed.contains(&column) {
            return Err(AppError::Internal(format!(
                "column '{column}' is not updatable on table '{}'",
                self.table
            )));
        }

        self.fields.push((column, value));
        Ok(())
    }

    /// Returns whether no column was assigned.
    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds `UPDATE <table> SET col = $1, ... WHERE id = $n RETURNING id`.
    ///
    /// An empty set is refused; an unconditional update must never be
    /// issued by accident.
    pub(crate) fn into_update_query(self, id: i32) -> AppResult<QueryBuilder<'static, Postgres>> {
        if self.fields.is_empty() {
            return Err(AppError::Validation("no fields to update".to_owned()));
        }

        let mut builder: QueryBuilder<'static, Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET ", self.table));

        for (index, (column, value)) in self.fields.into_iter().enumerate() {
            if index > 0 {
                builder.push(", ");
            }
            builder.push(column);
            builder.push(" = ");
            match value {
                SqlParam::Int(value) => builder.push_bind(value),
                SqlParam::NullableInt(value) => builder.push_bind(value),
                SqlParam::Text(value) => builder.push_bind(value),
                SqlParam::Date(value) => builder.push_bind(value),
            };
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING id");

        Ok(builder)
    }
}
