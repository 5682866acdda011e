// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic paginated reader over the whitelisted telemetry entities.
//!
//! Maps untyped query parameters into a filtered, sorted, paginated SELECT
//! plus a COUNT over the same predicate. Identifiers go through the schema
//! registry before touching SQL text; values are always bound.

use std::collections::BTreeMap;

use rusqlite::params_from_iter;
use rusqlite::types::{Value, ValueRef};
use tracing::debug;

use farmsight_core::{EntityPage, FarmsightError};

use crate::database::Database;
use crate::schema;

/// Sort direction for the generic reader.
///
/// Parsing is tolerant the way the HTTP surface has always been: `asc` in any
/// case selects ascending, anything else falls back to descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A validated-on-entry read request for one entity page.
#[derive(Debug, Clone, Default)]
pub struct ReadQuery {
    pub entity: String,
    pub page: i64,
    pub limit: i64,
    /// column -> exact-match value, combined with AND.
    pub filters: BTreeMap<String, String>,
    /// Inclusive lower bound on event_datetime (events only).
    pub start: Option<String>,
    /// Inclusive upper bound on event_datetime (events only).
    pub end: Option<String>,
    pub sort_column: Option<String>,
    pub sort_order: SortOrder,
}

/// Fetch one page of rows plus the total matching row count.
///
/// `total_rows` comes from a separate COUNT over the filter predicate alone,
/// so it is independent of page/limit.
pub async fn get_entity(db: &Database, query: ReadQuery) -> Result<EntityPage, FarmsightError> {
    let entity = schema::entity_schema(&query.entity).ok_or_else(|| {
        FarmsightError::Validation(format!("Invalid entity name: {}", query.entity))
    })?;

    if query.page <= 0 || query.limit <= 0 {
        return Err(FarmsightError::Validation(
            "Page and limit must be positive integers".to_string(),
        ));
    }

    let sort_column = match query.sort_column.as_deref() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            return Err(FarmsightError::Validation(
                "Sort column is required".to_string(),
            ));
        }
    };
    if !entity.has_column(&sort_column) {
        return Err(FarmsightError::Validation(format!(
            "Invalid sort_column: {sort_column}"
        )));
    }

    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    for (column, value) in &query.filters {
        if !entity.has_column(column) {
            return Err(FarmsightError::Validation(format!(
                "Invalid filter column: {column}"
            )));
        }
        clauses.push(format!("{column} = ?"));
        values.push(Value::Text(value.clone()));
    }

    // Datetime range bounds are special-cased for the events table only.
    if entity.table == "events" {
        if let Some(start) = &query.start {
            clauses.push("event_datetime >= ?".to_string());
            values.push(Value::Text(start.clone()));
        }
        if let Some(end) = &query.end {
            clauses.push("event_datetime <= ?".to_string());
            values.push(Value::Text(end.clone()));
        }
    }

    let filter_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    // Identifiers here have all passed the registry; only values are bound.
    let count_sql = format!("SELECT COUNT(*) FROM {}{}", entity.table, filter_sql);
    let select_sql = format!(
        "SELECT * FROM {}{} ORDER BY {} {} LIMIT ? OFFSET ?",
        entity.table,
        filter_sql,
        sort_column,
        query.sort_order.as_sql()
    );

    let page = query.page;
    let limit = query.limit;
    // Checked arithmetic: absurd page/limit values must not wrap into a
    // negative OFFSET.
    let offset = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(limit))
        .ok_or_else(|| {
            FarmsightError::Validation("Page and limit must be positive integers".to_string())
        })?;
    debug!(entity = entity.table, page, limit, "reading entity page");

    db.connection()
        .call(move |conn| {
            let total_rows: i64 =
                conn.query_row(&count_sql, params_from_iter(values.iter()), |row| {
                    row.get(0)
                })?;

            let mut stmt = conn.prepare(&select_sql)?;
            let column_names: Vec<String> =
                stmt.column_names().iter().map(|s| s.to_string()).collect();

            let mut page_values = values.clone();
            page_values.push(Value::Integer(limit));
            page_values.push(Value::Integer(offset));

            let mut data = Vec::new();
            let mut rows = stmt.query(params_from_iter(page_values.iter()))?;
            while let Some(row) = rows.next()? {
                data.push(row_to_json(row, &column_names)?);
            }

            Ok(EntityPage {
                data,
                total_rows,
                page,
                limit,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Convert a dynamic row into a JSON object keyed by column name.
fn row_to_json(
    row: &rusqlite::Row<'_>,
    columns: &[String],
) -> Result<serde_json::Value, rusqlite::Error> {
    let mut object = serde_json::Map::with_capacity(columns.len());
    for (i, name) in columns.iter().enumerate() {
        let value = match row.get_ref(i)? {
            ValueRef::Null => serde_json::Value::Null,
            ValueRef::Integer(n) => serde_json::Value::from(n),
            ValueRef::Real(f) => serde_json::Value::from(f),
            ValueRef::Text(t) => {
                serde_json::Value::String(String::from_utf8_lossy(t).into_owned())
            }
            ValueRef::Blob(b) => {
                serde_json::Value::String(b.iter().map(|byte| format!("{byte:02x}")).collect())
            }
        };
        object.insert(name.clone(), value);
    }
    Ok(serde_json::Value::Object(object))
}
