//! Schema inspection endpoint

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::{ok, Envelope};
use crate::{ApiResult, AppState};

/// One table with its row count
#[derive(Debug, Serialize)]
pub struct TableInfo {
    pub table: String,
    pub lignes: i64,
}

/// GET /api/debug/tables
///
/// Lists the application tables with their row counts.
pub async fn list_tables(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<TableInfo>>>> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&state.db)
    .await?;

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        // Names come from sqlite_master, but guard interpolation anyway
        if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            continue;
        }
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {name}"))
            .fetch_one(&state.db)
            .await?;
        tables.push(TableInfo {
            table: name,
            lignes: count,
        });
    }

    Ok(ok(tables))
}
