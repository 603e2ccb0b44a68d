//! Planning persistence (store-backed; replaces the historical
//! process-global planning array)

use fablier_common::db::models::PlanningEntry;
use fablier_common::Result;
use sqlx::SqlitePool;

/// All planning entries, by day then time slot
pub async fn list_entries(pool: &SqlitePool) -> Result<Vec<PlanningEntry>> {
    let entries = sqlx::query_as::<_, PlanningEntry>(
        "SELECT id, day, time_slot, title, description FROM planning_entries \
         ORDER BY day, time_slot, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Insert one planning slot
pub async fn insert_entry(
    pool: &SqlitePool,
    day: &str,
    time_slot: &str,
    title: &str,
    description: Option<&str>,
) -> Result<PlanningEntry> {
    let entry = sqlx::query_as::<_, PlanningEntry>(
        r#"
        INSERT INTO planning_entries (day, time_slot, title, description)
        VALUES (?, ?, ?, ?)
        RETURNING id, day, time_slot, title, description
        "#,
    )
    .bind(day)
    .bind(time_slot)
    .bind(title)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(entry)
}
