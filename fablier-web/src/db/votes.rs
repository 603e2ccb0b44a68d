//! Vote persistence (store-backed; replaces the historical process-global
//! vote array)

use fablier_common::db::models::Vote;
use fablier_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// Insert one vote
pub async fn insert_vote(
    pool: &SqlitePool,
    poll: &str,
    choice: &str,
    user_id: Option<i64>,
) -> Result<Vote> {
    let vote = sqlx::query_as::<_, Vote>(
        r#"
        INSERT INTO votes (poll, choice, user_id)
        VALUES (?, ?, ?)
        RETURNING id, poll, choice, user_id, created_at
        "#,
    )
    .bind(poll)
    .bind(choice)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(vote)
}

/// One tallied choice of a poll
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TallyRow {
    #[serde(rename = "choix")]
    pub choice: String,
    #[serde(rename = "nombre")]
    pub count: i64,
}

/// Tally a poll's votes, most popular choice first
pub async fn tally(pool: &SqlitePool, poll: &str) -> Result<Vec<TallyRow>> {
    let rows = sqlx::query_as::<_, TallyRow>(
        "SELECT choice, COUNT(*) AS count FROM votes \
         WHERE poll = ? GROUP BY choice ORDER BY count DESC, choice",
    )
    .bind(poll)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
