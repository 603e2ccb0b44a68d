//! Story persistence

use fablier_common::db::models::Story;
use fablier_common::Result;
use sqlx::SqlitePool;

const STORY_COLUMNS: &str = "id, title, author, source, source_url, description, \
                             wiki_enabled, created_at, updated_at";

/// Fields accepted when creating a story
#[derive(Debug, Clone, Default)]
pub struct NewStory {
    pub title: String,
    pub author: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub description: Option<String>,
    pub wiki_enabled: bool,
}

/// Optional fields for a partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct StoryPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub description: Option<String>,
    pub wiki_enabled: Option<bool>,
}

/// List all stories, most recently created first
pub async fn list_stories(pool: &SqlitePool) -> Result<Vec<Story>> {
    let stories = sqlx::query_as::<_, Story>(&format!(
        "SELECT {STORY_COLUMNS} FROM stories ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(stories)
}

/// Load one story by id
pub async fn get_story(pool: &SqlitePool, id: i64) -> Result<Option<Story>> {
    let story = sqlx::query_as::<_, Story>(&format!(
        "SELECT {STORY_COLUMNS} FROM stories WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(story)
}

/// Insert a story and return the stored row
pub async fn create_story(pool: &SqlitePool, story: &NewStory) -> Result<Story> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO stories (title, author, source, source_url, description, wiki_enabled)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&story.title)
    .bind(&story.author)
    .bind(&story.source)
    .bind(&story.source_url)
    .bind(&story.description)
    .bind(story.wiki_enabled)
    .fetch_one(pool)
    .await?;

    get_story(pool, id)
        .await?
        .ok_or_else(|| fablier_common::Error::Internal("story row vanished after insert".into()))
}

/// Apply a partial update; returns the updated row, or None when the id is unknown
pub async fn update_story(pool: &SqlitePool, id: i64, patch: &StoryPatch) -> Result<Option<Story>> {
    let result = sqlx::query(
        r#"
        UPDATE stories SET
            title = COALESCE(?, title),
            author = COALESCE(?, author),
            source = COALESCE(?, source),
            source_url = COALESCE(?, source_url),
            description = COALESCE(?, description),
            wiki_enabled = COALESCE(?, wiki_enabled),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&patch.title)
    .bind(&patch.author)
    .bind(&patch.source)
    .bind(&patch.source_url)
    .bind(&patch.description)
    .bind(patch.wiki_enabled)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_story(pool, id).await
}

/// Delete a story; chapters, progressions, and wiki items cascade
pub async fn delete_story(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM stories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
