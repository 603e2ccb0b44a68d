//! Row models shared between handlers and db modules
//!
//! Internal names are English; the serde attributes produce the French
//! wire vocabulary the HTTP API exposes (utilisateur_id, histoire_id, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reading status of a progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    InProgress,
    Completed,
}

/// Reward action category
///
/// `Completion` and `Achievement` actions are one-time grants per
/// (user, action, story); `Lecture` and `Progression` grants repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Lecture,
    Progression,
    Completion,
    Achievement,
}

impl ActionCategory {
    /// One-time categories are deduplicated against the points history
    pub fn is_one_time(self) -> bool {
        matches!(self, ActionCategory::Completion | ActionCategory::Achievement)
    }
}

/// Kind tag of an unlockable lore item
///
/// One table with a kind tag replaces the five parallel content tables of
/// the historical schema; the wire keeps the French per-kind type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum WikiKind {
    #[sqlx(rename = "personnage")]
    #[serde(rename = "personnage")]
    Character,
    #[sqlx(rename = "lieu")]
    #[serde(rename = "lieu")]
    Place,
    #[sqlx(rename = "objet")]
    #[serde(rename = "objet")]
    Object,
    #[sqlx(rename = "anecdote")]
    #[serde(rename = "anecdote")]
    Anecdote,
    #[sqlx(rename = "illustration")]
    #[serde(rename = "illustration")]
    Illustration,
}

impl WikiKind {
    /// All kinds, in the order the unlock gate scans them
    pub const ALL: [WikiKind; 5] = [
        WikiKind::Character,
        WikiKind::Place,
        WikiKind::Object,
        WikiKind::Anecdote,
        WikiKind::Illustration,
    ];

    /// Wire name of the kind (French type tag)
    pub fn as_str(self) -> &'static str {
        match self {
            WikiKind::Character => "personnage",
            WikiKind::Place => "lieu",
            WikiKind::Object => "objet",
            WikiKind::Anecdote => "anecdote",
            WikiKind::Illustration => "illustration",
        }
    }
}

/// Supported video platforms for channel sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Twitch,
}

/// Minimal reader identity row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A serialized written work composed of ordered chapters
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Story {
    pub id: i64,
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "auteur")]
    pub author: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "wiki_active")]
    pub wiki_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One chapter of a story; `number` is 1-based and dense per story
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Chapter {
    pub id: i64,
    #[serde(rename = "histoire_id")]
    pub story_id: i64,
    #[serde(rename = "numero")]
    pub number: i64,
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "contenu")]
    pub content: Option<String>,
}

/// A user's reading position within one story; unique per (user, story)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Progression {
    pub id: i64,
    #[serde(rename = "utilisateur_id")]
    pub user_id: i64,
    #[serde(rename = "histoire_id")]
    pub story_id: i64,
    #[serde(rename = "chapitres_lus")]
    pub chapters_read: i64,
    #[serde(rename = "statut")]
    pub status: ProgressStatus,
    #[serde(rename = "derniere_lecture")]
    pub last_read_at: DateTime<Utc>,
}

/// Per-user point totals; level = floor(total/1000) + 1
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PointsAccount {
    #[serde(rename = "utilisateur_id")]
    pub user_id: i64,
    #[serde(rename = "points_total")]
    pub total_points: i64,
    #[serde(rename = "points_actuels")]
    pub current_points: i64,
    #[serde(rename = "niveau")]
    pub level: i64,
}

/// Catalog entry describing a grantable reward action
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RewardAction {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    pub description: String,
    pub points: i64,
    #[serde(rename = "categorie")]
    pub category: ActionCategory,
    #[serde(rename = "actif")]
    pub active: bool,
}

/// Append-only ledger record, one per grant
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PointsHistoryEntry {
    pub id: i64,
    #[serde(rename = "utilisateur_id")]
    pub user_id: i64,
    pub action_id: i64,
    #[serde(rename = "points_gagnes")]
    pub points: i64,
    #[serde(rename = "histoire_id")]
    pub story_id: Option<i64>,
    #[serde(rename = "chapitre_id")]
    pub chapter_id: Option<i64>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Unlockable lore item gated by a chapters-read threshold
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WikiItem {
    pub id: i64,
    #[serde(rename = "histoire_id")]
    pub story_id: i64,
    #[serde(rename = "type")]
    pub kind: WikiKind,
    #[serde(rename = "nom")]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "image")]
    pub image_url: Option<String>,
    /// Kind-specific extra field (character role, illustration caption, ...)
    pub extra: Option<String>,
    #[serde(rename = "niveau_deblocage")]
    pub unlock_level: i64,
    #[serde(rename = "actif")]
    pub active: bool,
}

/// Creator channel metadata mirrored from a video platform
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Channel {
    pub id: i64,
    #[serde(rename = "plateforme")]
    pub platform: Platform,
    pub external_id: String,
    #[serde(rename = "nom")]
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "abonnes")]
    pub subscriber_count: i64,
    #[serde(rename = "nb_videos")]
    pub video_count: i64,
    #[serde(rename = "en_direct")]
    pub is_live: bool,
    #[serde(rename = "derniere_sync")]
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// One video belonging to a synced channel
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChannelVideo {
    pub id: i64,
    #[serde(rename = "chaine_id")]
    pub channel_id: i64,
    pub external_id: String,
    #[serde(rename = "titre")]
    pub title: String,
    pub url: Option<String>,
    #[serde(rename = "publie_le")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "miniature")]
    pub thumbnail_url: Option<String>,
}

/// One vote in a named poll
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Vote {
    pub id: i64,
    #[serde(rename = "sondage")]
    pub poll: String,
    #[serde(rename = "choix")]
    pub choice: String,
    #[serde(rename = "utilisateur_id")]
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// One publication-planning slot
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PlanningEntry {
    pub id: i64,
    #[serde(rename = "jour")]
    pub day: String,
    #[serde(rename = "heure")]
    pub time_slot: String,
    #[serde(rename = "titre")]
    pub title: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wiki_kind_wire_names_are_french() {
        assert_eq!(WikiKind::Character.as_str(), "personnage");
        assert_eq!(
            serde_json::to_string(&WikiKind::Place).unwrap(),
            "\"lieu\""
        );
    }

    #[test]
    fn one_time_categories() {
        assert!(ActionCategory::Completion.is_one_time());
        assert!(ActionCategory::Achievement.is_one_time());
        assert!(!ActionCategory::Lecture.is_one_time());
        assert!(!ActionCategory::Progression.is_one_time());
    }
}
