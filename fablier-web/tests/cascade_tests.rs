//! End-to-end tests for the rewards cascade over HTTP
//!
//! A progress report fans out into chapter grants, milestone grants, the
//! completion grant, and the wiki unlock gate; these tests exercise the
//! whole chain through the router, including the ledger rows it leaves
//! behind.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fablier_web::{build_router, AppState, PlatformClients};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot`

async fn setup() -> (Router, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await.unwrap();
    fablier_common::db::create_schema(&pool).await.unwrap();
    fablier_common::db::seed::seed_reward_actions(&pool).await.unwrap();

    let state = AppState::new(pool.clone(), PlatformClients::mock());
    (build_router(state), pool)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

/// Creates a user and a story with `chapters` chapters through the API;
/// returns (user_id, story_id).
async fn seed_reader_and_story(app: &Router, chapters: i64) -> (i64, i64) {
    let body = body_json(
        app.clone()
            .oneshot(post_json("/api/utilisateurs", json!({"nom": "Lina"})))
            .await
            .unwrap(),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let body = body_json(
        app.clone()
            .oneshot(post_json(
                "/api/histoires",
                json!({"titre": "Les Fils Oubliés", "wiki_active": true}),
            ))
            .await
            .unwrap(),
    )
    .await;
    let story_id = body["data"]["id"].as_i64().unwrap();

    for n in 1..=chapters {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/histoires/{story_id}/chapitres"),
                json!({"titre": format!("Chapitre {n}")}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    (user_id, story_id)
}

async fn report_progress(app: &Router, user_id: i64, story_id: i64, chapter: i64) -> Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/progression",
            json!({"utilisateur_id": user_id, "histoire_id": story_id, "chapitre_lu": chapter}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn advancing_from_three_to_twelve_of_twenty() {
    let (app, _pool) = setup().await;
    let (user, story) = seed_reader_and_story(&app, 20).await;

    report_progress(&app, user, story, 3).await;
    let body = report_progress(&app, user, story, 12).await;
    let data = &body["data"];

    assert_eq!(data["nouvelle_progression"], true);
    assert_eq!(data["pourcentage_progression"], 60);
    assert_eq!(data["total_chapitres"], 20);
    assert_eq!(data["progression"]["chapitres_lus"], 12);
    assert_eq!(data["progression"]["statut"], "in_progress");

    let rewards = data["recompenses"].as_array().unwrap();
    let chapter_grants = rewards
        .iter()
        .filter(|r| r["action"] == "Lecture Chapitre")
        .count();
    let milestones: Vec<&str> = rewards
        .iter()
        .filter_map(|r| r["action"].as_str())
        .filter(|a| a.starts_with("Progression"))
        .collect();
    assert_eq!(chapter_grants, 9);
    assert_eq!(milestones, vec!["Progression 25%", "Progression 50%"]);

    // 3 + 9 chapters at 10 points, milestones at 25 and 50
    let body = body_json(
        app.clone()
            .oneshot(get(&format!("/api/points?utilisateur_id={user}")))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["points"]["points_total"], 120 + 25 + 50);
}

#[tokio::test]
async fn regression_report_changes_nothing() {
    let (app, pool) = setup().await;
    let (user, story) = seed_reader_and_story(&app, 10).await;

    // 0% -> 50% crosses the 25% and 50% milestones in one report
    let body = report_progress(&app, user, story, 5).await;
    let milestones: Vec<&str> = body["data"]["recompenses"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["action"].as_str())
        .filter(|a| a.starts_with("Progression"))
        .collect();
    assert_eq!(milestones, vec!["Progression 25%", "Progression 50%"]);

    let body = report_progress(&app, user, story, 2).await;

    assert_eq!(body["data"]["nouvelle_progression"], false);
    assert_eq!(body["data"]["progression"]["chapitres_lus"], 5);
    assert!(body["data"]["recompenses"].as_array().unwrap().is_empty());

    // Ledger only holds the first report's five chapter grants plus the
    // 25% and 50% milestones it crossed
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM points_history")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 7);
}

#[tokio::test]
async fn completion_transition_grants_once_and_manual_regrant_is_rejected() {
    let (app, _pool) = setup().await;
    let (user, story) = seed_reader_and_story(&app, 4).await;

    report_progress(&app, user, story, 3).await;
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/progression",
            json!({
                "utilisateur_id": user,
                "histoire_id": story,
                "chapitre_lu": 4,
                "statut": "completed"
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["progression"]["statut"], "completed");
    assert!(body["data"]["recompenses"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["action"] == "Histoire Terminée"));

    // Granting the completion action again by hand is a 400
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/points",
            json!({
                "utilisateur_id": user,
                "action_nom": "Histoire Terminée",
                "histoire_id": story
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "ALREADY_GRANTED");
}

#[tokio::test]
async fn wiki_unlocks_flow_through_progression_and_dedicated_endpoint() {
    let (app, pool) = setup().await;
    let (user, story) = seed_reader_and_story(&app, 10).await;
    sqlx::query(
        "INSERT INTO wiki_items (story_id, kind, name, unlock_level) \
         VALUES (?, 'personnage', 'Héroïne', 1), (?, 'objet', 'Clef Rouillée', 3)",
    )
    .bind(story)
    .bind(story)
    .execute(&pool)
    .await
    .unwrap();

    // Unlock endpoint refuses a pair with no progression
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/wiki/debloquer",
            json!({"utilisateur_id": user, "histoire_id": story}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The cascade unlocks the level-1 item
    let body = report_progress(&app, user, story, 1).await;
    let unlocked = body["data"]["nouveaux_debloquages"].as_array().unwrap();
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0]["titre"], "Héroïne");
    assert_eq!(unlocked[0]["type"], "personnage");

    // Reaching the second threshold through the dedicated endpoint
    report_progress(&app, user, story, 3).await;
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/wiki/debloquer",
            json!({"utilisateur_id": user, "histoire_id": story}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    // The cascade already ran the gate at chapter 3, so a second pass at
    // the same threshold is empty
    assert!(body["data"]["nouveaux_debloquages"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["points_gagnes"], 0);
    assert_eq!(body["data"]["chapitres_lus"], 3);

    // Both unlocks are recorded exactly once
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wiki_unlocks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn level_up_is_reported_when_a_grant_crosses_a_thousand() {
    let (app, pool) = setup().await;
    let (user, story) = seed_reader_and_story(&app, 5).await;

    sqlx::query("INSERT INTO points_accounts (user_id, total_points, current_points, level) VALUES (?, 990, 990, 1)")
        .bind(user)
        .execute(&pool)
        .await
        .unwrap();

    let body = report_progress(&app, user, story, 1).await;
    let reward = &body["data"]["recompenses"][0];
    assert_eq!(reward["points_gagnes"], 10);
    assert_eq!(reward["niveau_up"], true);
    assert_eq!(reward["nouveau_niveau"], 2);

    let body = body_json(
        app.clone()
            .oneshot(get(&format!("/api/points?utilisateur_id={user}")))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["points"]["niveau"], 2);
    assert_eq!(body["data"]["points_pour_prochain_niveau"], 1000);
}

#[tokio::test]
async fn zero_chapter_story_accepts_reports_without_milestones() {
    let (app, _pool) = setup().await;
    let (user, story) = seed_reader_and_story(&app, 0).await;

    let body = report_progress(&app, user, story, 4).await;
    assert_eq!(body["data"]["pourcentage_progression"], 0);
    assert_eq!(body["data"]["total_chapitres"], 0);
    let rewards = body["data"]["recompenses"].as_array().unwrap();
    // Chapter grants still accrue; no milestone can be crossed at 0%
    assert_eq!(rewards.len(), 4);
    assert!(rewards.iter().all(|r| r["action"] == "Lecture Chapitre"));
}
