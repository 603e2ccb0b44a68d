//! HTTP API handlers
//!
//! All endpoints answer with the `{success, data}` envelope on success and
//! `{success: false, error}` on failure (see error.rs). Field names on the
//! wire use the French vocabulary of the historical API.

pub mod chaines;
pub mod debug;
pub mod health;
pub mod histoires;
pub mod planning;
pub mod points;
pub mod progression;
pub mod utilisateurs;
pub mod votes;
pub mod wiki;

use axum::Json;
use serde::Serialize;

/// Success envelope wrapping every response body
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Wrap a payload in the success envelope
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { success: true, data })
}
