//! Domain services behind the HTTP handlers
//!
//! The progress tracker, reward ledger, and wiki unlock gate form one
//! cascade: a progress update triggers point grants and wiki unlocks. Each
//! downstream call commits independently; a failed grant or unlock is
//! logged and skipped, never aborting the parent operation.

pub mod progression;
pub mod rewards;
pub mod wiki;
