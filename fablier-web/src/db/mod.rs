//! Per-entity database operations
//!
//! Free async functions over `&SqlitePool`, raw SQL with binds. All writes
//! commit independently; no transaction spans the reward cascade.

pub mod channels;
pub mod chapters;
pub mod planning;
pub mod points;
pub mod progressions;
pub mod stories;
pub mod users;
pub mod votes;
pub mod wiki;
