//! Vote model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vote entity associating one user with one work.
///
/// At most one vote exists per (user, work) pair; the database enforces this
/// with a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub user_id: i64,
    pub work_id: i64,
    pub created_at: DateTime<Utc>,
}
