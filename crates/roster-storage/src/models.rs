// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct PersonRow {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreatePerson {
    pub name: String,
    pub age: i64,
}

/// Partial update; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdatePerson {
    pub name: Option<String>,
    pub age: Option<i64>,
}
