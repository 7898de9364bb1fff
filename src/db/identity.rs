/// Identity database models
use sqlx::FromRow;
use uuid::Uuid;

/// Raw id token stored for a subject
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Internal key, assigned on first insert and kept across updates
    pub id: Uuid,
    pub sub: String,
    /// The token payload exactly as received
    pub idtoken: String,
}

/// Effect of an upsert on the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Record created or its token replaced
    Written,
    /// Stored token was already identical, nothing written
    Unchanged,
}
