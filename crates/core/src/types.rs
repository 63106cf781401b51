/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Owning-organization identifier. Same representation as [`DbId`]; the
/// alias exists so repository signatures read as org-scoped.
pub type OrgId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
