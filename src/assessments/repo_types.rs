use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;

use crate::radar::Scores;

/// Append-only assessment snapshot; the scores column holds JSON text.
/// Ownership is enforced in the queries, so the owner id is not loaded.
#[derive(Debug, Clone, FromRow)]
pub struct StoredAssessment {
    pub id: i64,
    pub assessment_data: Json<Scores>,
    pub comment: Option<String>,
    pub created_at: OffsetDateTime,
}

impl StoredAssessment {
    pub fn scores(&self) -> &Scores {
        &self.assessment_data.0
    }
}
