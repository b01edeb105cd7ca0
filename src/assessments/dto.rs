use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::radar::{RawScores, Scores, Summary};

#[derive(Debug, Deserialize)]
pub struct SaveAssessmentRequest {
    pub scores: RawScores,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavedAssessmentResponse {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub summary: Summary,
}

#[derive(Debug, Serialize)]
pub struct AssessmentListItem {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub comment: Option<String>,
    pub summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentDetails {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub comment: Option<String>,
    pub scores: Scores,
    pub summary: Option<Summary>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub scores: RawScores,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportCategory {
    pub category: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStatistics {
    pub average: f64,
    pub strongest: ExportCategory,
    pub weakest: ExportCategory,
}

/// Downloadable JSON document for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentExport {
    pub user: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub skills: Scores,
    pub statistics: ExportStatistics,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }
