use time::{macros::format_description, OffsetDateTime};

use super::dto::{AssessmentExport, ExportCategory, ExportStatistics};
use crate::radar::{CategoryScore, Scores, Summary};

/// Trimmed comment, or `None` when nothing is left.
pub fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn export_category(c: &CategoryScore) -> ExportCategory {
    ExportCategory {
        category: c.category.clone(),
        score: c.score,
    }
}

pub fn build_export(
    username: &str,
    timestamp: OffsetDateTime,
    scores: &Scores,
    summary: &Summary,
    comment: Option<&str>,
) -> AssessmentExport {
    AssessmentExport {
        user: username.to_string(),
        timestamp,
        skills: scores.clone(),
        statistics: ExportStatistics {
            average: summary.export_average(),
            strongest: export_category(&summary.strongest),
            weakest: export_category(&summary.weakest),
        },
        comment: comment.unwrap_or_default().to_string(),
    }
}

/// `skills_{username}_{YYYYMMDD_HHMM}.json`, with the username reduced to
/// characters that are safe in a Content-Disposition header.
pub fn export_filename(username: &str, at: OffsetDateTime) -> anyhow::Result<String> {
    let safe: String = username
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stamp = at.format(format_description!("[year][month][day]_[hour][minute]"))?;
    Ok(format!("skills_{}_{}.json", safe, stamp))
}
