use anyhow::Context;
use sqlx::{types::Json, SqlitePool};
use time::OffsetDateTime;

use super::repo_types::StoredAssessment;
use crate::radar::Scores;

pub async fn save_assessment(
    db: &SqlitePool,
    user_id: i64,
    scores: &Scores,
    comment: Option<&str>,
) -> anyhow::Result<(i64, OffsetDateTime)> {
    let created_at = OffsetDateTime::now_utc();
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO skill_assessments (user_id, assessment_data, comment, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(Json(scores))
    .bind(comment)
    .bind(created_at)
    .fetch_one(db)
    .await
    .context("insert assessment")?;
    Ok((id, created_at))
}

/// Most recent first. Ids grow with insertion time, so they order the
/// snapshots without comparing timestamp strings.
pub async fn list_assessments(
    db: &SqlitePool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<StoredAssessment>> {
    let rows = sqlx::query_as::<_, StoredAssessment>(
        r#"
        SELECT id, assessment_data, comment, created_at
        FROM skill_assessments
        WHERE user_id = ?1
        ORDER BY id DESC
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list assessments")?;
    Ok(rows)
}

pub async fn get_assessment(
    db: &SqlitePool,
    user_id: i64,
    id: i64,
) -> anyhow::Result<Option<StoredAssessment>> {
    let row = sqlx::query_as::<_, StoredAssessment>(
        r#"
        SELECT id, assessment_data, comment, created_at
        FROM skill_assessments
        WHERE id = ?1 AND user_id = ?2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get assessment")?;
    Ok(row)
}
