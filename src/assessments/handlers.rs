use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use super::dto::{
    AssessmentDetails, AssessmentListItem, ExportRequest, Pagination, SaveAssessmentRequest,
    SavedAssessmentResponse,
};
use super::repo_types::StoredAssessment;
use super::{repo, services};
use crate::{
    auth::{CurrentUser, User},
    radar::{
        build_chart,
        dto::{ChartOverrides, ScoresJson},
        rejection, render_svg, summarize, validate_scores, Scores,
    },
    state::AppState,
};

const MAX_PAGE: i64 = 100;

pub fn assessment_routes() -> Router<AppState> {
    Router::new()
        .route("/assessments", post(save_assessment).get(list_assessments))
        .route("/assessments/:id", get(get_assessment))
        .route("/assessments/:id/chart.svg", get(assessment_chart))
        .route("/assessments/:id/export", get(export_assessment))
        .route("/export", post(export_scores))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "assessment request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

async fn load_owned(
    state: &AppState,
    user_id: i64,
    id: i64,
) -> Result<StoredAssessment, (StatusCode, String)> {
    repo::get_assessment(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            warn!(user_id, id, "assessment not found");
            (StatusCode::NOT_FOUND, "Assessment not found".to_string())
        })
}

fn export_response(
    user: &User,
    at: OffsetDateTime,
    scores: &Scores,
    comment: Option<&str>,
    state: &AppState,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summary = summarize(&state.categories, scores).map_err(rejection)?;
    let export = services::build_export(&user.username, at, scores, &summary, comment);
    let filename = services::export_filename(&user.username, at).map_err(internal)?;
    let body = serde_json::to_string_pretty(&export).map_err(|e| internal(e.into()))?;

    info!(user_id = user.id, %filename, "assessment exported");
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}

#[instrument(skip(state, user, body))]
pub async fn save_assessment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ScoresJson(body): ScoresJson<SaveAssessmentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let scores = validate_scores(&state.categories, &body.scores).map_err(rejection)?;
    let summary = summarize(&state.categories, &scores).map_err(rejection)?;
    let comment = services::normalize_comment(body.comment);

    let (id, created_at) = repo::save_assessment(&state.db, user.id, &scores, comment.as_deref())
        .await
        .map_err(internal)?;

    info!(user_id = user.id, assessment_id = id, average = summary.average, "assessment saved");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/assessments/{}", id))],
        Json(SavedAssessmentResponse {
            id,
            created_at,
            summary,
        }),
    ))
}

#[instrument(skip(state, user))]
pub async fn list_assessments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<AssessmentListItem>>, (StatusCode, String)> {
    let limit = p.limit.clamp(1, MAX_PAGE);
    let offset = p.offset.max(0);
    let rows = repo::list_assessments(&state.db, user.id, limit, offset)
        .await
        .map_err(internal)?;

    let items = rows
        .into_iter()
        .map(|row| AssessmentListItem {
            summary: summarize(&state.categories, row.scores()).ok(),
            id: row.id,
            created_at: row.created_at,
            comment: row.comment,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, user))]
pub async fn get_assessment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<AssessmentDetails>, (StatusCode, String)> {
    let row = load_owned(&state, user.id, id).await?;
    Ok(Json(AssessmentDetails {
        summary: summarize(&state.categories, row.scores()).ok(),
        id: row.id,
        created_at: row.created_at,
        comment: row.comment,
        scores: row.assessment_data.0,
    }))
}

#[instrument(skip(state, user))]
pub async fn assessment_chart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Query(chart): Query<ChartOverrides>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let row = load_owned(&state, user.id, id).await?;
    let options = chart.apply(&state.config.radar, Some(format!("Assessment #{}", row.id)));
    let chart = build_chart(&state.categories, row.scores(), &options).map_err(rejection)?;
    let svg = render_svg(&chart).map_err(rejection)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

#[instrument(skip(state, user))]
pub async fn export_assessment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let row = load_owned(&state, user.id, id).await?;
    export_response(&user, row.created_at, row.scores(), row.comment.as_deref(), &state)
}

/// Export of scores the client has not saved.
#[instrument(skip(state, user, body))]
pub async fn export_scores(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ScoresJson(body): ScoresJson<ExportRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let scores = validate_scores(&state.categories, &body.scores).map_err(rejection)?;
    let comment = services::normalize_comment(body.comment);
    export_response(&user, OffsetDateTime::now_utc(), &scores, comment.as_deref(), &state)
}
