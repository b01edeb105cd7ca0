use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, instrument};

use super::dto::{CategoryResponse, PreviewRequest, ScoresJson};
use super::{build_chart, rejection, render_svg, truncate_label, validate_partial_scores, RadarChart};
use crate::state::AppState;

pub fn radar_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/radar/preview", post(preview))
        .route("/radar/preview.svg", post(preview_svg))
}

pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryResponse>> {
    Json(
        state
            .categories
            .categories()
            .into_iter()
            .map(|c| CategoryResponse {
                tick_label: truncate_label(&c.label),
                angle: c.angle,
                label: c.label,
            })
            .collect(),
    )
}

fn preview_chart(state: &AppState, body: PreviewRequest) -> Result<RadarChart, (StatusCode, String)> {
    let scores = validate_partial_scores(&body.scores).map_err(rejection)?;
    let options = body.chart.apply(&state.config.radar, body.title);
    let chart = build_chart(&state.categories, &scores, &options).map_err(rejection)?;
    debug!(spokes = chart.geometry.spokes.len(), average = chart.summary.average, "preview built");
    Ok(chart)
}

#[instrument(skip(state, body))]
pub async fn preview(
    State(state): State<AppState>,
    ScoresJson(body): ScoresJson<PreviewRequest>,
) -> Result<Json<RadarChart>, (StatusCode, String)> {
    preview_chart(&state, body).map(Json)
}

#[instrument(skip(state, body))]
pub async fn preview_svg(
    State(state): State<AppState>,
    ScoresJson(body): ScoresJson<PreviewRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let chart = preview_chart(&state, body)?;
    let svg = render_svg(&chart).map_err(rejection)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
