use crate::state::AppState;
use axum::{http::StatusCode, Router};
use tracing::{error, warn};

mod categories;
pub mod dto;
mod error;
mod geometry;
pub mod handlers;
mod render;
mod tier;
mod validate;

pub use categories::{truncate_label, CategoryMap};
pub use error::RadarError;
pub use geometry::{
    build_chart, summarize, CategoryScore, ChartOptions, ChartStyle, Direction, RadarChart, Scores,
    Summary,
};
pub use render::render_svg;
pub use tier::TierScheme;
pub use validate::{validate_partial_scores, validate_scores, RawScores};

pub fn router() -> Router<AppState> {
    handlers::radar_routes()
}

/// Map a chart error onto the HTTP status the client sees.
pub(crate) fn rejection(e: RadarError) -> (StatusCode, String) {
    let status = match e {
        RadarError::NoData => StatusCode::UNPROCESSABLE_ENTITY,
        RadarError::InvalidAngle(_)
        | RadarError::InvalidScore { .. }
        | RadarError::ScoreOutOfRange { .. }
        | RadarError::MissingAngle(_)
        | RadarError::UnknownAngle(_) => StatusCode::BAD_REQUEST,
        RadarError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %e, "chart failed");
    } else {
        warn!(error = %e, "chart rejected");
    }
    (status, e.to_string())
}
