use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use super::geometry::{ChartOptions, ChartStyle, Direction};
use super::tier::TierScheme;
use super::validate::RawScores;
use crate::config::RadarConfig;

/// Per-request chart variant; unset fields fall back to the deployment config.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ChartOverrides {
    pub direction: Option<Direction>,
    pub scheme: Option<TierScheme>,
    pub style: Option<ChartStyle>,
    pub compass: Option<bool>,
}

impl ChartOverrides {
    pub fn apply(&self, base: &RadarConfig, title: Option<String>) -> ChartOptions {
        let mut options = base.chart_options(title);
        if let Some(direction) = self.direction {
            options.direction = direction;
        }
        if let Some(scheme) = self.scheme {
            options.scheme = scheme;
        }
        if let Some(style) = self.style {
            options.style = style;
        }
        if let Some(compass) = self.compass {
            options.compass = compass;
        }
        options
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub scores: RawScores,
    pub title: Option<String>,
    #[serde(default)]
    pub chart: ChartOverrides,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub angle: u16,
    pub label: String,
    pub tick_label: String,
}

/// JSON body whose shape errors (wrong field types, missing fields) are
/// reported as 400 like every other input error. 422 stays reserved for
/// "no scores to display".
pub struct ScoresJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ScoresJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(ScoresJson(body)),
            Err(JsonRejection::JsonDataError(e)) => {
                warn!(error = %e, "request body rejected");
                Err((StatusCode::BAD_REQUEST, e.body_text()))
            }
            Err(e) => Err((e.status(), e.body_text())),
        }
    }
}
