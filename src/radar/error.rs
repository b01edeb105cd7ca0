use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RadarError {
    #[error("no scores to display")]
    NoData,
    #[error("angle {0:?} is not a whole number of degrees in 0..=65535")]
    InvalidAngle(String),
    #[error("score {value} for angle {angle} is not a whole number")]
    InvalidScore { angle: u16, value: String },
    #[error("score {score} for angle {angle} is outside 1..=10")]
    ScoreOutOfRange { angle: u16, score: i64 },
    #[error("missing score for angle {0}")]
    MissingAngle(u16),
    #[error("unknown angle {0}")]
    UnknownAngle(u16),
    #[error("failed to render chart")]
    Render(#[from] std::fmt::Error),
}
