use std::collections::BTreeMap;

use serde_json::Value;

use super::categories::CategoryMap;
use super::error::RadarError;
use super::geometry::Scores;

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 10;

/// Scores exactly as they arrive in a JSON body: object keys are strings and
/// values are unchecked, so every malformed entry surfaces as a `RadarError`.
pub type RawScores = BTreeMap<String, Value>;

fn parse_entry(key: &str, value: &Value) -> Result<(u16, i64), RadarError> {
    let angle = key
        .trim()
        .parse::<u16>()
        .map_err(|_| RadarError::InvalidAngle(key.to_string()))?;
    let score = value.as_i64().ok_or_else(|| RadarError::InvalidScore {
        angle,
        value: value.to_string(),
    })?;
    Ok((angle, score))
}

fn checked(angle: u16, score: i64) -> Result<u8, RadarError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(score as u8)
    } else {
        Err(RadarError::ScoreOutOfRange { angle, score })
    }
}

fn typed(raw: &RawScores) -> Result<BTreeMap<u16, i64>, RadarError> {
    raw.iter().map(|(key, value)| parse_entry(key, value)).collect()
}

fn in_range(typed: &BTreeMap<u16, i64>) -> Result<Scores, RadarError> {
    typed
        .iter()
        .map(|(&angle, &score)| checked(angle, score).map(|s| (angle, s)))
        .collect()
}

/// A complete assessment: every known angle present, nothing else, every
/// score a whole number in range.
pub fn validate_scores(categories: &CategoryMap, raw: &RawScores) -> Result<Scores, RadarError> {
    let typed = typed(raw)?;
    if let Some(&unknown) = typed.keys().find(|a| !categories.contains(**a)) {
        return Err(RadarError::UnknownAngle(unknown));
    }
    if let Some(missing) = categories.angles().find(|a| !typed.contains_key(a)) {
        return Err(RadarError::MissingAngle(missing));
    }
    in_range(&typed)
}

/// Type and range checks only; partial and custom angles pass through.
pub fn validate_partial_scores(raw: &RawScores) -> Result<Scores, RadarError> {
    in_range(&typed(raw)?)
}
