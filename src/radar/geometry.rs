use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::categories::{truncate_label, CategoryMap};
use super::error::RadarError;
use super::tier::{LegendEntry, Tier, TierScheme};

/// Angle in degrees → score in 1..=10.
pub type Scores = BTreeMap<u16, u8>;

pub const RADIAL_MIN: f64 = 0.0;
pub const RADIAL_MAX: f64 = 10.0;
/// Distance between a spoke tip and its value label.
pub const VALUE_LABEL_OFFSET: f64 = 0.3;
pub const TICK_LABEL_RADIUS: f64 = 11.2;
pub const COMPASS_RADIUS: f64 = 12.6;

const RADIAL_TICKS: [u8; 6] = [0, 2, 4, 6, 8, 10];
const COMPASS_POINTS: [(u16, &str); 4] = [(0, "N"), (90, "E"), (180, "S"), (270, "W")];

/// Direction in which angles grow, starting from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Polar → cartesian with north up and `y` growing upwards.
    pub fn project(self, theta: f64, radius: f64) -> Point {
        let x = radius * theta.sin();
        Point {
            x: match self {
                Direction::Clockwise => x,
                Direction::CounterClockwise => -x,
            },
            y: radius * theta.cos(),
        }
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clockwise" | "cw" => Ok(Direction::Clockwise),
            "counter-clockwise" | "counterclockwise" | "ccw" => Ok(Direction::CounterClockwise),
            other => anyhow::bail!("unknown angle direction: {}", other),
        }
    }
}

/// Final draw strategy; all styles share the same geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartStyle {
    Lollipop,
    Spoke,
    FilledPolygon,
}

impl FromStr for ChartStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lollipop" => Ok(ChartStyle::Lollipop),
            "spoke" | "line" => Ok(ChartStyle::Spoke),
            "filled-polygon" | "filled" | "polygon" => Ok(ChartStyle::FilledPolygon),
            other => anyhow::bail!("unknown chart style: {}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: Option<String>,
    pub direction: Direction,
    pub scheme: TierScheme,
    pub style: ChartStyle,
    pub compass: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueLabel {
    pub text: String,
    pub radius: f64,
    pub position: Point,
}

/// One category: radial mark from the center to `radius`, a marker at `tip`
/// and the numeric value just beyond it.
#[derive(Debug, Clone, Serialize)]
pub struct SpokeMark {
    pub angle: u16,
    pub theta: f64,
    pub radius: f64,
    pub score: u8,
    pub tier: Tier,
    pub color: &'static str,
    pub category: String,
    pub tip: Point,
    pub value_label: ValueLabel,
}

#[derive(Debug, Clone, Serialize)]
pub struct AngularTick {
    pub angle: u16,
    pub theta: f64,
    pub label: String,
    pub position: Point,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompassLabel {
    pub text: &'static str,
    pub angle: u16,
    pub theta: f64,
    pub position: Point,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartGeometry {
    pub title: Option<String>,
    pub direction: Direction,
    pub style: ChartStyle,
    pub scheme: TierScheme,
    pub radial_range: [f64; 2],
    pub radial_ticks: Vec<u8>,
    pub angular_ticks: Vec<AngularTick>,
    pub spokes: Vec<SpokeMark>,
    pub compass: Vec<CompassLabel>,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub angle: u16,
    pub category: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub average: f64,
    pub average_display: String,
    pub strongest: CategoryScore,
    pub weakest: CategoryScore,
}

impl Summary {
    /// Average rounded to two decimals, as written to exports.
    pub fn export_average(&self) -> f64 {
        (self.average * 100.0).round() / 100.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarChart {
    pub geometry: ChartGeometry,
    pub summary: Summary,
}

pub fn to_radians(angle: u16) -> f64 {
    f64::from(angle) * PI / 180.0
}

/// Mean, maximum and minimum of an assessment. Ties resolve to the lowest
/// angle. Returns `NoData` for an empty mapping.
pub fn summarize(categories: &CategoryMap, scores: &Scores) -> Result<Summary, RadarError> {
    let mut entries = scores.iter();
    let (&first_angle, &first_score) = entries.next().ok_or(RadarError::NoData)?;

    let mut total = u32::from(first_score);
    let (mut max, mut min) = ((first_angle, first_score), (first_angle, first_score));
    for (&angle, &score) in entries {
        total += u32::from(score);
        if score > max.1 {
            max = (angle, score);
        }
        if score < min.1 {
            min = (angle, score);
        }
    }

    let average = f64::from(total) / scores.len() as f64;
    let category_score = |(angle, score): (u16, u8)| CategoryScore {
        angle,
        category: categories.label(angle),
        score,
    };

    Ok(Summary {
        average,
        average_display: format!("{:.1}", average),
        strongest: category_score(max),
        weakest: category_score(min),
    })
}

pub fn build_chart(
    categories: &CategoryMap,
    scores: &Scores,
    options: &ChartOptions,
) -> Result<RadarChart, RadarError> {
    let summary = summarize(categories, scores)?;
    let direction = options.direction;

    let mut spokes = Vec::with_capacity(scores.len());
    let mut angular_ticks = Vec::with_capacity(scores.len());
    // BTreeMap iteration is already ascending by angle.
    for (&angle, &score) in scores {
        let theta = to_radians(angle);
        let radius = f64::from(score);
        let tier = options.scheme.classify(score);
        let category = categories.label(angle);
        let label_radius = radius + VALUE_LABEL_OFFSET;

        angular_ticks.push(AngularTick {
            angle,
            theta,
            label: truncate_label(&category),
            position: direction.project(theta, TICK_LABEL_RADIUS),
        });
        spokes.push(SpokeMark {
            angle,
            theta,
            radius,
            score,
            tier,
            color: options.scheme.color(tier),
            category,
            tip: direction.project(theta, radius),
            value_label: ValueLabel {
                text: score.to_string(),
                radius: label_radius,
                position: direction.project(theta, label_radius),
            },
        });
    }

    let compass = if options.compass {
        COMPASS_POINTS
            .iter()
            .map(|&(angle, text)| {
                let theta = to_radians(angle);
                CompassLabel {
                    text,
                    angle,
                    theta,
                    position: direction.project(theta, COMPASS_RADIUS),
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(RadarChart {
        geometry: ChartGeometry {
            title: options.title.clone(),
            direction,
            style: options.style,
            scheme: options.scheme,
            radial_range: [RADIAL_MIN, RADIAL_MAX],
            radial_ticks: RADIAL_TICKS.to_vec(),
            angular_ticks,
            spokes,
            compass,
            legend: options.scheme.legend(),
        },
        summary,
    })
}
