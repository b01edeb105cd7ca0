use anyhow::Context;
use serde::Deserialize;

use crate::radar::{ChartOptions, ChartStyle, Direction, TierScheme};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Deployment-wide chart variant. Requests may override individual fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RadarConfig {
    pub direction: Direction,
    pub scheme: TierScheme,
    pub style: ChartStyle,
    pub compass: bool,
}

impl RadarConfig {
    pub fn chart_options(&self, title: Option<String>) -> ChartOptions {
        ChartOptions {
            title,
            direction: self.direction,
            scheme: self.scheme,
            style: self.style,
            compass: self.compass,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub radar: RadarConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env_or("DATABASE_URL", "sqlite://skills_users.db");
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: env_or("JWT_ISSUER", "skill-radar"),
            audience: env_or("JWT_AUDIENCE", "skill-radar-users"),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let radar = RadarConfig {
            direction: env_or("RADAR_DIRECTION", "clockwise")
                .parse()
                .context("RADAR_DIRECTION")?,
            scheme: env_or("RADAR_TIER_SCHEME", "four")
                .parse()
                .context("RADAR_TIER_SCHEME")?,
            style: env_or("RADAR_STYLE", "lollipop")
                .parse()
                .context("RADAR_STYLE")?,
            compass: env_or("RADAR_COMPASS", "false")
                .parse::<bool>()
                .context("RADAR_COMPASS")?,
        };
        Ok(Self {
            database_url,
            jwt,
            radar,
        })
    }
}
