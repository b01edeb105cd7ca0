use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordinal color tier of a score. Variants are declared weakest first so the
/// derived `Ord` matches strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    VeryWeak,
    Weak,
    Medium,
    Strong,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::VeryWeak => "very-weak",
            Tier::Weak => "weak",
            Tier::Medium => "medium",
            Tier::Strong => "strong",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tier::VeryWeak => "Very weak",
            Tier::Weak => "Weak",
            Tier::Medium => "Medium",
            Tier::Strong => "Strong",
        }
    }
}

/// Threshold scheme used to classify scores. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierScheme {
    /// 8-10 strong, 6-7 medium, 4-5 weak, 1-3 very weak.
    Four,
    /// 7-10 strong, 4-6 medium, 1-3 weak.
    Three,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LegendEntry {
    pub tier: Tier,
    pub color: &'static str,
    pub min: u8,
    pub max: u8,
    pub label: String,
}

impl TierScheme {
    pub fn classify(self, score: u8) -> Tier {
        match self {
            TierScheme::Four => match score {
                s if s >= 8 => Tier::Strong,
                s if s >= 6 => Tier::Medium,
                s if s >= 4 => Tier::Weak,
                _ => Tier::VeryWeak,
            },
            TierScheme::Three => match score {
                s if s >= 7 => Tier::Strong,
                s if s >= 4 => Tier::Medium,
                _ => Tier::Weak,
            },
        }
    }

    pub fn color(self, tier: Tier) -> &'static str {
        match (self, tier) {
            (_, Tier::Strong) => "#2E8B57",
            (_, Tier::Medium) => "#FFD700",
            (TierScheme::Four, Tier::Weak) => "#FF8C00",
            (TierScheme::Three, Tier::Weak) | (_, Tier::VeryWeak) => "#DC143C",
        }
    }

    /// Score ranges per tier, strongest first.
    fn bands(self) -> &'static [(Tier, u8, u8)] {
        match self {
            TierScheme::Four => &[
                (Tier::Strong, 8, 10),
                (Tier::Medium, 6, 7),
                (Tier::Weak, 4, 5),
                (Tier::VeryWeak, 1, 3),
            ],
            TierScheme::Three => &[
                (Tier::Strong, 7, 10),
                (Tier::Medium, 4, 6),
                (Tier::Weak, 1, 3),
            ],
        }
    }

    pub fn legend(self) -> Vec<LegendEntry> {
        self.bands()
            .iter()
            .map(|&(tier, min, max)| LegendEntry {
                tier,
                color: self.color(tier),
                min,
                max,
                label: format!("{} ({}-{})", tier.title(), min, max),
            })
            .collect()
    }
}

impl FromStr for TierScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "four" | "4" => Ok(TierScheme::Four),
            "three" | "3" => Ok(TierScheme::Three),
            other => anyhow::bail!("unknown tier scheme: {}", other),
        }
    }
}
