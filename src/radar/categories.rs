use std::collections::BTreeMap;

use serde::Serialize;

/// Number of characters a tick label may keep before it gets shortened.
pub const MAX_LABEL_CHARS: usize = 25;
const ELLIPSIS: &str = "...";

const DEFAULT_CATEGORIES: [(u16, &str); 36] = [
    (0, "MATEMATIKA, KVANTINĖ FIZIKA"),
    (10, "DIRBTINIS INTELEKTAS, MAŠINŲ MOKYMAS"),
    (20, "FIZIKA, ELEKTRONIKA, KOMPIUTERIJA"),
    (30, "INŽINERIJA"),
    (40, "ELEKTROTECHNIKA"),
    (50, "MECHANIKA"),
    (60, "ARCHITEKTŪRA, MODELIAVIMAS"),
    (70, "STATISTIKA, DUOMENYS"),
    (80, "FINANSAI, EKONOMIKA"),
    (90, "ĮSTATYMAI, TEISĖ"),
    (100, "POLITIKA"),
    (110, "VALDŽIA, VALSTYBĖ"),
    (120, "RAŠTAS, SKAIČIAI"),
    (130, "AMATAI, PREKYBA"),
    (140, "RELIGIJOS"),
    (150, "BŪSTAS, STATYBA"),
    (160, "KELIONĖS, ATRADIMAI"),
    (170, "AGRESIJA, DOMINAVIMAS"),
    (180, "FIZINĖ JĖGA"),
    (190, "MAISTAS"),
    (200, "SEKSAS, VAIKAI"),
    (210, "ŠILUMA, BUITIS"),
    (220, "VALGIO RUOŠIMAS"),
    (230, "GLOBA/RŪPYBA"),
    (240, "EMPATIJA"),
    (250, "PUOŠYBA"),
    (260, "MUZIKA, ŠOKIS"),
    (270, "DRAMATIKA, GINČAI"),
    (280, "LITERATŪRA"),
    (290, "MEDIA, DIZAINAS"),
    (300, "ISTORIJA, ŽURNALISTIKA"),
    (310, "PSICHOLOGIJA"),
    (320, "MĄSTYMAS, FILOSOFIJA"),
    (330, "BIOLOGIJA, NEUROMOKSLAI"),
    (340, "MEDICINOS MOKSLAI"),
    (350, "CHEMIJA, BIOTECHNOLOGIJOS"),
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Category {
    pub angle: u16,
    pub label: String,
}

/// Fixed angle → label table. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    labels: BTreeMap<u16, String>,
}

impl CategoryMap {
    pub fn standard() -> Self {
        Self {
            labels: DEFAULT_CATEGORIES
                .iter()
                .map(|(angle, label)| (*angle, label.to_string()))
                .collect(),
        }
    }

    pub fn contains(&self, angle: u16) -> bool {
        self.labels.contains_key(&angle)
    }

    /// Angles in ascending order.
    pub fn angles(&self) -> impl Iterator<Item = u16> + '_ {
        self.labels.keys().copied()
    }

    /// Resolve an angle to its label, or a synthesized `Angle {n}` placeholder
    /// for angles outside the table.
    pub fn label(&self, angle: u16) -> String {
        self.labels
            .get(&angle)
            .cloned()
            .unwrap_or_else(|| format!("Angle {}", angle))
    }

    pub fn categories(&self) -> Vec<Category> {
        self.labels
            .iter()
            .map(|(angle, label)| Category {
                angle: *angle,
                label: label.clone(),
            })
            .collect()
    }
}

/// Shorten a label for the tick-label slot. Counts characters, not bytes,
/// so multi-byte labels are never split mid-character.
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let mut short: String = label.chars().take(MAX_LABEL_CHARS).collect();
    short.push_str(ELLIPSIS);
    short
}
