#![allow(missing_docs)]

//! Shared domain models for the station/door dataset.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Egresses for one direction, keyed by category (`escalator`, `stairs`, ...).
pub type EgressGroups = HashMap<String, Vec<Egress>>;

/// A transit line from the dataset's reference table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Human-readable line name (e.g. `Red`).
    pub name: String,
    /// Display color as a hex string (e.g. `#c60c30`).
    pub color: String,
}

/// A named travel direction at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    /// Stable key used in `egress_by_dir` lookups (e.g. `WB`).
    pub key: String,
    /// User-facing label (e.g. `Toward Glenmont`).
    pub label: String,
}

/// Train door position within the consist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub car_index: u32,
    pub door_in_car: u32,
    /// Consist-wide position, used for compact range display.
    pub door_index: u32,
}

/// A station exit point (escalator, stairs, elevator, or other) mapped to
/// the train doors that stop closest to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Egress {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub doors: Vec<Door>,
}

impl Egress {
    /// Display title, falling back to a positional label when unnamed.
    pub fn title(&self, position: usize) -> String {
        if self.label.trim().is_empty() {
            format!("Egress {}", position + 1)
        } else {
            self.label.clone()
        }
    }
}

/// A station with its lines, directions, and per-direction egress mappings.
/// Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    /// Alternate name used by riders (secondary search target).
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub platform_type: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub directions: Vec<Direction>,
    #[serde(default)]
    pub egress_by_dir: HashMap<String, EgressGroups>,
}

impl Station {
    /// User-facing label combining name and subtitle.
    pub fn display_name(&self) -> String {
        if self.subtitle.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} · {}", self.name, self.subtitle)
        }
    }

    /// Label for a direction key, empty when the key is unknown.
    pub fn direction_label(&self, key: &str) -> &str {
        self.directions
            .iter()
            .find(|dir| dir.key == key)
            .map(|dir| dir.label.as_str())
            .unwrap_or("")
    }

    /// Egresses for a direction and category. Missing entries degrade to an
    /// empty slice rather than an error.
    pub fn egresses(&self, direction_key: &str, category_key: &str) -> &[Egress] {
        self.egress_by_dir
            .get(direction_key)
            .and_then(|groups| groups.get(category_key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Fixed egress categories in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EgressCategory {
    Escalator,
    Stairs,
    Elevator,
    Other,
}

impl EgressCategory {
    /// All categories in the fixed display order.
    pub const ALL: [EgressCategory; 4] = [
        EgressCategory::Escalator,
        EgressCategory::Stairs,
        EgressCategory::Elevator,
        EgressCategory::Other,
    ];

    /// Dataset key for this category.
    pub fn key(self) -> &'static str {
        match self {
            EgressCategory::Escalator => "escalator",
            EgressCategory::Stairs => "stairs",
            EgressCategory::Elevator => "elevator",
            EgressCategory::Other => "other",
        }
    }

    /// Heading shown in results and exports.
    pub fn label(self) -> &'static str {
        match self {
            EgressCategory::Escalator => "Escalators",
            EgressCategory::Stairs => "Stairs",
            EgressCategory::Elevator => "Elevators",
            EgressCategory::Other => "Other",
        }
    }
}

/// Consist statistics carried alongside the dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetMeta {
    #[serde(default)]
    pub door_count: u32,
    #[serde(default)]
    pub car_count: u32,
    #[serde(default)]
    pub doors_per_car: u32,
}

/// The full static dataset supplied at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub meta: DatasetMeta,
    #[serde(default)]
    pub lines: HashMap<String, Line>,
    #[serde(default)]
    pub stations: Vec<Station>,
    /// Stamped by the loader, not part of the serialized document.
    #[serde(skip, default = "Utc::now")]
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Display name for a line code, falling back to the raw code for
    /// unknown lines.
    pub fn line_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.lines
            .get(code)
            .map(|line| line.name.as_str())
            .unwrap_or(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station() -> Station {
        Station {
            name: "Central".to_string(),
            alt: String::new(),
            subtitle: "Transfer hub".to_string(),
            platform_type: "island".to_string(),
            lines: vec!["RD".to_string()],
            directions: vec![Direction {
                key: "WB".to_string(),
                label: "Toward Westgate".to_string(),
            }],
            egress_by_dir: HashMap::new(),
        }
    }

    #[test]
    fn display_name_includes_subtitle() {
        assert_eq!(station().display_name(), "Central · Transfer hub");

        let mut plain = station();
        plain.subtitle = String::new();
        assert_eq!(plain.display_name(), "Central");
    }

    #[test]
    fn direction_label_falls_back_to_empty() {
        let station = station();
        assert_eq!(station.direction_label("WB"), "Toward Westgate");
        assert_eq!(station.direction_label("EB"), "");
    }

    #[test]
    fn missing_egress_groups_degrade_to_empty() {
        let station = station();
        assert!(station.egresses("WB", "escalator").is_empty());
        assert!(station.egresses("nope", "stairs").is_empty());
    }

    #[test]
    fn egress_title_falls_back_to_position() {
        let egress = Egress {
            label: String::new(),
            delta: None,
            x: None,
            doors: Vec::new(),
        };
        assert_eq!(egress.title(0), "Egress 1");
        assert_eq!(egress.title(2), "Egress 3");

        let named = Egress {
            label: "Exit A: North mezzanine".to_string(),
            ..egress
        };
        assert_eq!(named.title(0), "Exit A: North mezzanine");
    }
}
