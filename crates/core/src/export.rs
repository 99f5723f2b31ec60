//! Plain-text export of the current selection for the system clipboard.

use crate::models::{Dataset, EgressCategory};
use crate::selection::Selection;
use crate::view::{door_index_text, doors_line};

/// Newline-delimited summary of the active station/line/direction, or
/// `None` when nothing is selected. Pure function; the frontend decides
/// whether and how to hand the payload to a clipboard.
///
/// Every category appears in the fixed order regardless of emptiness, and
/// every egress exactly once.
pub fn clipboard_payload(selection: &Selection, dataset: &Dataset) -> Option<String> {
    let station = selection.station()?;
    let line_code = selection.active_line_code().unwrap_or("");
    let direction_key = selection
        .active_direction()
        .map(|dir| dir.key.as_str())
        .unwrap_or("");

    let mut lines = Vec::new();
    lines.push(format!("Station: {}", station.name));
    lines.push(format!("Line: {} Line", dataset.line_name(line_code)));
    lines.push(format!(
        "Direction: {}",
        station.direction_label(direction_key)
    ));
    lines.push(String::new());

    for category in EgressCategory::ALL {
        lines.push(format!("{}:", category.label()));
        let egresses = station.egresses(direction_key, category.key());
        if egresses.is_empty() {
            lines.push("- None".to_string());
        } else {
            for (position, egress) in egresses.iter().enumerate() {
                let delta = egress
                    .delta
                    .map(|delta| format!(" (delta {delta})"))
                    .unwrap_or_default();
                lines.push(format!(
                    "- {}: {}, {}{}",
                    egress.title(position),
                    doors_line(egress),
                    door_index_text(&egress.doors),
                    delta
                ));
            }
        }
        lines.push(String::new());
    }

    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Door, Egress, EgressGroups, Station};
    use std::collections::HashMap;

    fn sample_dataset() -> Dataset {
        let mut escalators = Vec::new();
        escalators.push(Egress {
            label: "Exit A: North mezzanine".to_string(),
            delta: Some(0.25),
            x: None,
            doors: vec![
                Door {
                    car_index: 3,
                    door_in_car: 1,
                    door_index: 7,
                },
                Door {
                    car_index: 3,
                    door_in_car: 2,
                    door_index: 8,
                },
            ],
        });
        let mut stairs = Vec::new();
        stairs.push(Egress {
            label: String::new(),
            delta: None,
            x: None,
            doors: vec![Door {
                car_index: 1,
                door_in_car: 3,
                door_index: 2,
            }],
        });

        let mut groups = EgressGroups::new();
        groups.insert("escalator".to_string(), escalators);
        groups.insert("stairs".to_string(), stairs);

        let mut egress_by_dir = HashMap::new();
        egress_by_dir.insert("WB".to_string(), groups);

        let station = Station {
            name: "Central".to_string(),
            alt: String::new(),
            subtitle: String::new(),
            platform_type: String::new(),
            lines: vec!["RD".to_string()],
            directions: vec![Direction {
                key: "WB".to_string(),
                label: "Toward Westgate".to_string(),
            }],
            egress_by_dir,
        };

        serde_json::from_value(serde_json::json!({
            "lines": { "RD": { "name": "Red", "color": "#c60c30" } },
            "stations": [station],
        }))
        .unwrap()
    }

    fn selected(dataset: &Dataset) -> Selection {
        let mut selection = Selection::new();
        selection.select(dataset.stations[0].clone());
        selection
    }

    #[test]
    fn no_selection_exports_nothing() {
        let dataset = sample_dataset();
        assert!(clipboard_payload(&Selection::new(), &dataset).is_none());

        let mut selection = selected(&dataset);
        selection.clear();
        assert!(clipboard_payload(&selection, &dataset).is_none());
    }

    #[test]
    fn payload_lists_every_category_in_fixed_order() {
        let dataset = sample_dataset();
        let payload = clipboard_payload(&selected(&dataset), &dataset).unwrap();

        let positions: Vec<usize> = ["Escalators:", "Stairs:", "Elevators:", "Other:"]
            .iter()
            .map(|header| payload.find(header).expect("missing category header"))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn payload_matches_the_expected_shape() {
        let dataset = sample_dataset();
        let payload = clipboard_payload(&selected(&dataset), &dataset).unwrap();

        let expected = "\
Station: Central
Line: Red Line
Direction: Toward Westgate

Escalators:
- Exit A: North mezzanine: Car 3, Door 1 or Car 3, Door 2, Door index 7-8 (delta 0.25)

Stairs:
- Egress 1: Car 1, Door 3, Door index 2

Elevators:
- None

Other:
- None
";
        assert_eq!(payload, expected);
    }

    #[test]
    fn empty_categories_export_an_explicit_none() {
        let dataset = sample_dataset();
        let payload = clipboard_payload(&selected(&dataset), &dataset).unwrap();

        assert_eq!(payload.matches("- None").count(), 2);
    }

    #[test]
    fn every_egress_appears_exactly_once() {
        let dataset = sample_dataset();
        let payload = clipboard_payload(&selected(&dataset), &dataset).unwrap();

        assert_eq!(payload.matches("Exit A: North mezzanine").count(), 1);
        assert_eq!(payload.matches("Egress 1").count(), 1);
    }
}
