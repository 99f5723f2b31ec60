//! Declarative view models projected from the current selection.
//!
//! The core stays presentation-agnostic: the frontend renders these structs
//! however it likes (terminal widgets today, anything else tomorrow).

use crate::models::{Dataset, Door, Egress, EgressCategory};
use crate::selection::Selection;

/// One rendered egress entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EgressView {
    /// Display title (`Exit A: ...` or the positional fallback).
    pub title: String,
    /// Door labels joined with `or`.
    pub doors: String,
    /// Compact door-index range plus optional delta suffix.
    pub detail: String,
}

/// All egresses of one category, in dataset order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    /// Category heading.
    pub label: &'static str,
    /// Entries in dataset order; empty lists are kept so absence can be
    /// rendered explicitly.
    pub entries: Vec<EgressView>,
}

/// The grouped results for the active station/line/direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    /// `"{station} - {line} Line"`.
    pub title: String,
    /// Active direction label.
    pub subtitle: String,
    /// One group per category, always in the fixed order.
    pub groups: Vec<CategoryView>,
}

impl ResultsView {
    /// Project the selection into a results view, or `None` when no station
    /// is selected (the frontend shows a prompt and disables export).
    pub fn build(selection: &Selection, dataset: &Dataset) -> Option<ResultsView> {
        let station = selection.station()?;
        let line_code = selection.active_line_code().unwrap_or("");
        let direction_key = selection
            .active_direction()
            .map(|dir| dir.key.as_str())
            .unwrap_or("");

        let groups = EgressCategory::ALL
            .iter()
            .map(|category| CategoryView {
                label: category.label(),
                entries: station
                    .egresses(direction_key, category.key())
                    .iter()
                    .enumerate()
                    .map(|(position, egress)| EgressView {
                        title: egress.title(position),
                        doors: doors_line(egress),
                        detail: detail_line(egress),
                    })
                    .collect(),
            })
            .collect();

        Some(ResultsView {
            title: format!("{} - {} Line", station.name, dataset.line_name(line_code)),
            subtitle: station.direction_label(direction_key).to_string(),
            groups,
        })
    }
}

/// `"Car {car}, Door {door}"` for a single door.
pub fn door_label(door: &Door) -> String {
    format!("Car {}, Door {}", door.car_index, door.door_in_car)
}

/// All door labels of an egress joined with `or`.
pub fn doors_line(egress: &Egress) -> String {
    egress
        .doors
        .iter()
        .map(door_label)
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Compact door-index text: a single value for one door, `first-last` for a
/// multi-door list.
pub fn door_index_text(doors: &[Door]) -> String {
    match (doors.first(), doors.last()) {
        (Some(first), Some(last)) if doors.len() > 1 => {
            format!("Door index {}-{}", first.door_index, last.door_index)
        }
        (Some(only), _) => format!("Door index {}", only.door_index),
        _ => String::new(),
    }
}

fn detail_line(egress: &Egress) -> String {
    match egress.delta {
        Some(delta) => format!("{}, delta {delta}", door_index_text(&egress.doors)),
        None => door_index_text(&egress.doors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, EgressGroups, Station};
    use std::collections::HashMap;

    fn door(car: u32, in_car: u32, index: u32) -> Door {
        Door {
            car_index: car,
            door_in_car: in_car,
            door_index: index,
        }
    }

    fn egress(label: &str, delta: Option<f64>, doors: Vec<Door>) -> Egress {
        Egress {
            label: label.to_string(),
            delta,
            x: None,
            doors,
        }
    }

    fn dataset_with_station(groups: EgressGroups) -> Dataset {
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

    fn select_first(dataset: &Dataset) -> Selection {
        let mut selection = Selection::new();
        selection.select(dataset.stations[0].clone());
        selection
    }

    #[test]
    fn no_selection_builds_no_view() {
        let dataset = dataset_with_station(EgressGroups::new());
        assert!(ResultsView::build(&Selection::new(), &dataset).is_none());
    }

    #[test]
    fn groups_follow_the_fixed_category_order() {
        let dataset = dataset_with_station(EgressGroups::new());
        let view = ResultsView::build(&select_first(&dataset), &dataset).unwrap();

        let labels: Vec<&str> = view.groups.iter().map(|g| g.label).collect();
        assert_eq!(labels, vec!["Escalators", "Stairs", "Elevators", "Other"]);
        assert!(view.groups.iter().all(|g| g.entries.is_empty()));
    }

    #[test]
    fn title_and_subtitle_reflect_the_active_picks() {
        let dataset = dataset_with_station(EgressGroups::new());
        let view = ResultsView::build(&select_first(&dataset), &dataset).unwrap();

        assert_eq!(view.title, "Central - Red Line");
        assert_eq!(view.subtitle, "Toward Westgate");
    }

    #[test]
    fn multi_door_entries_join_with_or_and_show_a_range() {
        let mut groups = EgressGroups::new();
        groups.insert(
            "escalator".to_string(),
            vec![egress(
                "Exit A",
                Some(0.25),
                vec![door(3, 1, 7), door(3, 2, 8)],
            )],
        );
        let dataset = dataset_with_station(groups);
        let view = ResultsView::build(&select_first(&dataset), &dataset).unwrap();

        let entry = &view.groups[0].entries[0];
        assert_eq!(entry.title, "Exit A");
        assert_eq!(entry.doors, "Car 3, Door 1 or Car 3, Door 2");
        assert_eq!(entry.detail, "Door index 7-8, delta 0.25");
    }

    #[test]
    fn single_door_entry_shows_one_index_without_delta() {
        let mut groups = EgressGroups::new();
        groups.insert("stairs".to_string(), vec![egress("", None, vec![door(1, 3, 2)])]);
        let dataset = dataset_with_station(groups);
        let view = ResultsView::build(&select_first(&dataset), &dataset).unwrap();

        let entry = &view.groups[1].entries[0];
        assert_eq!(entry.title, "Egress 1");
        assert_eq!(entry.doors, "Car 1, Door 3");
        assert_eq!(entry.detail, "Door index 2");
    }

    #[test]
    fn entries_keep_dataset_order() {
        let mut groups = EgressGroups::new();
        groups.insert(
            "elevator".to_string(),
            vec![
                egress("Exit B", None, vec![door(2, 1, 4)]),
                egress("Exit A", None, vec![door(5, 2, 14)]),
            ],
        );
        let dataset = dataset_with_station(groups);
        let view = ResultsView::build(&select_first(&dataset), &dataset).unwrap();

        let titles: Vec<&str> = view.groups[2]
            .entries
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Exit B", "Exit A"]);
    }
}
