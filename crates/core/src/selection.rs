//! Selection state shared between the UI controller and the render layer.

use crate::models::{Direction, Station};

/// The currently chosen station plus the active line/direction picks.
///
/// Owned by the top-level UI controller and passed by reference to render
/// functions; there is no process-wide instance. Whenever a station is set,
/// the active line is one of its `lines` and the active direction one of its
/// `directions` (indexes are clamped on every mutation).
#[derive(Debug, Clone, Default)]
pub struct Selection {
    station: Option<Station>,
    line_index: usize,
    direction_index: usize,
}

impl Selection {
    /// Fresh state with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected station, if any.
    pub fn station(&self) -> Option<&Station> {
        self.station.as_ref()
    }

    /// True when a station is selected.
    pub fn has_station(&self) -> bool {
        self.station.is_some()
    }

    /// Select a station, resetting the line and direction picks to the
    /// station's first entries.
    pub fn select(&mut self, station: Station) {
        self.station = Some(station);
        self.line_index = 0;
        self.direction_index = 0;
    }

    /// Drop the selection. Line/direction picks are meaningless afterwards.
    pub fn clear(&mut self) {
        self.station = None;
        self.line_index = 0;
        self.direction_index = 0;
    }

    /// Keep the selection consistent with the query text: when the typed
    /// text no longer matches the selected station's name
    /// (case-insensitively), the selection clears. Returns true when it did.
    pub fn sync_with_query(&mut self, text: &str) -> bool {
        let mismatch = self
            .station
            .as_ref()
            .map(|station| text.to_lowercase() != station.name.to_lowercase())
            .unwrap_or(false);
        if mismatch {
            self.clear();
        }
        mismatch
    }

    /// Index of the active line within the station's line list.
    pub fn line_index(&self) -> usize {
        self.line_index
    }

    /// Index of the active direction within the station's direction list.
    pub fn direction_index(&self) -> usize {
        self.direction_index
    }

    /// Pick a line by index. Does not change the station.
    pub fn set_line(&mut self, index: usize) {
        self.line_index = index;
        self.clamp();
    }

    /// Pick a direction by index. Does not change the station.
    pub fn set_direction(&mut self, index: usize) {
        self.direction_index = index;
        self.clamp();
    }

    /// Step the active line pick, clamping at the ends.
    pub fn cycle_line(&mut self, delta: isize) {
        self.line_index = step(self.line_index, delta, self.line_count());
    }

    /// Step the active direction pick, clamping at the ends.
    pub fn cycle_direction(&mut self, delta: isize) {
        self.direction_index = step(self.direction_index, delta, self.direction_count());
    }

    /// Code of the active line, if a station with lines is selected.
    pub fn active_line_code(&self) -> Option<&str> {
        self.station
            .as_ref()
            .and_then(|station| station.lines.get(self.line_index))
            .map(String::as_str)
    }

    /// The active direction, if a station with directions is selected.
    pub fn active_direction(&self) -> Option<&Direction> {
        self.station
            .as_ref()
            .and_then(|station| station.directions.get(self.direction_index))
    }

    fn line_count(&self) -> usize {
        self.station
            .as_ref()
            .map(|station| station.lines.len())
            .unwrap_or(0)
    }

    fn direction_count(&self) -> usize {
        self.station
            .as_ref()
            .map(|station| station.directions.len())
            .unwrap_or(0)
    }

    fn clamp(&mut self) {
        self.line_index = self.line_index.min(self.line_count().saturating_sub(1));
        self.direction_index = self
            .direction_index
            .min(self.direction_count().saturating_sub(1));
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = (len - 1) as isize;
    (current as isize + delta).clamp(0, max) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Station;

    fn station() -> Station {
        Station {
            name: "Central".to_string(),
            alt: String::new(),
            subtitle: String::new(),
            platform_type: String::new(),
            lines: vec!["RD".to_string(), "BL".to_string()],
            directions: vec![
                Direction {
                    key: "WB".to_string(),
                    label: "Toward Westgate".to_string(),
                },
                Direction {
                    key: "EB".to_string(),
                    label: "Toward Eastbrook".to_string(),
                },
            ],
            egress_by_dir: Default::default(),
        }
    }

    #[test]
    fn select_defaults_to_first_line_and_direction() {
        let mut selection = Selection::new();
        selection.select(station());

        assert_eq!(selection.active_line_code(), Some("RD"));
        assert_eq!(selection.active_direction().map(|d| d.key.as_str()), Some("WB"));
    }

    #[test]
    fn select_resets_previous_picks() {
        let mut selection = Selection::new();
        selection.select(station());
        selection.cycle_line(1);
        selection.cycle_direction(1);

        selection.select(station());
        assert_eq!(selection.line_index(), 0);
        assert_eq!(selection.direction_index(), 0);
    }

    #[test]
    fn active_picks_stay_within_station_bounds() {
        let mut selection = Selection::new();
        selection.select(station());

        selection.cycle_line(10);
        selection.cycle_direction(-5);
        let station = selection.station().cloned().unwrap();
        assert!(station
            .lines
            .contains(&selection.active_line_code().unwrap().to_string()));
        assert!(station
            .directions
            .iter()
            .any(|d| Some(&d.key) == selection.active_direction().map(|a| &a.key)));

        selection.set_line(99);
        assert_eq!(selection.line_index(), 1);
    }

    #[test]
    fn clear_removes_the_station() {
        let mut selection = Selection::new();
        selection.select(station());
        selection.clear();

        assert!(!selection.has_station());
        assert!(selection.active_line_code().is_none());
        assert!(selection.active_direction().is_none());
    }

    #[test]
    fn query_mismatch_clears_the_selection() {
        let mut selection = Selection::new();
        selection.select(station());

        assert!(!selection.sync_with_query("central"));
        assert!(selection.has_station());

        assert!(selection.sync_with_query("centra"));
        assert!(!selection.has_station());

        // No selection: nothing to clear.
        assert!(!selection.sync_with_query("anything"));
    }

    #[test]
    fn line_pick_does_not_change_the_station() {
        let mut selection = Selection::new();
        selection.select(station());
        selection.cycle_line(1);

        assert_eq!(selection.active_line_code(), Some("BL"));
        assert_eq!(selection.station().map(|s| s.name.as_str()), Some("Central"));
    }
}
