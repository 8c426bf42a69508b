//! City autocomplete and pointer hit-testing

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum suggestions shown for one keystroke
pub const MAX_SUGGESTIONS: usize = 5;

/// Which city field a suggestion list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityField {
    Origin,
    Destination,
}

/// Suggestions currently offered for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitySuggestions {
    pub field: CityField,
    pub list: Vec<String>,
    /// Highlighted entry for keyboard selection
    pub highlighted: usize,
}

impl CitySuggestions {
    pub fn new(field: CityField, list: Vec<String>) -> Self {
        Self {
            field,
            list,
            highlighted: 0,
        }
    }

    pub fn highlighted_city(&self) -> Option<&str> {
        self.list.get(self.highlighted).map(String::as_str)
    }

    pub fn highlight_next(&mut self) {
        if self.highlighted + 1 < self.list.len() {
            self.highlighted += 1;
        }
    }

    pub fn highlight_prev(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }
}

/// Case-insensitive prefix matches, capped, in catalogue order
pub fn suggest_cities(input: &str, catalogue: &[&str]) -> Vec<String> {
    debug!(%input, "suggest_cities: called");
    if input.is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    let matches: Vec<String> = catalogue
        .iter()
        .filter(|city| city.to_lowercase().starts_with(&needle))
        .take(MAX_SUGGESTIONS)
        .map(|city| city.to_string())
        .collect();
    debug!(count = matches.len(), "suggest_cities: matched");
    matches
}

/// A rectangular screen region in cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Is the point inside (edges inclusive of the origin, exclusive of the far side)?
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && row >= self.y
            && u32::from(column) < u32::from(self.x) + u32::from(self.width)
            && u32::from(row) < u32::from(self.y) + u32::from(self.height)
    }
}

/// Did a pointer press land outside the tracked region?
///
/// With nothing tracked there is nothing to be outside of.
pub fn is_outside(region: Option<Region>, column: u16, row: u16) -> bool {
    region.is_some_and(|r| !r.contains(column, row))
}
