//! Trip preferences collected by the form

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::options::{canonical_budget, canonical_group_size, canonical_interest};

/// How the traveller wants to get to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelMode {
    #[default]
    Flight,
    Train,
    Bus,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [TravelMode::Flight, TravelMode::Train, TravelMode::Bus];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Train => "Train",
            Self::Bus => "Bus",
        }
    }

    /// Next mode in display order, wrapping
    pub fn next(self) -> Self {
        match self {
            Self::Flight => Self::Train,
            Self::Train => Self::Bus,
            Self::Bus => Self::Flight,
        }
    }

    /// Previous mode in display order, wrapping
    pub fn prev(self) -> Self {
        match self {
            Self::Flight => Self::Bus,
            Self::Train => Self::Flight,
            Self::Bus => Self::Train,
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Party composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravellerType {
    Solo,
    Couple,
    Group,
}

impl TravellerType {
    pub const ALL: [TravellerType; 3] = [TravellerType::Solo, TravellerType::Couple, TravellerType::Group];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Couple => "couple",
            Self::Group => "group",
        }
    }

    /// Human label for selects
    pub fn label(&self) -> &'static str {
        match self {
            Self::Solo => "Solo",
            Self::Couple => "Couple",
            Self::Group => "Group",
        }
    }
}

impl std::fmt::Display for TravellerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Requested density of activities per day
///
/// Serialized as the slider value 1-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Pace {
    Slow = 1,
    #[default]
    Moderate = 2,
    Fast = 3,
}

impl Pace {
    /// Label used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::Slow => "Slow & Relaxed",
            Self::Moderate => "Moderate",
            Self::Fast => "Fast-paced & Packed",
        }
    }

    /// Short label for the slider ends
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Moderate => "Moderate",
            Self::Fast => "Fast",
        }
    }

    /// One step faster, saturating
    pub fn faster(self) -> Self {
        match self {
            Self::Slow => Self::Moderate,
            _ => Self::Fast,
        }
    }

    /// One step slower, saturating
    pub fn slower(self) -> Self {
        match self {
            Self::Fast => Self::Moderate,
            _ => Self::Slow,
        }
    }
}

impl TryFrom<u8> for Pace {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Slow),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Fast),
            other => Err(format!("pace must be 1, 2 or 3 (got {})", other)),
        }
    }
}

impl From<Pace> for u8 {
    fn from(pace: Pace) -> Self {
        pace as u8
    }
}

/// Everything the traveller entered on the form
///
/// Mutated field by field while the form is open; cloned into an
/// immutable snapshot at the moment of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TripPreferences {
    pub full_name: String,
    pub email: String,
    pub origin: String,
    pub destination: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub travel_mode: Option<TravelMode>,
    pub return_transport: bool,
    pub budget: String,
    pub traveller_type: Option<TravellerType>,
    pub group_size: Option<String>,
    /// Selected interests in the order they were picked
    pub interests: Vec<String>,
    pub pace: Pace,
}

impl Default for TripPreferences {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            origin: String::new(),
            destination: String::new(),
            start_date: None,
            end_date: None,
            travel_mode: Some(TravelMode::default()),
            return_transport: false,
            budget: String::new(),
            traveller_type: None,
            group_size: None,
            interests: Vec::new(),
            pace: Pace::default(),
        }
    }
}

impl TripPreferences {
    /// Traveller description used in prompts and badges
    ///
    /// Groups are described by their size range, everyone else by type.
    pub fn traveller_detail(&self) -> String {
        debug!(?self.traveller_type, ?self.group_size, "TripPreferences::traveller_detail: called");
        match self.traveller_type {
            Some(TravellerType::Group) => {
                format!("Group Size Range: {}", self.group_size.as_deref().unwrap_or_default())
            }
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    /// Toggle membership of an interest, keeping selection order
    pub fn toggle_interest(&mut self, interest: &str) {
        debug!(%interest, "TripPreferences::toggle_interest: called");
        if let Some(idx) = self.interests.iter().position(|i| i == interest) {
            debug!("TripPreferences::toggle_interest: removing");
            self.interests.remove(idx);
        } else {
            debug!("TripPreferences::toggle_interest: adding");
            self.interests.push(interest.to_string());
        }
    }

    pub fn has_interest(&self, interest: &str) -> bool {
        self.interests.iter().any(|i| i == interest)
    }

    /// Hand-written values that match no catalogue entry, even ignoring case
    ///
    /// Empty fields are not reported here; submission validation covers them.
    pub fn unknown_options(&self) -> Vec<String> {
        debug!("TripPreferences::unknown_options: called");
        let mut unknown = Vec::new();
        if !self.budget.is_empty() && canonical_budget(&self.budget).is_none() {
            unknown.push(format!("budget \"{}\"", self.budget));
        }
        if let Some(size) = self.group_size.as_deref().filter(|s| !s.is_empty())
            && canonical_group_size(size).is_none()
        {
            unknown.push(format!("group size \"{}\"", size));
        }
        for interest in &self.interests {
            if canonical_interest(interest).is_none() {
                unknown.push(format!("interest \"{}\"", interest));
            }
        }
        unknown
    }

    /// Load preferences from a YAML or JSON file
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // JSON is a YAML subset, so one parser covers both file types
        serde_yaml::from_str(content)
    }
}
