//! Fixed option catalogues offered by the preference form

use tracing::debug;

/// Selectable interests, in display order
pub const INTERESTS: &[&str] = &[
    "Nature",
    "Culture",
    "Foodie",
    "Romance",
    "Nightlife",
    "Adventure",
    "Relaxation",
];

/// Value stored when the traveller has no fixed budget
pub const FLEXIBLE_BUDGET: &str = "Flexible";

/// Budget ranges as (label, value) pairs
pub const BUDGETS: &[(&str, &str)] = &[
    ("₹20,000 – ₹40,000", "₹20,000 – ₹40,000"),
    ("₹40,001 – ₹70,000", "₹40,001 – ₹70,000"),
    ("₹70,001 – ₹1,00,000", "₹70,001 – ₹1,00,000"),
    ("₹1,00,001 – ₹1,50,000", "₹1,00,001 – ₹1,50,000"),
    ("₹1,50,001 – ₹2,00,000", "₹1,50,001 – ₹2,00,000"),
    ("I am flexible", FLEXIBLE_BUDGET),
];

/// Party sizes offered when travelling as a group
pub const GROUP_SIZES: &[&str] = &["3", "4", "5", "6", "7", "8", "9", "10", "10+"];

/// Reference list for city autocomplete (order matters for suggestions)
pub const CITIES: &[&str] = &[
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Hyderabad",
    "Ahmedabad",
    "Chennai",
    "Kolkata",
    "Surat",
    "Pune",
    "Jaipur",
    "Lucknow",
    "Kanpur",
    "Nagpur",
    "Indore",
    "Thane",
    "Bhopal",
    "Visakhapatnam",
    "Patna",
    "Vadodara",
    "Ghaziabad",
    "Ludhiana",
    "Agra",
    "Nashik",
    "Varanasi",
    "Srinagar",
    "Gurgaon",
    "Manali",
    "Goa",
    "Udaipur",
    "Kochi",
];

/// Look up the display label for a stored budget value
pub fn budget_label(value: &str) -> Option<&'static str> {
    debug!(%value, "budget_label: called");
    BUDGETS.iter().find(|(_, v)| *v == value).map(|(label, _)| *label)
}

/// Is this one of the catalogue interests?
pub fn is_interest(name: &str) -> bool {
    INTERESTS.contains(&name)
}

pub fn is_budget(value: &str) -> bool {
    BUDGETS.iter().any(|(_, v)| *v == value)
}

pub fn is_group_size(value: &str) -> bool {
    GROUP_SIZES.contains(&value)
}

/// Catalogue spelling of an interest typed by hand, ignoring case
pub fn canonical_interest(name: &str) -> Option<&'static str> {
    INTERESTS.iter().copied().find(|i| i.eq_ignore_ascii_case(name.trim()))
}

/// Stored budget value for a hand-written budget, matching value or label
pub fn canonical_budget(value: &str) -> Option<&'static str> {
    let value = value.trim();
    BUDGETS
        .iter()
        .find(|(label, v)| v.eq_ignore_ascii_case(value) || label.eq_ignore_ascii_case(value))
        .map(|(_, v)| *v)
}

pub fn canonical_group_size(value: &str) -> Option<&'static str> {
    GROUP_SIZES.iter().copied().find(|s| *s == value.trim())
}

/// Step through a catalogue, wrapping at both ends
///
/// `current` of `None` starts at the first entry going forward and the last
/// entry going backward.
pub fn cycle<'a>(options: &[&'a str], current: Option<&str>, forward: bool) -> Option<&'a str> {
    debug!(?current, %forward, "cycle: called");
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match current.and_then(|c| options.iter().position(|o| *o == c)) {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Some(options[next])
}
