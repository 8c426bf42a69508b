//! Plain-text, markdown and JSON renderings of an itinerary

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use crate::domain::{ItineraryResponse, TravellerType, TripPreferences};

/// Output format for a finished itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Short traveller badge, e.g. `group (4)` or `couple`
pub fn traveller_badge(prefs: &TripPreferences) -> String {
    match (prefs.traveller_type, prefs.group_size.as_deref()) {
        (Some(TravellerType::Group), Some(size)) if !size.is_empty() => format!("group ({})", size),
        (Some(t), _) => t.to_string(),
        (None, _) => String::new(),
    }
}

/// Join rendered lines, ending with a newline
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render for a terminal, with colour when stdout supports it
pub fn render_text(itinerary: &ItineraryResponse, prefs: Option<&TripPreferences>) -> String {
    debug!(days = itinerary.itinerary.len(), "render_text: called");
    let mut lines = vec![
        itinerary.trip_title.bold().to_string(),
        format!("{} {}", "Destination:".dimmed(), itinerary.destination),
        format!("{} {}", "Total estimated cost:".dimmed(), itinerary.total_estimated_cost.green()),
    ];
    if let Some(prefs) = prefs {
        let badge = traveller_badge(prefs);
        if !badge.is_empty() {
            lines.push(format!("{} {}", "Travellers:".dimmed(), badge));
        }
    }

    for day in &itinerary.itinerary {
        lines.push(String::new());
        lines.push(format!("Day {}: {}", day.day, day.title).cyan().bold().to_string());
        for activity in &day.activities {
            lines.push(format!("  {}  {}", activity.time.yellow(), activity.activity.bold()));
            lines.push(format!("         {} {}", "@".dimmed(), activity.location));
            lines.push(format!("         {}", activity.description));
            if let Some(cost) = &activity.estimated_cost {
                lines.push(format!("         {} {}", "Cost:".dimmed(), cost));
            }
        }
    }

    if !itinerary.travel_tips.is_empty() {
        lines.push(String::new());
        lines.push("Travel tips".bold().to_string());
        lines.extend(itinerary.travel_tips.iter().map(|tip| format!("  - {}", tip)));
    }
    finish(lines)
}

/// Render as a markdown document
pub fn render_markdown(itinerary: &ItineraryResponse, prefs: Option<&TripPreferences>) -> String {
    debug!(days = itinerary.itinerary.len(), "render_markdown: called");
    let mut lines = vec![
        format!("# {}", itinerary.trip_title),
        String::new(),
        format!("- **Destination:** {}", itinerary.destination),
        format!("- **Total estimated cost:** {}", itinerary.total_estimated_cost),
    ];
    if let Some(prefs) = prefs {
        let badge = traveller_badge(prefs);
        if !badge.is_empty() {
            lines.push(format!("- **Travellers:** {}", badge));
        }
        if let (Some(start), Some(end)) = (prefs.start_date, prefs.end_date) {
            lines.push(format!("- **Dates:** {} to {}", start, end));
        }
    }

    for day in &itinerary.itinerary {
        lines.push(String::new());
        lines.push(format!("## Day {}: {}", day.day, day.title));
        lines.push(String::new());
        for activity in &day.activities {
            let mut line = format!(
                "- **{}** {} ({}): {}",
                activity.time, activity.activity, activity.location, activity.description
            );
            if let Some(cost) = &activity.estimated_cost {
                line.push_str(&format!(" *{}*", cost));
            }
            lines.push(line);
        }
    }

    if !itinerary.travel_tips.is_empty() {
        lines.push(String::new());
        lines.push("## Travel tips".to_string());
        lines.push(String::new());
        lines.extend(itinerary.travel_tips.iter().map(|tip| format!("- {}", tip)));
    }
    finish(lines)
}

/// Render in the requested format
pub fn render(itinerary: &ItineraryResponse, prefs: Option<&TripPreferences>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(itinerary, prefs)),
        OutputFormat::Markdown => Ok(render_markdown(itinerary, prefs)),
        OutputFormat::Json => serde_json::to_string_pretty(itinerary).context("Failed to serialize itinerary"),
    }
}

/// File name derived from the trip title, e.g. `goa-getaway.md`
pub fn export_file_name(itinerary: &ItineraryResponse, format: OutputFormat) -> String {
    let slug = itinerary
        .trip_title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { "itinerary".to_string() } else { slug };
    format!("{}.{}", slug, format.extension())
}

/// Write an itinerary into a directory and return the path written
///
/// Markdown is the printable export; JSON is the shareable form.
pub fn write_export(
    dir: &Path,
    itinerary: &ItineraryResponse,
    prefs: Option<&TripPreferences>,
    format: OutputFormat,
) -> Result<PathBuf> {
    debug!(?dir, ?format, "write_export: called");
    fs::create_dir_all(dir).context(format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(export_file_name(itinerary, format));
    let content = match format {
        // Files never carry terminal colour codes
        OutputFormat::Text => {
            colored::control::set_override(false);
            let text = render_text(itinerary, prefs);
            colored::control::unset_override();
            text
        }
        other => render(itinerary, prefs, other)?,
    };
    fs::write(&path, content).context(format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "write_export: written");
    Ok(path)
}
