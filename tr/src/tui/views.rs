//! TUI views and rendering
//!
//! All rendering logic is contained here. Views draw from AppState and only
//! write back one thing: where the suggestion popover landed, so clicks can
//! be hit-tested against it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::trace;

use super::state::{AppState, Field};
use crate::domain::ItineraryResponse;
use crate::domain::options::{INTERESTS, budget_label};
use crate::form::{EMAIL_HINT, Region, Screen};
use crate::render::traveller_badge;

/// Palette
mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const ACCENT: Color = Color::Rgb(255, 215, 0); // Gold
    pub const SELECTED: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const ERROR: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const DIM: Color = Color::DarkGray;
}

/// Width of the label column on the form
const LABEL_WIDTH: usize = 18;

/// Columns taken by the focus marker and label before a value starts
const VALUE_OFFSET: u16 = (LABEL_WIDTH + 2) as u16;

const POPOVER_WIDTH: u16 = 28;

/// Main render function
pub fn render(state: &mut AppState, frame: &mut Frame) {
    trace!(screen = ?state.screen(), "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);
    match state.screen() {
        Screen::Form => render_form(state, frame, chunks[1]),
        Screen::Loading => {
            state.popover_region = None;
            render_loading(state, frame, chunks[1]);
        }
        Screen::Results => {
            state.popover_region = None;
            render_results(state, frame, chunks[1]);
        }
    }
    render_footer(state, frame, chunks[2]);
}

fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_header: called");
    let section = match state.screen() {
        Screen::Form => "Plan a trip",
        Screen::Loading => "Planning",
        Screen::Results => "Itinerary",
    };
    let line = Line::from(vec![
        Span::styled(" TravelRAD", Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
        Span::styled(" │ ", Style::default().fg(colors::DIM)),
        Span::raw(section),
    ]);
    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

/// Render the preference form and, when open, the city popover
fn render_form(state: &mut AppState, frame: &mut Frame, area: Rect) {
    trace!(focus = ?state.focus, "render_form: called");
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Your preferences ")
        .border_style(Style::default().fg(colors::HEADER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(error) = &state.form.error {
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(colors::ERROR).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    let mut focus_row = None;
    for field in state.visible_fields() {
        let focused = field == state.focus;
        if focused {
            focus_row = Some(lines.len() as u16);
        }
        lines.push(field_line(state, field, focused));
        if field == Field::Email && state.form.show_email_error() {
            lines.push(Line::from(Span::styled(
                format!("{:width$}{}", "", EMAIL_HINT, width = VALUE_OFFSET as usize),
                Style::default().fg(colors::ERROR),
            )));
        }
    }

    if let Some(row) = focus_row {
        state.follow_form_focus(row, inner.height);
    }
    let max_scroll = (lines.len() as u16).saturating_sub(inner.height);
    state.form_scroll = state.form_scroll.min(max_scroll);
    frame.render_widget(Paragraph::new(lines).scroll((state.form_scroll, 0)), inner);

    state.popover_region = None;
    if let (Some(city), Some(row)) = (state.focus.city(), focus_row)
        && row >= state.form_scroll
        && let Some(suggestions) = state.form.suggestions_for(city)
    {
        let x = inner.x + VALUE_OFFSET;
        let y = inner.y + (row - state.form_scroll) + 1;
        let bottom = area.y + area.height;
        let height = (suggestions.list.len() as u16 + 2).min(bottom.saturating_sub(y));
        let width = POPOVER_WIDTH.min((inner.x + inner.width).saturating_sub(x));
        if height > 2 && width > 2 {
            let popover = Rect::new(x, y, width, height);
            let rows: Vec<Line> = suggestions
                .list
                .iter()
                .enumerate()
                .map(|(i, city)| {
                    let style = if i == suggestions.highlighted {
                        Style::default().fg(colors::SELECTED).bg(colors::SELECTED_BG)
                    } else {
                        Style::default()
                    };
                    Line::from(Span::styled(format!(" {}", city), style))
                })
                .collect();
            frame.render_widget(Clear, popover);
            frame.render_widget(
                Paragraph::new(rows).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(colors::ACCENT)),
                ),
                popover,
            );
            state.popover_region = Some(Region::new(x, y, width, height));
        }
    }
}

/// One form row: focus marker, label, value
fn field_line(state: &AppState, field: Field, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(colors::ACCENT)),
        Span::styled(format!("{:<width$}", field.label(), width = LABEL_WIDTH), label_style),
    ];
    spans.extend(field_value(state, field, focused));
    Line::from(spans)
}

fn placeholder(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(colors::DIM))
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x] " } else { "[ ] " }
}

fn field_value(state: &AppState, field: Field, focused: bool) -> Vec<Span<'static>> {
    let prefs = &state.form.prefs;
    let chosen = Style::default().fg(colors::SELECTED);
    let text = |value: &str, hint: &str| {
        let mut spans = if value.is_empty() && !focused {
            vec![placeholder(hint)]
        } else {
            vec![Span::raw(value.to_string())]
        };
        if focused {
            spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
        }
        spans
    };
    let select = |value: Option<String>| match value {
        Some(v) if focused => vec![Span::styled(format!("‹ {} ›", v), chosen)],
        Some(v) => vec![Span::styled(v, chosen)],
        None => vec![placeholder(if focused { "‹ select ›" } else { "select" })],
    };

    match field {
        Field::FullName => text(&prefs.full_name, "Your name"),
        Field::Email => text(&prefs.email, "you@example.com"),
        Field::Origin => text(&prefs.origin, "Where from?"),
        Field::Destination => text(&prefs.destination, "Where to?"),
        Field::StartDate => select(prefs.start_date.map(|d| d.format("%a %d %b %Y").to_string())),
        Field::EndDate => select(prefs.end_date.map(|d| d.format("%a %d %b %Y").to_string())),
        Field::TravelMode => select(prefs.travel_mode.map(|m| m.to_string())),
        Field::ReturnTransport => vec![Span::raw(format!("{}Book the return leg too", checkbox(prefs.return_transport)))],
        Field::Budget => select(budget_label(&prefs.budget).map(str::to_string)),
        Field::TravellerType => select(prefs.traveller_type.map(|t| t.label().to_string())),
        Field::GroupSize => select(prefs.group_size.clone()),
        Field::Interests => INTERESTS
            .iter()
            .enumerate()
            .flat_map(|(i, interest)| {
                let mut style = if prefs.has_interest(interest) { chosen } else { Style::default() };
                if focused && i == state.interest_cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                [
                    Span::styled(format!("{}{}", checkbox(prefs.has_interest(interest)), interest), style),
                    Span::raw("  "),
                ]
            })
            .collect(),
        Field::Pace => select(Some(prefs.pace.label().to_string())),
        Field::Terms => vec![Span::raw(format!(
            "{}I agree to my preferences being processed to plan this trip",
            checkbox(state.form.terms_agreed)
        ))],
        Field::Submit => {
            let style = if focused {
                Style::default().fg(colors::SELECTED).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(colors::SELECTED)
            };
            vec![Span::styled("[ Generate Itinerary ]", style)]
        }
    }
}

fn render_loading(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_loading: called");
    let popup = centered_rect(60, 30, area);
    let lines = vec![
        Line::from(Span::styled(
            format!("Planning your trip to {}", state.form.prefs.destination),
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(state.loading_message(), Style::default().fg(colors::ACCENT))),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

fn render_results(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!(scroll = state.results_scroll, "render_results: called");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));
    let Some(itinerary) = &state.form.itinerary else {
        frame.render_widget(Paragraph::new("No itinerary").block(block), area);
        return;
    };
    let badge = traveller_badge(&state.form.prefs);
    let paragraph = Paragraph::new(itinerary_lines(itinerary, &badge))
        .block(block.title(format!(" {} ", itinerary.trip_title)))
        .wrap(Wrap { trim: false })
        .scroll((state.results_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn itinerary_lines(itinerary: &ItineraryResponse, badge: &str) -> Vec<Line<'static>> {
    let dim = Style::default().fg(colors::DIM);
    let mut lines = vec![
        Line::from(vec![Span::styled("Destination  ", dim), Span::raw(itinerary.destination.clone())]),
        Line::from(vec![
            Span::styled("Est. cost    ", dim),
            Span::styled(itinerary.total_estimated_cost.clone(), Style::default().fg(colors::SELECTED)),
        ]),
    ];
    if !badge.is_empty() {
        lines.push(Line::from(vec![Span::styled("Travellers   ", dim), Span::raw(badge.to_string())]));
    }

    for day in &itinerary.itinerary {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Day {}: {}", day.day, day.title),
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        )));
        for activity in &day.activities {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<7}", activity.time), Style::default().fg(colors::ACCENT)),
                Span::styled(activity.activity.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  @ {}", activity.location), dim),
            ]));
            lines.push(Line::from(format!("         {}", activity.description)));
            if let Some(cost) = &activity.estimated_cost {
                lines.push(Line::from(Span::styled(format!("         Cost: {}", cost), dim)));
            }
        }
    }

    if !itinerary.travel_tips.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Travel tips",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for tip in &itinerary.travel_tips {
            lines.push(Line::from(format!("  • {}", tip)));
        }
    }
    lines
}

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_footer: called");
    let keybinds: &[(&str, &str)] = match state.screen() {
        Screen::Form => {
            if state.popover_region.is_some() {
                &[("[↑↓]", "Choose"), ("[Enter]", "Pick"), ("[Esc]", "Close")]
            } else if state.focus.is_text() {
                &[("[Tab]", "Next"), ("[Ctrl+S]", "Generate"), ("[Ctrl+C]", "Quit")]
            } else {
                &[("[Tab]", "Next"), ("[←→]", "Change"), ("[Space]", "Toggle"), ("[Ctrl+S]", "Generate"), ("[q]", "Quit")]
            }
        }
        Screen::Loading => &[("[Ctrl+C]", "Quit")],
        Screen::Results => &[("[↑↓]", "Scroll"), ("[b]", "Back"), ("[e]", "Export"), ("[s]", "Share"), ("[q]", "Quit")],
    };

    let mut spans = vec![Span::raw(" ")];
    if state.screen() == Screen::Results
        && let Some(notice) = &state.notice
    {
        spans.push(Span::styled(notice.clone(), Style::default().fg(colors::ACCENT)));
        spans.push(Span::styled(" │ ", Style::default().fg(colors::DIM)));
    }
    for (key, desc) in keybinds {
        spans.push(Span::styled(*key, Style::default().fg(colors::KEYBIND)));
        spans.push(Span::raw(format!(" {}  ", desc)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)), area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    trace!(percent_x, percent_y, "centered_rect: called");
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
