pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, CategoriesMode, Section, SlidersMode};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    // Main layout: info bar, tabs, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar (label + gap)
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        Section::Sliders => screens::sliders::render(frame, layout[2], state),
        Section::Categories => screens::categories::render(frame, layout[2], state),
        Section::Companies => screens::companies::render(frame, layout[2], state),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let status = if state.connection.ok { "OK" } else { "ERR" };
    let status_style = if state.connection.ok {
        Style::default().fg(theme.positive)
    } else {
        Style::default().fg(theme.error)
    };

    let line = Line::from(vec![
        Span::styled("Feed", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Refresh", Style::default().fg(theme.dim)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context_hints = get_context_hints(state, theme);
    if !context_hints.is_empty() {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.extend(context_hints);
    }

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Returns context-specific keyboard hints based on current section and mode.
fn get_context_hints(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    match state.section {
        Section::Sliders => match state.sliders.mode {
            SlidersMode::List => hint_pairs(
                theme,
                &[("a", "add"), ("e", "edit"), ("d", "delete"), ("r", "refresh")],
            ),
            SlidersMode::Form => hint_pairs(
                theme,
                &[("Enter", "save"), ("Tab", "next"), ("Esc", "cancel")],
            ),
            SlidersMode::ConfirmDelete => hint_pairs(theme, &[("y", "confirm"), ("n", "cancel")]),
        },
        Section::Categories => match state.categories.mode {
            CategoriesMode::List => hint_pairs(
                theme,
                &[
                    ("a", "add"),
                    ("e", "edit"),
                    ("d", "delete"),
                    ("v", "companies"),
                    ("l", "link"),
                    ("r", "refresh"),
                ],
            ),
            CategoriesMode::Form => hint_pairs(
                theme,
                &[
                    ("Enter", "save"),
                    ("Tab", "next"),
                    ("←/→", "activity"),
                    ("Esc", "cancel"),
                ],
            ),
            CategoriesMode::Companies => hint_pairs(
                theme,
                &[
                    ("l", "link"),
                    ("u", "unlink"),
                    ("r", "refresh"),
                    ("Esc", "back"),
                ],
            ),
            CategoriesMode::LinkPicker => hint_pairs(theme, &[("Enter", "link"), ("Esc", "cancel")]),
            CategoriesMode::ConfirmDelete | CategoriesMode::ConfirmUnlink => {
                hint_pairs(theme, &[("y", "confirm"), ("n", "cancel")])
            }
        },
        Section::Companies => hint_pairs(theme, &[("r", "refresh")]),
    }
}

fn hint_pairs(theme: &Theme, pairs: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, (key, label)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {label}")));
    }
    spans
}
