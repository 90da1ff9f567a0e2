use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{AppState, SliderField, SlidersMode},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, &theme);

    let (overlay_area, list_area) = match state.sliders.mode {
        SlidersMode::Form => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(9), Constraint::Min(0)])
                .split(layout[1]);
            (Some(split[0]), split[1])
        }
        SlidersMode::ConfirmDelete => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(layout[1]);
            (Some(split[0]), split[1])
        }
        SlidersMode::List => (None, layout[1]),
    };

    if let Some(overlay_area) = overlay_area {
        match state.sliders.mode {
            SlidersMode::Form => render_form(frame, overlay_area, state, &theme),
            SlidersMode::ConfirmDelete => render_confirm(frame, overlay_area, state, &theme),
            SlidersMode::List => {}
        }
    }

    render_list(frame, list_area, state, &theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mode = match state.sliders.mode {
        SlidersMode::List => "List",
        SlidersMode::Form => {
            if state.sliders.form.editing.is_some() {
                "Edit"
            } else {
                "Create"
            }
        }
        SlidersMode::ConfirmDelete => "Delete",
    };
    let mut line = vec![
        Span::styled("Mode", Style::default().fg(theme.dim)),
        Span::raw(format!(": {mode}")),
    ];
    if state.sliders.loading {
        line.push(Span::raw("   "));
        line.push(Span::styled("Loading…", Style::default().fg(theme.dim)));
    }
    if let Some(err) = state.sliders.error.as_ref() {
        line.push(Span::raw("   "));
        line.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title("Sliders");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if state.sliders.items.is_empty() {
        let message = if state.sliders.loading {
            Line::from("Loading sliders…")
        } else {
            Line::from(vec![
                Span::raw("No sliders found. Press "),
                Span::styled("a", Style::default().fg(theme.accent)),
                Span::raw(" to add one."),
            ])
        };
        frame.render_widget(
            Paragraph::new(message).alignment(Alignment::Center).block(block),
            area,
        );
        return;
    }

    let items = state
        .sliders
        .items
        .iter()
        .map(|slider| {
            let mut spans = vec![Span::styled(
                slider.title.clone(),
                Style::default().fg(theme.text),
            )];
            if let Some(link) = slider.link.as_deref() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(link.to_string(), Style::default().fg(theme.accent)));
            }
            if let Some(description) = slider.description.as_deref() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    description.to_string(),
                    Style::default().fg(theme.dim),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.sliders.selected));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.sliders.form;
    let editing = form.editing.is_some();

    let mut lines = vec![
        render_field("Title", &form.title, form.focus == SliderField::Title, theme),
        render_field(
            "Description",
            &form.description,
            form.focus == SliderField::Description,
            theme,
        ),
        render_field("Link", &form.link, form.focus == SliderField::Link, theme),
        render_field("Image", &form.image, form.focus == SliderField::Image, theme),
    ];

    lines.push(Line::from(Span::styled(
        if editing {
            "Image: local file path, leave empty to keep the current one"
        } else {
            "Image: local file path, required for new sliders"
        },
        Style::default().fg(theme.warning),
    )));
    lines.push(Line::from(Span::styled(
        "Enter: save • Tab: next • Esc: cancel",
        Style::default().fg(theme.dim),
    )));

    if let Some(err) = form.error.as_ref() {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title(if editing { "Edit Slider" } else { "New Slider" })
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let title = state
        .sliders
        .items
        .get(state.sliders.selected)
        .map(|slider| slider.title.as_str())
        .unwrap_or("?");
    let line = Line::from(vec![
        Span::raw(format!("Delete slider \"{title}\"? ")),
        Span::styled("y", Style::default().fg(theme.accent)),
        Span::raw("/"),
        Span::styled("n", Style::default().fg(theme.accent)),
    ]);
    let block = Block::default()
        .title("Confirm")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.warning));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_field(label: &str, value: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let label_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(format!("{label:<12}"), label_style),
        Span::raw(" "),
        Span::styled(value.to_string(), Style::default().fg(theme.text)),
    ])
}
