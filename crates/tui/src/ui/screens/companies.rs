use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{app::AppState, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, &theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[1]);
    render_list(frame, columns[0], state, &theme);
    render_detail(frame, columns[1], state, &theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut line = vec![
        Span::styled("Catalog", Style::default().fg(theme.dim)),
        Span::raw(format!(": {} companies", state.companies.items.len())),
    ];
    if state.companies.loading {
        line.push(Span::raw("   "));
        line.push(Span::styled("Loading…", Style::default().fg(theme.dim)));
    }
    if let Some(err) = state.companies.error.as_ref() {
        line.push(Span::raw("   "));
        line.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title("Companies");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if state.companies.items.is_empty() {
        let message = if state.companies.loading {
            "Loading companies…"
        } else {
            "No companies in the catalog."
        };
        frame.render_widget(
            Paragraph::new(Line::from(message))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let items = state
        .companies
        .items
        .iter()
        .map(|company| {
            let chip = if company.is_active {
                Span::styled("[ACTIVE]", Style::default().fg(theme.positive))
            } else {
                Span::styled("[INACTIVE]", Style::default().fg(theme.dim))
            };
            ListItem::new(Line::from(vec![
                Span::styled(company.name.clone(), Style::default().fg(theme.text)),
                Span::raw(" "),
                chip,
            ]))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.companies.selected));

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

fn render_detail(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .title("Company Detail")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));

    let Some(company) = state.companies.items.get(state.companies.selected) else {
        frame.render_widget(
            Paragraph::new(Line::from("No company selected."))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    };

    let field = |label: &str, value: Option<&str>| {
        Line::from(vec![
            Span::styled(format!("{label:<10}"), Style::default().fg(theme.dim)),
            Span::raw(" "),
            Span::raw(value.unwrap_or("-").to_string()),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(
            company.name.clone(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("About", company.description.as_deref()),
        field("Email", company.email.as_deref()),
        field("Phone", company.phone.as_deref()),
        field("Address", company.address.as_deref()),
        field(
            "Status",
            Some(if company.is_active { "active" } else { "inactive" }),
        ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
