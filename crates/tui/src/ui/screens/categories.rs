use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use api_types::Activity;

use crate::{
    app::{AppState, CategoriesMode, CategoryField},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, &theme);

    match state.categories.mode {
        CategoriesMode::Companies | CategoriesMode::LinkPicker | CategoriesMode::ConfirmUnlink => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(layout[1]);
            render_list(frame, columns[0], state, &theme);
            match state.categories.mode {
                CategoriesMode::LinkPicker => render_picker(frame, columns[1], state, &theme),
                CategoriesMode::ConfirmUnlink => {
                    render_unlink_confirm(frame, columns[1], state, &theme)
                }
                _ => render_linked_panel(frame, columns[1], state, &theme),
            }
        }
        CategoriesMode::Form => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(8), Constraint::Min(0)])
                .split(layout[1]);
            render_form(frame, split[0], state, &theme);
            render_list(frame, split[1], state, &theme);
        }
        CategoriesMode::ConfirmDelete => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(layout[1]);
            render_delete_confirm(frame, split[0], state, &theme);
            render_list(frame, split[1], state, &theme);
        }
        CategoriesMode::List => render_list(frame, layout[1], state, &theme),
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mode = match state.categories.mode {
        CategoriesMode::List => "List",
        CategoriesMode::Form => {
            if state.categories.form.editing.is_some() {
                "Edit"
            } else {
                "Create"
            }
        }
        CategoriesMode::Companies => "Companies",
        CategoriesMode::LinkPicker => "Link",
        CategoriesMode::ConfirmDelete => "Delete",
        CategoriesMode::ConfirmUnlink => "Unlink",
    };
    let mut line = vec![
        Span::styled("Mode", Style::default().fg(theme.dim)),
        Span::raw(format!(": {mode}")),
    ];
    if state.categories.loading {
        line.push(Span::raw("   "));
        line.push(Span::styled("Loading…", Style::default().fg(theme.dim)));
    }
    if let Some(err) = state.categories.error.as_ref() {
        line.push(Span::raw("   "));
        line.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title("Categories");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn activity_chip(activity: Activity, theme: &Theme) -> Span<'static> {
    let color = match activity {
        Activity::Water => theme.accent,
        Activity::Land => theme.positive,
    };
    Span::styled(
        format!("[{}]", activity.as_str().to_uppercase()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if state.categories.items.is_empty() {
        let message = if state.categories.loading {
            Line::from("Loading categories…")
        } else {
            Line::from(vec![
                Span::raw("No categories found. Press "),
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
        .categories
        .items
        .iter()
        .map(|category| {
            let mut spans = vec![
                Span::styled(format!("{:>3} ", category.order), Style::default().fg(theme.dim)),
                Span::styled(category.name.clone(), Style::default().fg(theme.text)),
                Span::raw(" "),
                activity_chip(category.activity, theme),
            ];
            if let Some(description) = category.description.as_deref() {
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
    list_state.select(Some(state.categories.selected));

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
    let form = &state.categories.form;
    let editing = form.editing.is_some();

    let mut lines = vec![
        render_field("Name", &form.name, form.focus == CategoryField::Name, theme),
        render_field(
            "Description",
            &form.description,
            form.focus == CategoryField::Description,
            theme,
        ),
        render_field("Order", &form.order, form.focus == CategoryField::Order, theme),
        Line::from(vec![
            Span::styled(format!("{:<12}", "Activity"), Style::default().fg(theme.text)),
            Span::raw(" "),
            activity_chip(form.activity, theme),
            Span::styled("  ←/→ to toggle", Style::default().fg(theme.dim)),
        ]),
        Line::from(Span::styled(
            "Enter: save • Tab: next • Esc: cancel",
            Style::default().fg(theme.dim),
        )),
    ];

    if let Some(err) = form.error.as_ref() {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title(if editing { "Edit Category" } else { "New Category" })
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_linked_panel(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let panel = &state.categories.companies;
    let name = panel
        .category
        .as_ref()
        .map(|(_, name)| name.as_str())
        .unwrap_or("?");
    let block = Block::default()
        .title(format!("Companies — {name}"))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));

    if panel.loading && panel.items.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from("Loading companies…"))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    if panel.items.is_empty() && panel.error.is_none() {
        let lines = vec![
            Line::from("No companies connected to this category."),
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("l", Style::default().fg(theme.accent)),
                Span::raw(" to link one."),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(block),
            area,
        );
        return;
    }

    let mut lines = Vec::new();
    if let Some(err) = panel.error.as_ref() {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        )));
    }

    let items = panel
        .items
        .iter()
        .map(|company| {
            let mut spans = vec![
                Span::styled(company.name.clone(), Style::default().fg(theme.text)),
                Span::raw(" "),
                active_chip(company.is_active, theme),
            ];
            if let Some(email) = company.email.as_deref() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(email.to_string(), Style::default().fg(theme.dim)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect::<Vec<_>>();

    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(lines.len() as u16), Constraint::Min(0)])
        .split(block.inner(area));
    frame.render_widget(block, area);
    if !lines.is_empty() {
        frame.render_widget(Paragraph::new(lines), split[0]);
    }

    let mut list_state = ListState::default();
    list_state.select(Some(panel.selected));
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, split[1], &mut list_state);
}

fn render_picker(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let picker = &state.categories.picker;
    let name = picker
        .category
        .as_ref()
        .map(|(_, name)| name.as_str())
        .unwrap_or("?");
    let block = Block::default()
        .title(format!("Link Company — {name}"))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));

    if state.companies.items.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from("No companies available."))
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
            ListItem::new(Line::from(vec![
                Span::styled(company.name.clone(), Style::default().fg(theme.text)),
                Span::raw(" "),
                active_chip(company.is_active, theme),
            ]))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(picker.selected));
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

fn render_unlink_confirm(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let panel = &state.categories.companies;
    let company = panel
        .items
        .get(panel.selected)
        .map(|company| company.name.as_str())
        .unwrap_or("?");
    let lines = vec![
        Line::from(format!("Unlink \"{company}\" from this category?")),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" confirm  "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" cancel"),
        ]),
    ];
    let block = Block::default()
        .title("Confirm Unlink")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.warning));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

fn render_delete_confirm(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let name = state
        .categories
        .items
        .get(state.categories.selected)
        .map(|category| category.name.as_str())
        .unwrap_or("?");
    let line = Line::from(vec![
        Span::raw(format!("Delete category \"{name}\"? ")),
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

fn active_chip(is_active: bool, theme: &Theme) -> Span<'static> {
    if is_active {
        Span::styled("[ACTIVE]", Style::default().fg(theme.positive))
    } else {
        Span::styled("[INACTIVE]", Style::default().fg(theme.dim))
    }
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
