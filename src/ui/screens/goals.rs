use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let filters = filter_label(app);

    if app.goals.is_empty() {
        let msg = if app.search_input.is_empty() && filters.is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled("No goals yet", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Add one with :add <amount> <YYYY-MM-DD> <title>",
                    theme::dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No goals match the current search or filter",
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Esc to clear the search, :filter to clear filters",
                    theme::dim_style(),
                )),
            ]
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Goals (0) ", theme::title_style()));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Title", "Category", "Status", "Progress", "Saved / Target", "Daily", "Target date"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .goals
        .iter()
        .enumerate()
        .skip(app.goal_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, view)| {
            let goal = &view.goal;
            let pct = view.progress_percentage;

            let style = if i == app.goal_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let daily = if view.is_reached() {
                Span::styled("reached", Style::default().fg(theme::GREEN))
            } else if view.plan.days_remaining == 0 {
                Span::styled("overdue", Style::default().fg(theme::RED))
            } else {
                Span::styled(
                    format_amount(view.plan.daily_amount),
                    Style::default().fg(theme::tier_color(view.tier)),
                )
            };

            Row::new(vec![
                Cell::from(truncate(&goal.title, 30)),
                Cell::from(goal.category.as_str()),
                Cell::from(goal.status.as_str()),
                Cell::from(Span::styled(
                    format!("{} {pct:>3.0}%", progress_bar(pct, 10)),
                    Style::default().fg(theme::progress_color(pct)),
                )),
                Cell::from(format!(
                    "{} / {}",
                    format_amount(goal.current_saved),
                    format_amount(goal.target_amount)
                )),
                Cell::from(daily),
                Cell::from(goal.target_date.to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(27),
        Constraint::Length(11),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(
                    " Goals ({}) {}{} ",
                    app.goals.len(),
                    filters,
                    if !app.search_input.is_empty() {
                        format!("search: '{}'", app.search_input)
                    } else {
                        String::new()
                    }
                ),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}

fn filter_label(app: &App) -> String {
    let mut parts = Vec::new();
    if let Some(status) = app.status_filter {
        parts.push(status.as_str());
    }
    if let Some(category) = app.category_filter {
        parts.push(category.as_str());
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("[{}] ", parts.join(", "))
    }
}
