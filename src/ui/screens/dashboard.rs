use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(8),    // Progress chart
            Constraint::Length(8), // Today's amounts
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_progress_chart(f, chunks[1], app);
    render_daily_list(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let s = &app.summary;
    let pct = s.progress_percentage();

    render_card(
        f,
        cards[0],
        "Active Goals",
        s.active_goals.to_string(),
        theme::ACCENT,
        format!("{} reached, {} overdue", s.reached, s.overdue),
    );
    render_card(
        f,
        cards[1],
        "Saved",
        format_amount(s.total_saved),
        theme::GREEN,
        format!("of {}", format_amount(s.total_target)),
    );
    render_card(
        f,
        cards[2],
        "Daily Commitment",
        format_amount(s.daily_commitment),
        theme::YELLOW,
        format!("{} mode", app.plan_mode),
    );
    render_card(
        f,
        cards[3],
        "Overall Progress",
        format!("{pct:.1}%"),
        theme::progress_color(pct),
        String::new(),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, subtitle: String) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_progress_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Progress by Goal (%) ", theme::title_style()));

    if app.active_goals.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No active goals yet. Create one with :add <amount> <YYYY-MM-DD> <title>",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = app
        .active_goals
        .iter()
        .take(12)
        .map(|view| {
            let val = view.progress_percentage.to_u64().unwrap_or(0);
            Bar::default()
                .value(val)
                .label(Line::from(truncate(&view.goal.title, 10)))
                .style(Style::default().fg(theme::progress_color(view.progress_percentage)))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .max(100);

    f.render_widget(chart, area);
}

fn render_daily_list(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .active_goals
        .iter()
        .filter(|v| !v.is_reached())
        .take(area.height.saturating_sub(2) as usize)
        .map(|view| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<28} ", truncate(&view.goal.title, 28)),
                    theme::normal_style(),
                ),
                Span::styled(
                    view.motivation.clone(),
                    Style::default().fg(theme::tier_color(view.tier)),
                ),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Today ", theme::title_style()));

    if lines.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Nothing left to save today",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}
