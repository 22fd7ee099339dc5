use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::plan::{self, PlanInput, PlanMode, SavingsPlan};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar};

/// What the Plan screen is showing.
struct Subject {
    title: String,
    input: PlanInput,
    plan: SavingsPlan,
}

fn subject(app: &App) -> Option<Subject> {
    if let Some(calc) = &app.calculation {
        return Some(Subject {
            title: "Quick calculation".into(),
            input: calc.input,
            plan: calc.plan,
        });
    }
    app.selected_goal().map(|view| Subject {
        title: view.goal.title.clone(),
        input: view.goal.plan_input(),
        plan: view.plan,
    })
}

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(subject) = subject(app) else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Plan ", theme::title_style()));
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Select a goal on the Goals screen and press Enter",
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                "or run :calc <amount> <YYYY-MM-DD> [saved]",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(5), // Amount cards
            Constraint::Length(7), // Comparisons + message
            Constraint::Min(5),    // Strategies
        ])
        .split(area);

    render_header(f, chunks[0], &subject, app.today);
    render_amounts(f, chunks[1], &subject.plan);
    render_comparisons(f, chunks[2], &subject.plan);
    render_strategies(f, chunks[3], &subject, app);
}

fn render_header(f: &mut Frame, area: Rect, subject: &Subject, today: chrono::NaiveDate) {
    let input = &subject.input;
    let pct = plan::progress_percentage(input.current_saved, input.target_amount);

    let days = input.days_until(today);
    let when = if days > 0 {
        format!("{} ({days} days)", input.target_date)
    } else {
        format!("{} (overdue)", input.target_date)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", format_amount(input.target_amount)), theme::normal_style()),
            Span::styled(format!("by {when}"), theme::dim_style()),
        ]),
        Line::from(vec![
            Span::styled(
                format!(" {} ", progress_bar(pct, 24)),
                Style::default().fg(theme::progress_color(pct)),
            ),
            Span::styled(
                format!("{} saved, {} to go", format_amount(input.current_saved), format_amount(subject.plan.amount_remaining)),
                theme::dim_style(),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {} [{} mode] ", subject.title, subject.plan.mode),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_amounts(f: &mut Frame, area: Rect, plan: &SavingsPlan) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let color = theme::tier_color(plan.tier());
    for (i, (label, amount)) in [
        ("Daily", plan.daily_amount),
        ("Weekly", plan.weekly_amount),
        ("Monthly", plan.monthly_amount),
    ]
    .into_iter()
    .enumerate()
    {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(format!(" {label} "), theme::title_style()));
        let text = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format_amount(amount),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(text, cards[i]);
    }
}

fn render_comparisons(f: &mut Frame, area: Rect, plan: &SavingsPlan) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let lines: Vec<Line> = plan
        .comparisons
        .entries()
        .iter()
        .map(|(price, count)| {
            Line::from(vec![
                Span::styled(
                    format!(" {count:>7} "),
                    Style::default()
                        .fg(theme::YELLOW)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(price.label, theme::normal_style()),
                Span::styled(format!(" @ {}", format_amount(price.price())), theme::dim_style()),
            ])
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" That's about ", theme::title_style()));
    f.render_widget(Paragraph::new(lines).block(block), halves[0]);

    let mut message = vec![
        Line::from(""),
        Line::from(Span::styled(
            plan.motivation(),
            Style::default()
                .fg(theme::tier_color(plan.tier()))
                .add_modifier(Modifier::BOLD),
        )),
    ];
    if plan.mode == PlanMode::Compound {
        message.push(Line::from(Span::styled(
            format!(
                "Interest covers {} of the remaining amount",
                format_amount(plan.amount_remaining - plan.present_value)
            ),
            theme::dim_style(),
        )));
    }
    if !plan.is_achievable {
        message.push(Line::from(Span::styled(
            format!(
                "Over {}/day. A later date or a relaxed strategy may help.",
                format_amount(plan::ACHIEVABLE_DAILY_LIMIT)
            ),
            Style::default().fg(theme::RED),
        )));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Motivation ", theme::title_style()));
    f.render_widget(
        Paragraph::new(message)
            .centered()
            .wrap(Wrap { trim: true })
            .block(block),
        halves[1],
    );
}

fn render_strategies(f: &mut Frame, area: Rect, subject: &Subject, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Strategies ", theme::title_style()));

    let strategies = match plan::savings_strategies(&subject.input, app.today) {
        Ok(s) => s,
        Err(e) => {
            let msg = Paragraph::new(Line::from(Span::styled(e.to_string(), theme::dim_style())))
                .centered()
                .block(block);
            f.render_widget(msg, area);
            return;
        }
    };

    let header = Row::new(
        ["Strategy", "Days", "Reach by", "Daily", "Weekly", "Monthly", ""]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = strategies
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(s.kind.as_str()),
                Cell::from(s.days.to_string()),
                Cell::from(s.target_date.to_string()),
                Cell::from(format_amount(s.daily_amount)),
                Cell::from(format_amount(s.weekly_amount)),
                Cell::from(format_amount(s.monthly_amount)),
                Cell::from(Span::styled(s.kind.description(), theme::dim_style())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(11),
        Constraint::Length(6),
        Constraint::Length(11),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(13),
        Constraint::Min(10),
    ];
    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}
