use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::app::{App, Calculation, InputMode, PendingAction, Screen};
use super::util::format_amount;
use crate::db::Database;
use crate::models::{Goal, GoalCategory, GoalStatus, GoalUpdate};
use crate::plan::{self, PlanInput, PlanMode};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("g", "Go to Goals", cmd_goals, r);
    register_command!("goals", "Go to Goals", cmd_goals, r);
    register_command!("p", "Go to Plan", cmd_plan, r);
    register_command!("plan", "Go to Plan", cmd_plan, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Create goal (e.g. :add 3000 2026-06-01 Trip to Lisbon)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Create goal (e.g. :a 3000 2026-06-01 Trip to Lisbon)",
        cmd_add,
        r
    );
    register_command!(
        "save",
        "Record savings on selected goal (e.g. :save 25)",
        cmd_save,
        r
    );
    register_command!("s", "Record savings on selected goal", cmd_save, r);
    register_command!(
        "target",
        "Change target amount (e.g. :target 4500)",
        cmd_target,
        r
    );
    register_command!(
        "date",
        "Change target date (e.g. :date 2027-01-31)",
        cmd_date,
        r
    );
    register_command!("title", "Rename selected goal", cmd_title, r);
    register_command!(
        "status",
        "Set status: active, completed, paused",
        cmd_status,
        r
    );
    register_command!(
        "category",
        "Set category (e.g. :category travel)",
        cmd_category,
        r
    );
    register_command!("archive", "Archive selected goal", cmd_archive, r);
    register_command!(
        "delete",
        "Permanently delete selected goal",
        cmd_delete,
        r
    );
    register_command!(
        "calc",
        "Quick plan (e.g. :calc 5000 2027-12-31 [saved])",
        cmd_calc,
        r
    );
    register_command!(
        "mode",
        "Switch plan mode: simple or compound",
        cmd_mode,
        r
    );
    register_command!(
        "filter",
        "Filter goals by status or category (no args clears)",
        cmd_filter,
        r
    );
    register_command!(
        "export",
        "Export goals to CSV (e.g. :export ~/goals.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_goals(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Goals;
    app.refresh_goals(db)?;
    Ok(())
}

fn cmd_plan(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.calculation = None;
    app.screen = Screen::Plan;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 3 {
        app.set_status("Usage: :add <amount> <YYYY-MM-DD> <title>");
        return Ok(());
    }

    let Some(amount) = parse_amount_or_status(parts[0], app) else {
        return Ok(());
    };
    let Some(date) = parse_date_or_status(parts[1], app) else {
        return Ok(());
    };

    let goal = Goal::new(parts[2..].join(" "), amount, date, GoalCategory::default());
    let goal = match goal.validated(app.today) {
        Ok(g) => g,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };

    let id = db.insert_goal(&goal)?;
    app.refresh_all(db)?;
    app.select_goal(id);
    let daily = goal.view(app.today, app.plan_mode).plan.daily_amount;
    app.set_status(format!(
        "Created '{}': {}",
        goal.title,
        plan::select_message(daily)
    ));
    Ok(())
}

fn cmd_save(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :save <amount> (negative to withdraw)");
        return Ok(());
    }
    let Some(id) = require_selected(app) else {
        return Ok(());
    };
    let Some(amount) = parse_amount_or_status(args, app) else {
        return Ok(());
    };

    match db.add_savings(id, amount) {
        Ok(Some(goal)) => {
            app.refresh_all(db)?;
            app.set_status(format!(
                "{}: {} of {} saved ({:.0}%)",
                goal.title,
                format_amount(goal.current_saved),
                format_amount(goal.target_amount),
                goal.progress_percentage()
            ));
        }
        Ok(None) => app.set_status("Goal no longer exists"),
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_target(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :target <amount>");
        return Ok(());
    }
    let Some(amount) = parse_amount_or_status(args, app) else {
        return Ok(());
    };
    let update = GoalUpdate {
        target_amount: Some(amount),
        ..Default::default()
    };
    apply_update(update, app, db)
}

fn cmd_date(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :date <YYYY-MM-DD>");
        return Ok(());
    }
    let Some(date) = parse_date_or_status(args, app) else {
        return Ok(());
    };
    let update = GoalUpdate {
        target_date: Some(date),
        ..Default::default()
    };
    apply_update(update, app, db)
}

fn cmd_title(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :title <new title>");
        return Ok(());
    }
    let update = GoalUpdate {
        title: Some(args.to_string()),
        ..Default::default()
    };
    apply_update(update, app, db)
}

fn cmd_status(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let status = match GoalStatus::parse(args) {
        Some(GoalStatus::Archived) => {
            app.set_status("Use :archive to archive a goal");
            return Ok(());
        }
        Some(s) => s,
        None => {
            app.set_status("Usage: :status <active|completed|paused>");
            return Ok(());
        }
    };
    let update = GoalUpdate {
        status: Some(status),
        ..Default::default()
    };
    apply_update(update, app, db)
}

fn cmd_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(category) = GoalCategory::parse(args) else {
        app.set_status(format!(
            "Usage: :category <name>. Categories: {}",
            GoalCategory::names()
        ));
        return Ok(());
    };
    let update = GoalUpdate {
        category: Some(category),
        ..Default::default()
    };
    apply_update(update, app, db)
}

fn cmd_archive(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if let Some(view) = app.selected_goal() {
        if let Some(id) = view.goal.id {
            let title = view.goal.title.clone();
            app.confirm_message = format!("Archive '{title}'?");
            app.pending_action = Some(PendingAction::ArchiveGoal { id, title });
            app.input_mode = InputMode::Confirm;
            return Ok(());
        }
    }
    app.set_status("Select a goal on the Goals screen first");
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if let Some(view) = app.selected_goal() {
        if let Some(id) = view.goal.id {
            let title = view.goal.title.clone();
            app.confirm_message = format!("Permanently delete '{title}'?");
            app.pending_action = Some(PendingAction::DeleteGoal { id, title });
            app.input_mode = InputMode::Confirm;
            return Ok(());
        }
    }
    app.set_status("Select a goal on the Goals screen first");
    Ok(())
}

fn cmd_calc(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 2 {
        app.set_status("Usage: :calc <amount> <YYYY-MM-DD> [saved]");
        return Ok(());
    }
    let Some(amount) = parse_amount_or_status(parts[0], app) else {
        return Ok(());
    };
    let Some(date) = parse_date_or_status(parts[1], app) else {
        return Ok(());
    };
    let saved = match parts.get(2) {
        Some(s) => match parse_amount_or_status(s, app) {
            Some(v) => v,
            None => return Ok(()),
        },
        None => Decimal::ZERO,
    };

    let input = PlanInput::new(amount, date, saved);
    match plan::compute_plan(&input, app.today, app.plan_mode) {
        Ok(result) => {
            app.set_status(result.motivation());
            app.calculation = Some(Calculation {
                input,
                plan: result,
            });
            app.screen = Screen::Plan;
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_mode(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mode = if args.is_empty() {
        match app.plan_mode {
            PlanMode::Simple => PlanMode::Compound,
            PlanMode::Compound => PlanMode::Simple,
        }
    } else if let Some(m) = PlanMode::parse(args) {
        m
    } else {
        app.set_status("Usage: :mode [simple|compound]");
        return Ok(());
    };

    app.plan_mode = mode;
    app.refresh_all(db)?;
    if let Some(calc) = app.calculation.as_mut() {
        match plan::compute_plan(&calc.input, app.today, mode) {
            Ok(p) => calc.plan = p,
            Err(e) => {
                app.calculation = None;
                app.set_status(format!("Plan mode: {mode}. Calculation cleared: {e}"));
                return Ok(());
            }
        }
    }
    app.set_status(format!("Plan mode: {mode}"));
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() || args == "clear" {
        app.status_filter = None;
        app.category_filter = None;
        app.set_status("Filters cleared");
    } else if let Some(status) = GoalStatus::parse(args) {
        app.status_filter = Some(status);
        app.set_status(format!("Showing {status} goals"));
    } else if let Some(category) = GoalCategory::parse(args) {
        app.category_filter = Some(category);
        app.set_status(format!("Showing {category} goals"));
    } else {
        app.set_status(format!(
            "Unknown filter '{args}'. Use a status or one of: {}",
            GoalCategory::names()
        ));
        return Ok(());
    }

    app.screen = Screen::Goals;
    app.goal_index = 0;
    app.goal_scroll = 0;
    app.refresh_goals(db)?;
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/dreamplan-export-{}.csv", app.today)
    } else {
        crate::run::shellexpand(args)
    };

    let count = db.export_to_csv(Path::new(&path), &app.goal_filter(), app.today, app.plan_mode)?;
    if count == 0 {
        app.set_status("No goals to export");
    } else {
        app.set_status(format!("Exported {count} goals to {path}"));
    }
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────

fn require_selected(app: &mut App) -> Option<i64> {
    let id = app.selected_goal_id();
    if id.is_none() {
        app.set_status("Select a goal on the Goals screen first");
    }
    id
}

fn apply_update(update: GoalUpdate, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(id) = require_selected(app) else {
        return Ok(());
    };
    let update = match update.validated() {
        Ok(u) => u,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    match db.update_goal(id, &update)? {
        Some(goal) => {
            app.refresh_all(db)?;
            app.select_goal(id);
            app.set_status(format!("Updated '{}'", goal.title));
        }
        None => app.set_status("Goal no longer exists"),
    }
    Ok(())
}

fn parse_amount_or_status(s: &str, app: &mut App) -> Option<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
    match Decimal::from_str(&cleaned) {
        Ok(v) => Some(v),
        Err(_) => {
            app.set_status(format!("Invalid amount: {s}"));
            None
        }
    }
}

fn parse_date_or_status(s: &str, app: &mut App) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            app.set_status(format!("Invalid date: {s} (use YYYY-MM-DD)"));
            None
        }
    }
}
