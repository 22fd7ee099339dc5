use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::config::Config;
use crate::db::{Database, GoalFilter};
use crate::models::{Goal, GoalCategory, GoalStatus, GoalUpdate, GoalView};
use crate::plan::{self, format_amount, ContributionPeriod, PlanInput, PlanMode, SavingsPlan};

/// Flags that take a value; their values are not positional arguments.
const VALUE_FLAGS: &[&str] = &[
    "--saved",
    "--period",
    "--category",
    "--description",
    "--image",
    "--status",
    "--search",
    "--limit",
    "--title",
    "--amount",
    "--date",
];

pub(crate) fn as_cli(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let command = args[1].as_str();
    let rest = &args[2..];
    let result = match command {
        "plan" | "p" => cli_plan(rest, config),
        "strategies" => cli_strategies(rest),
        "reach" => cli_reach(rest),
        "add" => cli_add(rest, db),
        "list" | "ls" => cli_list(rest, db, config),
        "show" => cli_show(rest, db, config),
        "update" => cli_update(rest, db),
        "save" => cli_save(rest, db),
        "delete" | "rm" => cli_delete(rest, db),
        "export" => cli_export(rest, db, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("dreamplan {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    };
    if let Err(ref e) = result {
        tracing::warn!(command, error = %e, "command failed");
    }
    result
}

fn print_usage() {
    println!("dreamplan - turn a savings goal into a daily habit");
    println!();
    println!("Usage: dreamplan [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive TUI");
    println!("  plan <amount> <YYYY-MM-DD>          Daily/weekly/monthly savings for a target");
    println!("    --saved <amount>                  Amount already saved");
    println!("    --compound                        Account for 5% interest, compounded daily");
    println!("    --json                            Print the plan as JSON");
    println!("  strategies <amount> <YYYY-MM-DD>    Compare aggressive/balanced/relaxed timelines");
    println!("  reach <amount> <contribution>       When a fixed contribution reaches the amount");
    println!("    --period daily|weekly|monthly     Contribution period (default: daily)");
    println!("  add <amount> <YYYY-MM-DD> <title>   Create a goal");
    println!("    --category <name>                 {}", GoalCategory::names());
    println!("    --description <text>  --image <url>");
    println!("  list                                List goals (archived hidden)");
    println!("    --status <s> --category <c> --search <text> --limit <n>");
    println!("  show <id> [--compound] [--json]     Show a goal and its plan");
    println!("  update <id>                         Change goal fields");
    println!("    --title --amount --date --saved --status --category --description --image");
    println!("  save <id> <amount>                  Record a contribution (negative to withdraw)");
    println!("  delete <id> [--hard]                Archive a goal, or remove it with --hard");
    println!("  export [path] [--status <s>]        Export goals to CSV");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
}

// ── Calculator commands ──────────────────────────────────────

fn cli_plan(args: &[String], config: &Config) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: dreamplan plan <amount> <YYYY-MM-DD> [--saved <amount>] [--compound] [--json]");
    }
    let input = PlanInput::new(
        parse_amount(pos[0])?,
        parse_date(pos[1])?,
        flag_value(args, "--saved")
            .map(parse_amount)
            .transpose()?
            .unwrap_or(Decimal::ZERO),
    );
    let mode = plan_mode(args, config);
    let plan = plan::compute_plan(&input, today(), mode)?;

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn cli_strategies(args: &[String]) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: dreamplan strategies <amount> <YYYY-MM-DD> [--saved <amount>]");
    }
    let input = PlanInput::new(
        parse_amount(pos[0])?,
        parse_date(pos[1])?,
        flag_value(args, "--saved")
            .map(parse_amount)
            .transpose()?
            .unwrap_or(Decimal::ZERO),
    );
    let strategies = plan::savings_strategies(&input, today())?;

    println!(
        "{:<12} {:>6} {:<12} {:>12} {:>12} {:>12}",
        "Strategy", "Days", "Reach by", "Daily", "Weekly", "Monthly"
    );
    println!("{}", "─".repeat(72));
    for s in &strategies {
        println!(
            "{:<12} {:>6} {:<12} {:>12} {:>12} {:>12}",
            s.kind.as_str(),
            s.days,
            s.target_date.to_string(),
            format_amount(s.daily_amount),
            format_amount(s.weekly_amount),
            format_amount(s.monthly_amount),
        );
    }
    Ok(())
}

fn cli_reach(args: &[String]) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: dreamplan reach <amount> <contribution> [--period daily|weekly|monthly]");
    }
    let amount = parse_amount(pos[0])?;
    let contribution = parse_amount(pos[1])?;
    let period = match flag_value(args, "--period") {
        Some(p) => ContributionPeriod::parse(p)
            .ok_or_else(|| anyhow::anyhow!("Unknown period '{p}' (daily, weekly, monthly)"))?,
        None => ContributionPeriod::default(),
    };

    let projection = plan::project_completion(amount, contribution, period, today())?;
    println!(
        "Saving {} per {} reaches {} in {} days, on {}",
        format_amount(contribution),
        period.as_str(),
        format_amount(amount),
        projection.days_needed,
        projection.reached_on,
    );
    Ok(())
}

// ── Goal commands ────────────────────────────────────────────

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 3 {
        anyhow::bail!(
            "Usage: dreamplan add <amount> <YYYY-MM-DD> <title...> [--category <c>] [--description <d>] [--image <url>]"
        );
    }
    let title = pos[2..].join(" ");
    let category = match flag_value(args, "--category") {
        Some(c) => parse_category(c)?,
        None => GoalCategory::default(),
    };

    let mut goal = Goal::new(title, parse_amount(pos[0])?, parse_date(pos[1])?, category);
    if let Some(d) = flag_value(args, "--description") {
        goal.description = d.to_string();
    }
    if let Some(url) = flag_value(args, "--image") {
        goal.image_url = url.to_string();
    }
    let goal = goal.validated(today())?;
    let id = db.insert_goal(&goal)?;

    let view = goal.view(today(), PlanMode::Simple);
    println!("Created goal #{id}: {}", goal.title);
    println!("  {}", view.motivation);
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let filter = GoalFilter {
        status: flag_value(args, "--status").map(parse_status).transpose()?,
        category: flag_value(args, "--category").map(parse_category).transpose()?,
        search: flag_value(args, "--search").map(str::to_string),
        hide_archived: true,
        limit: flag_value(args, "--limit")
            .map(|l| l.parse::<u32>().with_context(|| format!("Invalid limit: {l}")))
            .transpose()?,
    };
    let goals = db.get_goals(&filter)?;
    if goals.is_empty() {
        println!("No goals");
        return Ok(());
    }

    let today = today();
    println!(
        "{:<4} {:<28} {:<10} {:>14} {:>14} {:>7} {:>10}  Target date",
        "ID", "Title", "Status", "Target", "Saved", "Done", "Daily"
    );
    println!("{}", "─".repeat(105));
    for goal in goals {
        let view = goal.view(today, config.plan_mode);
        println!(
            "{:<4} {:<28} {:<10} {:>14} {:>14} {:>6}% {:>10}  {}",
            goal.id.unwrap_or(0),
            crate::ui::util::truncate(&goal.title, 28),
            goal.status.as_str(),
            format_amount(goal.target_amount),
            format_amount(goal.current_saved),
            format!("{:.0}", view.progress_percentage),
            format_amount(view.plan.daily_amount),
            goal.target_date,
        );
    }
    Ok(())
}

fn cli_show(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let id = parse_id(positionals(args).first().copied())?;
    let goal = find_goal(db, id)?;
    let view = goal.view(today(), plan_mode(args, config));

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    print_goal(&view);
    Ok(())
}

fn cli_update(args: &[String], db: &mut Database) -> Result<()> {
    let id = parse_id(positionals(args).first().copied())?;
    let update = build_update(args)?;
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Use --title, --amount, --date, --saved, --status, --category, --description or --image");
    }
    let update = update.validated()?;
    let goal = db
        .update_goal(id, &update)?
        .ok_or_else(|| anyhow::anyhow!("Goal #{id} not found"))?;
    println!("Updated goal #{id}: {}", goal.title);
    Ok(())
}

fn cli_save(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: dreamplan save <id> <amount>");
    }
    let id = parse_id(Some(pos[0]))?;
    let amount = parse_amount(pos[1])?;
    let goal = db
        .add_savings(id, amount)?
        .ok_or_else(|| anyhow::anyhow!("Goal #{id} not found"))?;
    println!(
        "{}: {} of {} saved ({:.2}%)",
        goal.title,
        format_amount(goal.current_saved),
        format_amount(goal.target_amount),
        goal.progress_percentage(),
    );
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id = parse_id(positionals(args).first().copied())?;
    let goal = find_goal(db, id)?;
    if has_flag(args, "--hard") {
        db.delete_goal(id)?;
        println!("Deleted goal #{id}: {}", goal.title);
    } else {
        db.archive_goal(id)?;
        println!("Archived goal #{id}: {} (use --hard to remove it)", goal.title);
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let today = today();
    let output_path = positionals(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/dreamplan-export-{today}.csv")
        });
    let filter = GoalFilter {
        status: flag_value(args, "--status").map(parse_status).transpose()?,
        limit: Some(crate::db::MAX_LIST_LIMIT),
        ..GoalFilter::visible()
    };

    let count = db.export_to_csv(Path::new(&output_path), &filter, today, config.plan_mode)?;
    if count == 0 {
        println!("No goals to export");
    } else {
        println!("Exported {count} goals to {output_path}");
    }
    Ok(())
}

// ── Output ───────────────────────────────────────────────────

fn print_plan(plan: &SavingsPlan) {
    println!("Savings plan ({} mode)", plan.mode);
    println!("{}", "─".repeat(40));
    println!("  Remaining:   {}", format_amount(plan.amount_remaining));
    if plan.mode == PlanMode::Compound {
        println!("  Needed now:  {}", format_amount(plan.present_value));
    }
    println!("  Days left:   {}", plan.days_remaining);
    println!("  Daily:       {}", format_amount(plan.daily_amount));
    println!("  Weekly:      {}", format_amount(plan.weekly_amount));
    println!("  Monthly:     {}", format_amount(plan.monthly_amount));
    println!();
    println!("That's about:");
    for (price, count) in plan.comparisons.entries() {
        println!("  {count:>8} {} ({} each)", price.label, format_amount(price.price()));
    }
    println!();
    if !plan.is_achievable {
        println!("  Over {}/day: consider a later date.", format_amount(plan::ACHIEVABLE_DAILY_LIMIT));
    }
    println!("  {}", plan.motivation());
}

fn print_goal(view: &GoalView) {
    let goal = &view.goal;
    println!("#{} {}", goal.id.unwrap_or(0), goal.title);
    if !goal.description.is_empty() {
        println!("  {}", goal.description);
    }
    println!("{}", "─".repeat(40));
    println!("  Category:    {}", goal.category);
    println!("  Status:      {}", goal.status);
    println!("  Target:      {} by {}", format_amount(goal.target_amount), goal.target_date);
    println!(
        "  Saved:       {} ({:.2}%)",
        format_amount(goal.current_saved),
        view.progress_percentage
    );
    if !goal.image_url.is_empty() {
        println!("  Image:       {}", goal.image_url);
    }
    println!();
    if view.is_reached() {
        println!("  Goal reached!");
        return;
    }
    if view.plan.days_remaining == 0 {
        println!("  Target date has passed. Update it with --date to get a new plan.");
        return;
    }
    print_plan(&view.plan);
}

// ── Argument helpers ─────────────────────────────────────────

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn plan_mode(args: &[String], config: &Config) -> PlanMode {
    if has_flag(args, "--compound") {
        PlanMode::Compound
    } else {
        config.plan_mode
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor the value of a value flag.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

/// Parse a money amount, tolerating a leading `$` and thousands separators.
fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount: {s}"))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {s} (expected YYYY-MM-DD)"))
}

fn parse_id(s: Option<&str>) -> Result<i64> {
    let s = s.ok_or_else(|| anyhow::anyhow!("Missing goal id"))?;
    s.trim_start_matches('#')
        .parse()
        .with_context(|| format!("Invalid goal id: {s}"))
}

fn parse_status(s: &str) -> Result<GoalStatus> {
    GoalStatus::parse(s)
        .ok_or_else(|| anyhow::anyhow!("Unknown status '{s}' ({})", GoalStatus::names()))
}

fn parse_category(s: &str) -> Result<GoalCategory> {
    GoalCategory::parse(s)
        .ok_or_else(|| anyhow::anyhow!("Unknown category '{s}' ({})", GoalCategory::names()))
}

fn build_update(args: &[String]) -> Result<GoalUpdate> {
    Ok(GoalUpdate {
        title: flag_value(args, "--title").map(str::to_string),
        description: flag_value(args, "--description").map(str::to_string),
        category: flag_value(args, "--category").map(parse_category).transpose()?,
        target_amount: flag_value(args, "--amount").map(parse_amount).transpose()?,
        target_date: flag_value(args, "--date").map(parse_date).transpose()?,
        current_saved: flag_value(args, "--saved").map(parse_amount).transpose()?,
        image_url: flag_value(args, "--image").map(str::to_string),
        status: flag_value(args, "--status").map(parse_status).transpose()?,
    })
}

fn find_goal(db: &Database, id: i64) -> Result<Goal> {
    db.get_goal_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("Goal #{id} not found"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
