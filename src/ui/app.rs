use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::{Database, GoalFilter, MAX_LIST_LIMIT};
use crate::models::*;
use crate::plan::{self, PlanInput, PlanMode, SavingsPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Goals,
    Plan,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Goals, Self::Plan]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Goals => write!(f, "Goals"),
            Self::Plan => write!(f, "Plan"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    ArchiveGoal { id: i64, title: String },
    DeleteGoal { id: i64, title: String },
}

/// Result of an ad-hoc `:calc`, shown on the Plan screen instead of a goal.
#[derive(Debug, Clone)]
pub(crate) struct Calculation {
    pub(crate) input: PlanInput,
    pub(crate) plan: SavingsPlan,
}

/// Totals across active goals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DashboardSummary {
    pub(crate) active_goals: usize,
    pub(crate) total_target: Decimal,
    pub(crate) total_saved: Decimal,
    /// Sum of every active goal's daily amount.
    pub(crate) daily_commitment: Decimal,
    pub(crate) reached: usize,
    pub(crate) overdue: usize,
}

impl DashboardSummary {
    pub(crate) fn from_views(views: &[GoalView]) -> Self {
        let mut summary = Self::default();
        for view in views {
            summary.active_goals += 1;
            summary.total_target += view.goal.target_amount;
            summary.total_saved += view.goal.current_saved.min(view.goal.target_amount);
            summary.daily_commitment += view.plan.daily_amount;
            if view.is_reached() {
                summary.reached += 1;
            } else if view.plan.days_remaining == 0 {
                summary.overdue += 1;
            }
        }
        summary
    }

    pub(crate) fn progress_percentage(&self) -> Decimal {
        if self.total_target <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        plan::round_cents(self.total_saved / self.total_target * Decimal::ONE_HUNDRED)
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,
    pub(crate) plan_mode: PlanMode,

    // Dashboard
    pub(crate) active_goals: Vec<GoalView>,
    pub(crate) summary: DashboardSummary,

    // Goals
    pub(crate) goals: Vec<GoalView>,
    pub(crate) goal_index: usize,
    pub(crate) goal_scroll: usize,
    pub(crate) goal_count: i64,
    pub(crate) status_filter: Option<GoalStatus>,
    pub(crate) category_filter: Option<GoalCategory>,

    // Plan
    pub(crate) calculation: Option<Calculation>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(today: NaiveDate, plan_mode: PlanMode) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today,
            plan_mode,

            active_goals: Vec::new(),
            summary: DashboardSummary::default(),

            goals: Vec::new(),
            goal_index: 0,
            goal_scroll: 0,
            goal_count: 0,
            status_filter: None,
            category_filter: None,

            calculation: None,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        let filter = GoalFilter {
            status: Some(GoalStatus::Active),
            limit: Some(MAX_LIST_LIMIT),
            ..Default::default()
        };
        self.active_goals = db
            .get_goals(&filter)?
            .into_iter()
            .map(|g| GoalView::new(g, self.today, self.plan_mode))
            .collect();
        self.summary = DashboardSummary::from_views(&self.active_goals);
        self.goal_count = db.get_goal_count()?;
        Ok(())
    }

    pub(crate) fn refresh_goals(&mut self, db: &Database) -> Result<()> {
        let filter = self.goal_filter();
        self.goals = db
            .get_goals(&filter)?
            .into_iter()
            .map(|g| GoalView::new(g, self.today, self.plan_mode))
            .collect();
        self.goal_count = db.get_goal_count()?;
        if self.goal_index >= self.goals.len() {
            self.goal_index = self.goals.len().saturating_sub(1);
        }
        if self.goal_scroll > self.goal_index {
            self.goal_scroll = self.goal_index;
        }
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_dashboard(db)?;
        self.refresh_goals(db)?;
        Ok(())
    }

    pub(crate) fn goal_filter(&self) -> GoalFilter {
        GoalFilter {
            status: self.status_filter,
            category: self.category_filter,
            search: if self.search_input.is_empty() {
                None
            } else {
                Some(self.search_input.clone())
            },
            hide_archived: true,
            limit: Some(MAX_LIST_LIMIT),
        }
    }

    pub(crate) fn selected_goal(&self) -> Option<&GoalView> {
        self.goals.get(self.goal_index)
    }

    pub(crate) fn selected_goal_id(&self) -> Option<i64> {
        self.selected_goal().and_then(|v| v.goal.id)
    }

    /// Move the cursor onto the goal with this id, if it is listed.
    pub(crate) fn select_goal(&mut self, id: i64) {
        if let Some(pos) = self.goals.iter().position(|v| v.goal.id == Some(id)) {
            self.goal_index = pos;
            let page = self.visible_rows.max(1);
            if pos < self.goal_scroll || pos >= self.goal_scroll + page {
                self.goal_scroll = pos.saturating_sub(page - 1);
            }
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
