use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::Goal;
use crate::plan::{self, MessageTier, PlanMode, SavingsPlan};

/// A stored goal together with everything derived from it on `today`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct GoalView {
    #[serde(flatten)]
    pub(crate) goal: Goal,
    pub(crate) plan: SavingsPlan,
    pub(crate) progress_percentage: Decimal,
    pub(crate) tier: MessageTier,
    pub(crate) motivation: String,
}

impl GoalView {
    pub(crate) fn new(goal: Goal, today: NaiveDate, mode: PlanMode) -> Self {
        let plan = plan::presentation_plan(&goal.plan_input(), today, mode);
        let progress_percentage = goal.progress_percentage();
        Self {
            plan,
            progress_percentage,
            tier: plan.tier(),
            motivation: plan.motivation(),
            goal,
        }
    }

    pub(crate) fn is_reached(&self) -> bool {
        self.goal.current_saved >= self.goal.target_amount
    }
}
