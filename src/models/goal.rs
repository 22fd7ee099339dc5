use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{GoalCategory, GoalStatus, GoalView};
use crate::error::{PlanError, PlanResult};
use crate::plan::{self, PlanInput, PlanMode};

pub(crate) const TITLE_MAX_CHARS: usize = 200;
pub(crate) const DESCRIPTION_MAX_CHARS: usize = 1000;
pub(crate) const IMAGE_URL_MAX_CHARS: usize = 500;

/// A savings goal as stored. Only raw fields live here; everything derived
/// comes from [`Goal::view`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Goal {
    pub(crate) id: Option<i64>,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category: GoalCategory,
    pub(crate) target_amount: Decimal,
    pub(crate) target_date: NaiveDate,
    pub(crate) current_saved: Decimal,
    pub(crate) image_url: String,
    pub(crate) status: GoalStatus,
    pub(crate) created_at: String,
    pub(crate) updated_at: Option<String>,
}

impl Goal {
    pub(crate) fn new(
        title: String,
        target_amount: Decimal,
        target_date: NaiveDate,
        category: GoalCategory,
    ) -> Self {
        Self {
            id: None,
            title,
            description: String::new(),
            category,
            target_amount,
            target_date,
            current_saved: Decimal::ZERO,
            image_url: String::new(),
            status: GoalStatus::Active,
            created_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            updated_at: None,
        }
    }

    /// Check a goal about to be created and round its amounts to cents.
    pub(crate) fn validated(mut self, today: NaiveDate) -> PlanResult<Self> {
        self.title = validate_title(&self.title)?;
        validate_len("description", &self.description, DESCRIPTION_MAX_CHARS)?;
        validate_len("image url", &self.image_url, IMAGE_URL_MAX_CHARS)?;
        plan::validate_target_amount(self.target_amount)?;
        plan::validate_current_saved(self.current_saved)?;

        let days_remaining = (self.target_date - today).num_days();
        if days_remaining <= 0 {
            return Err(PlanError::PastOrImmediateTargetDate { days_remaining });
        }

        self.target_amount = plan::round_cents(self.target_amount);
        self.current_saved = plan::round_cents(self.current_saved);
        Ok(self)
    }

    pub(crate) fn plan_input(&self) -> PlanInput {
        PlanInput::new(self.target_amount, self.target_date, self.current_saved)
    }

    pub(crate) fn progress_percentage(&self) -> Decimal {
        plan::progress_percentage(self.current_saved, self.target_amount)
    }

    /// Derived state for display. Never fails, even for an overdue goal.
    pub(crate) fn view(&self, today: NaiveDate, mode: PlanMode) -> GoalView {
        GoalView::new(self.clone(), today, mode)
    }

    /// Apply an already-validated partial update.
    pub(crate) fn apply(&mut self, update: &GoalUpdate) {
        if let Some(ref title) = update.title {
            self.title.clone_from(title);
        }
        if let Some(ref description) = update.description {
            self.description.clone_from(description);
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(amount) = update.target_amount {
            self.target_amount = amount;
        }
        if let Some(date) = update.target_date {
            self.target_date = date;
        }
        if let Some(saved) = update.current_saved {
            self.current_saved = saved;
        }
        if let Some(ref url) = update.image_url {
            self.image_url.clone_from(url);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

/// A partial update: only `Some` fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GoalUpdate {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) category: Option<GoalCategory>,
    pub(crate) target_amount: Option<Decimal>,
    pub(crate) target_date: Option<NaiveDate>,
    pub(crate) current_saved: Option<Decimal>,
    pub(crate) image_url: Option<String>,
    pub(crate) status: Option<GoalStatus>,
}

impl GoalUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check the fields that are present and round amounts to cents.
    ///
    /// The target date is not compared against today here: an existing goal
    /// may be left overdue and is clamped on display.
    pub(crate) fn validated(mut self) -> PlanResult<Self> {
        if let Some(ref title) = self.title {
            self.title = Some(validate_title(title)?);
        }
        if let Some(ref description) = self.description {
            validate_len("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        if let Some(ref url) = self.image_url {
            validate_len("image url", url, IMAGE_URL_MAX_CHARS)?;
        }
        if let Some(amount) = self.target_amount {
            plan::validate_target_amount(amount)?;
            self.target_amount = Some(plan::round_cents(amount));
        }
        if let Some(saved) = self.current_saved {
            plan::validate_current_saved(saved)?;
            self.current_saved = Some(plan::round_cents(saved));
        }
        Ok(self)
    }
}

fn validate_title(title: &str) -> PlanResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(PlanError::InvalidField("title cannot be empty".into()));
    }
    validate_len("title", trimmed, TITLE_MAX_CHARS)?;
    Ok(trimmed.to_string())
}

fn validate_len(field: &str, value: &str, max: usize) -> PlanResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(PlanError::InvalidField(format!(
            "{field} is {len} characters (max {max})"
        )));
    }
    Ok(())
}
