//! Savings plan calculation.
//!
//! Everything in this module is pure: the caller passes `today` explicitly and
//! gets back an immutable plan. Two policies exist for a target date that is
//! today or already past:
//!
//! - [`compute_plan`] is strict and fails with
//!   [`PlanError::PastOrImmediateTargetDate`]. Ad-hoc calculations use it.
//! - [`presentation_plan`] clamps to a zero plan. Stored goals are rendered
//!   through it, since a goal that was valid when saved must stay displayable.

mod comparisons;
mod currency;
mod message;
mod strategy;

use chrono::NaiveDate;
use rust_decimal::prelude::MathematicalOps;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::{PlanError, PlanResult};

pub(crate) use comparisons::Comparisons;
pub(crate) use currency::{format_amount, round_cents};
pub(crate) use message::{select_message, MessageTier};
pub(crate) use strategy::{project_completion, savings_strategies, ContributionPeriod};

/// Daily amounts at or below this are considered realistic.
pub(crate) const ACHIEVABLE_DAILY_LIMIT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Upper bound on a goal's target amount.
pub(crate) const MAX_TARGET_AMOUNT: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Annual rate used by compound mode, compounded daily.
pub(crate) const COMPOUND_ANNUAL_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

const DAYS_PER_WEEK: i64 = 7;
const DAYS_PER_MONTH: i64 = 30;
const DAYS_PER_YEAR: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PlanMode {
    #[default]
    Simple,
    Compound,
}

impl PlanMode {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Compound => "compound",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "compound" | "interest" => Some(Self::Compound),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The raw goal fields a plan is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlanInput {
    pub(crate) target_amount: Decimal,
    pub(crate) target_date: NaiveDate,
    pub(crate) current_saved: Decimal,
}

impl PlanInput {
    pub(crate) fn new(target_amount: Decimal, target_date: NaiveDate, current_saved: Decimal) -> Self {
        Self {
            target_amount,
            target_date,
            current_saved,
        }
    }

    pub(crate) fn amount_remaining(&self) -> Decimal {
        (self.target_amount - self.current_saved).max(Decimal::ZERO)
    }

    /// Whole days from `today` to the target date; negative when overdue.
    pub(crate) fn days_until(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct SavingsPlan {
    pub(crate) mode: PlanMode,
    pub(crate) amount_remaining: Decimal,
    /// Amount that has to be put aside today, after discounting for interest
    /// in compound mode. Equal to `amount_remaining` in simple mode.
    pub(crate) present_value: Decimal,
    pub(crate) days_remaining: i64,
    pub(crate) daily_amount: Decimal,
    pub(crate) weekly_amount: Decimal,
    pub(crate) monthly_amount: Decimal,
    pub(crate) comparisons: Comparisons,
    pub(crate) is_achievable: bool,
}

impl SavingsPlan {
    fn zero(mode: PlanMode, amount_remaining: Decimal) -> Self {
        Self {
            mode,
            amount_remaining,
            present_value: amount_remaining,
            days_remaining: 0,
            daily_amount: Decimal::ZERO,
            weekly_amount: Decimal::ZERO,
            monthly_amount: Decimal::ZERO,
            comparisons: Comparisons::zero(),
            is_achievable: true,
        }
    }

    pub(crate) fn tier(&self) -> MessageTier {
        MessageTier::for_amount(self.daily_amount)
    }

    pub(crate) fn motivation(&self) -> String {
        select_message(self.daily_amount)
    }
}

/// Reject a target amount outside `(0, MAX_TARGET_AMOUNT]`.
pub(crate) fn validate_target_amount(target_amount: Decimal) -> PlanResult<()> {
    if target_amount <= Decimal::ZERO {
        return Err(PlanError::InvalidAmount(format!(
            "target amount must be greater than zero (got {target_amount})"
        )));
    }
    if target_amount > MAX_TARGET_AMOUNT {
        return Err(PlanError::TargetAmountTooLarge {
            amount: target_amount,
            limit: MAX_TARGET_AMOUNT,
        });
    }
    Ok(())
}

/// Reject a saved amount outside `[0, MAX_TARGET_AMOUNT]`.
pub(crate) fn validate_current_saved(current_saved: Decimal) -> PlanResult<()> {
    if current_saved < Decimal::ZERO {
        return Err(PlanError::InvalidAmount(format!(
            "amount saved cannot be negative (got {current_saved})"
        )));
    }
    if current_saved > MAX_TARGET_AMOUNT {
        return Err(PlanError::InvalidAmount(format!(
            "amount saved cannot exceed ${MAX_TARGET_AMOUNT} (got {current_saved})"
        )));
    }
    Ok(())
}

/// Saved share of the target in percent, clamped to `[0, 100]`.
///
/// Ratios too large for `Decimal` count as fully saved, so rows written
/// before the saved-amount limit still render.
pub(crate) fn progress_percentage(current_saved: Decimal, target_amount: Decimal) -> Decimal {
    if target_amount <= Decimal::ZERO || current_saved <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let pct = current_saved
        .checked_div(target_amount)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ONE_HUNDRED);
    round_cents(pct.min(Decimal::ONE_HUNDRED))
}

/// Compute a savings plan, failing when there is no future window to save in.
pub(crate) fn compute_plan(
    input: &PlanInput,
    today: NaiveDate,
    mode: PlanMode,
) -> PlanResult<SavingsPlan> {
    validate_target_amount(input.target_amount)?;
    validate_current_saved(input.current_saved)?;

    let days_remaining = input.days_until(today);
    if days_remaining <= 0 {
        return Err(PlanError::PastOrImmediateTargetDate { days_remaining });
    }

    let plan = build_plan(input.amount_remaining(), days_remaining, mode);
    debug!(
        mode = %mode,
        days_remaining,
        daily = %plan.daily_amount,
        "computed savings plan"
    );
    Ok(plan)
}

/// Compute a plan for display. Never fails: an overdue target or an invalid
/// stored amount produces a zero plan instead of an error.
pub(crate) fn presentation_plan(input: &PlanInput, today: NaiveDate, mode: PlanMode) -> SavingsPlan {
    let amount_remaining = if input.target_amount > Decimal::ZERO {
        input.amount_remaining()
    } else {
        Decimal::ZERO
    };

    let days_remaining = input.days_until(today);
    if days_remaining <= 0 {
        return SavingsPlan::zero(mode, amount_remaining);
    }
    build_plan(amount_remaining, days_remaining, mode)
}

/// Spread `amount_remaining` over `days_remaining` (> 0) days.
fn build_plan(amount_remaining: Decimal, days_remaining: i64, mode: PlanMode) -> SavingsPlan {
    let present_value = match mode {
        PlanMode::Simple => amount_remaining,
        PlanMode::Compound => discount(amount_remaining, days_remaining),
    };

    let (daily_amount, weekly_amount, monthly_amount) =
        periodic_amounts(present_value, days_remaining);

    SavingsPlan {
        mode,
        amount_remaining,
        present_value: round_cents(present_value),
        days_remaining,
        daily_amount,
        weekly_amount,
        monthly_amount,
        comparisons: Comparisons::from_amounts(daily_amount, weekly_amount, monthly_amount),
        is_achievable: daily_amount <= ACHIEVABLE_DAILY_LIMIT,
    }
}

/// Daily amount rounded to cents, then scaled to a week and a 30-day month.
pub(crate) fn periodic_amounts(amount: Decimal, days: i64) -> (Decimal, Decimal, Decimal) {
    if days <= 0 {
        return (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    }
    let daily = round_cents(amount / Decimal::from(days));
    (
        daily,
        daily * Decimal::from(DAYS_PER_WEEK),
        daily * Decimal::from(DAYS_PER_MONTH),
    )
}

/// Present value of `amount` due in `days`, at the compound rate compounded daily.
fn discount(amount: Decimal, days: i64) -> Decimal {
    let daily_rate = COMPOUND_ANNUAL_RATE / Decimal::from(DAYS_PER_YEAR);
    let exponent = days.unsigned_abs();
    match (Decimal::ONE + daily_rate).checked_powu(exponent) {
        Some(factor) if !factor.is_zero() => amount / factor,
        // The growth factor left decimal range: nothing meaningful remains to save today.
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests;
