use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::currency::round_cents;
use super::{periodic_amounts, validate_current_saved, validate_target_amount, PlanInput};
use crate::error::{PlanError, PlanResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum StrategyKind {
    Aggressive,
    Balanced,
    Relaxed,
}

impl StrategyKind {
    pub(crate) fn all() -> &'static [StrategyKind] {
        &[Self::Aggressive, Self::Balanced, Self::Relaxed]
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Aggressive => "Aggressive",
            Self::Balanced => "Balanced",
            Self::Relaxed => "Relaxed",
        }
    }

    pub(crate) fn description(&self) -> &'static str {
        match self {
            Self::Aggressive => "Reach the goal 25% sooner with higher daily savings",
            Self::Balanced => "Reach the goal on the target date",
            Self::Relaxed => "Take 50% longer with lower daily savings",
        }
    }

    /// Number of days this strategy allows given the days left to the target.
    fn scale_days(&self, base_days: i64) -> i64 {
        match self {
            // ceil(base * 3 / 4)
            Self::Aggressive => (base_days * 3 + 3) / 4,
            Self::Balanced => base_days,
            // ceil(base * 3 / 2)
            Self::Relaxed => (base_days * 3 + 1) / 2,
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Strategy {
    pub(crate) kind: StrategyKind,
    pub(crate) days: i64,
    pub(crate) target_date: NaiveDate,
    pub(crate) daily_amount: Decimal,
    pub(crate) weekly_amount: Decimal,
    pub(crate) monthly_amount: Decimal,
}

/// Three ways to pace the same goal: sooner, on time, and later.
///
/// Uses the same validation and strict date policy as
/// [`compute_plan`](super::compute_plan).
pub(crate) fn savings_strategies(input: &PlanInput, today: NaiveDate) -> PlanResult<Vec<Strategy>> {
    validate_target_amount(input.target_amount)?;
    validate_current_saved(input.current_saved)?;

    let base_days = input.days_until(today);
    if base_days <= 0 {
        return Err(PlanError::PastOrImmediateTargetDate {
            days_remaining: base_days,
        });
    }

    let remaining = input.amount_remaining();
    StrategyKind::all()
        .iter()
        .map(|kind| {
            let days = kind.scale_days(base_days);
            let (daily_amount, weekly_amount, monthly_amount) = periodic_amounts(remaining, days);
            Ok(Strategy {
                kind: *kind,
                days,
                target_date: add_days(today, days)?,
                daily_amount,
                weekly_amount,
                monthly_amount,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ContributionPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ContributionPeriod {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "d" => Some(Self::Daily),
            "weekly" | "week" | "w" => Some(Self::Weekly),
            "monthly" | "month" | "m" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub(crate) fn days(&self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "day",
            Self::Weekly => "week",
            Self::Monthly => "month",
        }
    }
}

/// When a goal is reached at a fixed contribution rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Projection {
    pub(crate) days_needed: i64,
    pub(crate) reached_on: NaiveDate,
    pub(crate) daily_rate: Decimal,
}

pub(crate) fn project_completion(
    amount_remaining: Decimal,
    contribution: Decimal,
    period: ContributionPeriod,
    today: NaiveDate,
) -> PlanResult<Projection> {
    if contribution <= Decimal::ZERO {
        return Err(PlanError::InvalidAmount(format!(
            "contribution must be greater than zero (got {contribution})"
        )));
    }
    if amount_remaining < Decimal::ZERO {
        return Err(PlanError::InvalidAmount(format!(
            "amount remaining cannot be negative (got {amount_remaining})"
        )));
    }

    let daily_rate = contribution / Decimal::from(period.days());
    let days_needed = (amount_remaining / daily_rate).ceil();
    let days_needed = i64::try_from(days_needed).map_err(|_| {
        PlanError::InvalidAmount(format!(
            "contribution of {contribution} per {} is too small to reach the goal",
            period.as_str()
        ))
    })?;

    Ok(Projection {
        days_needed,
        reached_on: add_days(today, days_needed)?,
        daily_rate: round_cents(daily_rate),
    })
}

fn add_days(date: NaiveDate, days: i64) -> PlanResult<NaiveDate> {
    u64::try_from(days)
        .ok()
        .and_then(|d| date.checked_add_days(Days::new(d)))
        .ok_or_else(|| PlanError::InvalidField(format!("{days} days from {date} is out of range")))
}
