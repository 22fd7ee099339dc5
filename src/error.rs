use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures raised by the savings calculator and goal validation.
///
/// None of these are system faults: every variant describes input the user
/// can fix, and the message is meant to be shown to them as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlanError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Target date must be in the future ({days_remaining} days remaining)")]
    PastOrImmediateTargetDate { days_remaining: i64 },

    #[error("Target amount ${amount} is too large (limit ${limit})")]
    TargetAmountTooLarge { amount: Decimal, limit: Decimal },

    #[error("Invalid field: {0}")]
    InvalidField(String),
}

pub(crate) type PlanResult<T> = std::result::Result<T, PlanError>;
