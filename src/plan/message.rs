use rust_decimal::Decimal;
use serde::Serialize;

use super::currency::{format_amount, round_cents};

/// Motivational framing for a daily savings amount. Tiers are half-open
/// ranges; the lowest tier that contains the amount wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum MessageTier {
    LessThanCoffee,
    SkipOneCoffee,
    CostOfLunch,
    TotallyAchievable,
    AmbitiousButPossible,
}

impl MessageTier {
    /// Classify an amount already rounded to cents.
    pub(crate) fn for_amount(daily_amount: Decimal) -> Self {
        if daily_amount < Decimal::from(5) {
            Self::LessThanCoffee
        } else if daily_amount < Decimal::from(15) {
            Self::SkipOneCoffee
        } else if daily_amount < Decimal::from(30) {
            Self::CostOfLunch
        } else if daily_amount < Decimal::from(100) {
            Self::TotallyAchievable
        } else {
            Self::AmbitiousButPossible
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::LessThanCoffee => "Less than a coffee",
            Self::SkipOneCoffee => "Skip one coffee",
            Self::CostOfLunch => "Cost of lunch",
            Self::TotallyAchievable => "Totally achievable",
            Self::AmbitiousButPossible => "Ambitious",
        }
    }

    fn render(&self, amount: &str) -> String {
        match self {
            Self::LessThanCoffee => format!("Just {amount}/day - less than a coffee!"),
            Self::SkipOneCoffee => format!("{amount}/day - skip one coffee and you're there!"),
            Self::CostOfLunch => format!("{amount}/day - about the cost of lunch!"),
            Self::TotallyAchievable => format!("{amount}/day - totally achievable!"),
            Self::AmbitiousButPossible => {
                format!("{amount}/day - ambitious but possible with focus!")
            }
        }
    }
}

impl std::fmt::Display for MessageTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pick the motivational message for a daily savings amount.
///
/// The amount is rounded to cents before classification so the tier always
/// agrees with the figure printed in the message. Negative amounts fall into
/// the lowest tier.
pub(crate) fn select_message(daily_amount: Decimal) -> String {
    let rounded = round_cents(daily_amount).max(Decimal::ZERO);
    MessageTier::for_amount(rounded).render(&format_amount(rounded))
}
