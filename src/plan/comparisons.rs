use rust_decimal::Decimal;
use serde::Serialize;

use super::currency::round_tenths;

/// Which periodic amount a reference price is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Period {
    Daily,
    Weekly,
    Monthly,
}

pub(crate) struct ReferencePrice {
    pub(crate) label: &'static str,
    /// Price in cents.
    cents: i64,
    pub(crate) period: Period,
}

impl ReferencePrice {
    pub(crate) fn price(&self) -> Decimal {
        Decimal::new(self.cents, 2)
    }
}

pub(crate) const COFFEE: ReferencePrice = ReferencePrice {
    label: "coffees a day",
    cents: 550,
    period: Period::Daily,
};

pub(crate) const LUNCH: ReferencePrice = ReferencePrice {
    label: "lunches a week",
    cents: 1200,
    period: Period::Weekly,
};

pub(crate) const MOVIE_TICKET: ReferencePrice = ReferencePrice {
    label: "movie tickets a day",
    cents: 1500,
    period: Period::Daily,
};

pub(crate) const STREAMING: ReferencePrice = ReferencePrice {
    label: "streaming subscriptions a month",
    cents: 1299,
    period: Period::Monthly,
};

pub(crate) const REFERENCE_PRICES: [&ReferencePrice; 4] =
    [&COFFEE, &LUNCH, &MOVIE_TICKET, &STREAMING];

/// A savings amount expressed in units of everyday purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Comparisons {
    pub(crate) coffees: Decimal,
    pub(crate) lunches_per_week: Decimal,
    pub(crate) movie_tickets: Decimal,
    pub(crate) streaming_services: Decimal,
}

impl Comparisons {
    pub(crate) fn zero() -> Self {
        Self {
            coffees: Decimal::ZERO,
            lunches_per_week: Decimal::ZERO,
            movie_tickets: Decimal::ZERO,
            streaming_services: Decimal::ZERO,
        }
    }

    /// Ratios against already-rounded periodic amounts.
    pub(crate) fn from_amounts(daily: Decimal, weekly: Decimal, monthly: Decimal) -> Self {
        let ratio = |reference: &ReferencePrice| {
            let amount = match reference.period {
                Period::Daily => daily,
                Period::Weekly => weekly,
                Period::Monthly => monthly,
            };
            round_tenths(amount / reference.price())
        };

        Self {
            coffees: ratio(&COFFEE),
            lunches_per_week: ratio(&LUNCH),
            movie_tickets: ratio(&MOVIE_TICKET),
            streaming_services: ratio(&STREAMING),
        }
    }

    /// Reference → ratio pairs in display order.
    pub(crate) fn entries(&self) -> [(&'static ReferencePrice, Decimal); 4] {
        [
            (REFERENCE_PRICES[0], self.coffees),
            (REFERENCE_PRICES[1], self.lunches_per_week),
            (REFERENCE_PRICES[2], self.movie_tickets),
            (REFERENCE_PRICES[3], self.streaming_services),
        ]
    }
}
