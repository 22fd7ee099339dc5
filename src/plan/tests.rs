#![allow(clippy::unwrap_used)]

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::comparisons::REFERENCE_PRICES;
use super::strategy::StrategyKind;
use super::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn in_days(days: u64) -> NaiveDate {
    today().checked_add_days(Days::new(days)).unwrap()
}

fn input(target: Decimal, days: u64, saved: Decimal) -> PlanInput {
    PlanInput::new(target, in_days(days), saved)
}

fn simple(target: Decimal, days: u64, saved: Decimal) -> SavingsPlan {
    compute_plan(&input(target, days, saved), today(), PlanMode::Simple).unwrap()
}

// ── compute_plan ──────────────────────────────────────────────

#[test]
fn test_fifty_thousand_over_thousand_days() {
    let plan = simple(dec!(50000.00), 1000, Decimal::ZERO);
    assert_eq!(plan.mode, PlanMode::Simple);
    assert_eq!(plan.amount_remaining, dec!(50000.00));
    assert_eq!(plan.days_remaining, 1000);
    assert_eq!(plan.daily_amount, dec!(50.00));
    assert_eq!(plan.weekly_amount, dec!(350.00));
    assert_eq!(plan.monthly_amount, dec!(1500.00));
    assert!(plan.is_achievable);
    assert_eq!(plan.comparisons.coffees, dec!(9.1));
    assert_eq!(plan.comparisons.lunches_per_week, dec!(29.2));
    assert_eq!(plan.comparisons.movie_tickets, dec!(3.3));
    assert_eq!(plan.comparisons.streaming_services, dec!(115.5));
}

#[test]
fn test_fully_saved_goal_needs_nothing() {
    let plan = simple(dec!(1000.00), 45, dec!(1000.00));
    assert_eq!(plan.amount_remaining, Decimal::ZERO);
    assert_eq!(plan.daily_amount, Decimal::ZERO);
    assert_eq!(plan.weekly_amount, Decimal::ZERO);
    assert_eq!(plan.monthly_amount, Decimal::ZERO);
    assert_eq!(plan.tier(), MessageTier::LessThanCoffee);
    assert_eq!(plan.comparisons, Comparisons::zero());
}

#[test]
fn test_oversaved_goal_clamps_remaining_to_zero() {
    let plan = simple(dec!(500), 10, dec!(750));
    assert_eq!(plan.amount_remaining, Decimal::ZERO);
    assert_eq!(plan.daily_amount, Decimal::ZERO);
}

#[test]
fn test_partial_savings_reduce_remaining() {
    let plan = simple(dec!(1000), 10, dec!(400));
    assert_eq!(plan.amount_remaining, dec!(600));
    assert_eq!(plan.daily_amount, dec!(60.00));
}

#[test]
fn test_target_date_today_is_rejected() {
    let result = compute_plan(
        &PlanInput::new(dec!(1000), today(), Decimal::ZERO),
        today(),
        PlanMode::Simple,
    );
    assert_eq!(
        result,
        Err(PlanError::PastOrImmediateTargetDate { days_remaining: 0 })
    );
}

#[test]
fn test_target_date_in_past_is_rejected() {
    let past = NaiveDate::from_ymd_opt(2024, 12, 27).unwrap();
    let result = compute_plan(
        &PlanInput::new(dec!(1000), past, Decimal::ZERO),
        today(),
        PlanMode::Simple,
    );
    assert_eq!(
        result,
        Err(PlanError::PastOrImmediateTargetDate { days_remaining: -5 })
    );
}

#[test]
fn test_tomorrow_is_one_day() {
    let plan = simple(dec!(25), 1, Decimal::ZERO);
    assert_eq!(plan.days_remaining, 1);
    assert_eq!(plan.daily_amount, dec!(25.00));
}

#[test]
fn test_zero_target_is_invalid() {
    let result = compute_plan(&input(Decimal::ZERO, 10, Decimal::ZERO), today(), PlanMode::Simple);
    assert!(matches!(result, Err(PlanError::InvalidAmount(_))));
}

#[test]
fn test_negative_target_is_invalid() {
    let result = compute_plan(&input(dec!(-10), 10, Decimal::ZERO), today(), PlanMode::Simple);
    assert!(matches!(result, Err(PlanError::InvalidAmount(_))));
}

#[test]
fn test_negative_saved_is_invalid() {
    let result = compute_plan(&input(dec!(100), 10, dec!(-0.01)), today(), PlanMode::Simple);
    assert!(matches!(result, Err(PlanError::InvalidAmount(_))));
}

#[test]
fn test_saved_over_limit_is_invalid() {
    let over = MAX_TARGET_AMOUNT + dec!(0.01);
    assert!(validate_current_saved(MAX_TARGET_AMOUNT).is_ok());
    assert!(matches!(
        validate_current_saved(over),
        Err(PlanError::InvalidAmount(_))
    ));
}

#[test]
fn test_progress_percentage_past_decimal_range() {
    let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
    assert_eq!(progress_percentage(huge, dec!(0.01)), dec!(100));
    assert_eq!(progress_percentage(Decimal::MAX, dec!(0.01)), dec!(100));
    assert_eq!(progress_percentage(dec!(-5), dec!(100)), Decimal::ZERO);
}

#[test]
fn test_amount_validated_before_date() {
    // Both preconditions fail; the amount is checked first
    let result = compute_plan(
        &PlanInput::new(Decimal::ZERO, today(), Decimal::ZERO),
        today(),
        PlanMode::Simple,
    );
    assert!(matches!(result, Err(PlanError::InvalidAmount(_))));
}

#[test]
fn test_target_amount_limit() {
    assert!(compute_plan(&input(dec!(10000000), 1000, Decimal::ZERO), today(), PlanMode::Simple).is_ok());

    let result = compute_plan(&input(dec!(10000000.01), 1000, Decimal::ZERO), today(), PlanMode::Simple);
    assert!(matches!(result, Err(PlanError::TargetAmountTooLarge { .. })));
}

#[test]
fn test_achievable_boundary() {
    let at_limit = simple(dec!(10000), 100, Decimal::ZERO);
    assert_eq!(at_limit.daily_amount, dec!(100.00));
    assert!(at_limit.is_achievable);

    let over_limit = simple(dec!(10001), 100, Decimal::ZERO);
    assert_eq!(over_limit.daily_amount, dec!(100.01));
    assert!(!over_limit.is_achievable);
}

#[test]
fn test_weekly_and_monthly_derive_from_rounded_daily() {
    let plan = simple(dec!(1000), 3, Decimal::ZERO);
    assert_eq!(plan.daily_amount, dec!(333.33));
    assert_eq!(plan.weekly_amount, plan.daily_amount * dec!(7));
    assert_eq!(plan.monthly_amount, plan.daily_amount * dec!(30));
    assert_eq!(plan.weekly_amount, dec!(2333.31));
    assert_eq!(plan.monthly_amount, dec!(9999.90));
}

#[test]
fn test_rounds_half_away_from_zero() {
    // 1.00 / 8 = 0.125
    let plan = simple(dec!(1.00), 8, Decimal::ZERO);
    assert_eq!(plan.daily_amount, dec!(0.13));
}

#[test]
fn test_daily_times_days_approximates_remaining() {
    let cases = [
        (dec!(50000), 1000_u64, dec!(0)),
        (dec!(1234.56), 17, dec!(12.34)),
        (dec!(999.99), 365, dec!(500)),
        (dec!(7), 3, dec!(0)),
        (dec!(10000000), 3650, dec!(2500000)),
    ];
    for (target, days, saved) in cases {
        let plan = simple(target, days, saved);
        let total = plan.daily_amount * Decimal::from(days);
        let tolerance = dec!(0.01) * Decimal::from(days);
        assert!(
            (total - plan.amount_remaining).abs() <= tolerance,
            "{target} over {days} days: {total} vs {}",
            plan.amount_remaining
        );
    }
}

#[test]
fn test_plan_is_idempotent() {
    let i = input(dec!(4321.09), 77, dec!(12.5));
    let a = compute_plan(&i, today(), PlanMode::Simple).unwrap();
    let b = compute_plan(&i, today(), PlanMode::Simple).unwrap();
    assert_eq!(a, b);

    let c = compute_plan(&i, today(), PlanMode::Compound).unwrap();
    let d = compute_plan(&i, today(), PlanMode::Compound).unwrap();
    assert_eq!(c, d);
}

// ── compound mode ─────────────────────────────────────────────

#[test]
fn test_compound_mode_is_reported() {
    let plan = compute_plan(&input(dec!(36500), 365, Decimal::ZERO), today(), PlanMode::Compound).unwrap();
    assert_eq!(plan.mode, PlanMode::Compound);
    assert_eq!(plan.amount_remaining, dec!(36500));
    assert!(plan.present_value < plan.amount_remaining);
}

#[test]
fn test_compound_needs_less_than_simple() {
    let i = input(dec!(36500), 365, Decimal::ZERO);
    let simple = compute_plan(&i, today(), PlanMode::Simple).unwrap();
    let compound = compute_plan(&i, today(), PlanMode::Compound).unwrap();
    assert_eq!(simple.daily_amount, dec!(100.00));
    assert!(compound.daily_amount < simple.daily_amount);
    // One year at 5% compounded daily discounts by roughly 4.9%
    assert!(compound.daily_amount > dec!(94));
    assert!(compound.daily_amount < dec!(96));
    assert_eq!(compound.weekly_amount, compound.daily_amount * dec!(7));
}

#[test]
fn test_compound_single_day() {
    let plan = compute_plan(&input(dec!(100), 1, Decimal::ZERO), today(), PlanMode::Compound).unwrap();
    assert_eq!(plan.daily_amount, dec!(99.99));
}

#[test]
fn test_simple_present_value_is_remaining() {
    let plan = simple(dec!(800), 40, dec!(300));
    assert_eq!(plan.present_value, dec!(500));
}

// ── presentation_plan ─────────────────────────────────────────

#[test]
fn test_presentation_clamps_target_today() {
    let plan = presentation_plan(
        &PlanInput::new(dec!(1000), today(), dec!(100)),
        today(),
        PlanMode::Simple,
    );
    assert_eq!(plan.days_remaining, 0);
    assert_eq!(plan.amount_remaining, dec!(900));
    assert_eq!(plan.daily_amount, Decimal::ZERO);
    assert_eq!(plan.weekly_amount, Decimal::ZERO);
    assert_eq!(plan.monthly_amount, Decimal::ZERO);
    assert!(plan.is_achievable);
}

#[test]
fn test_presentation_clamps_overdue_target() {
    let past = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
    let plan = presentation_plan(
        &PlanInput::new(dec!(1000), past, Decimal::ZERO),
        today(),
        PlanMode::Compound,
    );
    assert_eq!(plan.days_remaining, 0);
    assert_eq!(plan.daily_amount, Decimal::ZERO);
    assert_eq!(plan.mode, PlanMode::Compound);
}

#[test]
fn test_presentation_matches_strict_for_future_dates() {
    let i = input(dec!(2500), 90, dec!(100));
    let strict = compute_plan(&i, today(), PlanMode::Simple).unwrap();
    let shown = presentation_plan(&i, today(), PlanMode::Simple);
    assert_eq!(strict, shown);
}

#[test]
fn test_presentation_tolerates_invalid_target() {
    let plan = presentation_plan(&input(Decimal::ZERO, 10, Decimal::ZERO), today(), PlanMode::Simple);
    assert_eq!(plan.amount_remaining, Decimal::ZERO);
    assert_eq!(plan.daily_amount, Decimal::ZERO);
}

// ── select_message ────────────────────────────────────────────

#[test]
fn test_message_tiers() {
    assert_eq!(MessageTier::for_amount(dec!(0)), MessageTier::LessThanCoffee);
    assert_eq!(MessageTier::for_amount(dec!(4.99)), MessageTier::LessThanCoffee);
    assert_eq!(MessageTier::for_amount(dec!(5.00)), MessageTier::SkipOneCoffee);
    assert_eq!(MessageTier::for_amount(dec!(14.99)), MessageTier::SkipOneCoffee);
    assert_eq!(MessageTier::for_amount(dec!(15.00)), MessageTier::CostOfLunch);
    assert_eq!(MessageTier::for_amount(dec!(29.99)), MessageTier::CostOfLunch);
    assert_eq!(MessageTier::for_amount(dec!(30.00)), MessageTier::TotallyAchievable);
    assert_eq!(MessageTier::for_amount(dec!(99.99)), MessageTier::TotallyAchievable);
    assert_eq!(MessageTier::for_amount(dec!(100.00)), MessageTier::AmbitiousButPossible);
    assert_eq!(MessageTier::for_amount(dec!(25000)), MessageTier::AmbitiousButPossible);
}

#[test]
fn test_message_text() {
    assert_eq!(select_message(dec!(3.2)), "Just $3.20/day - less than a coffee!");
    assert_eq!(
        select_message(dec!(12)),
        "$12.00/day - skip one coffee and you're there!"
    );
    assert_eq!(select_message(dec!(16.44)), "$16.44/day - about the cost of lunch!");
    assert_eq!(select_message(dec!(50)), "$50.00/day - totally achievable!");
    assert_eq!(
        select_message(dec!(1234.5)),
        "$1,234.50/day - ambitious but possible with focus!"
    );
}

#[test]
fn test_message_zero() {
    assert_eq!(select_message(Decimal::ZERO), "Just $0.00/day - less than a coffee!");
}

#[test]
fn test_message_rounds_before_tiering() {
    // 4.995 displays as $5.00, so it must not claim to be less than a coffee
    assert_eq!(
        select_message(dec!(4.995)),
        "$5.00/day - skip one coffee and you're there!"
    );
}

#[test]
fn test_message_negative_is_lowest_tier() {
    assert_eq!(select_message(dec!(-3)), "Just $0.00/day - less than a coffee!");
}

#[test]
fn test_plan_motivation_uses_daily_amount() {
    let plan = simple(dec!(50000), 1000, Decimal::ZERO);
    assert_eq!(plan.motivation(), "$50.00/day - totally achievable!");
}

// ── currency ──────────────────────────────────────────────────

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
    assert_eq!(format_amount(dec!(5.5)), "$5.50");
    assert_eq!(format_amount(dec!(1234567.891)), "$1,234,567.89");
    assert_eq!(format_amount(dec!(-42.5)), "-$42.50");
    assert_eq!(format_amount(dec!(999.995)), "$1,000.00");
}

#[test]
fn test_round_cents() {
    assert_eq!(round_cents(dec!(0.125)), dec!(0.13));
    assert_eq!(round_cents(dec!(0.124)), dec!(0.12));
    assert_eq!(round_cents(dec!(-0.125)), dec!(-0.13));
}

// ── comparisons ───────────────────────────────────────────────

#[test]
fn test_comparison_entries_order() {
    let plan = simple(dec!(50000), 1000, Decimal::ZERO);
    let labels: Vec<&str> = plan
        .comparisons
        .entries()
        .iter()
        .map(|(reference, _)| reference.label)
        .collect();
    assert_eq!(
        labels,
        vec![
            "coffees a day",
            "lunches a week",
            "movie tickets a day",
            "streaming subscriptions a month"
        ]
    );
    assert_eq!(plan.comparisons.entries()[0].1, dec!(9.1));
}

#[test]
fn test_reference_prices() {
    let prices: Vec<Decimal> = REFERENCE_PRICES.iter().map(|r| r.price()).collect();
    assert_eq!(prices, vec![dec!(5.50), dec!(12.00), dec!(15.00), dec!(12.99)]);
}

// ── strategies ────────────────────────────────────────────────

#[test]
fn test_strategies_scale_days() {
    let strategies = savings_strategies(&input(dec!(1000), 100, Decimal::ZERO), today()).unwrap();
    assert_eq!(strategies.len(), 3);

    assert_eq!(strategies[0].kind, StrategyKind::Aggressive);
    assert_eq!(strategies[0].days, 75);
    assert_eq!(strategies[0].daily_amount, dec!(13.33));
    assert_eq!(strategies[0].target_date, in_days(75));

    assert_eq!(strategies[1].kind, StrategyKind::Balanced);
    assert_eq!(strategies[1].days, 100);
    assert_eq!(strategies[1].daily_amount, dec!(10.00));
    assert_eq!(strategies[1].target_date, in_days(100));

    assert_eq!(strategies[2].kind, StrategyKind::Relaxed);
    assert_eq!(strategies[2].days, 150);
    assert_eq!(strategies[2].daily_amount, dec!(6.67));
    assert_eq!(strategies[2].monthly_amount, dec!(200.10));
}

#[test]
fn test_strategies_round_days_up() {
    let strategies = savings_strategies(&input(dec!(100), 10, Decimal::ZERO), today()).unwrap();
    assert_eq!(strategies[0].days, 8);
    assert_eq!(strategies[2].days, 15);

    let strategies = savings_strategies(&input(dec!(100), 1, Decimal::ZERO), today()).unwrap();
    assert_eq!(strategies[0].days, 1);
    assert_eq!(strategies[2].days, 2);
}

#[test]
fn test_strategies_are_ordered_by_intensity() {
    let strategies = savings_strategies(&input(dec!(8765), 123, dec!(65)), today()).unwrap();
    assert!(strategies[0].daily_amount >= strategies[1].daily_amount);
    assert!(strategies[1].daily_amount >= strategies[2].daily_amount);
}

#[test]
fn test_strategies_reject_past_date() {
    let result = savings_strategies(&PlanInput::new(dec!(100), today(), Decimal::ZERO), today());
    assert!(matches!(
        result,
        Err(PlanError::PastOrImmediateTargetDate { .. })
    ));
}

// ── projection ────────────────────────────────────────────────

#[test]
fn test_projection_daily() {
    let p = project_completion(dec!(1000), dec!(10), ContributionPeriod::Daily, today()).unwrap();
    assert_eq!(p.days_needed, 100);
    assert_eq!(p.reached_on, in_days(100));
    assert_eq!(p.daily_rate, dec!(10.00));
}

#[test]
fn test_projection_weekly_and_monthly() {
    let weekly = project_completion(dec!(1000), dec!(70), ContributionPeriod::Weekly, today()).unwrap();
    assert_eq!(weekly.days_needed, 100);

    let monthly = project_completion(dec!(1000), dec!(300), ContributionPeriod::Monthly, today()).unwrap();
    assert_eq!(monthly.days_needed, 100);
}

#[test]
fn test_projection_rounds_days_up() {
    let p = project_completion(dec!(1000), dec!(3), ContributionPeriod::Daily, today()).unwrap();
    assert_eq!(p.days_needed, 334);
}

#[test]
fn test_projection_nothing_remaining() {
    let p = project_completion(Decimal::ZERO, dec!(5), ContributionPeriod::Daily, today()).unwrap();
    assert_eq!(p.days_needed, 0);
    assert_eq!(p.reached_on, today());
}

#[test]
fn test_projection_rejects_zero_contribution() {
    let result = project_completion(dec!(1000), Decimal::ZERO, ContributionPeriod::Weekly, today());
    assert!(matches!(result, Err(PlanError::InvalidAmount(_))));
}

#[test]
fn test_contribution_period_parse() {
    assert_eq!(ContributionPeriod::parse("weekly"), Some(ContributionPeriod::Weekly));
    assert_eq!(ContributionPeriod::parse("Month"), Some(ContributionPeriod::Monthly));
    assert_eq!(ContributionPeriod::parse("d"), Some(ContributionPeriod::Daily));
    assert_eq!(ContributionPeriod::parse("yearly"), None);
}

#[test]
fn test_plan_mode_parse() {
    assert_eq!(PlanMode::parse("simple"), Some(PlanMode::Simple));
    assert_eq!(PlanMode::parse("COMPOUND"), Some(PlanMode::Compound));
    assert_eq!(PlanMode::parse("fancy"), None);
    assert_eq!(PlanMode::default(), PlanMode::Simple);
}
