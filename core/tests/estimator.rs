//! Heuristic risk estimator: base score, adjustment boundaries, clamping.

use churn_core::{
    estimator::{estimate, explain, BASE_SCORE},
    profile::{Gender, LastInteraction, ProfileData, ServiceType},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn profile() -> ProfileData {
    ProfileData::default()
}

/// Profile with every adjustment neutral, so one field can be varied alone.
fn neutral() -> ProfileData {
    ProfileData {
        service_type: ServiceType::Standard,
        ..ProfileData::default()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// 30 base, Premium −10, nothing else fires (spend ratio 0.2).
#[test]
fn default_profile_scores_twenty() {
    assert_eq!(estimate(&profile()).value(), 20);

    let b = explain(&profile());
    assert_eq!(b.base, BASE_SCORE);
    assert_eq!(b.service_type, -10);
    assert_eq!(b.drivers(), vec![("service_type", -10)]);
}

#[test]
fn neutral_profile_scores_base() {
    assert_eq!(estimate(&neutral()).value(), 30);
}

#[test]
fn age_boundaries_are_strict() {
    let at = |age| estimate(&ProfileData { age, ..neutral() }).value();
    assert_eq!(at(24), 40);
    assert_eq!(at(25), 30, "age 25 must not adjust");
    assert_eq!(at(60), 30, "age 60 must not adjust");
    assert_eq!(at(61), 35);
}

#[test]
fn tenure_boundaries_are_strict() {
    let at = |tenure| estimate(&ProfileData { tenure, ..neutral() }).value();
    assert_eq!(at(11), 50);
    assert_eq!(at(12), 40, "tenure 12 falls into the <24 tier only");
    assert_eq!(at(23), 40);
    assert_eq!(at(24), 30, "tenure 24 must not adjust");
    assert_eq!(at(48), 30, "tenure 48 must not adjust");
    assert_eq!(at(49), 20);
}

#[test]
fn support_call_tiers() {
    let at = |support_calls| estimate(&ProfileData { support_calls, ..neutral() }).value();
    assert_eq!(at(0), 25);
    assert_eq!(at(3), 30);
    assert_eq!(at(4), 38);
    assert_eq!(at(5), 38);
    assert_eq!(at(6), 45);
}

#[test]
fn last_interaction_and_service_adjustments() {
    let li = |last_interaction| estimate(&ProfileData { last_interaction, ..neutral() }).value();
    assert_eq!(li(LastInteraction::Within24Hours), 25);
    assert_eq!(li(LastInteraction::WithinAWeek), 30);
    assert_eq!(li(LastInteraction::WithinAMonth), 35);
    assert_eq!(li(LastInteraction::Over3Months), 50);

    assert_eq!(estimate(&ProfileData { service_type: ServiceType::Basic, ..neutral() }).value(), 45);
    assert_eq!(estimate(&ProfileData { auto_pay: false, ..neutral() }).value(), 40);
}

#[test]
fn spend_ratio_thresholds() {
    // 75k income: ratio > 0.3 needs spend > 1875/month, < 0.1 needs < 625
    let at = |monthly_spend| estimate(&ProfileData { monthly_spend, ..neutral() }).value();
    assert_eq!(at(1900), 40);
    assert_eq!(at(1250), 30);
    assert_eq!(at(600), 35);
}

/// Every risk factor at its worst pushes well past 100; the score clamps.
#[test]
fn worst_case_clamps_to_hundred() {
    let worst = ProfileData {
        age:              20,
        gender:           Gender::Other,
        income:           20_000,
        tenure:           1,
        service_type:     ServiceType::Basic,
        monthly_spend:    5_000,
        auto_pay:         false,
        support_calls:    20,
        last_interaction: LastInteraction::Over3Months,
    };
    let b = explain(&worst);
    assert_eq!(b.raw_total, 130);
    assert_eq!(b.score.value(), 100);
}

/// Every protective factor at its best still cannot go below 0.
#[test]
fn best_case_stays_non_negative() {
    let best = ProfileData {
        age:              40,
        gender:           Gender::Female,
        income:           200_000,
        tenure:           120,
        service_type:     ServiceType::Premium,
        monthly_spend:    2_000,
        auto_pay:         true,
        support_calls:    0,
        last_interaction: LastInteraction::Within24Hours,
    };
    // 30 − 10 − 10 − 5 − 5 = 0; spend ratio 0.12 is neutral
    assert_eq!(estimate(&best).value(), 0);
}

#[test]
fn estimate_is_deterministic_and_bounded() {
    for age in [18, 24, 25, 40, 60, 61, 80] {
        for tenure in [1, 11, 12, 23, 24, 48, 49, 120] {
            for support_calls in [0, 3, 4, 6, 20] {
                let p = ProfileData { age, tenure, support_calls, ..profile() };
                let a = estimate(&p);
                let b = estimate(&p);
                assert_eq!(a, b);
                assert!(a.value() <= 100);
            }
        }
    }
}
