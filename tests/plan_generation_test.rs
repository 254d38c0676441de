use chrono::{Duration, NaiveDate, Utc};
use fit_coach::models::{
    ActivityLevel, GoalPreferences, GoalType, PlanRequest, PlanStatus, Sex, UserProfile,
};
use fit_coach::services::macro_allocator::validate_macros;
use fit_coach::services::plan_assembler::assemble;
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn profile() -> UserProfile {
    let user_id = Uuid::new_v4();
    UserProfile {
        id: Uuid::new_v4(),
        user_id,
        birthdate: NaiveDate::from_ymd_opt(1994, 1, 15),
        age_years: None,
        height_cm: 180.3,
        weight_kg: 88.4,
        sex: Sex::Male,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn preferences(user_id: Uuid) -> GoalPreferences {
    GoalPreferences {
        user_id,
        goal_type: GoalType::Lose,
        weekly_change_kg: -0.5,
        target_weight_kg: None,
        activity_level: ActivityLevel::Moderate,
        workout_days_per_week: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// End-to-end generation scenario: 88.4 kg, 180.3 cm, age 30, male,
/// moderate activity, losing 0.5 kg/week over a 14-day request.
#[test]
fn two_week_weight_loss_plan() {
    let profile = profile();
    let prefs = preferences(profile.user_id);
    let request = PlanRequest {
        start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        requested_days: 14,
        target_loss_lb: None,
        goal_override: None,
    };

    let bundle = assemble(&profile, &prefs, &request);

    // BMR = 10*88.4 + 6.25*180.3 - 5*30 + 5 = 1865.875
    // TDEE = 1865.875 * 1.55, truncated
    let expected_tdee = (1865.875_f64 * 1.55) as i32;
    assert_eq!(bundle.targets.tdee, expected_tdee);

    // Daily deficit of 0.5 * 7700 / 7 = 550 kcal
    let expected_target = (1865.875 * 1.55 - 550.0) as i32;
    assert_eq!(bundle.targets.calorie_target, expected_target);
    assert!(bundle.targets.calorie_target >= 1200);

    // 0.5 kg/week sits inside the [0.442, 0.884] safe window for 88.4 kg,
    // so the request is not extended
    assert_eq!(bundle.days.len(), 14);
    assert_eq!(
        bundle.end_date,
        request.start_date + Duration::days(13)
    );

    // Default weight-loss cycle: four training slots plus one rest day
    assert_eq!(bundle.cycle.len(), 5);

    // 14 days means a single calorie block: no decrement anywhere
    assert!(bundle
        .days
        .iter()
        .all(|d| d.calorie_target == bundle.targets.calorie_target));

    assert_eq!(bundle.status, PlanStatus::Proposed);
    assert!(!bundle.targets.low_confidence);
    assert!(validate_macros(&bundle.targets.macros, bundle.targets.calorie_target));
    assert!(bundle.targets.step_goal > 0);
    assert!(bundle.targets.calorie_formula.contains("Mifflin-St Jeor"));
}

#[test]
fn checkpoints_descend_toward_the_derived_target() {
    let profile = profile();
    let prefs = preferences(profile.user_id);
    let request = PlanRequest {
        start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        requested_days: 14,
        target_loss_lb: None,
        goal_override: None,
    };

    let bundle = assemble(&profile, &prefs, &request);

    assert!(!bundle.checkpoints.is_empty());
    let mut previous = profile.weight_kg;
    for checkpoint in &bundle.checkpoints {
        assert!(checkpoint.expected_weight_kg < previous);
        let half = checkpoint.max_weight_kg - checkpoint.expected_weight_kg;
        assert!((half - 0.01 * profile.weight_kg).abs() < 1e-9);
        previous = checkpoint.expected_weight_kg;
    }
}

#[test]
fn goal_override_beats_stored_preference() {
    let profile = profile();
    let prefs = preferences(profile.user_id);
    let request = PlanRequest {
        start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        requested_days: 28,
        target_loss_lb: None,
        goal_override: Some(GoalType::Maintain),
    };

    let bundle = assemble(&profile, &prefs, &request);

    assert_eq!(bundle.targets.goal_type, GoalType::Maintain);
    // Maintenance plans never auto-decrement
    assert!(bundle
        .days
        .iter()
        .all(|d| d.calorie_target == bundle.targets.calorie_target));
}

#[test]
fn day_schedule_cycles_through_the_generated_pattern() {
    let profile = profile();
    let prefs = preferences(profile.user_id);
    let request = PlanRequest {
        start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        requested_days: 21,
        target_loss_lb: None,
        goal_override: None,
    };

    let bundle = assemble(&profile, &prefs, &request);
    let cycle_length = bundle.cycle.len();
    for (i, day) in bundle.days.iter().enumerate() {
        assert_eq!(day.workout.label, bundle.cycle[i % cycle_length].label);
    }
}
