//! Basal metabolic rate, total energy expenditure, and calorie targets.

use crate::models::{ActivityLevel, GoalType, Sex};

/// kcal stored in one kg of body fat.
pub const KCAL_PER_KG: f64 = 7700.0;

/// Hard floor for any generated calorie target.
pub const MIN_CALORIE_TARGET: i32 = 1200;

/// Calorie target plus the numbers it was derived from.
#[derive(Debug, Clone)]
pub struct EnergyTargets {
    pub bmr: f64,
    pub tdee: i32,
    pub calorie_target: i32,
    /// Weekly weight change after sign normalization against the goal.
    pub weekly_change_kg: f64,
    pub calorie_formula: String,
}

/// Mifflin-St Jeor basal metabolic rate.
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: i32, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match sex {
        Sex::Female => base - 161.0,
        Sex::Male => base + 5.0,
    }
}

pub fn tdee(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.multiplier()
}

/// Forces the weekly change's sign to agree with the goal. Mismatches are
/// corrected, never rejected.
pub fn normalize_weekly_change(goal: GoalType, weekly_change_kg: f64) -> f64 {
    match goal {
        GoalType::Lose => -weekly_change_kg.abs(),
        GoalType::Gain => weekly_change_kg.abs(),
        GoalType::Maintain => 0.0,
    }
}

/// Computes the daily calorie target for a goal. All calorie values are
/// truncated to whole kcal.
pub fn energy_targets(
    goal: GoalType,
    weekly_change_kg: f64,
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    sex: Sex,
    activity: ActivityLevel,
) -> EnergyTargets {
    let bmr_value = bmr(weight_kg, height_cm, age_years, sex);
    let tdee_value = tdee(bmr_value, activity);
    let weekly = normalize_weekly_change(goal, weekly_change_kg);

    let (calorie_target, calorie_formula) = match goal {
        GoalType::Lose => {
            let daily_delta = weekly * KCAL_PER_KG / 7.0;
            let target = (tdee_value + daily_delta).max(MIN_CALORIE_TARGET as f64);
            let formula = format!(
                "Mifflin-St Jeor BMR {:.0} kcal x {} ({}) = TDEE {:.0} kcal; {:.0} kcal/day deficit for {:.2} kg/week",
                bmr_value,
                activity.multiplier(),
                activity.label(),
                tdee_value,
                daily_delta.abs(),
                weekly.abs(),
            );
            (target, formula)
        }
        GoalType::Gain => {
            let bmi = body_mass_index(weight_kg, height_cm);
            let surplus = gain_surplus(bmi, activity);
            let target = (tdee_value + surplus).max(tdee_value);
            let formula = format!(
                "Mifflin-St Jeor BMR {:.0} kcal x {} ({}) = TDEE {:.0} kcal; {:.0} kcal/day surplus",
                bmr_value,
                activity.multiplier(),
                activity.label(),
                tdee_value,
                surplus,
            );
            (target, formula)
        }
        GoalType::Maintain => {
            let floor = if weight_kg < 60.0 { 1500.0 } else { 1800.0 };
            let target = tdee_value.max(floor);
            let formula = format!(
                "Mifflin-St Jeor BMR {:.0} kcal x {} ({}) = TDEE {:.0} kcal; maintenance",
                bmr_value,
                activity.multiplier(),
                activity.label(),
                tdee_value,
            );
            (target, formula)
        }
    };

    EnergyTargets {
        bmr: bmr_value,
        tdee: tdee_value as i32,
        calorie_target: calorie_target as i32,
        weekly_change_kg: weekly,
        calorie_formula,
    }
}

pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Underweight or highly active gainers get the larger surplus.
fn gain_surplus(bmi: f64, activity: ActivityLevel) -> f64 {
    let surplus: f64 = if bmi < 18.5
        || matches!(activity, ActivityLevel::Active | ActivityLevel::VeryActive)
    {
        350.0
    } else {
        200.0
    };
    surplus.min(500.0)
}

/// Daily step goal keyed by activity level, bumped for weight loss.
pub fn step_goal(goal: GoalType, activity: ActivityLevel) -> i32 {
    let base = match activity {
        ActivityLevel::Sedentary => 6000,
        ActivityLevel::Light => 7000,
        ActivityLevel::Moderate => 8000,
        ActivityLevel::Active => 10000,
        ActivityLevel::VeryActive => 12000,
        ActivityLevel::Unspecified => 8000,
    };
    match goal {
        GoalType::Lose => (base + 2000).min(12000),
        GoalType::Gain | GoalType::Maintain => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmr_matches_mifflin_st_jeor_literals() {
        // 10*80 + 6.25*180 - 5*30 + 5 = 1780
        assert_eq!(bmr(80.0, 180.0, 30, Sex::Male), 1780.0);
        // Female branch subtracts 161 instead of adding 5
        assert_eq!(bmr(80.0, 180.0, 30, Sex::Female), 1614.0);
    }

    #[test]
    fn tdee_uses_activity_multiplier() {
        let b = bmr(80.0, 180.0, 30, Sex::Male);
        assert_eq!(tdee(b, ActivityLevel::Sedentary), 1780.0 * 1.20);
        assert_eq!(tdee(b, ActivityLevel::Unspecified), 1780.0 * 1.40);
    }

    #[test]
    fn lose_target_applies_deficit_with_floor() {
        let targets = energy_targets(
            GoalType::Lose,
            // Positive sign gets corrected to a deficit
            0.5,
            80.0,
            180.0,
            30,
            Sex::Male,
            ActivityLevel::Moderate,
        );
        let expected_tdee = 1780.0 * 1.55;
        assert_eq!(targets.tdee, expected_tdee as i32);
        assert_eq!(targets.weekly_change_kg, -0.5);
        assert_eq!(targets.calorie_target, (expected_tdee - 550.0) as i32);

        let floored = energy_targets(
            GoalType::Lose,
            -3.0,
            45.0,
            150.0,
            70,
            Sex::Female,
            ActivityLevel::Sedentary,
        );
        assert_eq!(floored.calorie_target, MIN_CALORIE_TARGET);
    }

    #[test]
    fn gain_surplus_depends_on_bmi_and_activity() {
        // BMI well above 18.5, moderate activity: small surplus
        let modest = energy_targets(
            GoalType::Gain,
            0.25,
            80.0,
            180.0,
            30,
            Sex::Male,
            ActivityLevel::Moderate,
        );
        assert_eq!(modest.calorie_target - modest.tdee, 200);

        // Underweight: larger surplus
        let underweight = energy_targets(
            GoalType::Gain,
            0.25,
            55.0,
            180.0,
            30,
            Sex::Male,
            ActivityLevel::Moderate,
        );
        assert_eq!(underweight.calorie_target - underweight.tdee, 350);

        // Very active: larger surplus regardless of BMI
        let active = energy_targets(
            GoalType::Gain,
            0.25,
            80.0,
            180.0,
            30,
            Sex::Male,
            ActivityLevel::VeryActive,
        );
        assert_eq!(active.calorie_target - active.tdee, 350);
    }

    #[test]
    fn maintain_floors_depend_on_weight() {
        let light = energy_targets(
            GoalType::Maintain,
            0.0,
            45.0,
            150.0,
            75,
            Sex::Female,
            ActivityLevel::Sedentary,
        );
        assert!(light.calorie_target >= 1500);

        let heavier = energy_targets(
            GoalType::Maintain,
            0.0,
            62.0,
            150.0,
            80,
            Sex::Female,
            ActivityLevel::Sedentary,
        );
        assert!(heavier.calorie_target >= 1800);
    }
}
