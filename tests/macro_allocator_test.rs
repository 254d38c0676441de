use fit_coach::models::GoalType;
use fit_coach::services::macro_allocator::{allocate, validate_macros, validate_protein};
use proptest::prelude::*;

#[test]
fn allocation_grid_satisfies_validators_when_feasible() {
    for calories in (1200..=4000).step_by(100) {
        for weight in [40.0, 55.0, 70.0, 85.0, 100.0, 115.0, 130.0, 150.0] {
            for goal in [GoalType::Lose, GoalType::Gain, GoalType::Maintain] {
                let allocation = allocate(calories, weight, goal);

                // Grams are never negative, flagged or not
                assert!(allocation.macros.protein_g >= 0);
                assert!(allocation.macros.carbs_g >= 0);
                assert!(allocation.macros.fat_g >= 0);

                if !allocation.low_confidence {
                    assert!(
                        validate_macros(&allocation.macros, calories),
                        "macros off target for cal={calories} w={weight} goal={goal:?}: {:?}",
                        allocation.macros
                    );
                    assert!(
                        validate_protein(allocation.macros.protein_g, weight, goal),
                        "protein out of band for cal={calories} w={weight} goal={goal:?}"
                    );
                } else {
                    // The only non-convergent case: protein and fat floors
                    // alone exceed the calorie budget
                    let floor_kcal = 1.2 * weight * 4.0 + 0.6 * weight * 9.0;
                    assert!(
                        floor_kcal > calories as f64 - 100.0,
                        "unexpected low-confidence allocation for cal={calories} w={weight}"
                    );
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn allocation_is_valid_or_flagged(
        calories in 1200..4000i32,
        weight in 40.0..150.0f64,
        goal_index in 0..3usize,
    ) {
        let goal = [GoalType::Lose, GoalType::Gain, GoalType::Maintain][goal_index];
        let allocation = allocate(calories, weight, goal);

        prop_assert!(allocation.macros.protein_g >= 0);
        prop_assert!(allocation.macros.carbs_g >= 0);
        prop_assert!(allocation.macros.fat_g >= 0);

        if !allocation.low_confidence {
            prop_assert!(validate_macros(&allocation.macros, calories));
            prop_assert!(validate_protein(allocation.macros.protein_g, weight, goal));
        }
    }

    #[test]
    fn allocation_is_deterministic(
        calories in 1200..4000i32,
        weight in 40.0..150.0f64,
    ) {
        let first = allocate(calories, weight, GoalType::Lose);
        let second = allocate(calories, weight, GoalType::Lose);
        prop_assert_eq!(first.macros, second.macros);
        prop_assert_eq!(first.low_confidence, second.low_confidence);
    }
}

#[test]
fn typical_allocation_lands_on_target() {
    let allocation = allocate(2342, 88.4, GoalType::Lose);
    assert!(!allocation.low_confidence);
    assert!((allocation.macros.calories() - 2342).abs() <= 50);
    // 1.6 g/kg default for weight loss, modulo 5 g rounding
    let per_kg = allocation.macros.protein_g as f64 / 88.4;
    assert!((per_kg - 1.6).abs() < 0.05);
}
