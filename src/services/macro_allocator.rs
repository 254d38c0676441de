//! Splits a calorie target into protein/carb/fat grams under goal-specific
//! bounds, with a bounded repair loop.

use crate::models::{GoalType, MacroTargets};

/// Hard protein bounds in g/kg, applied after the goal band.
pub const PROTEIN_HARD_MIN: f64 = 1.2;
pub const PROTEIN_HARD_MAX: f64 = 2.4;

/// Tolerance between the calorie target and derived macro calories.
pub const MACRO_KCAL_TOLERANCE: i32 = 50;

const FAT_PER_KG: f64 = 0.8;
const FAT_PER_KG_MIN: f64 = 0.6;
const FAT_PER_KG_MAX: f64 = 1.0;
/// Fat never drops below this share of total calories.
const FAT_CALORIE_SHARE_MIN: f64 = 0.2;

/// Allocation result. `low_confidence` is set when the repair loop gave up
/// without satisfying the validators; the grams are then best-effort.
#[derive(Debug, Clone)]
pub struct MacroAllocation {
    pub macros: MacroTargets,
    pub low_confidence: bool,
}

/// Goal-specific protein band in g/kg.
fn protein_band(goal: GoalType) -> (f64, f64) {
    match goal {
        GoalType::Gain => (1.6, 2.2),
        GoalType::Maintain => (1.4, 2.0),
        GoalType::Lose => (1.4, 2.2),
    }
}

fn protein_per_kg_default(goal: GoalType) -> f64 {
    match goal {
        GoalType::Gain => 1.8,
        GoalType::Maintain | GoalType::Lose => 1.6,
    }
}

fn round_to_5(grams: f64) -> i32 {
    ((grams / 5.0).round() * 5.0) as i32
}

/// Splits `calories` into macro grams for the given body weight and goal.
///
/// Runs the allocator once, validates, and on failure retries the same
/// computation once more before accepting the result as low-confidence.
/// The non-convergent case (protein and fat floors alone exceeding the
/// calorie target) is a known edge and is what the flag exists for.
pub fn allocate(calories: i32, weight_kg: f64, goal: GoalType) -> MacroAllocation {
    let mut macros = compute(calories, weight_kg, goal);
    if validate_macros(&macros, calories) && validate_protein(macros.protein_g, weight_kg, goal) {
        return MacroAllocation {
            macros,
            low_confidence: false,
        };
    }

    // One bounded retry through the same allocator.
    macros = compute(calories, weight_kg, goal);
    let ok =
        validate_macros(&macros, calories) && validate_protein(macros.protein_g, weight_kg, goal);
    MacroAllocation {
        macros,
        low_confidence: !ok,
    }
}

fn compute(calories: i32, weight_kg: f64, goal: GoalType) -> MacroTargets {
    let calories_f = calories as f64;

    let (band_lo, band_hi) = protein_band(goal);
    let per_kg = protein_per_kg_default(goal)
        .clamp(band_lo, band_hi)
        .clamp(PROTEIN_HARD_MIN, PROTEIN_HARD_MAX);
    let mut protein = weight_kg * per_kg;
    let protein_floor = weight_kg * PROTEIN_HARD_MIN;

    let mut fat = (weight_kg * FAT_PER_KG).clamp(weight_kg * FAT_PER_KG_MIN, weight_kg * FAT_PER_KG_MAX);
    let fat_from_share = FAT_CALORIE_SHARE_MIN * calories_f / 9.0;
    if fat < fat_from_share {
        fat = fat_from_share;
    }
    let fat_floor = weight_kg * FAT_PER_KG_MIN;

    // If protein + fat alone exceed the target, shrink fat to its floor
    // first, then protein to its floor.
    let mut remainder = calories_f - protein * 4.0 - fat * 9.0;
    if remainder < 0.0 {
        let fat_give = (fat - fat_floor).max(0.0).min(-remainder / 9.0);
        fat -= fat_give;
        remainder = calories_f - protein * 4.0 - fat * 9.0;
    }
    if remainder < 0.0 {
        let protein_give = (protein - protein_floor).max(0.0).min(-remainder / 4.0);
        protein -= protein_give;
        remainder = calories_f - protein * 4.0 - fat * 9.0;
    }

    let carbs = (remainder / 4.0).max(0.0);

    let protein_g = round_to_5(protein);
    let fat_g = round_to_5(fat);
    let mut carbs_g = round_to_5(carbs);

    // Fold rounding drift back into carbs when it exceeds the tolerance.
    let derived = protein_g * 4 + carbs_g * 4 + fat_g * 9;
    let drift = calories - derived;
    if drift.abs() > MACRO_KCAL_TOLERANCE {
        carbs_g = (carbs_g + (drift as f64 / 4.0).round() as i32).max(0);
    }

    MacroTargets {
        protein_g,
        carbs_g,
        fat_g,
    }
}

/// Derived calories within ±50 kcal of the target and all grams ≥ 0.
pub fn validate_macros(macros: &MacroTargets, calories: i32) -> bool {
    macros.protein_g >= 0
        && macros.carbs_g >= 0
        && macros.fat_g >= 0
        && (macros.calories() - calories).abs() <= MACRO_KCAL_TOLERANCE
}

/// Protein g/kg within the hard [1.2, 2.4] band and the tighter goal band.
pub fn validate_protein(protein_g: i32, weight_kg: f64, goal: GoalType) -> bool {
    if weight_kg <= 0.0 {
        return false;
    }
    let per_kg = protein_g as f64 / weight_kg;
    let (band_lo, band_hi) = protein_band(goal);
    // Rounding to the nearest 5 g moves per-kg by up to 2.5/weight.
    let slack = 2.5 / weight_kg;
    per_kg >= PROTEIN_HARD_MIN - slack
        && per_kg <= PROTEIN_HARD_MAX + slack
        && per_kg >= band_lo - slack
        && per_kg <= band_hi + slack
}
