use serde::{Deserialize, Serialize};

pub const REST_DAY_LABEL: &str = "Rest Day";

/// One day's structured workout: a label plus the strength and cardio work
/// behind it. Serialized as JSON into template days and overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSpec {
    pub label: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseSpec>,
    #[serde(default)]
    pub cardio: Option<CardioBlock>,
}

impl WorkoutSpec {
    pub fn rest_day() -> Self {
        Self {
            label: REST_DAY_LABEL.to_string(),
            exercises: Vec::new(),
            cardio: None,
        }
    }

    /// A case-insensitive "rest day" label marks a non-training day.
    pub fn is_rest_day(&self) -> bool {
        self.label.eq_ignore_ascii_case("rest day")
    }

    pub fn total_sets(&self) -> i32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSpec {
    pub name: String,
    pub sets: i32,
    pub reps: i32,
    #[serde(default)]
    pub rpe: Option<f64>,
}

impl ExerciseSpec {
    pub fn new(name: &str, sets: i32, reps: i32, rpe: f64) -> Self {
        Self {
            name: name.to_string(),
            sets,
            reps,
            rpe: Some(rpe),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardioBlock {
    pub kind: String,
    pub duration_min: i32,
}

impl CardioBlock {
    pub fn new(kind: &str, duration_min: i32) -> Self {
        Self {
            kind: kind.to_string(),
            duration_min,
        }
    }
}

/// Movement categories used when substituting exercises in an existing
/// plan. Classification is a static keyword table, not pattern scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    Squat,
    Hinge,
    HorizontalPush,
    HorizontalPull,
    VerticalPush,
    VerticalPull,
}
