//! Profile types: the fields a user fills in and the request built from them.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

pub const AGE_RANGE: RangeInclusive<u32> = 0..=100;
pub const HEIGHT_CM_RANGE: RangeInclusive<u32> = 100..=250;
pub const WEIGHT_KG_RANGE: RangeInclusive<u32> = 0..=200;
pub const WEEKS_RANGE: RangeInclusive<u32> = 1..=52;
pub const TRAINING_SESSIONS_RANGE: RangeInclusive<u32> = 0..=7;

/// Offset applied to the current weight to derive a default target weight.
pub const TARGET_WEIGHT_OFFSET_KG: u32 = 5;

/// Clamp `value` into `range`.
pub fn clamp_to(range: &RangeInclusive<u32>, value: i64) -> u32 {
    let lo = i64::from(*range.start());
    let hi = i64::from(*range.end());
    // Bounded by a u32 range, so the cast cannot truncate.
    value.clamp(lo, hi) as u32
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Error returned when a choice field receives an unknown value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ChoiceParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Gender of the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Self::Male, Self::Female];

    pub fn id(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn label(self) -> &'static str {
        self.id()
    }
}

/// What the subject wants to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    LoseWeight,
    Maintenance,
    MassGain,
}

impl Objective {
    pub const ALL: [Objective; 3] = [Self::LoseWeight, Self::Maintenance, Self::MassGain];

    pub fn id(self) -> &'static str {
        match self {
            Self::LoseWeight => "lose_weight",
            Self::Maintenance => "maintenance",
            Self::MassGain => "mass_gain",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LoseWeight => "Lose weight",
            Self::Maintenance => "Maintenance",
            Self::MassGain => "Mass gain",
        }
    }

    /// Whether the objective has a target weight and a deadline.
    pub fn has_deadline(self) -> bool {
        !matches!(self, Self::Maintenance)
    }

    /// Default target weight for this objective, clamped to the weight bounds.
    pub fn default_target_weight(self, current_weight_kg: u32) -> u32 {
        let current = i64::from(current_weight_kg);
        let offset = i64::from(TARGET_WEIGHT_OFFSET_KG);
        let target = match self {
            Self::LoseWeight => current - offset,
            Self::Maintenance => current,
            Self::MassGain => current + offset,
        };
        clamp_to(&WEIGHT_KG_RANGE, target)
    }
}

/// Self-reported everyday activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    SlightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        Self::Sedentary,
        Self::SlightlyActive,
        Self::ModeratelyActive,
        Self::VeryActive,
        Self::ExtremelyActive,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::SlightlyActive => "slightly_active",
            Self::ModeratelyActive => "moderately_active",
            Self::VeryActive => "very_active",
            Self::ExtremelyActive => "extremely_active",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary",
            Self::SlightlyActive => "Slightly active",
            Self::ModeratelyActive => "Moderately active",
            Self::VeryActive => "Very active",
            Self::ExtremelyActive => "Extremely active",
        }
    }
}

// Display uses the human label (what the prompt sees); FromStr accepts either
// the identifier or the label, case-insensitively.
macro_rules! choice_impls {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = ChoiceParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .into_iter()
                    .find(|v| {
                        v.id().eq_ignore_ascii_case(needle)
                            || v.label().eq_ignore_ascii_case(needle)
                    })
                    .ok_or_else(|| ChoiceParseError {
                        kind: $kind,
                        value: s.to_owned(),
                    })
            }
        }
    };
}

choice_impls!(Gender, "gender");
choice_impls!(Objective, "objective");
choice_impls!(ActivityLevel, "activity level");

// ---------------------------------------------------------------------------
// PlanRequest
// ---------------------------------------------------------------------------

/// Everything the model needs to produce a plan. Built fresh per submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub gender: Gender,
    pub age: u32,
    pub height_cm: u32,
    pub current_weight_kg: u32,
    pub objective: Objective,
    pub target_weight_kg: u32,
    /// Zero under maintenance.
    pub weeks_to_goal: u32,
    pub training_sessions_per_week: u32,
    pub activity_level: ActivityLevel,
}

impl PlanRequest {
    /// Build a request with derived defaults for target weight and weeks.
    ///
    /// Numeric inputs are clamped to their control bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn with_defaults(
        gender: Gender,
        age: u32,
        height_cm: u32,
        current_weight_kg: u32,
        objective: Objective,
        training_sessions_per_week: u32,
        activity_level: ActivityLevel,
        weeks_to_goal: u32,
    ) -> Self {
        let current_weight_kg = clamp_to(&WEIGHT_KG_RANGE, i64::from(current_weight_kg));
        let weeks_to_goal = if objective.has_deadline() {
            clamp_to(&WEEKS_RANGE, i64::from(weeks_to_goal))
        } else {
            0
        };
        Self {
            gender,
            age: clamp_to(&AGE_RANGE, i64::from(age)),
            height_cm: clamp_to(&HEIGHT_CM_RANGE, i64::from(height_cm)),
            current_weight_kg,
            objective,
            target_weight_kg: objective.default_target_weight(current_weight_kg),
            weeks_to_goal,
            training_sessions_per_week: clamp_to(
                &TRAINING_SESSIONS_RANGE,
                i64::from(training_sessions_per_week),
            ),
            activity_level,
        }
    }
}
