//! Form field names and the errors raised when an update cannot be applied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::profile::ChoiceParseError;

/// One input control on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Gender,
    Age,
    HeightCm,
    CurrentWeightKg,
    Objective,
    TargetWeightKg,
    WeeksToGoal,
    TrainingSessionsPerWeek,
    ActivityLevel,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Self::Gender,
        Self::Age,
        Self::HeightCm,
        Self::CurrentWeightKg,
        Self::Objective,
        Self::TargetWeightKg,
        Self::WeeksToGoal,
        Self::TrainingSessionsPerWeek,
        Self::ActivityLevel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Age => "age",
            Self::HeightCm => "height_cm",
            Self::CurrentWeightKg => "current_weight_kg",
            Self::Objective => "objective",
            Self::TargetWeightKg => "target_weight_kg",
            Self::WeeksToGoal => "weeks_to_goal",
            Self::TrainingSessionsPerWeek => "training_sessions_per_week",
            Self::ActivityLevel => "activity_level",
        }
    }

    /// Whether the control takes an integer rather than a choice.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Gender | Self::Objective | Self::ActivityLevel)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_owned()))
    }
}

/// Errors from [`super::FormCollector::set_field`].
///
/// Out-of-range numbers are never an error; they clamp.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("unknown form field: {0:?}")]
    UnknownField(String),

    #[error("field {field} expects a number, got {value:?}")]
    NotANumber { field: Field, value: String },

    #[error(transparent)]
    InvalidChoice(#[from] ChoiceParseError),
}

/// Parse an integer control value. Fractions round to the nearest integer,
/// as a number spinner would.
pub(crate) fn parse_number(field: Field, value: &str) -> Result<i64, FieldError> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    match trimmed.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x.round() as i64),
        _ => Err(FieldError::NotANumber {
            field,
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>().unwrap(), field);
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = "shoe_size".parse::<Field>().unwrap_err();
        assert!(matches!(err, FieldError::UnknownField(ref n) if n == "shoe_size"));
    }

    #[test]
    fn parse_number_accepts_fractions_and_whitespace() {
        assert_eq!(parse_number(Field::Age, " 42 ").unwrap(), 42);
        assert_eq!(parse_number(Field::Age, "41.6").unwrap(), 42);
        assert_eq!(parse_number(Field::Age, "-7").unwrap(), -7);
        assert!(matches!(
            parse_number(Field::Age, "forty"),
            Err(FieldError::NotANumber { field: Field::Age, .. })
        ));
        assert!(parse_number(Field::Age, "NaN").is_err());
    }
}
