use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::user::ParseCategoryError;

/// Exercise catalogue cycled through by the seeder, one per iteration.
pub const EXERCISE_NAMES: [&str; 10] = [
    "Run 5K",
    "Weight Lifting",
    "Crossfit",
    "Stretching",
    "Run 10K",
    "Swimming",
    "Boxing",
    "Jogging",
    "Yoga",
    "Cycling",
];

/// Exercise names a generated workout may log.
pub const WORKOUT_EXERCISE_NAMES: [&str; 4] = ["Run 5K", "Weight Lifting", "Crossfit", "Stretching"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Light,
    Moderate,
    Hard,
    VeryHard,
}

impl Intensity {
    pub const ALL: [Intensity; 4] = [
        Intensity::Light,
        Intensity::Moderate,
        Intensity::Hard,
        Intensity::VeryHard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "Light",
            Intensity::Moderate => "Moderate",
            Intensity::Hard => "Hard",
            Intensity::VeryHard => "Very Hard",
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intensity::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| ParseCategoryError {
                kind: "intensity",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewExercise {
    pub name: String,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub intensity: Intensity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_labels() {
        assert_eq!(Intensity::VeryHard.to_string(), "Very Hard");
        assert_eq!("Very Hard".parse::<Intensity>().unwrap(), Intensity::VeryHard);
        assert!("Extreme".parse::<Intensity>().is_err());
    }

    #[test]
    fn test_workout_names_are_catalogued() {
        for name in WORKOUT_EXERCISE_NAMES {
            assert!(EXERCISE_NAMES.contains(&name));
        }
    }
}
