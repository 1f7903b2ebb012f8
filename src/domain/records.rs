//! Per-user log rows: workouts, sleep, and nutrition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::exercise::Intensity;
use super::user::ParseCategoryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWorkout {
    pub user_id: i64,
    pub date: NaiveDate,
    /// Free text; not tied to the Exercises table.
    pub exercise_name: String,
    /// Minutes.
    pub duration: i64,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SleepQuality {
    Good,
    Fair,
    Poor,
}

impl SleepQuality {
    pub const ALL: [SleepQuality; 3] = [SleepQuality::Good, SleepQuality::Fair, SleepQuality::Poor];

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepQuality::Good => "Good",
            SleepQuality::Fair => "Fair",
            SleepQuality::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SleepQuality {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SleepQuality::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| ParseCategoryError {
                kind: "sleep quality",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSleepRecord {
    pub user_id: i64,
    pub date: NaiveDate,
    /// Hours.
    pub duration: i64,
    pub quality: SleepQuality,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNutritionLog {
    pub user_id: i64,
    pub date: NaiveDate,
    pub calories: i64,
}
