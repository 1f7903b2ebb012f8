//! Derived health metrics used by the reports.

use serde::Serialize;

use super::user::ActivityLevel;

/// Width of the band around TDEE inside which intake counts as maintenance.
pub const CALORIE_TOLERANCE: f64 = 200.0;

/// Body mass index from height in centimetres and weight in kilograms.
///
/// Returns `None` for a non-positive height.
pub fn bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if height_cm <= 0.0 {
        return None;
    }
    let meters = height_cm / 100.0;
    Some(weight_kg / (meters * meters))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Healthy
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Healthy => "Healthy weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Total daily energy expenditure.
pub fn tdee(bmr: f64, level: ActivityLevel) -> f64 {
    bmr * level.multiplier()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalorieRecommendation {
    Decrease,
    Increase,
    Maintain,
}

impl CalorieRecommendation {
    /// Compare average intake to TDEE. Without a TDEE there is nothing to
    /// compare against, so the advice is to maintain.
    pub fn classify(avg_calories: f64, tdee: Option<f64>) -> Self {
        match tdee {
            Some(t) if avg_calories > t + CALORIE_TOLERANCE => CalorieRecommendation::Decrease,
            Some(t) if avg_calories < t - CALORIE_TOLERANCE => CalorieRecommendation::Increase,
            _ => CalorieRecommendation::Maintain,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CalorieRecommendation::Decrease => "Decrease caloric intake",
            CalorieRecommendation::Increase => "Increase caloric intake",
            CalorieRecommendation::Maintain => "Maintain caloric intake",
        }
    }
}

impl std::fmt::Display for CalorieRecommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub fn meets_sleep_goal(average_hours: f64, goal_hours: i64) -> bool {
    average_hours >= goal_hours as f64
}
