//! Domain types for the fitness tracking data set.
//!
//! This module provides:
//! - User, exercise, and log row types with their fixed category enums
//! - Pure health metrics (BMI, TDEE, sleep goal attainment)

pub mod exercise;
pub mod metrics;
pub mod records;
pub mod user;

pub use exercise::{Exercise, Intensity, NewExercise, EXERCISE_NAMES, WORKOUT_EXERCISE_NAMES};
pub use metrics::{bmi, meets_sleep_goal, tdee, BmiCategory, CalorieRecommendation};
pub use records::{NewNutritionLog, NewSleepRecord, NewWorkout, SleepQuality};
pub use user::{ActivityLevel, Gender, NewUser, ParseCategoryError};
