//! Synthetic row generation.
//!
//! All randomness flows through one explicitly seeded [`StdRng`], so two
//! generators built with the same seed and reference date produce identical
//! rows in identical order.

use crate::domain::{
    ActivityLevel, Gender, Intensity, NewExercise, NewNutritionLog, NewSleepRecord, NewUser,
    NewWorkout, SleepQuality, EXERCISE_NAMES, WORKOUT_EXERCISE_NAMES,
};
use chrono::{Duration, Months, NaiveDate};
use fake::faker::internet::en::{SafeEmail, Username};
use fake::Fake;
use rand::prelude::*;
use std::collections::HashSet;

/// Oldest and youngest generated users, in years.
const MIN_AGE_YEARS: u32 = 18;
const MAX_AGE_YEARS: u32 = 90;

/// How far back generated log rows may be dated.
const RECENT_WINDOW_DAYS: i64 = 30;

/// Fresh email draws before falling back to a numeric suffix.
const EMAIL_ATTEMPTS: usize = 16;

pub struct FakeDataGenerator {
    rng: StdRng,
    today: NaiveDate,
    issued_emails: HashSet<String>,
}

impl FakeDataGenerator {
    /// Create a generator. `today` anchors every generated date.
    pub fn new(seed: u64, today: NaiveDate) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            today,
            issued_emails: HashSet::new(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Uniform choice from a slice, `None` when empty.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        items.choose(&mut self.rng).copied()
    }

    pub fn user(&mut self) -> NewUser {
        let username: String = Username().fake_with_rng(&mut self.rng);
        let email = self.unique_email();
        let date_of_birth = self.date_of_birth();
        let gender = Gender::ALL[self.rng.gen_range(0..Gender::ALL.len())];
        let height = round2(self.rng.gen_range(150.0..=200.0));
        let weight = round2(self.rng.gen_range(50.0..=120.0));
        let sleep_goal = self.rng.gen_range(6..=12);
        let activity_level = ActivityLevel::ALL[self.rng.gen_range(0..ActivityLevel::ALL.len())];
        let bmr = round2(self.rng.gen_range(1200.0..=2500.0));

        NewUser {
            username,
            email,
            date_of_birth,
            gender,
            height: Some(height),
            weight: Some(weight),
            sleep_goal,
            activity_level,
            bmr: Some(bmr),
        }
    }

    /// The exercise for outer iteration `iteration`, cycling the catalogue.
    pub fn exercise(&mut self, iteration: usize) -> NewExercise {
        NewExercise {
            name: EXERCISE_NAMES[iteration % EXERCISE_NAMES.len()].to_string(),
            intensity: self.intensity(),
        }
    }

    pub fn workout(&mut self, user_id: i64) -> NewWorkout {
        let exercise_name =
            WORKOUT_EXERCISE_NAMES[self.rng.gen_range(0..WORKOUT_EXERCISE_NAMES.len())];
        NewWorkout {
            user_id,
            date: self.recent_date(),
            exercise_name: exercise_name.to_string(),
            duration: self.rng.gen_range(20..=120),
            intensity: self.intensity(),
        }
    }

    pub fn sleep_record(&mut self, user_id: i64) -> NewSleepRecord {
        NewSleepRecord {
            user_id,
            date: self.recent_date(),
            duration: self.rng.gen_range(4..=12),
            quality: SleepQuality::ALL[self.rng.gen_range(0..SleepQuality::ALL.len())],
        }
    }

    pub fn nutrition_log(&mut self, user_id: i64) -> NewNutritionLog {
        NewNutritionLog {
            user_id,
            date: self.recent_date(),
            calories: self.rng.gen_range(1200..=3500),
        }
    }

    fn intensity(&mut self) -> Intensity {
        Intensity::ALL[self.rng.gen_range(0..Intensity::ALL.len())]
    }

    fn unique_email(&mut self) -> String {
        let mut candidate: String = SafeEmail().fake_with_rng(&mut self.rng);
        for _ in 1..EMAIL_ATTEMPTS {
            if !self.issued_emails.contains(&candidate) {
                break;
            }
            candidate = SafeEmail().fake_with_rng(&mut self.rng);
        }

        if self.issued_emails.contains(&candidate) {
            let (local, domain) = candidate
                .split_once('@')
                .map(|(l, d)| (l.to_string(), d.to_string()))
                .unwrap_or_else(|| (candidate.clone(), "example.com".to_string()));
            let mut suffix = 1u32;
            loop {
                let suffixed = format!("{}{}@{}", local, suffix, domain);
                if !self.issued_emails.contains(&suffixed) {
                    candidate = suffixed;
                    break;
                }
                suffix += 1;
            }
        }

        self.issued_emails.insert(candidate.clone());
        candidate
    }

    fn date_of_birth(&mut self) -> NaiveDate {
        let earliest = self
            .today
            .checked_sub_months(Months::new(MAX_AGE_YEARS * 12))
            .unwrap_or(self.today);
        let latest = self
            .today
            .checked_sub_months(Months::new(MIN_AGE_YEARS * 12))
            .unwrap_or(self.today);
        let span = (latest - earliest).num_days().max(0);
        earliest + Duration::days(self.rng.gen_range(0..=span))
    }

    fn recent_date(&mut self) -> NaiveDate {
        self.today - Duration::days(self.rng.gen_range(0..=RECENT_WINDOW_DAYS))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
