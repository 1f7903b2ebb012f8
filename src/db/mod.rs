//! Database module for SQLite operations.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - Repository layer for reads and a transactional writer for seeding

pub mod migrations;
pub mod repo;
pub mod writer;

pub use migrations::{connect_db, init_db};
pub use repo::Repository;
pub use writer::BatchWriter;

/// The tables that make up the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Exercises,
    Workouts,
    Nutrition,
    Sleep,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Users,
        Table::Exercises,
        Table::Workouts,
        Table::Nutrition,
        Table::Sleep,
    ];

    /// Tables whose rows belong to a user.
    pub const USER_OWNED: [Table; 3] = [Table::Workouts, Table::Nutrition, Table::Sleep];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "Users",
            Table::Exercises => "Exercises",
            Table::Workouts => "Workouts",
            Table::Nutrition => "Nutrition",
            Table::Sleep => "Sleep",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
