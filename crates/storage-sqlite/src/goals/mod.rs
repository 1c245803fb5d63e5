//! SQLite storage implementation for goals.

mod model;
mod repository;

#[cfg(test)]
mod repository_tests;

pub use model::GoalDB;
pub use repository::GoalRepository;

pub(crate) use repository::load_goals_for_owner;
