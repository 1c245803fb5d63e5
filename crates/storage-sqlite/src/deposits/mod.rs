//! SQLite storage implementation for deposits.

mod model;
mod repository;

#[cfg(test)]
mod repository_tests;

pub use model::DepositDB;
pub use repository::DepositRepository;
