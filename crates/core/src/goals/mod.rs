pub(crate) mod goals_model;
pub(crate) mod goals_service;
pub(crate) mod goals_traits;
pub(crate) mod memory_repository;

#[cfg(test)]
mod goals_model_tests;

// Re-export the public interface
pub use goals_model::{new_goal_id, Goal, NewGoal};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
pub use memory_repository::InMemoryGoalRepository;
