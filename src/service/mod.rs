//! Request validation ahead of persistence.

mod validation;
pub use validation::MilestoneValidator;
