// Library crate - exports the calculator engine and HTTP surface

pub mod calculator;
pub mod config;
pub mod types;
pub mod api;

// Re-export commonly used types
pub use calculator::{CalcError, GoalConfig, GoalResult, ProjectionConfig, ProjectionMode};
pub use config::PlannerConfig;
