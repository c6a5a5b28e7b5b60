//! Calculator engine - compounding projections and goal planning
//!
//! Every operation here is a pure function of its inputs:
//! - Manual ledger replay of absolute / percentage adjustments
//! - Constant and win/loss projections with drawdown tracking
//! - Goal solving (required daily growth and win size)
//! - Seeded Monte Carlo batches of win/loss projections
//! - Single-trade P/L

pub mod batch;
pub mod error;
pub mod goal;
pub mod manual;
pub mod projection;
pub mod random;
pub mod trade_pnl;

// Re-export commonly used types
pub use batch::{simulate_batch, BatchConfig, BatchSummary};
pub use error::{CalcError, Result};
pub use goal::{solve_goal, GoalConfig, GoalResult};
pub use manual::{accumulate, ManualEntry, ManualLedger, ManualResultRow, ManualSummary};
pub use projection::{
    project, project_summary, roi_pct, OutcomeKind, ProjectionConfig, ProjectionMode,
    ProjectionRow, ProjectionSummary,
};
pub use random::{RandomSource, ScriptedDraws};
pub use trade_pnl::{trade_pnl, TradeCosts, TradeInput};
