//! Configuration for the planner host surfaces

use serde::{Deserialize, Serialize};

use crate::calculator::{CalcError, TradeCosts};

/// Defaults shown when the calculator opens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorDefaults {
    /// Starting capital (₹)
    pub initial_capital: f64,

    /// Daily growth for the constant projection
    pub daily_growth_pct: f64,

    /// Projection horizon in days
    pub horizon_days: i64,

    /// Lot size and charges used for trade P/L
    pub trade_costs: TradeCosts,
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        Self {
            initial_capital: 3000.0,
            daily_growth_pct: 2.0,
            horizon_days: 20,
            trade_costs: TradeCosts::default(),
        }
    }
}

/// Upper bounds on request size
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerLimits {
    pub max_horizon_days: i64,
    pub max_batch_runs: usize,
}

impl Default for PlannerLimits {
    fn default() -> Self {
        Self {
            max_horizon_days: 3650,
            max_batch_runs: 100_000,
        }
    }
}

impl PlannerLimits {
    pub fn check_horizon(&self, horizon_days: i64) -> Result<(), CalcError> {
        if horizon_days > self.max_horizon_days {
            return Err(CalcError::invalid(
                "horizon_days",
                format!("must be at most {}, got {}", self.max_horizon_days, horizon_days),
            ));
        }
        Ok(())
    }

    pub fn check_runs(&self, runs: usize) -> Result<(), CalcError> {
        if runs > self.max_batch_runs {
            return Err(CalcError::invalid(
                "runs",
                format!("must be at most {}, got {}", self.max_batch_runs, runs),
            ));
        }
        Ok(())
    }
}

/// Full planner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub defaults: CalculatorDefaults,
    pub limits: PlannerLimits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.defaults.initial_capital, 3000.0);
        assert_eq!(config.defaults.horizon_days, 20);
        assert_eq!(config.defaults.trade_costs.lot_size, 75.0);
    }

    #[test]
    fn test_limits() {
        let limits = PlannerLimits {
            max_horizon_days: 365,
            max_batch_runs: 1000,
        };

        assert!(limits.check_horizon(365).is_ok());
        assert!(limits.check_horizon(366).is_err());
        assert!(limits.check_runs(1000).is_ok());
        assert!(limits.check_runs(1001).is_err());
    }
}
