//! Goal solver - required daily growth and required win size to hit a target

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{require_finite, require_positive, CalcError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalConfig {
    pub initial_capital: f64,
    pub target_capital: f64,
    pub horizon_days: i64,
    pub win_rate_pct: f64,
    pub loss_pct_per_trade: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResult {
    pub required_daily_growth_pct: f64,
    /// `None` when the win rate is 0 and no win size can reach the goal
    pub required_win_pct: Option<f64>,
    /// `required_win_pct / loss_pct_per_trade`, `None` when either side is undefined
    pub reward_risk_ratio: Option<f64>,
}

/// Solve for the growth needed to turn `initial_capital` into `target_capital`.
///
/// Each day is treated as exactly one trade, so the realized daily rate is
/// `(1 + W)^WR * (1 - L)^(1 - WR)`.
pub fn solve_goal(config: &GoalConfig) -> Result<GoalResult> {
    if config.horizon_days <= 0 {
        return Err(CalcError::undefined(format!(
            "horizon must be positive, got {} days",
            config.horizon_days
        )));
    }
    let initial = require_finite("initial_capital", config.initial_capital)?;
    if initial <= 0.0 {
        return Err(CalcError::undefined(format!(
            "initial capital must be positive, got {}",
            initial
        )));
    }
    let target = require_positive("target_capital", config.target_capital)?;

    let win_rate_pct = require_finite("win_rate_pct", config.win_rate_pct)?;
    if !(0.0..=100.0).contains(&win_rate_pct) {
        return Err(CalcError::invalid(
            "win_rate_pct",
            format!("must be within 0..=100, got {}", win_rate_pct),
        ));
    }

    let loss_pct = require_finite("loss_pct_per_trade", config.loss_pct_per_trade)?;
    if loss_pct < 0.0 {
        return Err(CalcError::invalid(
            "loss_pct_per_trade",
            format!("must not be negative, got {}", loss_pct),
        ));
    }
    if loss_pct >= 100.0 {
        return Err(CalcError::undefined(format!(
            "a {}% loss per trade wipes out the account",
            loss_pct
        )));
    }

    let daily_rate = (target / initial).powf(1.0 / config.horizon_days as f64) - 1.0;
    if !daily_rate.is_finite() {
        return Err(CalcError::undefined("required daily rate is not finite"));
    }

    let required_win_pct = if win_rate_pct == 0.0 {
        None
    } else {
        let wr = win_rate_pct / 100.0;
        let lr = 1.0 - wr;
        let l = loss_pct / 100.0;

        let ln_win = ((1.0 + daily_rate).ln() - lr * (1.0 - l).ln()) / wr;
        let w = ln_win.exp() - 1.0;
        if !w.is_finite() {
            return Err(CalcError::undefined("required win size is not finite"));
        }
        Some(w * 100.0)
    };

    let reward_risk_ratio = match required_win_pct {
        Some(win) if loss_pct > 0.0 => Some(win / loss_pct),
        _ => None,
    };

    debug!(
        daily_pct = daily_rate * 100.0,
        ?required_win_pct,
        "Goal solved over {} days",
        config.horizon_days
    );

    Ok(GoalResult {
        required_daily_growth_pct: daily_rate * 100.0,
        required_win_pct,
        reward_risk_ratio,
    })
}
