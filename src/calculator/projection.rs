//! Day-by-day capital projection with peak and drawdown tracking

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{require_finite, require_non_negative, require_positive, CalcError, Result};
use super::random::RandomSource;

/// How each day's return is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ProjectionMode {
    /// Same growth every day
    #[serde(rename_all = "camelCase")]
    Constant { daily_growth_pct: f64 },
    /// Each day is a win at `win_pct` or a loss at `loss_pct`
    #[serde(rename_all = "camelCase")]
    VariableWinLoss {
        win_rate_pct: f64,
        win_pct: f64,
        loss_pct: f64,
    },
}

impl ProjectionMode {
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Self::VariableWinLoss { .. })
    }
}

impl std::fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant { daily_growth_pct } => write!(f, "Constant {}%/day", daily_growth_pct),
            Self::VariableWinLoss {
                win_rate_pct,
                win_pct,
                loss_pct,
            } => write!(f, "Win/Loss {}% WR, +{}% / -{}%", win_rate_pct, win_pct, loss_pct),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionConfig {
    pub initial_capital: f64,
    pub horizon_days: i64,
    #[serde(flatten)]
    pub mode: ProjectionMode,
}

impl ProjectionConfig {
    /// Hard ceiling on the horizon, independent of any host-configured limit
    pub const MAX_HORIZON_DAYS: i64 = 36_500;

    pub fn constant(initial_capital: f64, horizon_days: i64, daily_growth_pct: f64) -> Self {
        Self {
            initial_capital,
            horizon_days,
            mode: ProjectionMode::Constant { daily_growth_pct },
        }
    }

    pub fn win_loss(
        initial_capital: f64,
        horizon_days: i64,
        win_rate_pct: f64,
        win_pct: f64,
        loss_pct: f64,
    ) -> Self {
        Self {
            initial_capital,
            horizon_days,
            mode: ProjectionMode::VariableWinLoss {
                win_rate_pct,
                win_pct,
                loss_pct,
            },
        }
    }

    /// Reject out-of-domain inputs before any row is computed
    pub fn validate(&self) -> Result<()> {
        require_positive("initial_capital", self.initial_capital)?;

        if self.horizon_days < 1 {
            return Err(CalcError::invalid(
                "horizon_days",
                format!("must be at least 1, got {}", self.horizon_days),
            ));
        }
        if self.horizon_days > Self::MAX_HORIZON_DAYS {
            return Err(CalcError::invalid(
                "horizon_days",
                format!("must be at most {}, got {}", Self::MAX_HORIZON_DAYS, self.horizon_days),
            ));
        }

        match self.mode {
            ProjectionMode::Constant { daily_growth_pct } => {
                require_finite("daily_growth_pct", daily_growth_pct)?;
            }
            ProjectionMode::VariableWinLoss {
                win_rate_pct,
                win_pct,
                loss_pct,
            } => {
                let win_rate_pct = require_non_negative("win_rate_pct", win_rate_pct)?;
                if win_rate_pct > 100.0 {
                    return Err(CalcError::invalid(
                        "win_rate_pct",
                        format!("must be within 0..=100, got {}", win_rate_pct),
                    ));
                }
                require_non_negative("win_pct", win_pct)?;
                require_non_negative("loss_pct", loss_pct)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeKind {
    Fixed,
    Win,
    Loss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRow {
    pub day: i64,
    pub outcome: OutcomeKind,
    pub change_pct: f64,
    pub change_amount: f64,
    pub resulting_capital: f64,
    pub peak_capital: f64,
    pub drawdown_pct: f64,
}

/// Project capital over `horizon_days`.
///
/// Constant mode never touches `rng`. In win/loss mode a day is a win only
/// when `u * 100 < win_rate_pct`, so a draw on the boundary is a loss.
/// Capital is not floored and may go negative; compounding past the range
/// of `f64` is reported as `ComputationUndefined`.
pub fn project<R: RandomSource + ?Sized>(
    config: &ProjectionConfig,
    rng: &mut R,
) -> Result<Vec<ProjectionRow>> {
    config.validate()?;

    let mut capital = config.initial_capital;
    let mut peak = config.initial_capital;
    let mut rows = Vec::new();

    for day in 1..=config.horizon_days {
        let (outcome, change_pct) = match config.mode {
            ProjectionMode::Constant { daily_growth_pct } => (OutcomeKind::Fixed, daily_growth_pct),
            ProjectionMode::VariableWinLoss {
                win_rate_pct,
                win_pct,
                loss_pct,
            } => {
                let u = rng.next_unit();
                if u * 100.0 < win_rate_pct {
                    (OutcomeKind::Win, win_pct)
                } else {
                    (OutcomeKind::Loss, -loss_pct)
                }
            }
        };

        let change_amount = capital * (change_pct / 100.0);
        capital += change_amount;
        if !capital.is_finite() {
            return Err(CalcError::undefined(format!("capital overflowed on day {}", day)));
        }
        peak = peak.max(capital);

        let drawdown_pct = if peak > 0.0 {
            (peak - capital) / peak * 100.0
        } else {
            0.0
        };
        if !drawdown_pct.is_finite() {
            return Err(CalcError::undefined(format!("drawdown overflowed on day {}", day)));
        }

        rows.push(ProjectionRow {
            day,
            outcome,
            change_pct,
            change_amount,
            resulting_capital: capital,
            peak_capital: peak,
            drawdown_pct,
        });
    }

    debug!(
        days = config.horizon_days,
        final_capital = capital,
        "Projection complete ({})",
        config.mode
    );

    Ok(rows)
}

/// ROI in percent, 0 when `initial_capital` is 0
pub fn roi_pct(initial_capital: f64, final_capital: f64) -> f64 {
    if initial_capital == 0.0 {
        return 0.0;
    }
    (final_capital - initial_capital) / initial_capital * 100.0
}

/// Rows plus summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub rows: Vec<ProjectionRow>,
    pub final_capital: f64,
    pub roi_pct: f64,
    pub max_drawdown_pct: f64,
}

impl ProjectionSummary {
    pub fn from_rows(initial_capital: f64, rows: Vec<ProjectionRow>) -> Self {
        let final_capital = rows
            .last()
            .map(|r| r.resulting_capital)
            .unwrap_or(initial_capital);
        let max_drawdown_pct = rows.iter().map(|r| r.drawdown_pct).fold(0.0, f64::max);

        Self {
            roi_pct: roi_pct(initial_capital, final_capital),
            rows,
            final_capital,
            max_drawdown_pct,
        }
    }
}

/// Validate, project, and summarize in one call
pub fn project_summary<R: RandomSource + ?Sized>(
    config: &ProjectionConfig,
    rng: &mut R,
) -> Result<ProjectionSummary> {
    let rows = project(config, rng)?;
    Ok(ProjectionSummary::from_rows(config.initial_capital, rows))
}
