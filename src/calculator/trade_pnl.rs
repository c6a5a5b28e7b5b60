//! P/L for a single journaled trade

use serde::{Deserialize, Serialize};

use super::error::{require_finite, Result};

/// Contract sizing and flat costs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeCosts {
    /// Units per lot (NIFTY = 75)
    pub lot_size: f64,
    /// Brokerage and taxes per round trip
    pub charges: f64,
}

impl Default for TradeCosts {
    fn default() -> Self {
        Self {
            lot_size: 75.0,
            charges: 45.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInput {
    pub entry_price: f64,
    pub exit_price: f64,
    pub lots: f64,
}

/// Net P/L of a long trade.
///
/// Returns 0 until both prices are set (positive), matching an unpriced journal entry.
pub fn trade_pnl(input: &TradeInput, costs: &TradeCosts) -> Result<f64> {
    let entry = require_finite("entry_price", input.entry_price)?;
    let exit = require_finite("exit_price", input.exit_price)?;
    let lots = require_finite("lots", input.lots)?;
    let lot_size = require_finite("lot_size", costs.lot_size)?;
    let charges = require_finite("charges", costs.charges)?;

    if entry <= 0.0 || exit <= 0.0 {
        return Ok(0.0);
    }

    Ok((exit - entry) * (lots * lot_size) - charges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winning_trade() {
        let input = TradeInput {
            entry_price: 100.0,
            exit_price: 110.0,
            lots: 2.0,
        };
        // 10 pts * 150 units - 45
        let pnl = trade_pnl(&input, &TradeCosts::default()).unwrap();
        assert!((pnl - 1455.0).abs() < 1e-9);
    }

    #[test]
    fn test_losing_trade_custom_costs() {
        let input = TradeInput {
            entry_price: 250.0,
            exit_price: 240.5,
            lots: 1.0,
        };
        let costs = TradeCosts {
            lot_size: 50.0,
            charges: 20.0,
        };
        let pnl = trade_pnl(&input, &costs).unwrap();
        assert!((pnl + 495.0).abs() < 1e-9);
    }

    #[test]
    fn test_unpriced_trade_is_zero() {
        let input = TradeInput {
            entry_price: 0.0,
            exit_price: 110.0,
            lots: 1.0,
        };
        assert_eq!(trade_pnl(&input, &TradeCosts::default()).unwrap(), 0.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        let input = TradeInput {
            entry_price: f64::NAN,
            exit_price: 110.0,
            lots: 1.0,
        };
        assert!(trade_pnl(&input, &TradeCosts::default()).is_err());
    }
}
