use serde::{Deserialize, Serialize};

use crate::calculator::{CalcError, ManualEntry, ProjectionConfig, Result, TradeInput};
use crate::config::PlannerConfig;

/// Amount as typed into the form: a JSON number or the raw text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntryInput {
    pub amount: AmountInput,
    #[serde(default)]
    pub is_percentage: bool,
    #[serde(default)]
    pub note: String,
}

impl ManualEntryInput {
    pub fn into_entry(self) -> Result<ManualEntry> {
        match self.amount {
            AmountInput::Number(amount) => ManualEntry::new(amount, self.is_percentage, self.note),
            AmountInput::Text(raw) => ManualEntry::parse(&raw, self.is_percentage, self.note),
        }
    }
}

/// POST /api/calculator/manual
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualRequest {
    pub initial_capital: f64,
    #[serde(default)]
    pub entries: Vec<ManualEntryInput>,
}

/// POST /api/calculator/projection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    #[serde(flatten)]
    pub config: ProjectionConfig,
    /// Fixed seed for a reproducible win/loss run; fresh randomness when absent
    pub seed: Option<u64>,
}

/// POST /api/trade/pnl
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePnlRequest {
    #[serde(flatten)]
    pub trade: TradeInput,
    pub lot_size: Option<f64>,
    pub charges: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePnlResponse {
    pub pnl: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&CalcError> for ErrorResponse {
    fn from(err: &CalcError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub config: PlannerConfig,
}
