//! Manual ledger - replays user-entered P/L adjustments against a running balance

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::error::{require_finite, CalcError, Result};

/// A single user-entered adjustment, absolute or percentage of running capital
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntry {
    pub id: Uuid,
    pub amount: f64,
    pub is_percentage: bool,
    #[serde(default)]
    pub note: String,
}

impl ManualEntry {
    /// Create an entry from an already-numeric amount.
    pub fn new(amount: f64, is_percentage: bool, note: impl Into<String>) -> Result<Self> {
        let amount = require_finite("amount", amount)?;
        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            is_percentage,
            note: note.into(),
        })
    }

    /// Create an entry from raw form text.
    ///
    /// A trailing `%` marks the entry as a percentage regardless of `is_percentage`.
    pub fn parse(raw: &str, is_percentage: bool, note: impl Into<String>) -> Result<Self> {
        let trimmed = raw.trim();
        let (number, is_percentage) = match trimmed.strip_suffix('%') {
            Some(rest) => (rest.trim_end(), true),
            None => (trimmed, is_percentage),
        };

        if number.is_empty() {
            return Err(CalcError::invalid("amount", "must not be empty"));
        }

        let amount: f64 = number
            .parse()
            .map_err(|_| CalcError::invalid("amount", format!("'{}' is not a number", raw)))?;

        Self::new(amount, is_percentage, note)
    }

    /// Change this entry applies to the given capital
    pub fn change_on(&self, capital: f64) -> f64 {
        if self.is_percentage {
            capital * (self.amount / 100.0)
        } else {
            self.amount
        }
    }
}

/// Derived row, one per entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualResultRow {
    pub index: usize,
    pub change: f64,
    pub running_capital: f64,
    pub note: String,
}

/// Replay entries left to right against `initial_capital`.
///
/// A running capital (or net P/L) that leaves the range of `f64` is
/// `ComputationUndefined`.
pub fn accumulate(initial_capital: f64, entries: &[ManualEntry]) -> Result<Vec<ManualResultRow>> {
    let initial_capital = require_finite("initial_capital", initial_capital)?;
    let mut capital = initial_capital;
    let mut rows = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        let change = entry.change_on(capital);
        capital += change;
        if !capital.is_finite() || !(capital - initial_capital).is_finite() {
            return Err(CalcError::undefined(format!(
                "running capital overflowed at entry {}",
                i + 1
            )));
        }

        rows.push(ManualResultRow {
            index: i + 1,
            change,
            running_capital: capital,
            note: entry.note.clone(),
        });
    }

    Ok(rows)
}

/// Rows plus summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualSummary {
    pub rows: Vec<ManualResultRow>,
    pub final_capital: f64,
    pub net_pnl: f64,
}

impl ManualSummary {
    pub fn from_rows(initial_capital: f64, rows: Vec<ManualResultRow>) -> Self {
        let final_capital = rows
            .last()
            .map(|r| r.running_capital)
            .unwrap_or(initial_capital);

        Self {
            rows,
            final_capital,
            net_pnl: final_capital - initial_capital,
        }
    }
}

/// Ordered entries for one calculator session
#[derive(Debug, Clone, Default)]
pub struct ManualLedger {
    entries: Vec<ManualEntry>,
}

impl ManualLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its id
    pub fn add(&mut self, entry: ManualEntry) -> Uuid {
        let id = entry.id;
        debug!(%id, amount = entry.amount, pct = entry.is_percentage, "Manual entry added");
        self.entries.push(entry);
        id
    }

    /// Parse raw text and append. Invalid amounts leave the ledger untouched.
    pub fn add_raw(&mut self, raw: &str, is_percentage: bool, note: &str) -> Result<Uuid> {
        let entry = ManualEntry::parse(raw, is_percentage, note)?;
        Ok(self.add(entry))
    }

    /// Remove by identity. Returns true if an entry was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[ManualEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Accumulate the current entries against `initial_capital`
    pub fn summarize(&self, initial_capital: f64) -> Result<ManualSummary> {
        let rows = accumulate(initial_capital, &self.entries)?;
        Ok(ManualSummary::from_rows(initial_capital, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_then_percentage() {
        let entries = vec![
            ManualEntry::new(100.0, false, "").unwrap(),
            ManualEntry::new(10.0, true, "").unwrap(),
        ];

        let rows = accumulate(1000.0, &entries).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].index, 1);
        assert!((rows[0].change - 100.0).abs() < 1e-9);
        assert!((rows[0].running_capital - 1100.0).abs() < 1e-9);

        // 10% of 1100
        assert_eq!(rows[1].index, 2);
        assert!((rows[1].change - 110.0).abs() < 1e-9);
        assert!((rows[1].running_capital - 1210.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_ledger_summary() {
        let ledger = ManualLedger::new();
        let summary = ledger.summarize(3000.0).unwrap();

        assert!(summary.rows.is_empty());
        assert_eq!(summary.final_capital, 3000.0);
        assert_eq!(summary.net_pnl, 0.0);
    }

    #[test]
    fn test_losses_and_notes() {
        let mut ledger = ManualLedger::new();
        ledger.add_raw("-200", false, "Day 1").unwrap();
        ledger.add_raw("-50%", false, "Day 2").unwrap();

        let summary = ledger.summarize(1000.0).unwrap();
        assert_eq!(summary.rows[0].note, "Day 1");
        assert!((summary.rows[0].running_capital - 800.0).abs() < 1e-9);
        assert!((summary.rows[1].change + 400.0).abs() < 1e-9);
        assert!((summary.final_capital - 400.0).abs() < 1e-9);
        assert!((summary.net_pnl + 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflowing_capital_is_undefined() {
        let entries = vec![
            ManualEntry::new(1e308, false, "").unwrap(),
            ManualEntry::new(1e308, false, "").unwrap(),
        ];
        assert!(matches!(
            accumulate(1000.0, &entries),
            Err(CalcError::ComputationUndefined(_))
        ));

        let mut ledger = ManualLedger::new();
        ledger.add_raw("1e308", false, "").unwrap();
        ledger.add_raw("500%", false, "").unwrap();
        assert!(matches!(
            ledger.summarize(1000.0),
            Err(CalcError::ComputationUndefined(_))
        ));

        assert!(accumulate(f64::INFINITY, &[]).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            ManualEntry::parse("abc", false, ""),
            Err(CalcError::InvalidInput { field: "amount", .. })
        ));
        assert!(ManualEntry::parse("", false, "").is_err());
        assert!(ManualEntry::parse("   ", true, "").is_err());
        assert!(ManualEntry::parse("%", false, "").is_err());
        assert!(ManualEntry::parse("NaN", false, "").is_err());
        assert!(ManualEntry::parse("inf", false, "").is_err());
        assert!(ManualEntry::new(f64::NAN, false, "").is_err());
    }

    #[test]
    fn test_parse_percent_suffix() {
        let entry = ManualEntry::parse(" 2.5 % ", false, "").unwrap();
        assert!(entry.is_percentage);
        assert_eq!(entry.amount, 2.5);

        let entry = ManualEntry::parse("+200", false, "").unwrap();
        assert!(!entry.is_percentage);
        assert_eq!(entry.amount, 200.0);
    }

    #[test]
    fn test_invalid_add_leaves_ledger_unchanged() {
        let mut ledger = ManualLedger::new();
        ledger.add_raw("100", false, "").unwrap();
        assert!(ledger.add_raw("ten", false, "").is_err());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_by_id_recomputes() {
        let mut ledger = ManualLedger::new();
        let first = ledger.add_raw("100", false, "a").unwrap();
        ledger.add_raw("10", true, "b").unwrap();

        assert!(ledger.remove(first));
        assert!(!ledger.remove(first));

        let summary = ledger.summarize(1000.0).unwrap();
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].index, 1);
        assert_eq!(summary.rows[0].note, "b");
        assert!((summary.final_capital - 1100.0).abs() < 1e-9);
    }
}
