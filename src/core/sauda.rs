//! The sauda (deal) ledger: per-unit deal lines for one company on one
//! calendar day, merged on write so sibling units are never clobbered.
//!
//! The unit key is always `location|commodity`, built by [`unit_key`].
//! Writes are partial: a submission carries only the units it wants to
//! change, and each submitted unit replaces its own line list. Units absent
//! from the submission keep their recorded lines.

use crate::core::day;
use crate::core::error::{LedgerError, Result};
use crate::core::rate::RateBook;
use crate::store::{DocumentCollection, StoreError};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

/// Canonical addressing key for a unit within a ledger.
pub fn unit_key(location: &str, commodity: &str) -> String {
    format!("{location}|{commodity}")
}

/// Splits a unit key back into (location, commodity).
pub fn split_unit_key(unit: &str) -> Result<(&str, &str)> {
    unit.split_once('|').ok_or_else(|| {
        LedgerError::Validation(format!("unit must be 'location|commodity', got '{unit}'"))
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaudaLine {
    #[serde(default)]
    pub tons: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deal_reference: String,
}

impl SaudaLine {
    fn has_deal(&self) -> bool {
        self.tons > 0.0 || !self.description.trim().is_empty()
    }

    fn has_reference(&self) -> bool {
        !self.deal_reference.trim().is_empty()
    }
}

/// Advisory completion signal for a day's ledger. Recomputed on demand,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompletionStatus {
    NoEntry,
    Partial,
    Complete,
}

impl Display for CompletionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            CompletionStatus::NoEntry => "no entry",
            CompletionStatus::Partial => "partial",
            CompletionStatus::Complete => "complete",
        };
        write!(f, "{text}")
    }
}

/// All deal lines recorded for one company on one day.
///
/// The `date` field doubles as part of the uniqueness key and is the literal
/// wire string `DD-MM-YYYY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaudaLedger {
    pub company: String,
    pub date: String,
    #[serde(default)]
    pub entries: BTreeMap<String, Vec<SaudaLine>>,
}

impl SaudaLedger {
    pub fn empty(company: &str, date: &str) -> Self {
        Self {
            company: company.to_string(),
            date: date.to_string(),
            entries: BTreeMap::new(),
        }
    }

    /// Merges submitted units into the ledger. Each submitted unit replaces
    /// its own lines; units not mentioned are left untouched.
    pub fn merge_units(&mut self, entries_by_unit: BTreeMap<String, Vec<SaudaLine>>) {
        for (unit, lines) in entries_by_unit {
            self.entries.insert(unit, lines);
        }
    }

    pub fn completion_status(&self) -> CompletionStatus {
        let mut has_any_deal = false;
        let mut all_references_filled = true;

        for lines in self.entries.values() {
            for line in lines {
                if line.has_deal() {
                    has_any_deal = true;
                }
                if !line.has_reference() {
                    all_references_filled = false;
                }
            }
        }

        match (has_any_deal, all_references_filled) {
            (true, true) => CompletionStatus::Complete,
            (true, false) => CompletionStatus::Partial,
            (false, _) => CompletionStatus::NoEntry,
        }
    }
}

fn sauda_key(company: &str, date: &str) -> String {
    format!("{company}|{date}")
}

/// Manager for the sauda ledger collection.
pub struct SaudaBook {
    collection: Arc<dyn DocumentCollection>,
    tz: FixedOffset,
}

impl SaudaBook {
    pub fn new(collection: Arc<dyn DocumentCollection>, tz: FixedOffset) -> Self {
        Self { collection, tz }
    }

    /// Today's ledger date key, `DD-MM-YYYY`.
    pub fn today_key(&self) -> String {
        day::day_key(day::today(self.tz))
    }

    /// Merge-on-write submission for one company/day. One upsert per call.
    pub async fn submit(
        &self,
        company: &str,
        date: &str,
        entries_by_unit: BTreeMap<String, Vec<SaudaLine>>,
    ) -> Result<SaudaLedger> {
        if company.trim().is_empty() {
            return Err(LedgerError::required("company"));
        }
        day::parse_day_key(date)?;
        if entries_by_unit.is_empty() {
            return Err(LedgerError::required("entries"));
        }

        let key = sauda_key(company, date);
        let mut ledger = match self.load(&key).await? {
            Some(existing) => existing,
            None => SaudaLedger::empty(company, date),
        };
        ledger.merge_units(entries_by_unit);

        let bytes = serde_json::to_vec(&ledger).map_err(StoreError::Codec)?;
        self.collection.put(&key, &bytes).await?;
        debug!(company, date, units = ledger.entries.len(), "Sauda ledger upserted");
        Ok(ledger)
    }

    /// Pure lookup. Returns an empty ledger shape when none exists yet, so a
    /// fresh editing form can be initialized without special-casing.
    pub async fn entries_for(&self, company: &str, date: &str) -> Result<SaudaLedger> {
        if company.trim().is_empty() {
            return Err(LedgerError::required("company"));
        }
        day::parse_day_key(date)?;

        Ok(self
            .load(&sauda_key(company, date))
            .await?
            .unwrap_or_else(|| SaudaLedger::empty(company, date)))
    }

    /// Tri-state completion signal for the company's ledger of today.
    pub async fn completion_status_today(&self, company: &str) -> Result<CompletionStatus> {
        let ledger = self.entries_for(company, &self.today_key()).await?;
        Ok(ledger.completion_status())
    }

    /// A unit/commodity is eligible for deal entry only once today's rate
    /// has been quoted for it. The single cross-read into the rate ledger.
    pub async fn is_eligible(
        &self,
        rates: &RateBook,
        company: &str,
        location: &str,
        commodity: &str,
    ) -> Result<bool> {
        rates.has_fresh_rate(company, location, commodity).await
    }

    async fn load(&self, key: &str) -> Result<Option<SaudaLedger>> {
        match self.collection.get(key).await? {
            Some(bytes) => Ok(Some(
                serde_json::from_slice(&bytes).map_err(StoreError::Codec)?,
            )),
            None => Ok(None),
        }
    }
}
