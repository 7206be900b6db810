//! The rate ledger: one record per (company, location, commodity) holding the
//! current day's quote and the archived history of earlier days.
//!
//! A record moves between three states: uninitialized, current-for-today, and
//! stale. Staleness is never written anywhere; it is detected at read time by
//! comparing the record's day against the calendar. The first submission on a
//! new day performs the rollover, pushing the previous current rate onto the
//! history before overwriting it.

use crate::core::day;
use crate::core::error::{LedgerError, Result};
use crate::store::{DocumentCollection, StoreError};
use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRate {
    pub rate: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRecord {
    pub company: String,
    pub location: String,
    pub commodity: String,
    pub current_rate: f64,
    /// The calendar day the current rate was set on.
    pub current_rate_date: NaiveDate,
    /// Insertion order is chronological; never contains an entry for
    /// `current_rate_date` itself.
    #[serde(default)]
    pub historical_rates: Vec<HistoricalRate>,
    /// Mobile number of the last submitter.
    #[serde(default)]
    pub contact_mobile: Option<String>,
}

impl RateRecord {
    fn first_quote(quote: &RateQuote, today: NaiveDate) -> Self {
        Self {
            company: quote.company.clone(),
            location: quote.location.clone(),
            commodity: quote.commodity.clone(),
            current_rate: quote.rate,
            current_rate_date: today,
            historical_rates: Vec::new(),
            contact_mobile: Some(quote.mobile.clone()),
        }
    }

    /// Applies a new quote under the day-rollover rule.
    ///
    /// Same-day submissions are corrections and overwrite in place. The first
    /// submission of a later day archives the previous rate first.
    pub fn apply_quote(&mut self, rate: f64, mobile: &str, today: NaiveDate) {
        if self.current_rate_date != today {
            self.historical_rates.push(HistoricalRate {
                rate: self.current_rate,
                date: self.current_rate_date,
            });
            self.current_rate_date = today;
        }
        self.current_rate = rate;
        self.contact_mobile = Some(mobile.to_string());
    }

    pub fn has_new_rate_today(&self, today: NaiveDate) -> bool {
        self.current_rate_date == today
    }
}

/// A rate submission, validated before it touches storage.
#[derive(Debug, Clone)]
pub struct RateQuote {
    pub company: String,
    pub location: String,
    pub commodity: String,
    pub rate: f64,
    pub mobile: String,
}

impl RateQuote {
    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("company", &self.company),
            ("location", &self.location),
            ("commodity", &self.commodity),
            ("mobile", &self.mobile),
        ] {
            if value.trim().is_empty() {
                return Err(LedgerError::required(field));
            }
        }
        if !self.rate.is_finite() {
            return Err(LedgerError::Validation("rate must be a number".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RateFilter {
    pub company: Option<String>,
    pub commodity: Option<String>,
}

impl RateFilter {
    fn matches(&self, record: &RateRecord) -> bool {
        self.company.as_deref().is_none_or(|c| c == record.company)
            && self
                .commodity
                .as_deref()
                .is_none_or(|c| c == record.commodity)
    }
}

/// Day-aware read projection of a [`RateRecord`].
///
/// Callers see at a glance whether the quote is fresh for today; they never
/// re-derive day arithmetic themselves. Formatted strings here are a wire
/// format only, stored dates stay structured.
#[derive(Debug, Clone, Serialize)]
pub struct RateView {
    pub company: String,
    pub location: String,
    pub commodity: String,
    /// Each entry formatted as `"<rate> (<DD/MM/YYYY>)"`.
    pub historical_rates: Vec<String>,
    /// Today's rate, or empty when the record is stale.
    pub current_rate: String,
    pub has_new_rate_today: bool,
    /// Today when fresh, otherwise the most recent archived day, if any.
    pub last_updated: Option<NaiveDate>,
    pub contact_mobile: Option<String>,
}

impl RateView {
    pub fn project(record: &RateRecord, today: NaiveDate) -> Self {
        let is_today = record.has_new_rate_today(today);
        let last_updated = if is_today {
            Some(record.current_rate_date)
        } else {
            record.historical_rates.last().map(|h| h.date)
        };

        Self {
            company: record.company.clone(),
            location: record.location.clone(),
            commodity: record.commodity.clone(),
            historical_rates: record
                .historical_rates
                .iter()
                .map(|h| format!("{} ({})", format_rate(h.rate), day::display_date(h.date)))
                .collect(),
            current_rate: if is_today {
                format_rate(record.current_rate)
            } else {
                String::new()
            },
            has_new_rate_today: is_today,
            last_updated,
            contact_mobile: record.contact_mobile.clone(),
        }
    }
}

fn format_rate(rate: f64) -> String {
    format!("{rate}")
}

pub(crate) fn rate_key(company: &str, location: &str, commodity: &str) -> String {
    format!("{company}|{location}|{commodity}")
}

/// Manager for the rate ledger collection.
pub struct RateBook {
    collection: Arc<dyn DocumentCollection>,
    tz: FixedOffset,
}

impl RateBook {
    pub fn new(collection: Arc<dyn DocumentCollection>, tz: FixedOffset) -> Self {
        Self { collection, tz }
    }

    pub fn today(&self) -> NaiveDate {
        day::today(self.tz)
    }

    /// Upserts the record for the quote's triple. Exactly one storage write.
    pub async fn submit(&self, quote: RateQuote) -> Result<RateRecord> {
        quote.validate()?;

        let key = rate_key(&quote.company, &quote.location, &quote.commodity);
        let today = self.today();

        let record = match self.load(&key).await? {
            Some(mut existing) => {
                existing.apply_quote(quote.rate, &quote.mobile, today);
                existing
            }
            None => RateRecord::first_quote(&quote, today),
        };

        self.save(&key, &record).await?;
        debug!(company = %quote.company, location = %quote.location,
               commodity = %quote.commodity, rate = quote.rate, "Rate upserted");
        Ok(record)
    }

    pub async fn get(
        &self,
        company: &str,
        location: &str,
        commodity: &str,
    ) -> Result<Option<RateRecord>> {
        self.load(&rate_key(company, location, commodity)).await
    }

    /// Whether a quote was recorded today for the triple. This is the read
    /// the sauda eligibility gate depends on.
    pub async fn has_fresh_rate(
        &self,
        company: &str,
        location: &str,
        commodity: &str,
    ) -> Result<bool> {
        let today = self.today();
        Ok(self
            .get(company, location, commodity)
            .await?
            .is_some_and(|r| r.has_new_rate_today(today)))
    }

    /// Pure read projection over all matching records; mutates nothing.
    pub async fn list(&self, filter: &RateFilter) -> Result<Vec<RateView>> {
        let today = self.today();
        let mut views = Vec::new();
        for (_, bytes) in self.collection.scan().await? {
            let record: RateRecord =
                serde_json::from_slice(&bytes).map_err(StoreError::Codec)?;
            if filter.matches(&record) {
                views.push(RateView::project(&record, today));
            }
        }
        Ok(views)
    }

    /// Administrative bulk-clear of the whole rate ledger.
    pub async fn clear_all(&self) -> Result<()> {
        self.collection.clear().await?;
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<RateRecord>> {
        match self.collection.get(key).await? {
            Some(bytes) => Ok(Some(
                serde_json::from_slice(&bytes).map_err(StoreError::Codec)?,
            )),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, record: &RateRecord) -> Result<()> {
        let bytes = serde_json::to_vec(record).map_err(StoreError::Codec)?;
        self.collection.put(key, &bytes).await?;
        Ok(())
    }
}
