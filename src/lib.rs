pub mod cli;
pub mod core;
pub mod store;

use crate::core::company::{CompanyRegistration, CompanyRegistry};
use crate::core::config::AppConfig;
use crate::core::error::{LedgerError, Result as LedgerResult};
use crate::core::rate::{RateBook, RateQuote, RateRecord};
use crate::core::sauda::{SaudaBook, SaudaLedger, SaudaLine, split_unit_key};
use crate::core::throttle::SubmissionThrottle;
use crate::store::DocumentStore;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// The wired-up application: one document store, the three ledger managers,
/// and the collaborator-layer gates (throttle, sauda eligibility) that sit
/// in front of them.
pub struct App {
    pub store: Arc<DocumentStore>,
    pub rates: RateBook,
    pub saudas: SaudaBook,
    pub companies: CompanyRegistry,
    throttle: SubmissionThrottle,
}

impl App {
    /// Opens the persistent store at the configured data directory.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let store = DocumentStore::open(&config.data_path()?)?;
        Self::with_store(store, config)
    }

    /// Fully in-memory application, for tests and dry runs.
    pub fn in_memory(config: &AppConfig) -> Result<Self> {
        Self::with_store(DocumentStore::in_memory(), config)
    }

    fn with_store(store: DocumentStore, config: &AppConfig) -> Result<Self> {
        let tz = config.tz()?;
        let store = Arc::new(store);

        Ok(Self {
            rates: RateBook::new(store.collection("rates")?, tz),
            saudas: SaudaBook::new(store.collection("saudas")?, tz),
            companies: CompanyRegistry::new(store.collection("companies")?),
            throttle: SubmissionThrottle::new(
                config.throttle.max_submissions,
                Duration::from_secs(config.throttle.window_secs),
            ),
            store,
        })
    }

    /// Rate submission behind the per-caller throttle.
    pub async fn submit_rate(&self, quote: RateQuote) -> LedgerResult<RateRecord> {
        if !self.throttle.admit(&quote.mobile).await {
            return Err(LedgerError::RateLimited {
                caller: quote.mobile.clone(),
            });
        }
        self.rates.submit(quote).await
    }

    /// Sauda submission behind the freshness gate: units on today's ledger
    /// must have today's rate quoted first. Back-dated corrections skip the
    /// gate, since no fresh quote can exist for a past day.
    pub async fn submit_sauda(
        &self,
        company: &str,
        date: &str,
        entries_by_unit: BTreeMap<String, Vec<SaudaLine>>,
    ) -> LedgerResult<SaudaLedger> {
        if date == self.saudas.today_key() {
            for unit in entries_by_unit.keys() {
                let (location, commodity) = split_unit_key(unit)?;
                if !self
                    .saudas
                    .is_eligible(&self.rates, company, location, commodity)
                    .await?
                {
                    return Err(LedgerError::Validation(format!(
                        "no rate recorded today for {unit}; submit the rate first"
                    )));
                }
            }
        }
        self.saudas.submit(company, date, entries_by_unit).await
    }
}

/// Commands the front-end can dispatch. Mirrored from the clap tree in
/// `main.rs`, and driven directly by the integration tests.
#[derive(Debug)]
pub enum AppCommand {
    SubmitRate {
        company: String,
        location: String,
        commodity: String,
        rate: f64,
        mobile: String,
    },
    ListRates {
        company: Option<String>,
        commodity: Option<String>,
    },
    ClearRates {
        confirmed: bool,
    },
    SubmitSauda {
        company: String,
        date: Option<String>,
        entries_file: PathBuf,
    },
    ShowSauda {
        company: String,
        date: Option<String>,
    },
    SaudaStatus {
        company: String,
    },
    AddCompany(Box<CompanyRegistration>),
    ListCompanies,
    RemoveCompany {
        name: String,
    },
    RenameCompany {
        from: String,
        to: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Mandi tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let app = App::open(&config)?;

    match command {
        AppCommand::SubmitRate {
            company,
            location,
            commodity,
            rate,
            mobile,
        } => {
            cli::rates::submit(
                &app,
                RateQuote {
                    company,
                    location,
                    commodity,
                    rate,
                    mobile,
                },
            )
            .await
        }
        AppCommand::ListRates { company, commodity } => {
            cli::rates::list(&app, company, commodity).await
        }
        AppCommand::ClearRates { confirmed } => cli::rates::clear(&app, confirmed).await,
        AppCommand::SubmitSauda {
            company,
            date,
            entries_file,
        } => cli::sauda::submit(&app, &company, date.as_deref(), &entries_file).await,
        AppCommand::ShowSauda { company, date } => {
            cli::sauda::show(&app, &company, date.as_deref()).await
        }
        AppCommand::SaudaStatus { company } => cli::sauda::status(&app, &company).await,
        AppCommand::AddCompany(registration) => cli::company::add(&app, *registration).await,
        AppCommand::ListCompanies => cli::company::list(&app).await,
        AppCommand::RemoveCompany { name } => cli::company::remove(&app, &name).await,
        AppCommand::RenameCompany { from, to } => cli::company::rename(&app, &from, &to).await,
    }
}
