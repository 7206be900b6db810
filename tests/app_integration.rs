use mandi::core::rate::RateFilter;
use mandi::core::sauda::CompletionStatus;
use mandi::{App, AppCommand};
use std::fs;
use tracing::info;

// Adds automatic logging to test
mod test_utils {
    use std::path::{Path, PathBuf};

    /// Writes a config file whose store lives under the given temp dir.
    pub fn write_config(dir: &Path) -> PathBuf {
        let config_path = dir.join("config.yaml");
        let data_dir = dir.join("store");
        let config_content = format!(
            r#"
data_dir: "{}"
utc_offset_minutes: 330
throttle:
  max_submissions: 100
  window_secs: 60
"#,
            data_dir.display()
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }

    pub fn config_for(dir: &Path) -> mandi::core::config::AppConfig {
        mandi::core::config::AppConfig {
            data_dir: Some(dir.join("store")),
            ..Default::default()
        }
    }
}

fn submit_rate_command(rate: f64) -> AppCommand {
    AppCommand::SubmitRate {
        company: "Agro Traders".to_string(),
        location: "Indore".to_string(),
        commodity: "Soybean".to_string(),
        rate,
        mobile: "9876543210".to_string(),
    }
}

#[test_log::test(tokio::test)]
async fn test_full_rate_flow() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path());
    let config_path = config_path.to_str().unwrap();

    let result = mandi::run_command(submit_rate_command(4200.0), Some(config_path)).await;
    assert!(result.is_ok(), "Submit failed with: {:?}", result.err());

    // A same-day correction overwrites without touching history.
    let result = mandi::run_command(submit_rate_command(4250.0), Some(config_path)).await;
    assert!(result.is_ok(), "Resubmit failed with: {:?}", result.err());

    let result = mandi::run_command(
        AppCommand::ListRates {
            company: None,
            commodity: None,
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "List failed with: {:?}", result.err());

    let app = App::open(&test_utils::config_for(dir.path())).expect("Failed to open app");
    let views = app.rates.list(&RateFilter::default()).await.unwrap();
    info!(?views, "Rate views after same-day correction");

    assert_eq!(views.len(), 1, "Resubmit must update, never duplicate");
    assert!(views[0].has_new_rate_today);
    assert_eq!(views[0].current_rate, "4250");
    assert!(views[0].historical_rates.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_sauda_flow_behind_eligibility_gate() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path());
    let config_path = config_path.to_str().unwrap();

    let entries_file = dir.path().join("entries.yaml");
    fs::write(
        &entries_file,
        r#"
- location: Indore
  commodity: Soybean
  lines:
    - tons: 25.0
      description: plant delivery
      deal_reference: SD-1042
"#,
    )
    .expect("Failed to write entries file");

    let submit_sauda = || AppCommand::SubmitSauda {
        company: "Agro Traders".to_string(),
        date: None,
        entries_file: entries_file.clone(),
    };

    // No rate quoted today yet, so the unit is not eligible for deal entry.
    let result = mandi::run_command(submit_sauda(), Some(config_path)).await;
    assert!(result.is_err(), "Sauda submit must be gated on a fresh rate");
    let message = result.unwrap_err().to_string();
    assert!(
        message.contains("no rate recorded today"),
        "Unexpected gate message: {message}"
    );

    mandi::run_command(submit_rate_command(4200.0), Some(config_path))
        .await
        .expect("Rate submit failed");

    let result = mandi::run_command(submit_sauda(), Some(config_path)).await;
    assert!(result.is_ok(), "Sauda submit failed: {:?}", result.err());

    let result = mandi::run_command(
        AppCommand::ShowSauda {
            company: "Agro Traders".to_string(),
            date: None,
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Sauda show failed: {:?}", result.err());

    let app = App::open(&test_utils::config_for(dir.path())).expect("Failed to open app");
    let status = app
        .saudas
        .completion_status_today("Agro Traders")
        .await
        .unwrap();
    assert_eq!(status, CompletionStatus::Complete);
}

#[test_log::test(tokio::test)]
async fn test_partial_status_when_reference_missing() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path());
    let config_path = config_path.to_str().unwrap();

    mandi::run_command(submit_rate_command(4200.0), Some(config_path))
        .await
        .expect("Rate submit failed");

    let entries_file = dir.path().join("entries.yaml");
    fs::write(
        &entries_file,
        r#"
- location: Indore
  commodity: Soybean
  lines:
    - tons: 25.0
      description: plant delivery
      deal_reference: ""
"#,
    )
    .expect("Failed to write entries file");

    mandi::run_command(
        AppCommand::SubmitSauda {
            company: "Agro Traders".to_string(),
            date: None,
            entries_file,
        },
        Some(config_path),
    )
    .await
    .expect("Sauda submit failed");

    let app = App::open(&test_utils::config_for(dir.path())).expect("Failed to open app");
    let status = app
        .saudas
        .completion_status_today("Agro Traders")
        .await
        .unwrap();
    assert_eq!(status, CompletionStatus::Partial);
}

#[test_log::test(tokio::test)]
async fn test_rates_persist_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_utils::config_for(dir.path());

    {
        let app = App::open(&config).expect("Failed to open app");
        app.submit_rate(mandi::core::rate::RateQuote {
            company: "Agro Traders".to_string(),
            location: "Indore".to_string(),
            commodity: "Soybean".to_string(),
            rate: 4200.0,
            mobile: "9876543210".to_string(),
        })
        .await
        .expect("Submit failed");
    }

    let app = App::open(&config).expect("Failed to reopen app");
    let record = app
        .rates
        .get("Agro Traders", "Indore", "Soybean")
        .await
        .unwrap()
        .expect("Record should survive a reopen");
    assert_eq!(record.current_rate, 4200.0);
}

#[test_log::test(tokio::test)]
async fn test_clear_rates_requires_confirmation() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path());
    let config_path = config_path.to_str().unwrap();

    mandi::run_command(submit_rate_command(4200.0), Some(config_path))
        .await
        .expect("Rate submit failed");

    let result =
        mandi::run_command(AppCommand::ClearRates { confirmed: false }, Some(config_path)).await;
    assert!(result.is_err(), "Clear without --yes must be refused");

    mandi::run_command(AppCommand::ClearRates { confirmed: true }, Some(config_path))
        .await
        .expect("Confirmed clear failed");

    let app = App::open(&test_utils::config_for(dir.path())).expect("Failed to open app");
    assert!(app.rates.list(&RateFilter::default()).await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_company_registry_flow() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path());
    let config_path = config_path.to_str().unwrap();

    let add = |name: &str| {
        AppCommand::AddCompany(Box::new(mandi::core::company::CompanyRegistration {
            name: name.to_string(),
            state: "MP".to_string(),
            category: "Plant".to_string(),
            locations: vec!["Indore".to_string()],
            commodities: vec!["Soybean".to_string()],
            sub_commodities: vec![],
            contacts: Default::default(),
        }))
    };

    mandi::run_command(add("Agro Traders"), Some(config_path))
        .await
        .expect("Company add failed");
    // Same-named registration merges instead of duplicating.
    mandi::run_command(add("Agro Traders"), Some(config_path))
        .await
        .expect("Company re-add failed");

    mandi::run_command(
        AppCommand::RenameCompany {
            from: "Agro Traders".to_string(),
            to: "Agro Traders Pvt Ltd".to_string(),
        },
        Some(config_path),
    )
    .await
    .expect("Rename failed");

    let app = App::open(&test_utils::config_for(dir.path())).expect("Failed to open app");
    let profiles = app.companies.list().await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].name, "Agro Traders Pvt Ltd");
}
