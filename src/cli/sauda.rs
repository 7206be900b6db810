use super::ui;
use crate::App;
use crate::core::sauda::{SaudaLine, unit_key};
use anyhow::{Context, Result};
use comfy_table::Cell;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One unit's worth of deal lines as written in the submission file.
#[derive(Debug, Deserialize)]
struct UnitEntries {
    location: String,
    commodity: String,
    #[serde(default)]
    lines: Vec<SaudaLine>,
}

fn read_entries_file(path: &Path) -> Result<BTreeMap<String, Vec<SaudaLine>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read entries file: {}", path.display()))?;
    let units: Vec<UnitEntries> = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse entries file: {}", path.display()))?;

    Ok(units
        .into_iter()
        .map(|u| (unit_key(&u.location, &u.commodity), u.lines))
        .collect())
}

pub async fn submit(
    app: &App,
    company: &str,
    date: Option<&str>,
    entries_file: &Path,
) -> Result<()> {
    let date = date
        .map(str::to_string)
        .unwrap_or_else(|| app.saudas.today_key());
    let entries = read_entries_file(entries_file)?;

    let ledger = app.submit_sauda(company, &date, entries).await?;

    println!(
        "Sauda entries saved for {} on {} ({} unit(s)), status: {}",
        ui::style_text(company, ui::StyleType::Title),
        date,
        ledger.entries.len(),
        ui::status_text(ledger.completion_status())
    );
    Ok(())
}

pub async fn show(app: &App, company: &str, date: Option<&str>) -> Result<()> {
    let date = date
        .map(str::to_string)
        .unwrap_or_else(|| app.saudas.today_key());
    let ledger = app.saudas.entries_for(company, &date).await?;

    if ledger.entries.is_empty() {
        println!("No sauda entries for {company} on {date}.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Unit"),
        ui::header_cell("Tons"),
        ui::header_cell("Description"),
        ui::header_cell("Reference"),
    ]);

    for (unit, lines) in &ledger.entries {
        for line in lines {
            table.add_row(vec![
                Cell::new(unit),
                Cell::new(format!("{}", line.tons)),
                Cell::new(&line.description),
                Cell::new(&line.deal_reference),
            ]);
        }
    }

    println!(
        "Sauda for {} on {}, status: {}\n",
        ui::style_text(company, ui::StyleType::Title),
        date,
        ui::status_text(ledger.completion_status())
    );
    println!("{table}");
    Ok(())
}

pub async fn status(app: &App, company: &str) -> Result<()> {
    let status = app.saudas.completion_status_today(company).await?;
    println!("{company}: {}", ui::status_text(status));
    Ok(())
}
