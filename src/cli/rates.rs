use super::ui;
use crate::App;
use crate::core::day;
use crate::core::rate::{RateFilter, RateQuote};
use anyhow::Result;
use comfy_table::Cell;

pub async fn submit(app: &App, quote: RateQuote) -> Result<()> {
    let summary = format!(
        "{} @ {}, {}",
        quote.commodity, quote.company, quote.location
    );
    let record = app.submit_rate(quote).await?;

    println!(
        "Rate recorded: {} = {}",
        ui::style_text(&summary, ui::StyleType::Title),
        ui::style_text(&format!("{}", record.current_rate), ui::StyleType::Success)
    );
    if !record.historical_rates.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!("{} archived day(s) of history", record.historical_rates.len()),
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}

pub async fn list(app: &App, company: Option<String>, commodity: Option<String>) -> Result<()> {
    let filter = RateFilter { company, commodity };
    let views = app.rates.list(&filter).await?;

    if views.is_empty() {
        println!("No rates recorded yet.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Company"),
        ui::header_cell("Location"),
        ui::header_cell("Commodity"),
        ui::header_cell("Today's Rate"),
        ui::header_cell("History"),
        ui::header_cell("Last Updated"),
        ui::header_cell("Contact"),
    ]);

    for view in &views {
        let last_updated = view
            .last_updated
            .map(day::display_date)
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(&view.company),
            Cell::new(&view.location),
            Cell::new(&view.commodity),
            ui::rate_cell(&view.current_rate, view.has_new_rate_today),
            Cell::new(view.historical_rates.join(", ")),
            Cell::new(last_updated),
            Cell::new(view.contact_mobile.as_deref().unwrap_or("")),
        ]);
    }

    println!("{table}");
    Ok(())
}

pub async fn clear(app: &App, confirmed: bool) -> Result<()> {
    if !confirmed {
        anyhow::bail!("This deletes every rate record; pass --yes to confirm");
    }

    app.rates.clear_all().await?;
    println!("All rate records cleared.");
    Ok(())
}
