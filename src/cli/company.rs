use super::ui;
use crate::App;
use crate::core::company::{CompanyRegistration, ContactCard};
use anyhow::Result;
use comfy_table::Cell;

/// Parses a `--contact` argument of the form
/// `location|commodity|mobile|person`.
pub fn parse_contact(raw: &str) -> Result<(String, ContactCard)> {
    let parts: Vec<&str> = raw.splitn(4, '|').collect();
    if parts.len() != 4 {
        anyhow::bail!("contact must be 'location|commodity|mobile|person', got '{raw}'");
    }
    Ok((
        format!("{}|{}", parts[0], parts[1]),
        ContactCard {
            primary_mobile: parts[2].to_string(),
            contact_person: parts[3].to_string(),
        },
    ))
}

pub async fn add(app: &App, registration: CompanyRegistration) -> Result<()> {
    let profile = app.companies.register(registration).await?;

    println!(
        "Company saved: {} ({} location(s), {} commodity(ies))",
        ui::style_text(&profile.name, ui::StyleType::Title),
        profile.locations.len(),
        profile.commodities.len()
    );
    Ok(())
}

pub async fn list(app: &App) -> Result<()> {
    let profiles = app.companies.list().await?;

    if profiles.is_empty() {
        println!("No companies registered yet.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("State"),
        ui::header_cell("Category"),
        ui::header_cell("Locations"),
        ui::header_cell("Commodities"),
        ui::header_cell("Contacts"),
    ]);

    for profile in &profiles {
        let locations: Vec<&str> = profile.locations.iter().map(String::as_str).collect();
        let commodities: Vec<&str> = profile.commodities.iter().map(String::as_str).collect();

        table.add_row(vec![
            Cell::new(&profile.name),
            Cell::new(&profile.state),
            Cell::new(&profile.category),
            Cell::new(locations.join(", ")),
            Cell::new(commodities.join(", ")),
            Cell::new(format!("{}", profile.contacts.len())),
        ]);
    }

    println!("{table}");
    Ok(())
}

pub async fn remove(app: &App, name: &str) -> Result<()> {
    app.companies.remove(name).await?;
    println!("Company removed: {name}");
    println!(
        "{}",
        ui::style_text(
            "Existing rate and sauda records for this company are kept.",
            ui::StyleType::Subtle
        )
    );
    Ok(())
}

pub async fn rename(app: &App, from: &str, to: &str) -> Result<()> {
    let profile = app.companies.rename(from, to).await?;
    println!(
        "Company renamed: {from} -> {}",
        ui::style_text(&profile.name, ui::StyleType::Title)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contact() {
        let (unit, card) = parse_contact("Indore|Soybean|9876543210|Ramesh").unwrap();
        assert_eq!(unit, "Indore|Soybean");
        assert_eq!(card.primary_mobile, "9876543210");
        assert_eq!(card.contact_person, "Ramesh");
    }

    #[test]
    fn test_parse_contact_rejects_short_form() {
        assert!(parse_contact("Indore|Soybean").is_err());
    }
}
