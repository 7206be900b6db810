use crate::core::sauda::CompletionStatus;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Success,
    Warning,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Success => style(text).green().bold(),
        StyleType::Warning => style(text).yellow().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Cell for a rate value: green when it is today's quote, dimmed blank
/// otherwise.
pub fn rate_cell(rate: &str, fresh: bool) -> Cell {
    if fresh {
        Cell::new(rate)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right)
    } else {
        Cell::new(rate)
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right)
    }
}

/// Color-coded rendering of the tri-state sauda completion signal.
pub fn status_text(status: CompletionStatus) -> String {
    let style_type = match status {
        CompletionStatus::Complete => StyleType::Success,
        CompletionStatus::Partial => StyleType::Warning,
        CompletionStatus::NoEntry => StyleType::Error,
    };
    style_text(&status.to_string(), style_type)
}
