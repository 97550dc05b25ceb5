use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::model::TokenPrice;
use crate::tokens;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
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

pub fn price_cell(price: f64) -> Cell {
    Cell::new(format!("${}", tokens::format_price(price))).set_alignment(CellAlignment::Right)
}

/// Creates a cell for displaying percentage change with color coding.
pub fn change_cell(change_pct: f64) -> Cell {
    let color = if change_pct >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(tokens::format_signed_pct(change_pct))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Creates a cell for "N/A" values.
pub fn na_cell() -> Cell {
    Cell::new("N/A")
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

/// Creates a spinner for one-shot network operations.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Renders the resolved price list as a table. The list order is already
/// canonical; this renders it as-is.
pub fn render_price_table(prices: &[TokenPrice]) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Token"),
        header_cell("Pair"),
        header_cell("Price (USD)"),
        header_cell("7d Change"),
    ]);

    for price in prices {
        let base = tokens::base_symbol(&price.symbol);
        let name = tokens::token_info(base).map_or(base, |t| t.name);
        let change = price.change_7d_pct.map_or_else(na_cell, change_cell);

        table.add_row(vec![
            Cell::new(name),
            Cell::new(&price.symbol),
            price_cell(price.price),
            change,
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_price_table_lists_every_entry() {
        let prices = vec![
            TokenPrice {
                symbol: "CNGN/USD".to_string(),
                price: 0.00067,
                change_7d: Some(0.1),
                change_7d_pct: Some(1.5),
                icon: "/images/tokens/cngn.svg",
            },
            TokenPrice {
                symbol: "ETH/USD".to_string(),
                price: 2000.0,
                change_7d: None,
                change_7d_pct: None,
                icon: "/images/tokens/eth.svg",
            },
        ];

        let rendered = render_price_table(&prices);
        assert!(rendered.contains("CNGN/USD"));
        assert!(rendered.contains("ETH/USD"));
        assert!(rendered.contains("$2000"));
        assert!(rendered.contains("N/A"));
    }
}
