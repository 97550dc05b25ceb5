//! Static token display metadata, ordering and formatting helpers
//!
//! These are pure lookups and comparators shared by every consumer view, so
//! a ticker, a table and a dropdown rendering the same data always agree.

use std::cmp::Ordering;

use crate::model::TokenPrice;

/// Display metadata for a known token, keyed by its base symbol.
#[derive(Debug, Clone, Copy)]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// Lower shows first among non-prioritized entries.
    pub order: u32,
    pub decimals: u8,
}

/// Tokens that should appear first, in this order.
pub const PRIORITIZED_SYMBOLS: [&str; 5] = ["CNGN", "BRZ", "USDC", "USDT", "ETH"];

pub const TOKEN_LIST: [TokenInfo; 5] = [
    TokenInfo {
        symbol: "CNGN",
        name: "CNGN",
        icon: "/images/tokens/cngn.svg",
        order: 1,
        decimals: 18,
    },
    TokenInfo {
        symbol: "BRZ",
        name: "BRZ",
        icon: "/images/tokens/BRZ.svg",
        order: 2,
        decimals: 18,
    },
    TokenInfo {
        symbol: "USDC",
        name: "USDC",
        icon: "/images/tokens/usdc.svg",
        order: 3,
        decimals: 6,
    },
    TokenInfo {
        symbol: "USDT",
        name: "USDT",
        icon: "/images/tokens/usdt.svg",
        order: 4,
        decimals: 6,
    },
    TokenInfo {
        symbol: "ETH",
        name: "ETH",
        icon: "/images/tokens/eth.svg",
        order: 5,
        decimals: 6,
    },
];

pub const FALLBACK_ICON: &str = "/images/tokens/eth.svg";

/// Base symbol of a pair, the substring before '/' ("ETH/USD" -> "ETH").
pub fn base_symbol(pair: &str) -> &str {
    pair.split('/').next().unwrap_or(pair)
}

pub fn token_info(base: &str) -> Option<&'static TokenInfo> {
    TOKEN_LIST.iter().find(|t| t.symbol == base)
}

/// Icon for a base symbol, falling back to the ETH icon for unknown tokens.
pub fn icon_for(base: &str) -> &'static str {
    token_info(base).map_or(FALLBACK_ICON, |t| t.icon)
}

pub fn token_pair_name(base: &str, quote: &str) -> String {
    format!("{base}/{quote}")
}

fn priority_index(base: &str) -> Option<usize> {
    PRIORITIZED_SYMBOLS.iter().position(|s| *s == base)
}

/// The one ordering every consumer-facing list applies.
///
/// Prioritized base symbols sort first in priority-list order; everything
/// else follows, lower explicit display `order` first, then alphabetical by
/// full pair symbol.
pub fn compare_symbols(a: &str, b: &str) -> Ordering {
    let a_base = base_symbol(a).to_uppercase();
    let b_base = base_symbol(b).to_uppercase();

    match (priority_index(&a_base), priority_index(&b_base)) {
        (Some(ai), Some(bi)) => ai.cmp(&bi),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => {
            let a_order = token_info(&a_base).map_or(u32::MAX, |t| t.order);
            let b_order = token_info(&b_base).map_or(u32::MAX, |t| t.order);
            a_order.cmp(&b_order).then_with(|| a.cmp(b))
        }
    }
}

/// Stable-sorts a resolved price list into the canonical display order.
pub fn sort_prices(prices: &mut [TokenPrice]) {
    prices.sort_by(|a, b| compare_symbols(&a.symbol, &b.symbol));
}

/// Finds the price entry for a base symbol, matching the exact symbol or a
/// `{symbol}/...` pair prefix.
pub fn price_for_symbol<'a>(prices: &'a [TokenPrice], symbol: &str) -> Option<&'a TokenPrice> {
    prices
        .iter()
        .find(|p| p.symbol == symbol || p.symbol.starts_with(&format!("{symbol}/")))
}

/// Formats a price for display: up to 9 fractional digits above 1.0, up to 6
/// below, trailing zeros trimmed.
pub fn format_price(price: f64) -> String {
    let digits = if price > 1.0 { 9 } else { 6 };
    let formatted = format!("{price:.digits$}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Signed percentage for display, e.g. "+1.25%" or "-0.80%".
pub fn format_signed_pct(pct: f64) -> String {
    if pct >= 0.0 {
        format!("+{pct:.2}%")
    } else {
        format!("{pct:.2}%")
    }
}
