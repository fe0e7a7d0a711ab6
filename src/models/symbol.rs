use serde::Serialize;

/// Symbols offered in the dashboard picker. Any other symbol may still be typed.
pub const SUGGESTED_SYMBOLS: [(&str, &str); 15] = [
    ("Apple (AAPL)", "AAPL"),
    ("Google (GOOGL)", "GOOGL"),
    ("Amazon (AMZN)", "AMZN"),
    ("Microsoft (MSFT)", "MSFT"),
    ("Tesla (TSLA)", "TSLA"),
    ("Netflix (NFLX)", "NFLX"),
    ("NVIDIA (NVDA)", "NVDA"),
    ("Facebook (META)", "META"),
    ("Adobe (ADBE)", "ADBE"),
    ("Intel (INTC)", "INTC"),
    ("PayPal (PYPL)", "PYPL"),
    ("Shopify (SHOP)", "SHOP"),
    ("Square (SQ)", "SQ"),
    ("Twitter (TWTR)", "TWTR"),
    ("Zoom (ZM)", "ZM"),
];

pub const DEFAULT_SYMBOL: &str = "AAPL";

#[derive(Debug, Clone, Serialize)]
pub struct SymbolOption {
    pub label: String,
    pub value: String,
}

pub fn suggested_symbols() -> Vec<SymbolOption> {
    SUGGESTED_SYMBOLS
        .iter()
        .map(|(label, value)| SymbolOption {
            label: label.to_string(),
            value: value.to_string(),
        })
        .collect()
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-')
}

/// Trims and upper-cases a user-typed symbol.
///
/// Returns `None` when nothing is left or when the symbol holds anything besides
/// ASCII letters, digits and `. ^ = -` (`BRK-B`, `SHOP.TO`, `^GSPC`, `EURUSD=X`).
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_ascii_uppercase();
    if symbol.is_empty() || !symbol.chars().all(is_symbol_char) {
        None
    } else {
        Some(symbol)
    }
}
