use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("VND")
    }
}

/// Locale-aware number formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        VI_VN.clone()
    }
}

/// The application's home locale: Vietnamese digit grouping uses `.` and
/// a `,` decimal separator.
pub static VI_VN: Lazy<LocaleConfig> = Lazy::new(|| LocaleConfig {
    language_tag: "vi-VN".into(),
    decimal_separator: ',',
    grouping_separator: '.',
});

pub fn symbol_for(code: &str) -> String {
    match code {
        "VND" => "₫".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "JPY" => "¥".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "VND" | "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats an integral amount of minor units with locale digit grouping.
pub fn format_amount(locale: &LocaleConfig, amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let grouped = group_digits(&digits, locale.grouping_separator);
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Formats an amount followed by the currency's symbol, the way the
/// original screens render VND values.
pub fn format_currency_value(locale: &LocaleConfig, amount: i64, code: &CurrencyCode) -> String {
    format!(
        "{} {}",
        format_amount(locale, amount),
        symbol_for(code.as_str())
    )
}

/// Formats a percentage with two-digit display rounding; the full-precision
/// value stays with the caller.
pub fn format_percent(locale: &LocaleConfig, percent: f64) -> String {
    let mut body = format!("{:.2}", percent);
    if locale.decimal_separator != '.' {
        if let Some(pos) = body.find('.') {
            body.replace_range(pos..=pos, &locale.decimal_separator.to_string());
        }
    }
    format!("{}%", body)
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_with_vietnamese_separators() {
        assert_eq!(format_amount(&VI_VN, 1_000_000), "1.000.000");
        assert_eq!(format_amount(&VI_VN, -45_000), "-45.000");
        assert_eq!(format_amount(&VI_VN, 999), "999");
        assert_eq!(format_amount(&VI_VN, 0), "0");
    }

    #[test]
    fn currency_value_appends_symbol() {
        let code = CurrencyCode::default();
        assert_eq!(format_currency_value(&VI_VN, 500_000, &code), "500.000 ₫");
    }

    #[test]
    fn percent_uses_locale_decimal_separator() {
        assert_eq!(format_percent(&VI_VN, 2.0), "2,00%");
        assert_eq!(format_percent(&VI_VN, 3.456), "3,46%");
    }

    #[test]
    fn vnd_has_no_minor_units() {
        assert_eq!(minor_units_for("VND"), 0);
        assert_eq!(minor_units_for("USD"), 2);
    }
}
