//! ISO 4217 currency code validation.
//!
//! Lookup of commonly used ISO 4217 currency codes for draft validation.
//! The core carries no conversion logic; the code is only checked for shape
//! and membership here and stored verbatim on the invoice.

/// Check whether `code` is a known ISO 4217 currency code.
pub fn is_known_currency_code(code: &str) -> bool {
    CURRENCY_CODES.binary_search(&code).is_ok()
}

/// Sorted list of common ISO 4217 currency codes.
/// Sorted for binary search.
static CURRENCY_CODES: &[&str] = &[
    "AED", // UAE Dirham
    "AUD", // Australian Dollar
    "BGN", // Bulgarian Lev
    "BRL", // Brazilian Real
    "CAD", // Canadian Dollar
    "CHF", // Swiss Franc
    "CNY", // Chinese Yuan
    "CZK", // Czech Koruna
    "DKK", // Danish Krone
    "EUR", // Euro
    "GBP", // Pound Sterling
    "HKD", // Hong Kong Dollar
    "HUF", // Hungarian Forint
    "IDR", // Indonesian Rupiah
    "ILS", // Israeli Shekel
    "INR", // Indian Rupee
    "ISK", // Icelandic Krona
    "JPY", // Japanese Yen
    "KRW", // South Korean Won
    "MXN", // Mexican Peso
    "NOK", // Norwegian Krone
    "NZD", // New Zealand Dollar
    "PLN", // Polish Zloty
    "RON", // Romanian Leu
    "RSD", // Serbian Dinar
    "SEK", // Swedish Krona
    "SGD", // Singapore Dollar
    "THB", // Thai Baht
    "TRY", // Turkish Lira
    "TWD", // New Taiwan Dollar
    "UAH", // Ukrainian Hryvnia
    "USD", // US Dollar
    "ZAR", // South African Rand
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        let mut sorted = CURRENCY_CODES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, CURRENCY_CODES);
    }

    #[test]
    fn known_and_unknown_codes() {
        assert!(is_known_currency_code("EUR"));
        assert!(is_known_currency_code("USD"));
        assert!(!is_known_currency_code("XXZ"));
        assert!(!is_known_currency_code("eur"));
    }
}
