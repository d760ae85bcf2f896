use std::collections::HashMap;

/// Convert a USD amount into the requested display currency using the
/// provider's base-USD rate table. An absent or non-positive rate
/// leaves the USD amount unchanged rather than zeroing it out.
pub fn to_display(amount_usd: f64, display_currency: &str, rates: &HashMap<String, f64>) -> f64 {
    let code = display_currency.trim().to_uppercase();
    if code == "USD" {
        return amount_usd;
    }
    match rates.get(&code) {
        Some(&rate) if rate > 0.0 => amount_usd * rate,
        _ => amount_usd,
    }
}

/// Inverse conversion, for figures quoted in a local currency.
pub fn to_usd(amount: f64, currency: &str, rates: &HashMap<String, f64>) -> f64 {
    let code = currency.trim().to_uppercase();
    if code == "USD" {
        return amount;
    }
    match rates.get(&code) {
        Some(&rate) if rate > 0.0 => amount / rate,
        _ => amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> HashMap<String, f64> {
        HashMap::from([
            ("USD".to_string(), 1.0),
            ("EUR".to_string(), 0.92),
            ("JPY".to_string(), 149.3),
        ])
    }

    #[test]
    fn test_usd_passthrough() {
        assert_eq!(to_display(50000.0, "USD", &rates()), 50000.0);
    }

    #[test]
    fn test_eur_display_conversion() {
        let r = rates();
        assert_eq!(to_display(50000.0, "EUR", &r).round(), 46000.0);
        assert_eq!(to_display(90000.0, "EUR", &r).round(), 82800.0);
    }

    #[test]
    fn test_unknown_currency_unchanged() {
        assert_eq!(to_display(50000.0, "XYZ", &rates()), 50000.0);
    }

    #[test]
    fn test_roundtrip_idempotence() {
        let r = rates();
        for code in ["USD", "EUR", "JPY"] {
            let x = 1234.56;
            let roundtrip = to_display(to_usd(x, code, &r), code, &r);
            assert!((roundtrip - x).abs() < 1e-6, "{} roundtrip drifted", code);
        }
    }

    #[test]
    fn test_case_insensitive_code() {
        assert_eq!(to_display(100.0, "eur", &rates()), 92.0);
    }
}
