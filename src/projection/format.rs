//! Display formatting for monetary amounts attached to ledger rows
//!
//! Formatted strings are a convenience for presentation; no calculation reads them.

/// Formats a monetary amount for display
pub trait CurrencyFormatter: Send + Sync {
    fn format(&self, amount: f64) -> String;
}

/// USD-style formatting with no decimals: `$1,285,714`, `-$3,000`
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdFormatter;

impl CurrencyFormatter for UsdFormatter {
    fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return amount.to_string();
        }
        let rounded = amount.round();
        let digits = format!("{:.0}", rounded.abs());

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if rounded < 0.0 {
            format!("-${}", grouped)
        } else {
            format!("${}", grouped)
        }
    }
}

impl<F> CurrencyFormatter for F
where
    F: Fn(f64) -> String + Send + Sync,
{
    fn format(&self, amount: f64) -> String {
        self(amount)
    }
}
