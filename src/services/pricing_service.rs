use regex::Regex;
use std::sync::OnceLock;

use crate::models::trek::{format_number, FlexValue};

pub const CURRENCY_SYMBOL: char = '₹';

fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("static pattern")
    })
}

pub struct PricingService;

impl PricingService {
    /// Display price with the rupee prefix. Numbers pass through, text loses a
    /// leading `$` and gains `₹` unless it already has one.
    pub fn format_price(price: Option<&FlexValue>) -> String {
        match price {
            Some(p) if p.is_present() => match p {
                FlexValue::Text(text) => {
                    let text = text.strip_prefix('$').unwrap_or(text);
                    if text.starts_with(CURRENCY_SYMBOL) {
                        text.to_string()
                    } else {
                        format!("{}{}", CURRENCY_SYMBOL, text)
                    }
                }
                number => format!("{}{}", CURRENCY_SYMBOL, number.to_display()),
            },
            _ => format!("{}0", CURRENCY_SYMBOL),
        }
    }

    /// Leading numeric value of a price, ignoring one currency symbol and
    /// thousands separators. Anything unparsable is 0.
    pub fn numeric_price(price: Option<&FlexValue>) -> f64 {
        match price {
            Some(p) if p.is_present() => match p {
                FlexValue::Int(n) => *n as f64,
                FlexValue::Float(f) => *f,
                FlexValue::Text(text) => {
                    let text = text
                        .strip_prefix('$')
                        .or_else(|| text.strip_prefix(CURRENCY_SYMBOL))
                        .unwrap_or(text)
                        .replace(',', "");
                    leading_number()
                        .find(&text)
                        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
                        .filter(|v| v.is_finite())
                        .unwrap_or(0.0)
                }
            },
            _ => 0.0,
        }
    }

    /// Amount owed for a group booking.
    pub fn total_cost(price: Option<&FlexValue>, participants: u32) -> f64 {
        Self::numeric_price(price) * participants as f64
    }

    pub fn format_amount(amount: f64) -> String {
        format!("{}{}", CURRENCY_SYMBOL, format_number(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FlexValue {
        FlexValue::Text(s.to_string())
    }

    #[test]
    fn test_format_price() {
        assert_eq!(PricingService::format_price(Some(&FlexValue::Int(1500))), "₹1500");
        assert_eq!(PricingService::format_price(Some(&text("$1500"))), "₹1500");
        assert_eq!(PricingService::format_price(Some(&text("₹1500"))), "₹1500");
        assert_eq!(PricingService::format_price(None), "₹0");
        assert_eq!(PricingService::format_price(Some(&text(""))), "₹0");
        assert_eq!(PricingService::format_price(Some(&FlexValue::Float(2499.5))), "₹2499.5");
    }

    #[test]
    fn test_numeric_price() {
        assert_eq!(PricingService::numeric_price(Some(&text("₹12,500"))), 12500.0);
        assert_eq!(PricingService::numeric_price(None), 0.0);
        assert_eq!(PricingService::numeric_price(Some(&text("$99.50 per person"))), 99.5);
        assert_eq!(PricingService::numeric_price(Some(&text("call us"))), 0.0);
        assert_eq!(PricingService::numeric_price(Some(&FlexValue::Int(3000))), 3000.0);
    }

    #[test]
    fn test_total_cost() {
        assert_eq!(PricingService::total_cost(Some(&text("₹4,000")), 3), 12000.0);
        assert_eq!(PricingService::format_amount(12000.0), "₹12000");
    }
}
