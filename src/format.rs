use chrono::{DateTime, NaiveDate};

pub const DEFAULT_CURRENCY: &str = "\u{20b9}";

/// Format an amount with two forced decimals and en-IN digit grouping
/// (last three digits, then pairs): `123456.7` -> `₹1,23,456.70`.
pub fn format_currency(value: f64, symbol: Option<&str>) -> String {
    let symbol = symbol.unwrap_or(DEFAULT_CURRENCY);
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = group_indian(int_part);
    let sign = if negative { "-" } else { "" };
    format!("{}{}{}.{}", sign, symbol, grouped, frac_part)
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Render an ISO date (or RFC 3339 datetime) as the short en-IN form,
/// e.g. `2026-01-15` -> `15 Jan 2026`. Unparseable input is returned
/// unchanged rather than erroring.
pub fn format_date(date_str: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return date.format("%-d %b %Y").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return dt.format("%-d %b %Y").to_string();
    }
    date_str.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_indian_grouping() {
        assert_eq!(format_currency(123456.7, None), "\u{20b9}1,23,456.70");
        assert_eq!(format_currency(1234567.0, None), "\u{20b9}12,34,567.00");
        assert_eq!(format_currency(999.5, None), "\u{20b9}999.50");
        assert_eq!(format_currency(1000.0, None), "\u{20b9}1,000.00");
        assert_eq!(format_currency(0.0, None), "\u{20b9}0.00");
    }

    #[test]
    fn test_currency_custom_symbol_and_sign() {
        assert_eq!(format_currency(-2500.0, Some("$")), "-$2,500.00");
    }

    #[test]
    fn test_date_short_form() {
        assert_eq!(format_date("2026-01-15"), "15 Jan 2026");
        assert_eq!(format_date("2026-08-05"), "5 Aug 2026");
        assert_eq!(format_date("2026-08-05T10:30:00+05:30"), "5 Aug 2026");
    }

    #[test]
    fn test_unparseable_date_echoes_back() {
        assert_eq!(format_date("not a date"), "not a date");
        assert_eq!(format_date(""), "");
    }
}
