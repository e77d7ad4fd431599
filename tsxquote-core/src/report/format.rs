//! Value formatting for console reports.
//!
//! Every formatter takes an `Option` and renders a missing value as `N/A`.

use chrono::NaiveDate;

pub const MISSING: &str = "N/A";

/// Large money amounts with a unit suffix: `$1.85B`, `$12.30M`, `$4.50K`, `$950.00`.
pub fn money(value: Option<f64>) -> String {
    let Some(v) = value else {
        return MISSING.into();
    };
    let sign = if v < 0.0 { "-" } else { "" };
    let a = v.abs();
    if a >= 1_000_000_000.0 {
        format!("{sign}${:.2}B", a / 1_000_000_000.0)
    } else if a >= 1_000_000.0 {
        format!("{sign}${:.2}M", a / 1_000_000.0)
    } else if a >= 1_000.0 {
        format!("{sign}${:.2}K", a / 1_000.0)
    } else {
        format!("{sign}${a:.2}")
    }
}

/// Per-share prices: `$12.34`.
pub fn price(value: Option<f64>) -> String {
    match value {
        Some(v) if v < 0.0 => format!("-${:.2}", v.abs()),
        Some(v) => format!("${v:.2}"),
        None => MISSING.into(),
    }
}

/// Ratios and multiples to two decimals.
pub fn ratio(value: Option<f64>) -> String {
    decimal(value, 2)
}

pub fn decimal(value: Option<f64>, places: usize) -> String {
    match value {
        Some(v) => format!("{v:.places$}"),
        None => MISSING.into(),
    }
}

/// Fractions as percentages: `0.1534` → `15.34%`.
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => MISSING.into(),
    }
}

/// Whole counts with thousands separators: `1,234,567`.
pub fn count(value: Option<f64>) -> String {
    match value {
        Some(v) => group_thousands(v.round() as i64),
        None => MISSING.into(),
    }
}

pub fn date(value: Option<NaiveDate>) -> String {
    match value {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => MISSING.into(),
    }
}

pub fn text(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

/// First `max_chars` characters followed by `...` when cut.
pub fn truncate(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", value[..idx].trim_end()),
        None => value.to_string(),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_picks_unit() {
        assert_eq!(money(Some(1_850_000_000.0)), "$1.85B");
        assert_eq!(money(Some(12_300_000.0)), "$12.30M");
        assert_eq!(money(Some(4_500.0)), "$4.50K");
        assert_eq!(money(Some(950.0)), "$950.00");
        assert_eq!(money(Some(-2_000_000.0)), "-$2.00M");
        assert_eq!(money(None), "N/A");
    }

    #[test]
    fn percent_scales_fraction() {
        assert_eq!(percent(Some(0.1534)), "15.34%");
        assert_eq!(percent(Some(-0.05)), "-5.00%");
        assert_eq!(percent(None), "N/A");
    }

    #[test]
    fn ratio_and_price() {
        assert_eq!(ratio(Some(9.8765)), "9.88");
        assert_eq!(price(Some(3.5)), "$3.50");
        assert_eq!(decimal(Some(0.00126), 4), "0.0013");
    }

    #[test]
    fn count_groups_digits() {
        assert_eq!(count(Some(1_234_567.0)), "1,234,567");
        assert_eq!(count(Some(999.0)), "999");
        assert_eq!(count(Some(-1000.0)), "-1,000");
        assert_eq!(count(Some(0.0)), "0");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 300), "short");
        assert_eq!(truncate("Société Générale", 6), "Sociét...");
        assert_eq!(truncate("abc def", 4), "abc...");
    }

    #[test]
    fn date_is_iso() {
        assert_eq!(date(NaiveDate::from_ymd_opt(2026, 3, 31)), "2026-03-31");
        assert_eq!(date(None), "N/A");
    }
}
