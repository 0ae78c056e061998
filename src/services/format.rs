//! Display formatting for prices, supplies and holder shares.
//!
//! Every function here is total: missing, malformed or non-finite input
//! renders as a zero-valued string instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::types::amount::parse_amount;

/// Raw supply and balance strings are whole tokens scaled by 10^11.
pub const TOKEN_SCALE: f64 = 1e11;
/// Prices are quoted in satoshis.
pub const SATS_PER_BTC: f64 = 1e8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyFormat {
    Short,
    Full,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn format_currency(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return "$0.00".to_string(),
    };

    let abs = value.abs();
    if abs == 0.0 {
        return "$0.00".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if abs < 0.00001 {
        return format!("<${sign}0.00001");
    }

    let body = match abs {
        a if a < 1.0 => format!("{:.5}", a),
        a if a < 1_000.0 => format!("{:.2}", a),
        a if a < 1_000_000.0 => format!("{:.2}K", a / 1_000.0),
        a if a < 1_000_000_000.0 => format!("{:.2}M", a / 1_000_000.0),
        a => format!("{:.2}B", a / 1_000_000_000.0),
    };
    format!("${sign}{body}")
}

pub fn format_supply(format: SupplyFormat, supply: Option<&str>) -> String {
    let raw = match supply {
        Some(s) if !s.trim().is_empty() => s,
        _ => return "0".to_string(),
    };
    let num = finite_or_zero(parse_amount(raw) / TOKEN_SCALE);

    match format {
        SupplyFormat::Short => match num {
            n if n >= 1e9 => format!("{:.2}B", n / 1e9),
            n if n >= 1e6 => format!("{:.2}M", n / 1e6),
            n if n >= 1e3 => format!("{:.2}K", n / 1e3),
            n => format!("{:.2}", n),
        },
        SupplyFormat::Full => group_thousands(num),
    }
}

/// Comma-grouped integer part with at most three fraction digits, trailing
/// zeros dropped.
fn group_thousands(value: f64) -> String {
    let rendered = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rendered
        .split_once('.')
        .unwrap_or((rendered.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Satoshi-scaled price converted with the current BTC/USD rate.
pub fn price_in_usd(price: f64, btc_usd: f64) -> f64 {
    (price / SATS_PER_BTC) * btc_usd
}

/// Formats an already USD-converted token price. The extra `/ 1000` matches
/// the scale the upstream feed has always been displayed at.
pub fn format_token_price(price: f64) -> String {
    format!("${:.5}", finite_or_zero(price / 1000.0))
}

/// Market cap is always shown in billions.
pub fn format_market_cap(price: f64, total_supply: &str, btc_usd: f64) -> String {
    let supply = parse_amount(total_supply) / TOKEN_SCALE;
    let market_cap = price_in_usd(price, btc_usd) * supply;
    format!("${:.2}B", finite_or_zero(market_cap / 1_000_000_000.0))
}

pub fn format_percentage(balance: &str, total_supply: &str) -> String {
    let balance = parse_amount(balance);
    let total = parse_amount(total_supply);
    if balance == 0.0 || balance.is_nan() || total == 0.0 || total.is_nan() {
        return "0.00%".to_string();
    }
    format!("{:.2}%", finite_or_zero((balance / total) * 100.0))
}

pub fn format_holder_balance(balance: &str, ticker: &str) -> String {
    let amount = format_supply(SupplyFormat::Full, Some(balance));
    if ticker.is_empty() {
        amount
    } else {
        format!("{} {}", amount, ticker)
    }
}

/// Upstream creation timestamps, normalised to UTC. Accepts RFC 3339, naive
/// ISO-8601 date-times (taken as UTC) and bare dates.
pub fn parse_created_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn format_created_date(raw: &str) -> String {
    parse_created_time(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}
