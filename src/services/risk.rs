//! Holder-concentration risk tiers.
//!
//! `evaluate_risk` is a pure function of the token and the holder list it is
//! given. A report that only has a partial or empty holder list must be
//! re-evaluated once the full list arrives: an empty list always reads as an
//! abandoned token.

use crate::types::amount::parse_amount;
use crate::types::models::{Holder, RiskAssessment, RiskLevel, RiskStats, Token};

const ABANDONED_MESSAGE: &str = "Developer has abandoned the token";
const ABANDONED_WARNING: &str = "DANGER: Developer has sold their entire position (0 holders)";

const INSUFFICIENT_MESSAGE: &str = "Not enough data to assess token distribution.";
const INSUFFICIENT_WARNING: &str =
    "Holder concentration could not be computed: total supply is zero or balances are malformed";

/// (dev %, top 5 %) thresholds, most severe first.
const TIERS: [(RiskLevel, f64, f64, &str); 3] = [
    (
        RiskLevel::Extreme,
        50.0,
        70.0,
        "Extremely high centralization. High probability of price manipulation.",
    ),
    (
        RiskLevel::High,
        30.0,
        50.0,
        "High centralization detected. Major price manipulation risk.",
    ),
    (
        RiskLevel::Medium,
        20.0,
        40.0,
        "Moderate centralization. Exercise caution.",
    ),
];

const LOW_MESSAGE: &str = "Good distribution of tokens. Standard market risks apply.";

fn top_n_balance(sorted: &[f64], n: usize) -> f64 {
    sorted.iter().take(n).sum()
}

pub fn evaluate_risk(token: &Token, holders: &[Holder]) -> RiskAssessment {
    let total_supply = parse_amount(&token.total_supply);

    let dev_balance = holders
        .iter()
        .find(|h| h.user == token.creator)
        .map(|h| parse_amount(&h.balance))
        .unwrap_or(0.0);
    let dev_percentage = (dev_balance / total_supply) * 100.0;

    let mut balances: Vec<f64> = holders.iter().map(|h| parse_amount(&h.balance)).collect();
    // Stable, descending. NaN balances sort first and poison the top-N sums.
    balances.sort_by(|a, b| b.total_cmp(a));

    let stats = RiskStats {
        dev_percentage,
        top5_percentage: (top_n_balance(&balances, 5) / total_supply) * 100.0,
        top10_percentage: (top_n_balance(&balances, 10) / total_supply) * 100.0,
    };

    if dev_balance == 0.0 {
        return assessment(RiskLevel::Extreme, ABANDONED_MESSAGE, ABANDONED_WARNING.to_string(), stats);
    }

    if !(stats.dev_percentage.is_finite()
        && stats.top5_percentage.is_finite()
        && stats.top10_percentage.is_finite())
    {
        return assessment(
            RiskLevel::InsufficientData,
            INSUFFICIENT_MESSAGE,
            INSUFFICIENT_WARNING.to_string(),
            stats,
        );
    }

    let warning = format!(
        "Developer holds {:.2}% of supply. Top 5 holders control {:.2}%",
        stats.dev_percentage, stats.top5_percentage
    );

    for (level, dev_threshold, top5_threshold, message) in TIERS {
        if stats.dev_percentage >= dev_threshold || stats.top5_percentage >= top5_threshold {
            return assessment(level, message, warning, stats);
        }
    }

    assessment(RiskLevel::Low, LOW_MESSAGE, warning, stats)
}

fn assessment(level: RiskLevel, message: &str, warning: String, stats: RiskStats) -> RiskAssessment {
    RiskAssessment {
        level,
        color: level.color(),
        message: message.to_string(),
        warning,
        stats,
    }
}
