use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::amount::{
    de_amount_string, de_lenient_f64, de_lenient_string, de_lenient_u64, de_null_default,
    de_opt_amount_string,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Token {
    #[serde(default, deserialize_with = "de_amount_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub ticker: String,
    /// Satoshi-scaled price.
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub marketcap: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub volume: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub holder_count: f64,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub created_time: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub creator: String,
    /// Whole-token supply scaled by 10^11.
    #[serde(default, deserialize_with = "de_amount_string")]
    pub total_supply: String,
    #[serde(default, deserialize_with = "de_opt_amount_string", skip_serializing_if = "Option::is_none")]
    pub creator_balance: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Holder {
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_username: Option<String>,
    #[serde(default, deserialize_with = "de_amount_string")]
    pub balance: String,
    #[serde(default, deserialize_with = "de_opt_amount_string", skip_serializing_if = "Option::is_none")]
    pub percentage: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HoldersPage {
    #[serde(default, deserialize_with = "de_null_default")]
    pub data: Vec<Holder>,
    #[serde(default, deserialize_with = "de_lenient_u64")]
    pub count: u64,
}

/// Envelope of the upstream token listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllTokensResponse {
    #[serde(default, deserialize_with = "de_null_default")]
    pub data: Vec<Token>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BtcPrices {
    #[serde(rename = "USD")]
    pub usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "LOW RISK")]
    Low,
    #[serde(rename = "MEDIUM RISK")]
    Medium,
    #[serde(rename = "HIGH RISK")]
    High,
    #[serde(rename = "EXTREME RISK")]
    Extreme,
    #[serde(rename = "INSUFFICIENT DATA")]
    InsufficientData,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW RISK",
            RiskLevel::Medium => "MEDIUM RISK",
            RiskLevel::High => "HIGH RISK",
            RiskLevel::Extreme => "EXTREME RISK",
            RiskLevel::InsufficientData => "INSUFFICIENT DATA",
        }
    }

    /// Colour key the dashboard uses for badges and progress bars.
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Medium => "yellow",
            RiskLevel::High | RiskLevel::Extreme => "red",
            RiskLevel::InsufficientData => "gray",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskStats {
    pub dev_percentage: f64,
    pub top5_percentage: f64,
    pub top10_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub color: &'static str,
    pub message: String,
    pub warning: String,
    pub stats: RiskStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderRow {
    pub rank: usize,
    pub user: String,
    pub username: Option<String>,
    pub balance: String,
    pub balance_display: String,
    pub percentage_display: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderRowsPage {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub has_more: bool,
    pub holders: Vec<HolderRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReport {
    pub token: Token,
    pub btc_usd_price: f64,
    pub price_display: String,
    pub market_cap_display: String,
    pub supply_display: String,
    pub supply_full: String,
    pub created_display: String,
    pub risk: RiskAssessment,
    pub holders: Vec<HolderRow>,
    pub holders_loaded: bool,
    pub total_holders: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenList {
    pub total: usize,
    pub matched: usize,
    pub tokens: Vec<Token>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_tolerates_nulls_and_numbers() {
        let token: Token = serde_json::from_str(
            r#"{"id":42,"name":null,"ticker":null,"price":"1000","created_time":null,
                "creator":null,"total_supply":100000000000,"holder_count":null}"#,
        )
        .unwrap();
        assert_eq!(token.id, "42");
        assert_eq!(token.name, "");
        assert_eq!(token.ticker, "");
        assert_eq!(token.creator, "");
        assert_eq!(token.created_time, "");
        assert_eq!(token.price, 1000.0);
        assert_eq!(token.total_supply, "100000000000");
        assert_eq!(token.holder_count, 0.0);
    }

    #[test]
    fn holders_page_tolerates_quoted_count_and_null_user() {
        let page: HoldersPage = serde_json::from_str(
            r#"{"data":[{"user":null,"balance":"5"},{"user":"a","balance":7}],"count":"2"}"#,
        )
        .unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.data[0].user, "");
        assert_eq!(page.data[1].balance, "7");
    }

    #[test]
    fn holders_page_tolerates_null_data() {
        let page: HoldersPage = serde_json::from_str(r#"{"data":null,"count":null}"#).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.count, 0);
    }
}
