use anyhow::Result;

use super::format::{
    format_created_date, format_holder_balance, format_market_cap, format_percentage,
    format_supply, format_token_price, parse_created_time, price_in_usd, SupplyFormat,
};
use super::risk::evaluate_risk;
use super::upstream::UpstreamClient;
use crate::config::AppConfig;
use crate::types::models::{
    Holder, HolderRow, HolderRowsPage, HoldersPage, Token, TokenList, TokenReport,
};

pub const MAX_HOLDERS_PAGE_SIZE: u32 = 100;

pub fn holder_rows(holders: &[Holder], token: &Token, offset: usize) -> Vec<HolderRow> {
    holders
        .iter()
        .enumerate()
        .map(|(i, h)| HolderRow {
            rank: offset + i + 1,
            user: h.user.clone(),
            username: h.user_username.clone(),
            balance: h.balance.clone(),
            balance_display: format_holder_balance(&h.balance, &token.ticker),
            percentage_display: format_percentage(&h.balance, &token.total_supply),
        })
        .collect()
}

/// Builds the report from whatever was fetched. `holders == None` means the
/// holder list is not available yet, so the risk tier is provisional.
pub fn assemble_report(token: Token, holders: Option<HoldersPage>, btc_usd: f64) -> TokenReport {
    let holders_loaded = holders.is_some();
    let page = holders.unwrap_or_default();

    let risk = evaluate_risk(&token, &page.data);
    let rows = holder_rows(&page.data, &token, 0);

    TokenReport {
        btc_usd_price: btc_usd,
        price_display: format_token_price(price_in_usd(token.price, btc_usd)),
        market_cap_display: format_market_cap(token.price, &token.total_supply, btc_usd),
        supply_display: format_supply(SupplyFormat::Short, Some(&token.total_supply)),
        supply_full: format_supply(SupplyFormat::Full, Some(&token.total_supply)),
        created_display: format_created_date(&token.created_time),
        risk,
        holders: rows,
        holders_loaded,
        total_holders: page.count.max(page.data.len() as u64),
        token,
    }
}

pub async fn build_token_report(
    client: &UpstreamClient,
    config: &AppConfig,
    token_id: &str,
) -> Result<TokenReport> {
    let token = client.fetch_token(token_id).await?;

    let (btc_usd, holders) = futures::join!(
        client.fetch_btc_usd(),
        client.fetch_holders(token_id, 1, config.holders_page_size.min(MAX_HOLDERS_PAGE_SIZE))
    );

    let btc_usd = btc_usd.unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to fetch BTC price, using default ${}: {:#}",
            config.default_btc_usd,
            e
        );
        config.default_btc_usd
    });

    let holders = match holders {
        Ok(page) => Some(page),
        Err(e) => {
            tracing::warn!("Failed to fetch holders for {}: {:#}", token_id, e);
            None
        }
    };

    let report = assemble_report(token, holders, btc_usd);
    tracing::info!(
        "Risk for {}: {} (dev {:.2}%, top5 {:.2}%, top10 {:.2}%)",
        token_id,
        report.risk.level,
        report.risk.stats.dev_percentage,
        report.risk.stats.top5_percentage,
        report.risk.stats.top10_percentage
    );
    Ok(report)
}

pub async fn build_holders_page(
    client: &UpstreamClient,
    token_id: &str,
    page: u32,
    limit: u32,
) -> Result<HolderRowsPage> {
    let page = page.max(1);
    let limit = limit.clamp(1, MAX_HOLDERS_PAGE_SIZE);

    let (token, holders) = futures::try_join!(
        client.fetch_token(token_id),
        client.fetch_holders(token_id, page, limit)
    )?;

    let offset = (page as usize - 1) * limit as usize;
    let rows = holder_rows(&holders.data, &token, offset);
    let has_more = holders.count > (offset + rows.len()) as u64;

    Ok(HolderRowsPage {
        page,
        limit,
        total: holders.count,
        has_more,
        holders: rows,
    })
}

/// Fills the placeholders the listing has always shown for sparse tokens.
pub fn normalize_token(mut token: Token) -> Token {
    if token.name.trim().is_empty() {
        token.name = format!("Token {}", token.id);
    }
    if token.ticker.trim().is_empty() {
        token.ticker = format!("TKN{}", token.id);
    }
    if token.creator.trim().is_empty() {
        token.creator = "Unknown".to_string();
    }
    if token.total_supply.trim().is_empty() {
        token.total_supply = "0".to_string();
    }
    token
}

/// Newest first, then a case-insensitive substring match on name, ticker or
/// id. Tokens without a readable creation time sort last.
pub fn list_tokens(tokens: Vec<Token>, search: Option<&str>) -> TokenList {
    let total = tokens.len();
    let mut tokens: Vec<Token> = tokens.into_iter().map(normalize_token).collect();
    tokens.sort_by_cached_key(|t| std::cmp::Reverse(parse_created_time(&t.created_time)));

    let needle = search.map(str::trim).unwrap_or_default().to_lowercase();
    if !needle.is_empty() {
        tokens.retain(|t| {
            t.name.to_lowercase().contains(&needle)
                || t.ticker.to_lowercase().contains(&needle)
                || t.id.to_lowercase().contains(&needle)
        });
    }

    TokenList {
        total,
        matched: tokens.len(),
        tokens,
    }
}

pub async fn build_token_list(client: &UpstreamClient, search: Option<&str>) -> Result<TokenList> {
    let tokens = client.fetch_all_tokens().await?;
    let list = list_tokens(tokens, search);
    tracing::info!("Listing {} of {} tokens", list.matched, list.total);
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::models::RiskLevel;

    fn mock_token() -> Token {
        Token {
            id: "2ait".to_string(),
            name: "AIEYE".to_string(),
            ticker: "AIEYE".to_string(),
            price: 1000.0,
            created_time: "2023-01-01T00:00:00Z".to_string(),
            creator: "creator1".to_string(),
            total_supply: "100000000000".to_string(),
            ..Default::default()
        }
    }

    fn mock_holders() -> HoldersPage {
        let holder = |user: &str, balance: &str| Holder {
            user: user.to_string(),
            balance: balance.to_string(),
            ..Default::default()
        };
        HoldersPage {
            data: vec![
                holder("creator1", "50000000000"),
                holder("user1", "20000000000"),
                holder("user2", "10000000000"),
            ],
            count: 3,
        }
    }

    #[test]
    fn report_without_holders_is_provisional() {
        let report = assemble_report(mock_token(), None, 30000.0);
        assert!(!report.holders_loaded);
        assert!(report.holders.is_empty());
        assert_eq!(report.risk.level, RiskLevel::Extreme);
        assert_eq!(report.risk.message, "Developer has abandoned the token");
    }

    #[test]
    fn report_with_holders() {
        let report = assemble_report(mock_token(), Some(mock_holders()), 30000.0);
        assert!(report.holders_loaded);
        assert_eq!(report.total_holders, 3);
        assert_eq!(report.risk.level, RiskLevel::Extreme);
        assert_eq!(report.risk.stats.dev_percentage, 50.0);

        // 1000 sats at $30k/BTC is $0.30, shown scaled down by 1000
        assert_eq!(report.price_display, "$0.00030");
        assert_eq!(report.supply_display, "1.00");
        assert_eq!(report.created_display, "2023-01-01");

        let first = &report.holders[0];
        assert_eq!(first.rank, 1);
        assert_eq!(first.balance_display, "0.5 AIEYE");
        assert_eq!(first.percentage_display, "50.00%");
    }

    fn listed(id: &str, name: &str, ticker: &str, created: &str) -> Token {
        Token {
            id: id.to_string(),
            name: name.to_string(),
            ticker: ticker.to_string(),
            created_time: created.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn sparse_tokens_get_placeholders() {
        let token = normalize_token(listed("7k2p", "", " ", ""));
        assert_eq!(token.name, "Token 7k2p");
        assert_eq!(token.ticker, "TKN7k2p");
        assert_eq!(token.creator, "Unknown");
        assert_eq!(token.total_supply, "0");
    }

    #[test]
    fn listing_is_newest_first() {
        let list = list_tokens(
            vec![
                listed("a", "Old", "OLD", "2023-01-01T00:00:00Z"),
                listed("b", "Undated", "UND", "not a date"),
                listed("c", "New", "NEW", "2024-06-01T00:00:00Z"),
            ],
            None,
        );
        let ids: Vec<&str> = list.tokens.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(list.total, 3);
        assert_eq!(list.matched, 3);
    }

    #[test]
    fn listing_search_ignores_case() {
        let tokens = vec![
            listed("2ait", "AIEYE", "AIEYE", "2023-01-01T00:00:00Z"),
            listed("dog1", "Odin Dog", "ODINDOG", "2023-02-01T00:00:00Z"),
            listed("x9", "", "", "2023-03-01T00:00:00Z"),
        ];
        let by_name = list_tokens(tokens.clone(), Some("dog"));
        assert_eq!(by_name.matched, 1);
        assert_eq!(by_name.tokens[0].id, "dog1");

        let by_id = list_tokens(tokens.clone(), Some(" 2AI "));
        assert_eq!(by_id.tokens[0].id, "2ait");

        // placeholders are searchable too
        let by_placeholder = list_tokens(tokens, Some("tknx9"));
        assert_eq!(by_placeholder.matched, 1);
        assert_eq!(by_placeholder.total, 3);
    }

    #[test]
    fn rows_are_ranked_from_offset() {
        let token = mock_token();
        let rows = holder_rows(&mock_holders().data, &token, 100);
        assert_eq!(rows[0].rank, 101);
        assert_eq!(rows[2].rank, 103);
        assert_eq!(rows[1].percentage_display, "20.00%");
    }
}
