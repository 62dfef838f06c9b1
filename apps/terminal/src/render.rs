//! Plain-text rendering of view snapshots.

use nexora_core::portfolio::Holding;
use nexora_core::sync::SyncStatus;
use nexora_market_data::{GlobalStats, MarketAsset};
use rust_decimal::{Decimal, RoundingStrategy};

/// `$1.23T`, `$4.56B`, `$7.89M`, `$1.00K`, or the plain amount below a
/// thousand.
pub fn format_compact(value: f64) -> String {
    if value >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("${:.2}K", value / 1e3)
    } else {
        format!("${:.2}", value)
    }
}

pub fn format_change(percent: f64) -> String {
    if percent >= 0.0 {
        format!("+{:.2}%", percent)
    } else {
        format!("{:.2}%", percent)
    }
}

/// USDT shows whole units; everything else up to six decimals.
pub fn format_quantity(symbol: &str, quantity: Decimal) -> String {
    if symbol.eq_ignore_ascii_case("USDT") {
        quantity.floor().to_string()
    } else {
        quantity
            .round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string()
    }
}

pub fn status_line(status: &SyncStatus) -> String {
    match status.last_failure {
        Some(kind) if status.is_stale() => format!("STALE ({})", kind),
        _ => "LIVE".to_string(),
    }
}

pub fn global_summary(global: Option<&GlobalStats>, last_synced: Option<&str>) -> String {
    match global {
        Some(stats) => format!(
            "Market cap {}  Volume {}  24h {}  (synced {})",
            format_compact(stats.total_market_cap),
            format_compact(stats.total_volume),
            format_change(stats.market_cap_change_24h),
            last_synced.unwrap_or("never"),
        ),
        None => "Global stats unavailable".to_string(),
    }
}

pub fn market_table(assets: &[MarketAsset]) -> String {
    let mut out = format!(
        "{:>3}  {:<8} {:<20} {:>14} {:>9} {:>10} {:>10}\n",
        "#", "SYMBOL", "NAME", "PRICE", "24H", "MCAP", "VOLUME"
    );
    for (i, asset) in assets.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<8} {:<20} {:>14} {:>9} {:>10} {:>10}\n",
            i + 1,
            asset.symbol,
            truncate(&asset.name, 20),
            format!("${:.2}", asset.price),
            format_change(asset.change_24h),
            format_compact(asset.market_cap),
            format_compact(asset.volume_24h),
        ));
    }
    out
}

pub fn holdings_table(holdings: &[Holding]) -> String {
    let mut out = format!(
        "{:<6} {:>14} {:>9} {:>16} {:>12}\n",
        "ASSET", "PRICE", "24H", "QUANTITY", "VALUE"
    );
    for holding in holdings {
        out.push_str(&format!(
            "{:<6} {:>14} {:>9} {:>16} {:>12}\n",
            holding.symbol,
            format!("${:.2}", holding.price),
            format_change(holding.change_24h),
            format_quantity(&holding.symbol, holding.quantity),
            format!("${}", holding.value.round_dp(2)),
        ));
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexora_market_data::FailureKind;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(2.45e12), "$2.45T");
        assert_eq!(format_compact(8.1e10), "$81.00B");
        assert_eq!(format_compact(3_500_000.0), "$3.50M");
        assert_eq!(format_compact(1000.0), "$1.00K");
        assert_eq!(format_compact(999.5), "$999.50");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(1.234), "+1.23%");
        assert_eq!(format_change(-0.5), "-0.50%");
    }

    #[test]
    fn test_format_quantity() {
        let q = Decimal::from_str("0.0015384615384615").unwrap();
        assert_eq!(format_quantity("BTC", q), "0.001538");
        assert_eq!(format_quantity("USDT", Decimal::from_str("99.97").unwrap()), "99");
        assert_eq!(format_quantity("ETH", Decimal::ZERO), "0");
    }

    #[test]
    fn test_status_line() {
        let mut status = SyncStatus::default();
        assert_eq!(status_line(&status), "LIVE");
        status.fail(FailureKind::RateLimited);
        assert!(status_line(&status).starts_with("STALE"));
    }

    #[test]
    fn test_market_table_rows() {
        let assets = vec![MarketAsset::new("bitcoin", "btc", "Bitcoin").with_price(65000.0)];
        let table = market_table(&assets);
        assert_eq!(table.lines().count(), 2);
        assert!(table.contains("BTC"));
        assert!(table.contains("$65000.00"));
    }
}
