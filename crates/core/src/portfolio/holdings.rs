use nexora_market_data::MarketAsset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::targets::TargetValues;

/// Symbols the portfolio screen shows a position for.
pub const HOLDING_SYMBOLS: [&str; 5] = ["BTC", "ETH", "USDT", "BNB", "SOL"];

/// One synthetic position, priced from the latest market list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub change_24h: f64,
    /// Units held: target value over price, zero without a positive price.
    pub quantity: Decimal,
    /// Position value in USD, always the configured target.
    pub value: Decimal,
}

/// Holdings for every [`HOLDING_SYMBOLS`] row of `assets`, in list order.
///
/// Symbols missing from the list get no holding.
pub fn derive_holdings(assets: &[MarketAsset], targets: &TargetValues) -> Vec<Holding> {
    assets
        .iter()
        .filter(|asset| {
            let symbol = asset.symbol.to_uppercase();
            HOLDING_SYMBOLS.contains(&symbol.as_str())
        })
        .map(|asset| {
            let symbol = asset.symbol.to_uppercase();
            Holding {
                id: asset.id.clone(),
                quantity: targets.quantity_at(&symbol, asset.price),
                value: targets.get(&symbol),
                symbol,
                name: asset.name.clone(),
                image: asset.image.clone(),
                price: asset.price,
                change_24h: asset.change_24h,
            }
        })
        .collect()
}
