use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

/// An asset the withdrawal screen offers, with its per-request limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawalAsset {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub network: &'static str,
    pub min: Decimal,
    pub max: Decimal,
}

pub const WITHDRAWAL_ASSETS: [WithdrawalAsset; 4] = [
    WithdrawalAsset {
        id: "bitcoin",
        symbol: "BTC",
        name: "Bitcoin",
        network: "Bitcoin",
        min: dec!(0.001),
        max: dec!(2),
    },
    WithdrawalAsset {
        id: "ethereum",
        symbol: "ETH",
        name: "Ethereum",
        network: "Ethereum",
        min: dec!(0.01),
        max: dec!(50),
    },
    WithdrawalAsset {
        id: "solana",
        symbol: "SOL",
        name: "Solana",
        network: "Solana",
        min: dec!(1),
        max: dec!(500),
    },
    WithdrawalAsset {
        id: "tether",
        symbol: "USDT",
        name: "Tether",
        network: "TRC-20",
        min: dec!(10),
        max: dec!(100000),
    },
];

/// Look up a withdrawal asset by symbol, case-insensitively.
pub fn withdrawal_asset(symbol: &str) -> Option<&'static WithdrawalAsset> {
    WITHDRAWAL_ASSETS
        .iter()
        .find(|asset| asset.symbol.eq_ignore_ascii_case(symbol))
}

/// Flat network fee charged per withdrawal, in units of the asset.
pub fn network_fee(symbol: &str) -> Decimal {
    match symbol.to_uppercase().as_str() {
        "BTC" => dec!(0.0004),
        "ETH" => dec!(0.0025),
        "SOL" => dec!(0.00005),
        "USDT" => dec!(1.00),
        _ => Decimal::ZERO,
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is below the minimum of {min} {symbol}")]
    BelowMinimum { symbol: &'static str, min: Decimal },

    #[error("Amount is above the maximum of {max} {symbol}")]
    AboveMaximum { symbol: &'static str, max: Decimal },

    #[error("Insufficient balance (max: {available} {symbol})")]
    InsufficientBalance {
        symbol: &'static str,
        available: Decimal,
    },

    #[error("{0} cannot be withdrawn")]
    UnsupportedAsset(String),
}

/// Check a requested amount against the asset limits and the available
/// balance.
pub fn validate_amount(
    asset: &WithdrawalAsset,
    amount: Decimal,
    available: Decimal,
) -> Result<(), AmountError> {
    if amount < asset.min {
        return Err(AmountError::BelowMinimum {
            symbol: asset.symbol,
            min: asset.min,
        });
    }
    if amount > asset.max {
        return Err(AmountError::AboveMaximum {
            symbol: asset.symbol,
            max: asset.max,
        });
    }
    if amount > available {
        return Err(AmountError::InsufficientBalance {
            symbol: asset.symbol,
            available,
        });
    }
    Ok(())
}
