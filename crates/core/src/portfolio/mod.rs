//! Display-side arithmetic over live prices: target values, derived
//! holdings and the withdrawal asset table.

mod holdings;
mod targets;
mod withdrawal;

pub use holdings::{derive_holdings, Holding, HOLDING_SYMBOLS};
pub use targets::TargetValues;
pub use withdrawal::{
    network_fee, validate_amount, withdrawal_asset, AmountError, WithdrawalAsset,
    WITHDRAWAL_ASSETS,
};
