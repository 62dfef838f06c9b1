use std::collections::BTreeMap;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Configured USD value per symbol.
///
/// Quantities shown on screen are derived from these and the live price, so
/// a symbol's position moves inversely with its price while its value stays
/// fixed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetValues {
    values: BTreeMap<String, Decimal>,
}

impl TargetValues {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(symbol, value)| (symbol.into().to_uppercase(), value))
                .collect(),
        }
    }

    /// Targets of the portfolio screen.
    pub fn portfolio_defaults() -> Self {
        Self::new([
            ("BTC", dec!(6500)),
            ("ETH", Decimal::ZERO),
            ("USDT", Decimal::ZERO),
            ("SOL", Decimal::ZERO),
            ("BNB", Decimal::ZERO),
        ])
    }

    /// Targets of the withdrawal screen.
    pub fn withdrawal_defaults() -> Self {
        Self::new([
            ("BTC", dec!(100)),
            ("ETH", dec!(100)),
            ("USDT", dec!(100)),
            ("SOL", dec!(100)),
            ("BNB", Decimal::ZERO),
        ])
    }

    /// Target for `symbol`; unknown symbols are worth nothing.
    pub fn get(&self, symbol: &str) -> Decimal {
        self.values
            .get(&symbol.to_uppercase())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Units of `symbol` worth its target at `price`.
    ///
    /// Zero when the price is not positive, not representable, or so small
    /// that the quantity overflows.
    pub fn quantity_at(&self, symbol: &str, price: f64) -> Decimal {
        if price <= 0.0 {
            return Decimal::ZERO;
        }
        let target = self.get(symbol);
        if target.is_zero() {
            return Decimal::ZERO;
        }
        match Decimal::from_f64(price) {
            Some(price) if price > Decimal::ZERO => {
                target.checked_div(price).unwrap_or(Decimal::ZERO)
            }
            _ => Decimal::ZERO,
        }
    }
}
