use std::borrow::Cow;

/// Quote currency code as the API spells it (lowercase, e.g. "usd")
pub type VsCurrency = Cow<'static, str>;

/// API-assigned asset identifier (e.g. "bitcoin")
pub type CoinId = String;

/// Default quote currency for every request.
pub const DEFAULT_VS_CURRENCY: &str = "usd";
