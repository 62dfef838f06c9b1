/// Classification of a failed fetch.
///
/// Both classes are soft failures: the caller keeps serving its last
/// snapshot and flags it as stale. Neither class triggers a retry; the next
/// scheduled refresh is the only retry mechanism.
///
/// | Class | Cause |
/// |-------|-------|
/// | `RateLimited` | HTTP 429 from the market data API |
/// | `NetworkError` | transport failure, timeout, non-2xx status, bad payload |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FailureKind {
    /// The API asked us to slow down (HTTP 429).
    RateLimited,

    /// Anything else that kept us from getting a usable payload.
    NetworkError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::NetworkError => "network_error",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
