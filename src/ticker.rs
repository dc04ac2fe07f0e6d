/// Maximum number of tickers analyzed per run. Extra entries are dropped.
pub const MAX_TICKERS: usize = 10;

/// Symbols at most this long (and without an exchange suffix) get the default suffix.
pub const SHORT_SYMBOL_MAX_LEN: usize = 5;

/// Default exchange suffix for bare short symbols (Oslo Børs)
pub const DEFAULT_SUFFIX: &str = ".OL";

/// How bare symbols are qualified with an exchange suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerPolicy {
    default_suffix: Option<String>,
}

impl TickerPolicy {
    /// Build a policy from a configured suffix. `None` or an empty string
    /// disables suffixing; "ol" and ".OL" both become ".OL".
    pub fn new(suffix: Option<&str>) -> Self {
        let default_suffix = suffix
            .map(|s| s.trim().trim_start_matches('.').to_uppercase())
            .filter(|s| !s.is_empty())
            .map(|s| format!(".{}", s));
        Self { default_suffix }
    }

    /// Policy that leaves every symbol as typed (apart from case)
    pub fn passthrough() -> Self {
        Self { default_suffix: None }
    }

    pub fn default_suffix(&self) -> Option<&str> {
        self.default_suffix.as_deref()
    }

    /// Qualify a single upper-cased symbol
    pub fn qualify(&self, symbol: &str) -> String {
        match &self.default_suffix {
            Some(suffix)
                if !symbol.contains('.') && symbol.chars().count() <= SHORT_SYMBOL_MAX_LEN =>
            {
                format!("{}{}", symbol, suffix)
            }
            _ => symbol.to_string(),
        }
    }
}

impl Default for TickerPolicy {
    fn default() -> Self {
        Self::new(Some(DEFAULT_SUFFIX))
    }
}

/// Turn comma-separated user input into at most [`MAX_TICKERS`] canonical tickers.
///
/// Tokens are trimmed and upper-cased, empty tokens are dropped, and the
/// policy's suffix is applied to short bare symbols. Order is preserved.
/// Nothing checks that a ticker is actually listed; that surfaces when
/// metrics are fetched.
pub fn normalize_tickers(input: &str, policy: &TickerPolicy) -> Vec<String> {
    input
        .split(',')
        .map(|token| token.trim().to_uppercase())
        .filter(|token| !token.is_empty())
        .map(|token| policy.qualify(&token))
        .take(MAX_TICKERS)
        .collect()
}
