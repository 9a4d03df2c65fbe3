//! Configuration for the provider clients and fetch gating.

use std::time::Duration;

use url::Url;

/// Default Merkl API endpoint.
pub const DEFAULT_MERKL_API_URL: &str = "https://api.merkl.xyz/v3";

/// Default StellaSwap offchain rewards endpoint.
pub const DEFAULT_STELLASWAP_API_URL: &str = "https://offchain-api.stellaswap.com/api/v1";

/// Default per-key freshness window: a completed fetch suppresses refetches
/// of the same (provider, wallet, chain) key for this long.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(20 * 60);

/// Default provider-global cool-down: caps request rate across wallets when
/// many vault views refresh concurrently.
pub const DEFAULT_GLOBAL_COOLDOWN: Duration = Duration::from_secs(5);

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for reward provider clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Merkl API base URL.
    pub merkl_url: Url,
    /// StellaSwap API base URL.
    pub stellaswap_url: Url,
    /// HTTP request timeout.
    pub request_timeout: Duration,
    /// Per-key freshness window for the recency gate.
    pub freshness_window: Duration,
    /// Provider-global cool-down for the recency gate.
    pub global_cooldown: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            merkl_url: Url::parse(DEFAULT_MERKL_API_URL).expect("Invalid default Merkl URL"),
            stellaswap_url: Url::parse(DEFAULT_STELLASWAP_API_URL)
                .expect("Invalid default StellaSwap URL"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            global_cooldown: DEFAULT_GLOBAL_COOLDOWN,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom Merkl base URL.
    pub fn with_merkl_url(mut self, url: Url) -> Self {
        self.merkl_url = url;
        self
    }

    /// Set a custom StellaSwap base URL.
    pub fn with_stellaswap_url(mut self, url: Url) -> Self {
        self.stellaswap_url = url;
        self
    }

    /// Set the HTTP request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the per-key freshness window.
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    /// Set the provider-global cool-down.
    pub fn with_global_cooldown(mut self, cooldown: Duration) -> Self {
        self.global_cooldown = cooldown;
        self
    }
}
