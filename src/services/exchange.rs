use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

const BINANCE_BASE_URL: &str = "https://api.binance.com";
const BINANCE_TESTNET_URL: &str = "https://testnet.binance.vision";

/// Assets quoted 1:1 against the pricing stablecoin
const QUOTE_STABLECOINS: &[&str] = &["USDT", "BUSD"];

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Exchange {0} is not supported")]
    UnsupportedExchange(String),

    #[error("Invalid API key or insufficient permissions")]
    InvalidApiKey,

    #[error("Access denied. Check the IP restrictions on your exchange account")]
    AccessDenied,

    #[error("Exchange returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Failed to build request signature")]
    Signature,
}

/// Exchange API credentials. Held in memory for the duration of a request
/// and never persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeCredentials {
    #[serde(default = "default_exchange_name")]
    pub name: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default)]
    pub testnet: bool,
}

fn default_exchange_name() -> String {
    "binance".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct ExchangeBalance {
    pub asset: String,
    pub free: f64,
    pub locked: f64,
}

impl ExchangeBalance {
    pub fn total(&self) -> f64 {
        self.free + self.locked
    }
}

/// A holding synthesized from an exchange balance plus a current market
/// price. The average price uses the current price as a stand-in; a true
/// cost basis would need trade-history ingestion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePosition {
    pub symbol: String,
    pub asset: String,
    pub quantity: f64,
    pub average_price: f64,
    pub current_price: f64,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    balances: Vec<RawBalance>,
}

#[derive(Debug, Deserialize)]
struct RawBalance {
    asset: String,
    free: String,
    locked: String,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    msg: Option<String>,
}

pub struct ExchangeService {
    client: reqwest::Client,
    base_url: String,
    testnet_url: String,
}

impl Default for ExchangeService {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeService {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BINANCE_BASE_URL.to_string(),
            testnet_url: BINANCE_TESTNET_URL.to_string(),
        }
    }

    /// Point every endpoint at a single host. Used by tests with a mocked
    /// exchange listener.
    pub fn with_base_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: url.clone(),
            testnet_url: url,
        }
    }

    fn host(&self, testnet: bool) -> &str {
        if testnet {
            &self.testnet_url
        } else {
            &self.base_url
        }
    }

    /// HMAC-SHA256 over the query string, keyed by the API secret, hex-encoded
    pub fn sign(query: &str, api_secret: &str) -> Result<String, ExchangeError> {
        let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
            .map_err(|_| ExchangeError::Signature)?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Validate API credentials by requesting the signed account endpoint.
    /// Any 2xx response means the credentials are usable.
    pub async fn validate_credentials(
        &self,
        credentials: &ExchangeCredentials,
    ) -> Result<(), ExchangeError> {
        if credentials.name.to_lowercase() != "binance" {
            return Err(ExchangeError::UnsupportedExchange(credentials.name.clone()));
        }

        let response = self.signed_account_request(credentials).await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::map_upstream_error(response).await)
    }

    /// Fetch account balances, filtered to assets with nonzero free+locked
    pub async fn fetch_balances(
        &self,
        credentials: &ExchangeCredentials,
    ) -> Result<Vec<ExchangeBalance>, ExchangeError> {
        if credentials.name.to_lowercase() != "binance" {
            return Err(ExchangeError::UnsupportedExchange(credentials.name.clone()));
        }

        let response = self.signed_account_request(credentials).await?;
        if !response.status().is_success() {
            return Err(Self::map_upstream_error(response).await);
        }

        let account: AccountResponse = response.json().await?;
        let balances = account
            .balances
            .into_iter()
            .map(|b| ExchangeBalance {
                asset: b.asset,
                free: b.free.parse().unwrap_or(0.0),
                locked: b.locked.parse().unwrap_or(0.0),
            })
            .filter(|b| b.total() > 0.0)
            .collect();
        Ok(balances)
    }

    /// Spot price of an asset in the quote stablecoin. Unknown symbols price
    /// at zero, matching the original behavior.
    pub async fn asset_price(&self, asset: &str) -> Result<f64, ExchangeError> {
        if QUOTE_STABLECOINS.contains(&asset) {
            return Ok(1.0);
        }

        let url = format!(
            "{}/api/v3/ticker/price?symbol={}USDT",
            self.base_url, asset
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            warn!("No price for asset {}, defaulting to 0", asset);
            return Ok(0.0);
        }

        let ticker: TickerPrice = response.json().await?;
        Ok(ticker.price.parse().unwrap_or(0.0))
    }

    /// Synthesize one position per nonzero balance, pricing each asset at its
    /// current market price. The purchase price is approximated by the
    /// current price (no trade-history ingestion).
    pub async fn sync_positions(
        &self,
        credentials: &ExchangeCredentials,
    ) -> Result<Vec<ExchangePosition>, ExchangeError> {
        let balances = self.fetch_balances(credentials).await?;
        let mut positions = Vec::with_capacity(balances.len());

        for balance in balances {
            let quantity = balance.total();
            if quantity <= 0.0 {
                continue;
            }
            let current_price = self.asset_price(&balance.asset).await?;
            positions.push(ExchangePosition {
                symbol: balance.asset.clone(),
                asset: balance.asset,
                quantity,
                average_price: current_price,
                current_price,
                value: quantity * current_price,
            });
        }

        Ok(positions)
    }

    async fn signed_account_request(
        &self,
        credentials: &ExchangeCredentials,
    ) -> Result<reqwest::Response, ExchangeError> {
        let timestamp = Utc::now().timestamp_millis();
        let query = format!("timestamp={}", timestamp);
        let signature = Self::sign(&query, &credentials.api_secret)?;

        let url = format!(
            "{}/api/v3/account?{}&signature={}",
            self.host(credentials.testnet),
            query,
            signature
        );

        let response = self
            .client
            .get(&url)
            .header("X-MBX-APIKEY", &credentials.api_key)
            .send()
            .await?;
        Ok(response)
    }

    async fn map_upstream_error(response: reqwest::Response) -> ExchangeError {
        let status = response.status();
        match status.as_u16() {
            401 => ExchangeError::InvalidApiKey,
            403 => ExchangeError::AccessDenied,
            code => {
                let message = response
                    .json::<UpstreamError>()
                    .await
                    .ok()
                    .and_then(|e| e.msg)
                    .unwrap_or_else(|| {
                        format!("HTTP {}: {}", code, status.canonical_reason().unwrap_or(""))
                    });
                ExchangeError::Upstream {
                    status: code,
                    message,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_sha256_matches_rfc4231_vector() {
        // RFC 4231 test case 2
        let signature = ExchangeService::sign("what do ya want for nothing?", "Jefe").unwrap();
        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn stablecoins_price_at_one() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let service = ExchangeService::with_base_url("http://127.0.0.1:1");
        let price = rt.block_on(service.asset_price("USDT")).unwrap();
        assert_eq!(price, 1.0);
    }

    #[test]
    fn balance_total_sums_free_and_locked() {
        let balance = ExchangeBalance {
            asset: "BTC".into(),
            free: 0.5,
            locked: 0.25,
        };
        assert_eq!(balance.total(), 0.75);
    }
}
