//! Balance Providers
//!
//! The seam to external per-chain balance sources (RPC nodes, indexers).
//! Providers are registered per chain; lookups for chains without a
//! provider degrade to a zero balance instead of failing.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::error::{AppError, Result};

// == Blockchain ==
/// Chains the balance layer knows how to key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blockchain {
    Bitcoin,
    Ethereum,
    Solana,
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Blockchain::Bitcoin => "bitcoin",
            Blockchain::Ethereum => "ethereum",
            Blockchain::Solana => "solana",
        };
        f.write_str(name)
    }
}

impl FromStr for Blockchain {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(Blockchain::Bitcoin),
            "ethereum" | "eth" => Ok(Blockchain::Ethereum),
            "solana" | "sol" => Ok(Blockchain::Solana),
            other => Err(AppError::InvalidRequest(format!(
                "Unsupported blockchain: {}",
                other
            ))),
        }
    }
}

// == Balance Provider ==
/// Per-chain balance source.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// Chain this provider serves.
    fn chain(&self) -> Blockchain;

    /// Current balance for an address in the given currency.
    async fn current_balance(&self, address: &str, currency: &str) -> Result<f64>;

    /// Point-in-time balance for an address in the given currency.
    async fn balance_at(&self, address: &str, currency: &str, at: DateTime<Utc>) -> Result<f64>;
}

/// Builds the default provider registry, one entry per supported chain.
pub fn default_providers() -> HashMap<Blockchain, Arc<dyn BalanceProvider>> {
    let mut providers: HashMap<Blockchain, Arc<dyn BalanceProvider>> = HashMap::new();
    for chain in [Blockchain::Bitcoin, Blockchain::Ethereum, Blockchain::Solana] {
        providers.insert(chain, Arc::new(DerivedBalanceProvider::new(chain)));
    }
    providers
}

// == Derived Balance Provider ==
/// Deterministic stand-in provider deriving balances from a hash of the
/// lookup inputs.
///
/// TODO: replace with JSON-RPC/indexer-backed providers once endpoint
/// credentials are provisioned per chain.
pub struct DerivedBalanceProvider {
    chain: Blockchain,
}

impl DerivedBalanceProvider {
    pub fn new(chain: Blockchain) -> Self {
        Self { chain }
    }

    fn derive(&self, address: &str, currency: &str, at: Option<DateTime<Utc>>) -> f64 {
        let mut hasher = Sha256::new();
        hasher.update(self.chain.to_string().as_bytes());
        hasher.update(address.as_bytes());
        hasher.update(currency.as_bytes());
        if let Some(at) = at {
            hasher.update(at.timestamp().to_be_bytes());
        }
        let digest = hasher.finalize();

        let raw = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
        (raw % 10_000_000) as f64 / 100.0
    }
}

#[async_trait]
impl BalanceProvider for DerivedBalanceProvider {
    fn chain(&self) -> Blockchain {
        self.chain
    }

    async fn current_balance(&self, address: &str, currency: &str) -> Result<f64> {
        if address.is_empty() {
            return Err(AppError::InvalidRequest("Empty address".to_string()));
        }
        Ok(self.derive(address, currency, None))
    }

    async fn balance_at(&self, address: &str, currency: &str, at: DateTime<Utc>) -> Result<f64> {
        if address.is_empty() {
            return Err(AppError::InvalidRequest("Empty address".to_string()));
        }
        Ok(self.derive(address, currency, Some(at)))
    }
}
