//! Balance Service
//!
//! Wraps per-chain balance providers with the read-through cache contract,
//! keyed by `(address, blockchain, currency)`. Current balances use the
//! short TTL; historical (point-in-time) balances use the long one, since
//! the past does not change.
//!
//! Failure semantics: provider errors and unsupported chains never throw.
//! A failed lookup yields amount `0` with the `failed` flag set, and the
//! prefetch batch isolates each lookup so one failure cannot cancel its
//! siblings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::balances::{BalanceProvider, Blockchain};
use crate::cache::{CacheKey, ReadThroughCache};

// == Balance Lookup ==
/// One balance request: which address, on which chain, in which currency,
/// optionally at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceLookup {
    pub address: String,
    pub chain: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
}

// == Balance Result ==
/// Outcome of a lookup. `failed` marks provider errors and unsupported
/// chains, both of which report a zero amount instead of erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResult {
    pub address: String,
    pub chain: String,
    pub currency: String,
    pub amount: f64,
    pub failed: bool,
    #[serde(rename = "_cached")]
    pub cached: bool,
}

impl BalanceResult {
    fn zero(lookup: &BalanceLookup) -> Self {
        Self {
            address: lookup.address.clone(),
            chain: lookup.chain.clone(),
            currency: lookup.currency.clone(),
            amount: 0.0,
            failed: true,
            cached: false,
        }
    }
}

// == Balance Service ==
/// Cached balance lookups over the provider registry.
#[derive(Clone)]
pub struct BalanceService {
    providers: Arc<HashMap<Blockchain, Arc<dyn BalanceProvider>>>,
    cache: ReadThroughCache,
    ttl_current: Duration,
    ttl_historical: Duration,
}

impl BalanceService {
    /// Creates a service over the given providers and cache accessor.
    pub fn new(
        providers: HashMap<Blockchain, Arc<dyn BalanceProvider>>,
        cache: ReadThroughCache,
        ttl_current: Duration,
        ttl_historical: Duration,
    ) -> Self {
        Self {
            providers: Arc::new(providers),
            cache,
            ttl_current,
            ttl_historical,
        }
    }

    /// Cache key for a lookup. Historical lookups live in their own
    /// namespace with the timestamp as a parameter, so current-balance
    /// invalidation patterns can still match both via the address.
    fn key_for(lookup: &BalanceLookup, chain: Blockchain) -> CacheKey {
        let namespace = if lookup.at.is_some() {
            "balances:history"
        } else {
            "balances:current"
        };
        CacheKey::new(namespace)
            .param("address", lookup.address.as_str())
            .param("chain", chain.to_string())
            .param("currency", lookup.currency.as_str())
            .opt_param("at", lookup.at.map(|at| at.timestamp()))
    }

    // == Balance ==
    /// Resolves one lookup through the cache.
    ///
    /// Unsupported chains and provider failures return a zero,
    /// `failed`-flagged result; the only path that caches is a successful
    /// provider response.
    pub async fn balance(&self, lookup: &BalanceLookup) -> BalanceResult {
        let chain: Blockchain = match lookup.chain.parse() {
            Ok(chain) => chain,
            Err(_) => {
                warn!(chain = %lookup.chain, "balance lookup for unsupported chain");
                return BalanceResult::zero(lookup);
            }
        };

        let provider = match self.providers.get(&chain) {
            Some(provider) => Arc::clone(provider),
            None => {
                warn!(%chain, "no balance provider registered");
                return BalanceResult::zero(lookup);
            }
        };

        let key = Self::key_for(lookup, chain);
        let ttl = if lookup.at.is_some() {
            self.ttl_historical
        } else {
            self.ttl_current
        };

        let address = lookup.address.clone();
        let currency = lookup.currency.clone();
        let at = lookup.at;
        let fetched = self
            .cache
            .get_or_fetch(&key, ttl, || async move {
                match at {
                    Some(at) => provider.balance_at(&address, &currency, at).await,
                    None => provider.current_balance(&address, &currency).await,
                }
            })
            .await;

        match fetched {
            Ok(cached) => BalanceResult {
                address: lookup.address.clone(),
                chain: chain.to_string(),
                currency: lookup.currency.clone(),
                amount: cached.value,
                failed: false,
                cached: cached.hit,
            },
            Err(err) => {
                warn!(%chain, address = %lookup.address, %err, "balance provider failed");
                BalanceResult::zero(lookup)
            }
        }
    }

    // == Prefetch ==
    /// Warms the cache for a batch of lookups concurrently. Each lookup is
    /// isolated; failures come back as zero results in position.
    pub async fn prefetch(&self, lookups: &[BalanceLookup]) -> Vec<BalanceResult> {
        join_all(lookups.iter().map(|lookup| self.balance(lookup))).await
    }
}
