//! Invalidation Dispatcher
//!
//! After a mutation, every cache entry that could hold a stale view of the
//! mutated resource must go. The fan-out is a declarative table from
//! mutation type to key-namespace prefixes, so a new endpoint registers its
//! dependent caches in one place instead of sprinkling delete calls per
//! route.
//!
//! Invalidation is best-effort: failures are logged and never fail the
//! mutation response that triggered them.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::CacheBackend;

// == Mutation ==
/// Mutation sites that trigger cache invalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Create/update/delete of a business card
    BusinessCardWrite,
    /// Create/update/delete of a bank account
    BankAccountWrite,
    /// Create/update/delete of a calendar event
    CalendarEventWrite,
    /// A wallet was added, removed, or re-labelled
    WalletWrite {
        /// Address whose balance namespaces must drop
        address: String,
    },
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::BusinessCardWrite => write!(f, "business-card-write"),
            Mutation::BankAccountWrite => write!(f, "bank-account-write"),
            Mutation::CalendarEventWrite => write!(f, "calendar-event-write"),
            Mutation::WalletWrite { address } => write!(f, "wallet-write:{}", address),
        }
    }
}

impl Mutation {
    // == Fan-Out Table ==
    /// Key-namespace prefixes to drop for this mutation.
    ///
    /// Calendar events also feed the dashboard summary, so their writes
    /// invalidate both namespaces. Same for bank accounts and business
    /// cards, which the summary counts.
    pub fn fanout(&self) -> Vec<String> {
        match self {
            Mutation::BusinessCardWrite => vec![
                "business-cards:".to_string(),
                "dashboard:".to_string(),
            ],
            Mutation::BankAccountWrite => vec![
                "bank-accounts:".to_string(),
                "dashboard:".to_string(),
            ],
            Mutation::CalendarEventWrite => vec![
                "calendar:".to_string(),
                "dashboard:".to_string(),
            ],
            Mutation::WalletWrite { address } => vec![
                format!("balances:current:{{address=\"{}\"", address),
                format!("balances:history:{{address=\"{}\"", address),
            ],
        }
    }
}

// == Invalidation Dispatcher ==
/// Fires pattern deletes against the cache backend for a mutation.
#[derive(Clone)]
pub struct InvalidationDispatcher {
    backend: Arc<dyn CacheBackend>,
}

impl InvalidationDispatcher {
    /// Creates a dispatcher over the given backend.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    // == Dispatch ==
    /// Invalidates every namespace the mutation's fan-out names.
    ///
    /// Returns the number of entries removed. Backend failures are logged
    /// per prefix and swallowed; the mutation that triggered this has
    /// already committed and must not fail.
    pub async fn dispatch(&self, mutation: Mutation) -> usize {
        let mut removed = 0;

        for prefix in mutation.fanout() {
            match self.backend.delete_pattern(&prefix).await {
                Ok(count) => removed += count,
                Err(err) => {
                    warn!(%mutation, %prefix, %err, "cache invalidation failed");
                }
            }
        }

        if removed > 0 {
            info!(%mutation, removed, "cache invalidated");
        }
        removed
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, MemoryBackend};
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(3600);

    #[test]
    fn test_fanout_table() {
        assert_eq!(
            Mutation::BusinessCardWrite.fanout(),
            vec!["business-cards:", "dashboard:"]
        );
        assert_eq!(
            Mutation::CalendarEventWrite.fanout(),
            vec!["calendar:", "dashboard:"]
        );
    }

    #[test]
    fn test_wallet_fanout_matches_balance_keys() {
        let key = CacheKey::new("balances:current")
            .param("address", "0xabc")
            .param("chain", "ethereum")
            .param("currency", "EUR");
        let mutation = Mutation::WalletWrite {
            address: "0xabc".to_string(),
        };

        let prefixes = mutation.fanout();
        assert!(
            prefixes.iter().any(|p| key.render().starts_with(p.as_str())),
            "wallet fan-out must cover the balance key namespace"
        );
    }

    #[tokio::test]
    async fn test_dispatch_removes_namespace_regardless_of_ttl() {
        let backend = MemoryBackend::shared();
        let dispatcher = InvalidationDispatcher::new(backend.clone());

        backend
            .set("business-cards:list:{page=1}", "a".to_string(), TTL)
            .await
            .unwrap();
        backend
            .set("business-cards:list:{page=2}", "b".to_string(), TTL)
            .await
            .unwrap();
        backend
            .set("bank-accounts:list:{}", "c".to_string(), TTL)
            .await
            .unwrap();

        let removed = dispatcher.dispatch(Mutation::BusinessCardWrite).await;
        assert_eq!(removed, 2);

        assert_eq!(
            backend.get("business-cards:list:{page=1}").await.unwrap(),
            None
        );
        assert!(backend.get("bank-accounts:list:{}").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_calendar_write_invalidates_dashboard() {
        let backend = MemoryBackend::shared();
        let dispatcher = InvalidationDispatcher::new(backend.clone());

        backend
            .set("calendar:stats:{month=\"2026-08\"}", "s".to_string(), TTL)
            .await
            .unwrap();
        backend
            .set("dashboard:summary:{}", "d".to_string(), TTL)
            .await
            .unwrap();

        let removed = dispatcher.dispatch(Mutation::CalendarEventWrite).await;
        assert_eq!(removed, 2);
    }

    #[tokio::test]
    async fn test_dispatch_is_noop_on_empty_cache() {
        let backend = MemoryBackend::shared();
        let dispatcher = InvalidationDispatcher::new(backend);

        assert_eq!(dispatcher.dispatch(Mutation::BankAccountWrite).await, 0);
    }
}
