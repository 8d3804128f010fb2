//! Balances Module
//!
//! Blockchain wallet balance lookups behind the read-through cache, with
//! per-chain providers and batch prefetch.

mod provider;
mod service;

pub use provider::{default_providers, BalanceProvider, Blockchain, DerivedBalanceProvider};
pub use service::{BalanceLookup, BalanceResult, BalanceService};
