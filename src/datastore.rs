//! Source-of-Truth Data Store
//!
//! In-process, multi-tenant stand-in for the relational database behind the
//! cached endpoints: business cards, bank accounts, and calendar events,
//! all scoped by company. The caching layer treats this module as the
//! authoritative query layer; a query counter is exposed so tests can
//! assert that cache hits do not touch it.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{AppError, Result};

// == Records ==

/// A business card belonging to a company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusinessCard {
    pub id: u64,
    pub company_id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A bank account belonging to a company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankAccount {
    pub id: u64,
    pub company_id: u64,
    pub name: String,
    pub iban: String,
}

/// A calendar event belonging to a company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub id: u64,
    pub company_id: u64,
    pub title: String,
    pub starts_at: DateTime<Utc>,
}

/// Monthly calendar aggregate served by the statistics endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarStats {
    pub company_id: u64,
    pub month: String,
    pub event_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busiest_day: Option<u32>,
}

/// Cross-cutting counts for the dashboard summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<u64>,
    pub card_count: usize,
    pub account_count: usize,
    pub upcoming_event_count: usize,
}

// == Data Store ==
/// Authoritative store for all cached resources.
#[derive(Debug, Default)]
pub struct DataStore {
    cards: RwLock<Vec<BusinessCard>>,
    accounts: RwLock<Vec<BankAccount>>,
    events: RwLock<Vec<CalendarEvent>>,
    next_id: AtomicU64,
    queries: AtomicU64,
}

impl DataStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Default::default()
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of read queries served so far. Cache hits must not move this.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::SeqCst)
    }

    // == Business Cards ==

    /// Lists business cards, optionally filtered by company, with
    /// page/limit pagination (pages are 1-based). Returns the page plus
    /// the total matching count.
    pub async fn list_cards(
        &self,
        company_id: Option<u64>,
        page: usize,
        limit: usize,
    ) -> (Vec<BusinessCard>, usize) {
        self.record_query();
        let cards = self.cards.read().await;

        let matching: Vec<&BusinessCard> = cards
            .iter()
            .filter(|c| company_id.map_or(true, |id| c.company_id == id))
            .collect();
        let total = matching.len();

        let items = matching
            .into_iter()
            .skip(page.saturating_sub(1) * limit)
            .take(limit)
            .cloned()
            .collect();
        (items, total)
    }

    /// Inserts a business card and returns it with its assigned id.
    pub async fn insert_card(
        &self,
        company_id: u64,
        name: String,
        email: Option<String>,
        phone: Option<String>,
    ) -> BusinessCard {
        let card = BusinessCard {
            id: self.allocate_id(),
            company_id,
            name,
            email,
            phone,
        };
        self.cards.write().await.push(card.clone());
        card
    }

    /// Updates a business card's contact fields.
    pub async fn update_card(
        &self,
        id: u64,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<BusinessCard> {
        let mut cards = self.cards.write().await;
        let card = cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("business card {}", id)))?;

        if let Some(name) = name {
            card.name = name;
        }
        if email.is_some() {
            card.email = email;
        }
        if phone.is_some() {
            card.phone = phone;
        }
        Ok(card.clone())
    }

    /// Deletes a business card by id.
    pub async fn delete_card(&self, id: u64) -> Result<()> {
        let mut cards = self.cards.write().await;
        let before = cards.len();
        cards.retain(|c| c.id != id);
        if cards.len() == before {
            return Err(AppError::NotFound(format!("business card {}", id)));
        }
        Ok(())
    }

    // == Bank Accounts ==

    /// Lists bank accounts, optionally filtered by company.
    pub async fn list_accounts(&self, company_id: Option<u64>) -> Vec<BankAccount> {
        self.record_query();
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .filter(|a| company_id.map_or(true, |id| a.company_id == id))
            .cloned()
            .collect()
    }

    /// Inserts a bank account and returns it with its assigned id.
    pub async fn insert_account(
        &self,
        company_id: u64,
        name: String,
        iban: String,
    ) -> BankAccount {
        let account = BankAccount {
            id: self.allocate_id(),
            company_id,
            name,
            iban,
        };
        self.accounts.write().await.push(account.clone());
        account
    }

    // == Calendar ==

    /// Inserts a calendar event and returns it with its assigned id.
    pub async fn insert_event(
        &self,
        company_id: u64,
        title: String,
        starts_at: DateTime<Utc>,
    ) -> CalendarEvent {
        let event = CalendarEvent {
            id: self.allocate_id(),
            company_id,
            title,
            starts_at,
        };
        self.events.write().await.push(event.clone());
        event
    }

    /// Aggregates events for a company in a `YYYY-MM` month: total count and
    /// the day of month with the most events.
    pub async fn calendar_stats(&self, company_id: u64, month: &str) -> Result<CalendarStats> {
        let (year, month_num) = parse_month(month)?;
        self.record_query();

        let events = self.events.read().await;
        let mut per_day = std::collections::HashMap::new();
        let mut event_count = 0;

        for event in events.iter().filter(|e| {
            e.company_id == company_id
                && e.starts_at.year() == year
                && e.starts_at.month() == month_num
        }) {
            event_count += 1;
            *per_day.entry(event.starts_at.day()).or_insert(0usize) += 1;
        }

        let busiest_day = per_day
            .into_iter()
            .max_by_key(|(day, count)| (*count, std::cmp::Reverse(*day)))
            .map(|(day, _)| day);

        Ok(CalendarStats {
            company_id,
            month: month.to_string(),
            event_count,
            busiest_day,
        })
    }

    // == Dashboard ==

    /// Cross-cutting counts over all resources, optionally per company.
    pub async fn dashboard_summary(&self, company_id: Option<u64>) -> DashboardSummary {
        self.record_query();
        let now = Utc::now();

        let card_count = self
            .cards
            .read()
            .await
            .iter()
            .filter(|c| company_id.map_or(true, |id| c.company_id == id))
            .count();
        let account_count = self
            .accounts
            .read()
            .await
            .iter()
            .filter(|a| company_id.map_or(true, |id| a.company_id == id))
            .count();
        let upcoming_event_count = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.starts_at >= now && company_id.map_or(true, |id| e.company_id == id))
            .count();

        DashboardSummary {
            company_id,
            card_count,
            account_count,
            upcoming_event_count,
        }
    }
}

/// Parses a `YYYY-MM` month string.
fn parse_month(month: &str) -> Result<(i32, u32)> {
    let invalid = || AppError::InvalidRequest(format!("Invalid month '{}', expected YYYY-MM", month));

    let (year, month_num) = month.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month_num: u32 = month_num.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month_num) {
        return Err(invalid());
    }
    Ok((year, month_num))
}
