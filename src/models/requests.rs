//! Request DTOs for the caching service API
//!
//! Defines the structure of incoming query strings and request bodies.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::balances::BalanceLookup;

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

/// Query string for list endpoints (`page`, `limit`, optional company scope).
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default, rename = "companyId")]
    pub company_id: Option<u64>,
}

impl ListQuery {
    /// Validates pagination bounds.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.page == 0 {
            return Some("page must be at least 1".to_string());
        }
        if self.limit == 0 || self.limit > 100 {
            return Some("limit must be between 1 and 100".to_string());
        }
        None
    }
}

/// Query string for company-scoped endpoints without pagination.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyQuery {
    #[serde(default, rename = "companyId")]
    pub company_id: Option<u64>,
}

/// Request body for creating a business card (POST /business-cards).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCardRequest {
    #[serde(rename = "companyId")]
    pub company_id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CreateCardRequest {
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("name cannot be empty".to_string());
        }
        None
    }
}

/// Request body for updating a business card (PUT /business-cards/:id).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCardRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Request body for creating a bank account (POST /bank-accounts).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(rename = "companyId")]
    pub company_id: u64,
    pub name: String,
    pub iban: String,
}

/// Query string for calendar statistics (GET /calendar/stats).
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarStatsQuery {
    #[serde(rename = "companyId")]
    pub company_id: u64,
    /// Month in `YYYY-MM` form
    pub month: String,
}

/// Request body for creating a calendar event (POST /calendar/events).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    #[serde(rename = "companyId")]
    pub company_id: u64,
    pub title: String,
    #[serde(rename = "startsAt")]
    pub starts_at: DateTime<Utc>,
}

/// Query string for a single balance lookup (GET /balances/:chain/:address).
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceQuery {
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Point-in-time lookup; absent means current balance
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Request body for batch balance prefetch (POST /balances/prefetch).
#[derive(Debug, Clone, Deserialize)]
pub struct PrefetchRequest {
    pub lookups: Vec<BalanceLookup>,
}
