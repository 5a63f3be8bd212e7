//! Consent table: expiry, status, and ordering.
//!
//! Status priority is Revoked > Expired > Active: a revoked record reads
//! "Revoked" even after its retention window has passed.

use std::cmp::Reverse;
use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::api::types::ConsentRecord;
use crate::utils::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentStatus {
    Active,
    Expired,
    Revoked,
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Expired => write!(f, "Expired"),
            Self::Revoked => write!(f, "Revoked"),
        }
    }
}

/// `consent_date + retention_days`.
pub fn expiry_date(consent_date: DateTime<Utc>, retention_days: i64) -> DateTime<Utc> {
    Duration::try_days(retention_days)
        .and_then(|retention| consent_date.checked_add_signed(retention))
        .unwrap_or(if retention_days < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

/// Revocation is checked before expiry.
pub fn derive_status(revoked: bool, expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ConsentStatus {
    if revoked {
        return ConsentStatus::Revoked;
    }
    match expiry {
        Some(expiry) if expiry < now => ConsentStatus::Expired,
        _ => ConsentStatus::Active,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsentRow {
    pub user_id: String,
    /// `None` when the backend date could not be parsed.
    pub consent_date: Option<DateTime<Utc>>,
    pub raw_consent_date: String,
    pub purpose: String,
    pub retention_period: i64,
    pub revoked: bool,
    pub expired: bool,
    pub expiry: Option<DateTime<Utc>>,
    pub status: ConsentStatus,
}

impl ConsentRow {
    /// `offset` is the wall clock the backend's naive dates are in.
    pub fn from_record(record: &ConsentRecord, now: DateTime<Utc>, offset: &FixedOffset) -> Self {
        let consent_date = time::parse_timestamp(&record.consent_date, offset);
        let expiry = consent_date.map(|date| expiry_date(date, record.retention_period));
        let expired = expiry.is_some_and(|expiry| expiry < now);
        Self {
            user_id: record.user_id.clone(),
            consent_date,
            raw_consent_date: record.consent_date.clone(),
            purpose: record.purpose.clone(),
            retention_period: record.retention_period,
            revoked: record.revoked,
            expired,
            expiry,
            status: derive_status(record.revoked, expiry, now),
        }
    }

    /// CSS classes for the table row; `revoked` and `expired` are
    /// independent of the status label.
    pub fn css_classes(&self) -> String {
        let mut classes = Vec::new();
        if self.revoked {
            classes.push("revoked");
        }
        if self.expired {
            classes.push("expired");
        }
        classes.join(" ")
    }
}

/// Everything the consent region shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsentTable {
    pub total: usize,
    /// Records not revoked, whatever their expiry.
    pub active: usize,
    /// Newest consent first; unparseable dates last, in input order.
    pub rows: Vec<ConsentRow>,
}

impl ConsentTable {
    /// Build the table without touching `records`.
    pub fn build(records: &[ConsentRecord], now: DateTime<Utc>, offset: &FixedOffset) -> Self {
        let mut rows: Vec<ConsentRow> = records
            .iter()
            .map(|record| ConsentRow::from_record(record, now, offset))
            .collect();
        // Option orders None first; reversing puts newest first, None last.
        rows.sort_by_key(|row| Reverse(row.consent_date));

        Self {
            total: records.len(),
            active: records.iter().filter(|r| !r.revoked).count(),
            rows,
        }
    }
}
