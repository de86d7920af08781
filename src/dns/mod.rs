//! DNS record resolution.
//!
//! This module queries a fixed set of record types (A, AAAA, MX, NS, TXT) for a host
//! using `hickory-resolver`. Every record type always ends up in the result:
//! - an empty list when the name has no such records (or does not exist, or the query
//!   timed out, or no nameserver is reachable)
//! - a single `"Error: ..."` entry for any other resolver failure
//!
//! Queries for different types are independent and run concurrently.

mod records;

use std::collections::BTreeMap;

use futures::future::join_all;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioAsyncResolver;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

pub use records::lookup_records;

/// Record types queried for every target, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Mail exchanger
    Mx,
    /// Nameserver
    Ns,
    /// Free-form text
    Txt,
}

impl DnsRecordType {
    /// The wire record type queried for this tag.
    pub fn record_type(self) -> RecordType {
        match self {
            DnsRecordType::A => RecordType::A,
            DnsRecordType::Aaaa => RecordType::AAAA,
            DnsRecordType::Mx => RecordType::MX,
            DnsRecordType::Ns => RecordType::NS,
            DnsRecordType::Txt => RecordType::TXT,
        }
    }
}

/// Records found per type.
///
/// Always holds exactly one entry per `DnsRecordType`; iteration follows the
/// A, AAAA, MX, NS, TXT order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DnsRecordSet {
    records: BTreeMap<DnsRecordType, Vec<String>>,
}

impl DnsRecordSet {
    /// Builds a set from per-type results, filling any missing type with an empty list.
    pub fn from_entries(entries: impl IntoIterator<Item = (DnsRecordType, Vec<String>)>) -> Self {
        let mut records: BTreeMap<DnsRecordType, Vec<String>> =
            DnsRecordType::iter().map(|t| (t, Vec::new())).collect();
        records.extend(entries);
        Self { records }
    }

    /// Values for one record type.
    pub fn get(&self, record_type: DnsRecordType) -> &[String] {
        self.records
            .get(&record_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over all record types in display order.
    pub fn iter(&self) -> impl Iterator<Item = (DnsRecordType, &[String])> {
        self.records.iter().map(|(t, v)| (*t, v.as_slice()))
    }

    /// Number of record types held (always five).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Resolves every record type for `host`.
///
/// Never fails: resolver errors are recorded inline, see the module documentation.
pub async fn resolve_records(host: &str, resolver: &TokioAsyncResolver) -> DnsRecordSet {
    log::debug!("Resolving DNS records for {host}");
    let lookups = DnsRecordType::iter().map(|record_type| async move {
        let values = lookup_records(host, record_type, resolver).await;
        (record_type, values)
    });
    let records = DnsRecordSet::from_entries(join_all(lookups).await);
    log::info!(
        "DNS resolution finished for {host}: {}",
        records
            .iter()
            .map(|(t, v)| format!("{t}={}", v.len()))
            .collect::<Vec<_>>()
            .join(" ")
    );
    records
}

#[cfg(test)]
mod tests;
