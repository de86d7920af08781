//! Single record-type queries and their outcome policy.

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::error::ProtoErrorKind;
use hickory_resolver::proto::rr::RData;
use hickory_resolver::TokioAsyncResolver;

use super::DnsRecordType;
use crate::config::DNS_QUERY_LIFETIME;

/// Queries one record type for a host.
///
/// # Returns
///
/// The rendered record values. "Nothing there" outcomes (no records, NXDOMAIN, no
/// reachable nameserver, timeout) give an empty vector; any other failure gives a
/// single `"Error: <message>"` entry so it can be displayed like data.
pub async fn lookup_records(
    host: &str,
    record_type: DnsRecordType,
    resolver: &TokioAsyncResolver,
) -> Vec<String> {
    let lookup = tokio::time::timeout(
        DNS_QUERY_LIFETIME,
        resolver.lookup(host, record_type.record_type()),
    )
    .await;

    match lookup {
        Ok(Ok(lookup)) => lookup.iter().filter_map(render_rdata).collect(),
        Ok(Err(e)) => match lookup_error_entry(&e) {
            None => {
                log::debug!("No {record_type} records for {host}: {e}");
                Vec::new()
            }
            Some(entry) => {
                log::warn!("Failed to lookup {record_type} records for {host}: {e}");
                vec![entry]
            }
        },
        Err(_) => {
            log::debug!(
                "{record_type} lookup for {host} exceeded {}s",
                DNS_QUERY_LIFETIME.as_secs()
            );
            Vec::new()
        }
    }
}

/// Maps a resolver error to the inline entry recorded for it.
///
/// `None` means the failure is a normal "no data" outcome.
pub(crate) fn lookup_error_entry(error: &ResolveError) -> Option<String> {
    let no_data = match error.kind() {
        ResolveErrorKind::NoRecordsFound { .. }
        | ResolveErrorKind::NoConnections
        | ResolveErrorKind::Timeout => true,
        ResolveErrorKind::Proto(proto) => matches!(proto.kind(), ProtoErrorKind::Timeout),
        ResolveErrorKind::Io(io) => io.kind() == std::io::ErrorKind::TimedOut,
        _ => false,
    };
    if no_data {
        None
    } else {
        Some(format!("Error: {error}"))
    }
}

/// Renders a record the way `dig +short` would, minus TXT quoting.
pub(crate) fn render_rdata(rdata: &RData) -> Option<String> {
    match rdata {
        RData::A(a) => Some(a.to_string()),
        RData::AAAA(aaaa) => Some(aaaa.to_string()),
        RData::MX(mx) => Some(format!("{} {}", mx.preference(), mx.exchange().to_utf8())),
        RData::NS(ns) => Some(ns.to_utf8()),
        // TXT records can contain multiple strings - join them
        RData::TXT(txt) => Some(
            txt.iter()
                .map(|bytes| String::from_utf8_lossy(bytes).to_string())
                .collect::<Vec<String>>()
                .join(""),
        ),
        // CNAMEs in the answer chain are followed by the resolver, not reported
        _ => None,
    }
}
