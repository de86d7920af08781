//! DNS module tests.

use super::records::{lookup_error_entry, render_rdata};
use super::*;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::error::{ProtoError, ProtoErrorKind};
use hickory_resolver::proto::rr::rdata::{A, MX, NS, TXT};
use hickory_resolver::proto::rr::{Name, RData};
use std::str::FromStr;
use std::time::Duration;

/// Creates a test DNS resolver with short timeouts for faster test execution.
fn create_test_resolver() -> TokioAsyncResolver {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(5);
    opts.attempts = 1; // Single attempt for faster failures in tests
    opts.ndots = 0;

    TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
}

/// A resolver with no nameservers at all: every query fails without touching the network.
fn create_unreachable_resolver() -> TokioAsyncResolver {
    let config = ResolverConfig::from_parts(None, vec![], NameServerConfigGroup::new());
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_millis(200);
    opts.attempts = 1;
    TokioAsyncResolver::tokio(config, opts)
}

#[test]
fn test_record_type_order_is_fixed() {
    let order: Vec<String> = DnsRecordType::iter().map(|t| t.to_string()).collect();
    assert_eq!(order, vec!["A", "AAAA", "MX", "NS", "TXT"]);
}

#[test]
fn test_record_set_fills_missing_types() {
    let set = DnsRecordSet::from_entries(vec![(
        DnsRecordType::Mx,
        vec!["10 mail.example.com.".to_string()],
    )]);
    assert_eq!(set.len(), 5);
    assert_eq!(set.get(DnsRecordType::Mx), ["10 mail.example.com."]);
    assert!(set.get(DnsRecordType::A).is_empty());
    let keys: Vec<DnsRecordType> = set.iter().map(|(t, _)| t).collect();
    assert_eq!(keys, DnsRecordType::iter().collect::<Vec<_>>());
}

#[test]
fn test_record_set_serializes_as_ordered_map() {
    let set = DnsRecordSet::from_entries(vec![(
        DnsRecordType::A,
        vec!["93.184.216.34".to_string()],
    )]);
    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(
        json,
        r#"{"A":["93.184.216.34"],"AAAA":[],"MX":[],"NS":[],"TXT":[]}"#
    );
}

#[test]
fn test_not_found_outcomes_are_empty() {
    let timeout = ResolveError::from(ResolveErrorKind::Timeout);
    assert_eq!(lookup_error_entry(&timeout), None);

    let no_connections = ResolveError::from(ResolveErrorKind::NoConnections);
    assert_eq!(lookup_error_entry(&no_connections), None);

    let proto_timeout = ResolveError::from(ProtoError::from(ProtoErrorKind::Timeout));
    assert_eq!(lookup_error_entry(&proto_timeout), None);

    let io_timeout = ResolveError::from(std::io::Error::new(
        std::io::ErrorKind::TimedOut,
        "timed out",
    ));
    assert_eq!(lookup_error_entry(&io_timeout), None);
}

#[test]
fn test_other_failures_become_error_entries() {
    let failure = ResolveError::from("resolver exploded");
    let entry = lookup_error_entry(&failure).expect("should be recorded as an error");
    assert!(entry.starts_with("Error: "));
    assert!(entry.contains("resolver exploded"));

    let refused = ResolveError::from(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "refused",
    ));
    assert!(lookup_error_entry(&refused).is_some());
}

#[test]
fn test_render_rdata() {
    let a = RData::A(A::new(93, 184, 216, 34));
    assert_eq!(render_rdata(&a).as_deref(), Some("93.184.216.34"));

    let mx = RData::MX(MX::new(10, Name::from_str("mail.example.com.").unwrap()));
    assert_eq!(render_rdata(&mx).as_deref(), Some("10 mail.example.com."));

    let ns = RData::NS(NS(Name::from_str("a.iana-servers.net.").unwrap()));
    assert_eq!(render_rdata(&ns).as_deref(), Some("a.iana-servers.net."));

    let txt = RData::TXT(TXT::new(vec![
        "v=spf1 ".to_string(),
        "-all".to_string(),
    ]));
    assert_eq!(render_rdata(&txt).as_deref(), Some("v=spf1 -all"));
}

#[tokio::test]
async fn test_resolve_records_always_has_every_type() {
    let resolver = create_unreachable_resolver();
    let records = resolve_records("example.com", &resolver).await;
    assert_eq!(records.len(), 5);
    for (record_type, values) in records.iter() {
        assert!(
            values.is_empty() || (values.len() == 1 && values[0].starts_with("Error: ")),
            "{record_type} should be empty or a single error entry, got {values:?}"
        );
    }
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_resolve_records_example_com() {
    let resolver = create_test_resolver();
    let records = resolve_records("example.com", &resolver).await;
    assert_eq!(records.len(), 5);
    assert!(!records.get(DnsRecordType::A).is_empty());
    assert!(!records.get(DnsRecordType::Ns).is_empty());
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_nxdomain_yields_empty_lists() {
    let resolver = create_test_resolver();
    let records = resolve_records("definitely-does-not-exist-12345.invalid", &resolver).await;
    for (record_type, values) in records.iter() {
        assert!(values.is_empty(), "{record_type} should be empty: {values:?}");
    }
}
