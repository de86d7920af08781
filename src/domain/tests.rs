use super::*;

#[test]
fn test_parse_adds_https() {
    let target = NormalizedTarget::parse("example.com").unwrap();
    assert_eq!(target.origin_url(), "https://example.com");
    assert_eq!(target.host(), "example.com");
}

#[test]
fn test_parse_preserves_existing_scheme() {
    let target = NormalizedTarget::parse("http://example.com/index.html").unwrap();
    assert_eq!(target.origin_url(), "http://example.com/index.html");
    assert_eq!(target.host(), "example.com");
}

#[test]
fn test_parse_uppercase_scheme() {
    let target = NormalizedTarget::parse("HTTPS://example.com").unwrap();
    assert_eq!(target.origin_url(), "HTTPS://example.com");
    assert_eq!(target.host(), "example.com");
}

#[test]
fn test_host_is_text_between_scheme_and_first_slash() {
    for raw in [
        "example.com",
        "www.example.org/path/to/page",
        "sub.domain.example.net/?q=1",
        "expired.badssl.com",
    ] {
        let target = NormalizedTarget::parse(raw).unwrap();
        assert!(target.origin_url().starts_with("https://"));
        let after_scheme = target.origin_url().split_once("://").unwrap().1;
        let expected_host = after_scheme.split('/').next().unwrap();
        assert_eq!(target.host(), expected_host, "input: {raw}");
    }
}

#[test]
fn test_host_drops_port() {
    let target = NormalizedTarget::parse("example.com:8443/health").unwrap();
    assert_eq!(target.origin_url(), "https://example.com:8443/health");
    assert_eq!(target.host(), "example.com");
}

#[test]
fn test_parse_trims_whitespace() {
    let target = NormalizedTarget::parse("  example.com \n").unwrap();
    assert_eq!(target.origin_url(), "https://example.com");
}

#[test]
fn test_parse_ip_literal() {
    let target = NormalizedTarget::parse("https://93.184.216.34").unwrap();
    assert_eq!(target.host(), "93.184.216.34");
}

#[test]
fn test_parse_empty_is_invalid() {
    assert_eq!(NormalizedTarget::parse(""), Err(InvalidTarget::Empty));
    assert_eq!(NormalizedTarget::parse("   "), Err(InvalidTarget::Empty));
}

#[test]
fn test_parse_scheme_without_host_is_invalid() {
    assert!(matches!(
        NormalizedTarget::parse("https://"),
        Err(InvalidTarget::Unparseable { .. })
    ));
    assert!(NormalizedTarget::parse("http://?query").is_err());
}

#[test]
fn test_parse_rejects_other_schemes() {
    assert_eq!(
        NormalizedTarget::parse("ftp://example.com"),
        Err(InvalidTarget::UnsupportedScheme("ftp".to_string()))
    );
    assert_eq!(
        NormalizedTarget::parse("svn+ssh://example.com"),
        Err(InvalidTarget::UnsupportedScheme("svn+ssh".to_string()))
    );
}

#[test]
fn test_parse_url_in_query_is_not_a_scheme() {
    let target = NormalizedTarget::parse("example.com/login?next=https://example.com/home")
        .expect("Scheme-less target with a URL in its query should parse");
    assert_eq!(
        target.origin_url(),
        "https://example.com/login?next=https://example.com/home"
    );
    assert_eq!(target.host(), "example.com");

    let target = NormalizedTarget::parse("example.com:8443/r#ftp://mirror").unwrap();
    assert_eq!(target.host(), "example.com");
}

#[test]
fn test_parse_rejects_overlong_input() {
    let raw = format!("{}.com", "a".repeat(MAX_URL_LENGTH));
    assert!(matches!(
        NormalizedTarget::parse(&raw),
        Err(InvalidTarget::TooLong { .. })
    ));
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(NormalizedTarget::parse("exa mple.com").is_err());
}
