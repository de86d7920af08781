//! HTTP probe tests.

use super::*;
use crate::test_support::request_uri;
use httptest::{matchers::*, responders::*, Expectation, Server};

fn create_test_prober() -> HttpProber {
    let client = crate::initialization::init_probe_client(5, None)
        .expect("Failed to create HTTP client");
    HttpProber::new(client, Duration::from_secs(5))
}

#[test]
fn test_round_millis_two_decimals() {
    assert_eq!(round_millis(Duration::from_micros(123_456)), 123.46);
    assert_eq!(round_millis(Duration::from_millis(5)), 5.0);
    assert_eq!(round_millis(Duration::ZERO), 0.0);
}

#[tokio::test]
async fn test_probe_success_reports_server_header() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/"))
            .respond_with(status_code(200).insert_header("Server", "nginx").body("ok")),
    );

    let url = server.url_str("/");
    let result = create_test_prober().probe(&url).await;
    match result {
        HttpProbeResult::Success {
            status_code,
            reason,
            latency_ms,
            redirect_count,
            final_url,
            server_header,
        } => {
            assert_eq!(status_code, 200);
            assert_eq!(reason, "OK");
            assert!(latency_ms >= 0.0);
            assert_eq!(redirect_count, 0);
            assert_eq!(final_url, url);
            assert_eq!(server_header, "nginx");
        }
        HttpProbeResult::Failure { error } => panic!("Expected success, got {error}"),
    }
}

#[tokio::test]
async fn test_probe_missing_server_header_is_unknown() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/"))
            .respond_with(status_code(404)),
    );

    let result = create_test_prober().probe(&server.url_str("/")).await;
    match result {
        HttpProbeResult::Success {
            status_code,
            reason,
            server_header,
            ..
        } => {
            // An error status is still a successful probe
            assert_eq!(status_code, 404);
            assert_eq!(reason, "Not Found");
            assert_eq!(server_header, "Unknown");
        }
        HttpProbeResult::Failure { error } => panic!("Expected success, got {error}"),
    }
}

#[tokio::test]
async fn test_probe_counts_redirects() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/old"))
            .respond_with(status_code(301).insert_header("Location", server.url_str("/middle"))),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/middle"))
            // Relative location, resolved against the current URL
            .respond_with(status_code(302).insert_header("Location", "/new")),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/new"))
            .respond_with(status_code(200).body("moved")),
    );

    let original = server.url_str("/old");
    let result = create_test_prober().probe(&original).await;
    match result {
        HttpProbeResult::Success {
            status_code,
            redirect_count,
            final_url,
            ..
        } => {
            assert_eq!(status_code, 200);
            assert_eq!(redirect_count, 2);
            assert_ne!(final_url, original);
            assert!(final_url.ends_with("/new"), "final url: {final_url}");
        }
        HttpProbeResult::Failure { error } => panic!("Expected success, got {error}"),
    }
}

#[tokio::test]
async fn test_probe_redirect_loop_fails() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/loop"))
            .times(1..)
            .respond_with(status_code(302).insert_header("Location", "/loop")),
    );

    let result = create_test_prober().probe(&server.url_str("/loop")).await;
    match result {
        HttpProbeResult::Failure { error } => {
            assert!(error.contains("Exceeded 10 redirects"), "error: {error}");
        }
        other => panic!("Expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_redirect_without_location_is_final() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/"))
            .respond_with(status_code(302)),
    );

    let result = create_test_prober().probe(&server.url_str("/")).await;
    assert!(matches!(
        result,
        HttpProbeResult::Success {
            status_code: 302,
            redirect_count: 0,
            ..
        }
    ));
}

#[tokio::test]
async fn test_probe_unreachable_host_fails() {
    // Nothing listens on port 1 of the loopback interface
    let result = create_test_prober().probe("http://127.0.0.1:1/").await;
    assert!(!result.is_success());
    match result {
        HttpProbeResult::Failure { error } => assert!(!error.is_empty()),
        other => panic!("Expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_invalid_url_fails() {
    let result = create_test_prober().probe("not a url").await;
    match result {
        HttpProbeResult::Failure { error } => assert!(error.starts_with("Invalid URL")),
        other => panic!("Expected failure, got {other:?}"),
    }
}

#[test]
fn test_result_serializes_with_outcome_tag() {
    let failure = HttpProbeResult::Failure {
        error: "boom".to_string(),
    };
    assert_eq!(
        serde_json::to_string(&failure).unwrap(),
        r#"{"outcome":"failure","error":"boom"}"#
    );
}

#[tokio::test]
async fn test_probe_routes_through_proxy() {
    // The httptest server plays the forward proxy; `origin.invalid` never resolves, so
    // every hop has to reach it as an absolute-form request carrying the credentials.
    let proxy = Server::run();
    proxy.expect(
        Expectation::matching(all_of![
            request::method("GET"),
            request_uri("http://origin.invalid/"),
            request::headers(contains(("proxy-authorization", "Basic dXNlcjpwYXNz"))),
        ])
        .respond_with(status_code(301).insert_header("Location", "/home")),
    );
    proxy.expect(
        Expectation::matching(all_of![
            request::method("GET"),
            request_uri("http://origin.invalid/home"),
            request::headers(contains(("proxy-authorization", "Basic dXNlcjpwYXNz"))),
        ])
        .respond_with(status_code(200).insert_header("Server", "origin-httpd")),
    );

    let proxy_url = format!("http://user:pass@{}", proxy.addr());
    let client = crate::initialization::init_probe_client(5, Some(&proxy_url))
        .expect("Failed to create proxied HTTP client");
    let result = HttpProber::new(client, Duration::from_secs(5))
        .probe("http://origin.invalid/")
        .await;

    match result {
        HttpProbeResult::Success {
            status_code,
            redirect_count,
            final_url,
            server_header,
            ..
        } => {
            assert_eq!(status_code, 200);
            assert_eq!(redirect_count, 1);
            assert_eq!(final_url, "http://origin.invalid/home");
            assert_eq!(server_header, "origin-httpd");
        }
        HttpProbeResult::Failure { error } => panic!("Expected success, got {error}"),
    }
}
