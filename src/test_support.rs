//! Helpers shared by unit tests.

use std::fmt;

use httptest::http::Request;
use httptest::matchers::{ExecutionContext, Matcher};

/// Matches a request whose request-target is exactly `uri`.
///
/// A forward proxy receives absolute-form targets (`GET http://host/path`), so this
/// tells a proxied request apart from one sent straight to the server.
pub(crate) fn request_uri(uri: &'static str) -> RequestUri {
    RequestUri(uri)
}

pub(crate) struct RequestUri(&'static str);

impl<B> Matcher<Request<B>> for RequestUri {
    fn matches(&mut self, input: &Request<B>, _ctx: &mut ExecutionContext) -> bool {
        input.uri().to_string() == self.0
    }

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RequestUri({:?})", self.0)
    }
}
