//! HTTP redirect chain resolution.
//!
//! Redirects are followed manually (the client has them disabled) so the probe can count
//! the hops and report where the chain ends.

use reqwest::{StatusCode, Url};

use crate::error_handling::HttpTransportError;

/// The last response of a redirect chain.
#[derive(Debug)]
pub(crate) struct FinalResponse {
    pub status: StatusCode,
    pub final_url: String,
    pub redirect_count: usize,
    pub server: Option<String>,
}

/// Requests `start_url` and follows redirects up to `max_hops`.
///
/// The body of the final response is read to completion so the caller's timing covers
/// the whole exchange.
///
/// # Errors
///
/// Returns an error if a request fails, a `Location` header cannot be resolved, or the
/// chain is longer than `max_hops`.
pub(crate) async fn follow_redirects(
    client: &reqwest::Client,
    start_url: &str,
    max_hops: usize,
) -> Result<FinalResponse, HttpTransportError> {
    let mut current = Url::parse(start_url).map_err(|source| HttpTransportError::InvalidLocation {
        location: start_url.to_string(),
        source,
    })?;
    let mut redirect_count = 0;

    loop {
        let resp = client.get(current.clone()).send().await?;
        let status = resp.status();

        if is_followed_redirect(status) {
            if let Some(loc) = resp.headers().get(reqwest::header::LOCATION) {
                if redirect_count == max_hops {
                    return Err(HttpTransportError::TooManyRedirects(max_hops));
                }
                let loc = String::from_utf8_lossy(loc.as_bytes()).into_owned();
                // join() handles both absolute and relative locations
                current = current.join(&loc).map_err(|source| {
                    HttpTransportError::InvalidLocation {
                        location: loc.clone(),
                        source,
                    }
                })?;
                redirect_count += 1;
                log::debug!("Redirect {redirect_count} ({status}) to {current}");
                continue;
            }
            // Redirect status but no Location header - report it as the final response
            log::warn!("Redirect status {status} for {current} but no Location header");
        }

        let server = resp
            .headers()
            .get(reqwest::header::SERVER)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        let final_url = resp.url().to_string();
        resp.bytes().await?;

        return Ok(FinalResponse {
            status,
            final_url,
            redirect_count,
            server,
        });
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}
