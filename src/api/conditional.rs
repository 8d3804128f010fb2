//! Conditional Response / ETag Layer
//!
//! Stateless helpers over the response payload: content hashing for
//! `ETag`, `If-None-Match` comparison with a `304` short-circuit, and
//! `Cache-Control` headers whose numeric directives differ between the
//! cache-hit and freshly-computed paths.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};

// == ETag ==
/// Computes a strong ETag over the serialized payload: SHA-256, hex,
/// quoted. Identical bytes produce identical tags.
pub fn etag_for(body: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(body)))
}

/// Extracts the `If-None-Match` header value, if any.
pub fn if_none_match(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
}

/// Compares a client-supplied `If-None-Match` value (possibly a list, or
/// `*`) against a computed ETag.
fn etag_matches(client_value: &str, etag: &str) -> bool {
    client_value
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate == etag)
}

// == Cache Policy ==
/// Numeric `Cache-Control` directives. Hits advertise longer lifetimes
/// than fresh computations since a hit proves the payload is already
/// stable across requests.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// Browser `max-age`, seconds
    pub max_age: u32,
    /// CDN `s-maxage`, seconds
    pub s_maxage: u32,
    /// `stale-while-revalidate` window, seconds
    pub stale_while_revalidate: u32,
}

impl CachePolicy {
    /// Policy for responses served from the cache.
    pub fn for_hit() -> Self {
        Self {
            max_age: 300,
            s_maxage: 900,
            stale_while_revalidate: 600,
        }
    }

    /// Policy for freshly computed responses.
    pub fn for_miss() -> Self {
        Self {
            max_age: 60,
            s_maxage: 300,
            stale_while_revalidate: 600,
        }
    }

    /// Picks the policy for a read-through outcome.
    pub fn for_outcome(hit: bool) -> Self {
        if hit {
            Self::for_hit()
        } else {
            Self::for_miss()
        }
    }

    fn header_value(&self) -> String {
        format!(
            "public, max-age={}, s-maxage={}, stale-while-revalidate={}",
            self.max_age, self.s_maxage, self.stale_while_revalidate
        )
    }
}

// == Conditional Response ==
/// Builds the response for a JSON payload: `304` with an empty body when
/// the client's ETag still matches, otherwise `200` with the payload and
/// cache headers.
pub fn conditional_response(
    body: Vec<u8>,
    client_etag: Option<&str>,
    policy: &CachePolicy,
) -> Response {
    let etag = etag_for(&body);
    let cache_control = policy.header_value();

    if let Some(client_value) = client_etag {
        if etag_matches(client_value, &etag) {
            return (
                StatusCode::NOT_MODIFIED,
                [
                    (header::ETAG, etag),
                    (header::CACHE_CONTROL, cache_control),
                ],
            )
                .into_response();
        }
    }

    (
        StatusCode::OK,
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, cache_control),
            (header::CONTENT_TYPE, "application/json".to_string()),
        ],
        body,
    )
        .into_response()
}
