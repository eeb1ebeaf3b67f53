//! Credential extraction from request headers.
//!
//! HTTP requests carry the token in the `Authorization` header. Browser
//! WebSocket clients cannot set arbitrary headers, so they smuggle the
//! token through the `Sec-WebSocket-Protocol` list as a pseudo-protocol
//! entry prefixed with [`WS_AUTH_PROTOCOL_PREFIX`].

use http::HeaderMap;
use http::header::{AUTHORIZATION, SEC_WEBSOCKET_PROTOCOL, UPGRADE};

/// Prefix marking the token-bearing WebSocket subprotocol entry.
pub const WS_AUTH_PROTOCOL_PREFIX: &str = "Authorization.Bearer.";

/// Extract a bearer token from the `Authorization` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
}

/// Extract a token from the WebSocket subprotocol list.
#[must_use]
pub fn websocket_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SEC_WEBSOCKET_PROTOCOL)
        .and_then(|v| v.to_str().ok())
        .and_then(|list| {
            list.split(',')
                .map(str::trim)
                .find_map(|entry| entry.strip_prefix(WS_AUTH_PROTOCOL_PREFIX))
        })
        .filter(|token| !token.is_empty())
}

/// True when the request asks to upgrade to a WebSocket.
#[must_use]
pub fn is_websocket_upgrade(headers: &HeaderMap) -> bool {
    headers
        .get(UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
}

/// Extract the request credential from the header its transport uses:
/// the subprotocol list for WebSocket upgrades, the `Authorization`
/// header for everything else. Each transport accepts only its own
/// header.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    if is_websocket_upgrade(headers) {
        websocket_token(headers)
    } else {
        bearer_token(headers)
    }
}
