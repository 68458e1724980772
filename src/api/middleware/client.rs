//! Client address extraction

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};

use crate::api::state::AppState;

/// Address used to throttle anonymous callers
///
/// The connection peer, else `unknown`. The first `X-Forwarded-For` entry
/// replaces the peer only when the server is configured to trust it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl ClientAddr {
    pub fn from_parts(parts: &Parts, trust_forwarded_for: bool) -> Self {
        if trust_forwarded_for {
            let forwarded = parts
                .headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());

            if let Some(addr) = forwarded {
                return ClientAddr(addr.to_string());
            }
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        ClientAddr(peer.unwrap_or_else(|| "unknown".to_string()))
    }
}

impl FromRequestParts<AppState> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, state.trust_forwarded_for))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn extract(request: Request<()>, trust_forwarded_for: bool) -> String {
        let (parts, _) = request.into_parts();
        ClientAddr::from_parts(&parts, trust_forwarded_for).0
    }

    fn from_peer(forwarded_for: &str) -> Request<()> {
        let mut request = Request::builder()
            .header("x-forwarded-for", forwarded_for)
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 20], 50000))));
        request
    }

    #[test]
    fn test_forwarded_for_ignored_by_default() {
        assert_eq!(extract(from_peer("203.0.113.7"), false), "192.168.1.20");
    }

    #[test]
    fn test_forwarded_for_first_entry_when_trusted() {
        assert_eq!(
            extract(from_peer("203.0.113.7, 10.0.0.1"), true),
            "203.0.113.7"
        );
    }

    #[test]
    fn test_blank_forwarded_for_falls_back_to_peer() {
        assert_eq!(extract(from_peer(" "), true), "192.168.1.20");
    }

    #[test]
    fn test_unknown_without_source() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(())
            .unwrap();

        assert_eq!(extract(request, false), "unknown");
    }
}
