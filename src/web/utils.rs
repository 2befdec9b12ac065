use axum::http::HeaderMap;
use std::net::SocketAddr;

/// First `X-Forwarded-For` hop when behind the load balancer, else the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|p| p.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Whether a matched route gets an entry in the recent-activity log.
/// `/visit` records its own entry after bumping the counter.
pub fn logs_activity(path: &str) -> bool {
    !matches!(path, "/health" | "/recent-requests" | "/visit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn prefers_forwarded_for() {
        let mut h = HeaderMap::new();
        h.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.2"));
        let peer: SocketAddr = "10.0.0.2:5555".parse().unwrap();
        assert_eq!(client_ip(&h, Some(peer)), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_peer_then_unknown() {
        let peer: SocketAddr = "192.0.2.1:80".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)), "192.0.2.1");
        assert_eq!(client_ip(&HeaderMap::new(), None), "unknown");
    }

    #[test]
    fn quiet_paths() {
        assert!(!logs_activity("/health"));
        assert!(!logs_activity("/recent-requests"));
        assert!(logs_activity("/memo"));
        assert!(logs_activity("/stats/summary"));
    }
}
