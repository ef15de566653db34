use http::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Banner,
    Health,
    Logs,
    Failures,
    StripeWebhook,
    TestNotification,
    TestEmail,
}

impl Endpoint {
    /// Match a method and path to an endpoint. Paths match exactly, apart
    /// from a single trailing slash.
    pub fn resolve(method: &Method, path: &str) -> Option<Self> {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };

        let endpoint = match (method.as_str(), path) {
            ("GET", "/") => Endpoint::Banner,
            ("GET", "/health") => Endpoint::Health,
            ("GET", "/logs") => Endpoint::Logs,
            ("GET", "/failures") => Endpoint::Failures,
            ("POST", "/webhook/stripe") => Endpoint::StripeWebhook,
            ("POST", "/test") => Endpoint::TestNotification,
            ("POST", "/test-email") => Endpoint::TestEmail,
            _ => return None,
        };

        Some(endpoint)
    }

    /// Human-readable map served on the banner endpoint.
    pub fn catalog() -> [(&'static str, &'static str); 7] {
        [
            ("GET /", "service status"),
            ("GET /health", "health check"),
            ("GET /logs?limit=N", "recent log entries"),
            ("GET /failures?limit=N", "recent payment failures"),
            ("POST /webhook/stripe", "Stripe webhook intake"),
            ("POST /test", "send a mock payment failure alert"),
            ("POST /test-email", "send a test email"),
        ]
    }
}

/// Read `limit` from a query string.
///
/// Missing, unparsable or zero values fall back to `default`.
pub fn parse_limit(query: Option<&str>, default: usize) -> usize {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "limit")
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        })
        .filter(|limit| *limit > 0)
        .unwrap_or(default)
}
