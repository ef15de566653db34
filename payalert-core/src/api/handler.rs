use crate::api::{ApiError, ApiResponse, Endpoint, parse_limit};
use crate::event::{PaymentError, PaymentIntent};
use crate::notify::compose_test_email;
use crate::runtime::{AppState, MemorySnapshot};
use crate::store::{DEFAULT_FAILURE_LIMIT, DEFAULT_LOG_LIMIT};
use chrono::Utc;
use http::{Method, StatusCode};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "Stripe Payment Failure Notifier";

/// A request stripped down to what the endpoints need.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// Dispatches requests to the status, listing, webhook and test endpoints.
#[derive(Clone)]
pub struct ApiHandler {
    state: Arc<AppState>,
}

impl ApiHandler {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Handle a request, converting any escaped error into a 500.
    pub async fn respond(&self, req: &ApiRequest) -> ApiResponse {
        match self.handle(req).await {
            Ok(resp) => resp,
            Err(err) => self.fallback(&req.path, &err),
        }
    }

    /// Catch-all for errors that escape an endpoint.
    pub fn fallback(&self, path: &str, err: &ApiError) -> ApiResponse {
        self.state.logs.error(
            "Unhandled error",
            Some(json!({ "path": path, "error": err.to_string() })),
        );
        ApiResponse::internal_error()
    }

    pub async fn handle(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let Some(endpoint) = Endpoint::resolve(&req.method, &req.path) else {
            return ApiResponse::json(
                StatusCode::NOT_FOUND,
                &json!({ "error": "Not found", "path": req.path }),
            );
        };

        match endpoint {
            Endpoint::Banner => self.banner(),
            Endpoint::Health => self.health(),
            Endpoint::Logs => {
                let limit = parse_limit(req.query.as_deref(), DEFAULT_LOG_LIMIT);
                ApiResponse::json(StatusCode::OK, &self.state.logs.list(limit))
            }
            Endpoint::Failures => {
                let limit = parse_limit(req.query.as_deref(), DEFAULT_FAILURE_LIMIT);
                ApiResponse::json(StatusCode::OK, &self.state.failures.list(limit))
            }
            Endpoint::StripeWebhook => self.webhook(&req.body).await,
            Endpoint::TestNotification => self.test_notification().await,
            Endpoint::TestEmail => self.test_email().await,
        }
    }

    fn banner(&self) -> Result<ApiResponse, ApiError> {
        let endpoints: BTreeMap<_, _> = Endpoint::catalog().into_iter().collect();

        ApiResponse::json(
            StatusCode::OK,
            &json!({
                "status": "running",
                "service": SERVICE_NAME,
                "endpoints": endpoints,
                "recent_failures": self.state.failures.len(),
                "logs_count": self.state.logs.len(),
                "uptime": self.state.uptime().as_secs_f64(),
            }),
        )
    }

    fn health(&self) -> Result<ApiResponse, ApiError> {
        ApiResponse::json(
            StatusCode::OK,
            &json!({
                "status": "healthy",
                "timestamp": Utc::now(),
                "uptime": self.state.uptime().as_secs_f64(),
                "memory": MemorySnapshot::capture(),
                "recent_failures": self.state.failures.len(),
            }),
        )
    }

    // Payload problems are the caller's fault: plain-text 400.
    async fn webhook(&self, body: &[u8]) -> Result<ApiResponse, ApiError> {
        match self.state.router.handle(body).await {
            Ok(receipt) => ApiResponse::json(StatusCode::OK, &receipt),
            Err(err) => Ok(ApiResponse::text(
                StatusCode::BAD_REQUEST,
                format!("Webhook Error: {err}"),
            )),
        }
    }

    async fn test_notification(&self) -> Result<ApiResponse, ApiError> {
        let intent = mock_failed_intent();

        self.state.logs.info(
            "Test notification requested",
            Some(json!({ "payment_id": intent.id })),
        );

        // The outcome is already logged by the notifier; the endpoint always
        // reports success.
        let outcome = self.state.notifier.notify_payment_failure(&intent).await;
        tracing::debug!(sent = outcome.is_sent(), "test notification finished");

        ApiResponse::json(
            StatusCode::OK,
            &json!({
                "success": true,
                "message": "Test notification triggered",
                "test_data": intent,
            }),
        )
    }

    async fn test_email(&self) -> Result<ApiResponse, ApiError> {
        let message = compose_test_email(self.state.addresses(), Utc::now());

        match self.state.mailer.send(&message).await {
            Ok(()) => {
                self.state.logs.info(
                    "Test email sent",
                    Some(json!({ "recipient": message.to })),
                );
                ApiResponse::json(
                    StatusCode::OK,
                    &json!({
                        "success": true,
                        "message": "Test email sent successfully",
                        "recipient": message.to,
                    }),
                )
            }
            Err(err) => {
                let error = err.to_string();
                self.state.logs.error(
                    "Failed to send test email",
                    Some(json!({ "error": error })),
                );
                ApiResponse::json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &json!({ "success": false, "error": error }),
                )
            }
        }
    }
}

/// Fixed sample used by the manual test trigger.
fn mock_failed_intent() -> PaymentIntent {
    PaymentIntent {
        id: format!("pi_test_{}", Utc::now().timestamp_millis()),
        amount: 2500,
        currency: "usd".to_string(),
        customer: None,
        status: Some("requires_payment_method".to_string()),
        last_payment_error: Some(PaymentError {
            code: Some("card_declined".to_string()),
            message: Some("Your card was declined.".to_string()),
            decline_code: Some("generic_decline".to_string()),
            kind: Some("card_error".to_string()),
        }),
    }
}
