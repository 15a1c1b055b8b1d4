//! Router configuration for the HTTP host.

use axum::{Router, middleware, routing::post};
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Build the router
///
/// # Routes
/// - `POST /invoke` - one triggered invocation
/// - `GET /health` - liveness and channel readiness
///
/// Middleware runs in reverse order of declaration, so the request id is
/// assigned before the logging span is opened. The trace layer adds
/// debug-level spans for the HTTP exchange itself.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/invoke", post(handlers::invoke::invoke))
        .merge(handlers::health::health_routes())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::REQUEST_ID_HEADER;
    use crate::channels::{ChannelAdapter, ChannelConnector, ChannelKind};
    use crate::config::{ChannelSettings, MessageSettings, Settings, SourceKind};
    use crate::error::NotifyResult;
    use crate::message::Message;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct EchoAdapter;

    #[async_trait]
    impl ChannelAdapter for EchoAdapter {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn kind(&self) -> ChannelKind {
            ChannelKind::Sns
        }

        async fn transmit(&self, _message: &Message) -> NotifyResult<String> {
            Ok("echo-1".to_string())
        }
    }

    struct EchoConnector;

    #[async_trait]
    impl ChannelConnector for EchoConnector {
        async fn connect(&self, _settings: &ChannelSettings) -> NotifyResult<Arc<dyn ChannelAdapter>> {
            Ok(Arc::new(EchoAdapter))
        }
    }

    fn router(phone_number: &str) -> Router {
        let mut settings = Settings {
            message: MessageSettings {
                source: SourceKind::Constant,
                text: Some("Stretch".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        settings.channel.kind = ChannelKind::Sns;
        settings.channel.sns.phone_number = phone_number.to_string();

        create_router(AppState::with_connector(settings, Arc::new(EchoConnector)))
    }

    async fn call(router: Router, method: Method, uri: &str) -> (StatusCode, Value, Option<String>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap(), request_id)
    }

    #[tokio::test]
    async fn test_invoke_returns_response_object() {
        let (status, body, request_id) = call(router("+12025550123"), Method::POST, "/invoke").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "statusCode": 200,
                "body": {"message": "SMS sent successfully", "messageId": "echo-1"}
            })
        );
        assert!(request_id.is_some());
    }

    #[tokio::test]
    async fn test_invoke_status_mirrors_response() {
        let (status, body, _) = call(router(""), Method::POST, "/invoke").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], 400);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body, _) = call(router("+12025550123"), Method::GET, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["channel"], "sns");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = router("+12025550123").oneshot(request).await.unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
    }
}
