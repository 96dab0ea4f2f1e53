// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook gateway.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{debug, warn};

use markdone_telegram::convert;

use crate::server::GatewayState;

const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// POST handler for the Telegram webhook.
///
/// Telegram retries deliveries that do not get a 200, so every
/// structurally valid payload is acknowledged even when it decodes to
/// nothing actionable. Only malformed bodies get a 400; Telegram drops
/// those on its own schedule.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    if let Some(expected) = &state.secret_token {
        let presented = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            warn!("webhook request rejected: secret token mismatch");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let update = match convert::decode_json(payload) {
        Ok(update) => update,
        Err(err) => {
            warn!(error = %err, "webhook payload failed to decode");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if state.update_tx.send(update).await.is_err() {
        // Dispatcher is gone, likely mid-shutdown. Acknowledge anyway so
        // Telegram does not redeliver into a dying process.
        debug!("update channel closed, dropping webhook update");
    }

    StatusCode::OK.into_response()
}

/// GET /health
pub async fn get_health() -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tokio::sync::mpsc;
    use tower::util::ServiceExt;

    use markdone_core::types::ChatUpdate;

    use crate::server::{build_router, GatewayState, ServerConfig};

    fn test_router(
        secret_token: Option<&str>,
    ) -> (axum::Router, mpsc::Receiver<ChatUpdate>) {
        let (tx, rx) = mpsc::channel(8);
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            webhook_path: "/telegram/webhook".to_string(),
        };
        let state = GatewayState {
            update_tx: tx,
            secret_token: secret_token.map(str::to_string),
        };
        (build_router(&config, state), rx)
    }

    fn reaction_body() -> String {
        serde_json::json!({
            "update_id": 10,
            "message_reaction": {
                "chat": { "id": 1, "type": "private", "first_name": "Test" },
                "message_id": 100,
                "user": { "id": 42, "is_bot": false, "first_name": "Test" },
                "date": 1700000000i64,
                "old_reaction": [],
                "new_reaction": [{ "type": "emoji", "emoji": "👍" }],
            }
        })
        .to_string()
    }

    fn post(path: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_update_is_acknowledged_and_forwarded() {
        let (router, mut rx) = test_router(None);

        let response = router
            .oneshot(post("/telegram/webhook", reaction_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let update = rx.try_recv().expect("update not forwarded");
        assert!(matches!(update, ChatUpdate::Reaction(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let (router, mut rx) = test_router(None);

        let response = router
            .oneshot(post("/telegram/webhook", "{\"nonsense\": true}".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_update_kind_is_still_acknowledged() {
        let (router, mut rx) = test_router(None);
        let body = serde_json::json!({
            "update_id": 11,
            "poll": { "id": "p1", "question": "?", "options": [],
                      "total_voter_count": 0, "is_closed": false,
                      "is_anonymous": true, "type": "regular",
                      "allows_multiple_answers": false }
        })
        .to_string();

        let response = router.oneshot(post("/telegram/webhook", body)).await.unwrap();

        assert_eq!(response.status(), 200);
        assert!(matches!(rx.try_recv(), Ok(ChatUpdate::Other)));
    }

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        let (router, _rx) = test_router(None);

        let request = Request::builder()
            .method("GET")
            .uri("/telegram/webhook")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), 405);
    }

    #[tokio::test]
    async fn secret_token_mismatch_is_unauthorized() {
        let (router, mut rx) = test_router(Some("expected"));

        let mut request = post("/telegram/webhook", reaction_body());
        request
            .headers_mut()
            .insert("x-telegram-bot-api-secret-token", "wrong".parse().unwrap());
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), 401);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn matching_secret_token_is_accepted() {
        let (router, mut rx) = test_router(Some("expected"));

        let mut request = post("/telegram/webhook", reaction_body());
        request.headers_mut().insert(
            "x-telegram-bot-api-secret-token",
            "expected".parse().unwrap(),
        );
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), 200);
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn missing_secret_token_is_unauthorized() {
        let (router, _rx) = test_router(Some("expected"));

        let response = router
            .oneshot(post("/telegram/webhook", reaction_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let (router, _rx) = test_router(None);

        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), 200);
    }
}
