//! Webhook delivery and health endpoints.

use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use txwatch_core::processors::EventOutcome;
use txwatch_sdk::objects::{HealthResponse, HealthStatus, ReceiverResponse, WebhookPayload};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check).post(receive_webhook))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        group: state.group_name().to_string(),
    })
}

/// Process one provider delivery.
///
/// Events are handled in order and independently: a failing event is logged
/// and reported in the response, its siblings are still processed. The
/// provider only ever sees a non-200 status when the body is not JSON.
///
/// The body is parsed as JSON whatever `Content-Type` says.
async fn receive_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<ReceiverResponse>) {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(
                group = state.group_name(),
                error = %e,
                "Rejected webhook delivery"
            );
            return (
                StatusCode::BAD_REQUEST,
                Json(ReceiverResponse::error(format!("invalid JSON body: {e}"))),
            );
        }
    };

    let events = payload.into_events();
    tracing::debug!(
        group = state.group_name(),
        events = events.len(),
        "Received webhook delivery"
    );

    let mut failures = Vec::new();
    for (position, entry) in events.into_iter().enumerate() {
        match state.process_event(entry).await {
            Ok(EventOutcome::Processed { notifications }) => {
                tracing::debug!(position, notifications, "Event processed");
            }
            Ok(outcome) => {
                tracing::trace!(position, ?outcome, "Event skipped");
            }
            Err(e) => {
                tracing::error!(
                    group = state.group_name(),
                    position,
                    error = %e,
                    "Error processing event"
                );
                failures.push(format!("event {position}: {e}"));
            }
        }
    }

    if failures.is_empty() {
        (StatusCode::OK, Json(ReceiverResponse::Success))
    } else {
        (
            StatusCode::OK,
            Json(ReceiverResponse::error(failures.join("; "))),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::server::build_router;
    use crate::state::AppState;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use txwatch_core::entities::{SignatureLedger, TrackedTokens, WalletGroup};
    use txwatch_core::events::{
        DEFAULT_CHANNEL_BUFFER, TransferNotificationReceiver, transfer_notification_channel,
    };
    use txwatch_core::processors::EventReceiver;

    fn test_app() -> (Router, TransferNotificationReceiver) {
        let wallets = Arc::new(WalletGroup::new(1, vec!["W1".into(), "W3".into()]));
        let tokens: TrackedTokens = [("RAY_MINT", "RAY")].into_iter().collect();
        let ledger = SignatureLedger::new(Duration::from_secs(3600));
        let (notification_tx, notification_rx) = transfer_notification_channel();
        let receiver = EventReceiver::new(wallets, Arc::new(tokens), ledger, notification_tx);
        (build_router(AppState::new(receiver)), notification_rx)
    }

    fn delivery(to: &str) -> Value {
        json!([{
            "signature": "S1",
            "type": "TRANSFER",
            "tokenTransfers": [{
                "mint": "RAY_MINT",
                "fromUserAccount": "W2",
                "toUserAccount": to,
                "tokenAmount": "5.0"
            }]
        }])
    }

    async fn post(app: &Router, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_incoming_transfer_is_notified() {
        let (app, mut notifications) = test_app();

        let (status, body) = post(&app, delivery("W1").to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success"}));

        let notification = notifications.try_recv().unwrap();
        assert_eq!(notification.symbol, "RAY");
        assert_eq!(notification.formatted_amount(), "5.000000");
        assert_eq!(notification.transfer.from_address, "W2");
        assert_eq!(notification.transfer.to_address, "W1");
        assert_eq!(notification.transfer.signature, "S1");
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_redelivery_is_not_notified_twice() {
        let (app, mut notifications) = test_app();

        for _ in 0..2 {
            let (status, body) = post(&app, delivery("W1").to_string()).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"status": "success"}));
        }

        assert!(notifications.try_recv().is_ok());
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_destination_outside_group() {
        let (app, mut notifications) = test_app();

        let (status, body) = post(&app, delivery("W9").to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success"}));
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_single_object_without_transfers() {
        let (app, mut notifications) = test_app();

        let (status, body) = post(&app, r#"{"signature":"S2","type":"SWAP"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success"}));
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_malformed_event_reported_siblings_processed() {
        let (app, mut notifications) = test_app();
        let mut events = delivery("W3");
        events.as_array_mut().unwrap().insert(0, json!(42));

        let (status, body) = post(&app, events.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().starts_with("event 0:"));

        let notification = notifications.try_recv().unwrap();
        assert_eq!(notification.transfer.to_address, "W3");
    }

    #[tokio::test]
    async fn test_full_notification_queue_does_not_block_delivery() {
        let (app, mut notifications) = test_app();
        let transfers: Vec<Value> = (0..DEFAULT_CHANNEL_BUFFER)
            .map(|_| {
                json!({
                    "mint": "RAY_MINT",
                    "fromUserAccount": "W2",
                    "toUserAccount": "W1",
                    "tokenAmount": "1"
                })
            })
            .collect();
        let burst = json!({"signature": "BURST", "tokenTransfers": transfers});
        let (status, _) = post(&app, burst.to_string()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = tokio::time::timeout(
            Duration::from_secs(3),
            post(&app, delivery("W1").to_string()),
        )
        .await
        .expect("delivery must be answered while the queue is full");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success"}));

        let mut queued = 0;
        while let Ok(notification) = notifications.try_recv() {
            assert_eq!(notification.transfer.signature, "BURST");
            queued += 1;
        }
        assert_eq!(queued, DEFAULT_CHANNEL_BUFFER);
    }

    #[tokio::test]
    async fn test_body_parsed_without_json_content_type() {
        let (app, mut notifications) = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(delivery("W1").to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(notifications.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_json_rejected() {
        let (app, mut notifications) = test_app();

        let (status, body) = post(&app, "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _notifications) = test_app();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "healthy", "group": "group1"}));
    }
}
