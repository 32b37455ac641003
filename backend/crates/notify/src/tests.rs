//! HTTP-level tests for the notify crate
//! SSE bodies are read to completion; the stream must end on its own.

#[cfg(test)]
mod sse_tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{
        CheckOutcome, NotificationChannel, NotifyConfig, StatusCheck, SubscriberKey,
        notify_router,
    };

    /// Per-key scripts; unknown keys are NotFound
    struct ScriptedChecks {
        scripts: Mutex<Vec<(String, VecDeque<CheckOutcome>)>>,
    }

    impl ScriptedChecks {
        fn new(scripts: Vec<(&str, Vec<CheckOutcome>)>) -> Self {
            Self {
                scripts: Mutex::new(
                    scripts
                        .into_iter()
                        .map(|(k, s)| (k.to_string(), s.into()))
                        .collect(),
                ),
            }
        }
    }

    impl StatusCheck for ScriptedChecks {
        async fn check(&self, key: &SubscriberKey) -> CheckOutcome {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.iter_mut().find(|(k, _)| k == key.as_str()) {
                Some((_, script)) => script.pop_front().unwrap_or(CheckOutcome::Pending),
                None => CheckOutcome::NotFound,
            }
        }
    }

    fn config() -> NotifyConfig {
        NotifyConfig {
            poll_interval: Duration::from_secs(1),
            watch_timeout: Duration::from_secs(10),
            retry_budget: 2,
        }
    }

    fn app(checks: ScriptedChecks) -> (Router, NotificationChannel) {
        let channel = NotificationChannel::new();
        (notify_router(checks, channel.clone(), config()), channel)
    }

    fn subscribe(key: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/notifications/subscribe?subscriberKey={key}"))
            .header(header::ACCEPT, "text/event-stream")
            .body(Body::empty())
            .unwrap()
    }

    /// JSON payloads of every `data:` line in an SSE body
    fn data_lines(body: &str) -> Vec<Value> {
        body.lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|data| serde_json::from_str(data.trim_start()).unwrap())
            .collect()
    }

    async fn read_events(app: &Router, key: &str) -> (StatusCode, Vec<Value>) {
        let response = app.clone().oneshot(subscribe(key)).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, data_lines(&String::from_utf8(bytes.to_vec()).unwrap()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_three_times_then_confirmed() {
        let (app, channel) = app(ScriptedChecks::new(vec![(
            "42",
            vec![
                CheckOutcome::Pending,
                CheckOutcome::Pending,
                CheckOutcome::Pending,
                CheckOutcome::Confirmed,
            ],
        )]));

        let (status, events) = read_events(&app, "42").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(events, vec![json!({"type": "Confirmed"})]);
        assert!(channel.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_subject_is_not_found_error() {
        let (app, _) = app(ScriptedChecks::new(vec![]));

        let (_, events) = read_events(&app, "99").await;
        assert_eq!(events, vec![json!({"type": "Error", "detail": "not found"})]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_beyond_budget() {
        let transient = || CheckOutcome::TransientError("db down".into());
        let (app, _) = app(ScriptedChecks::new(vec![(
            "42",
            vec![transient(), transient(), transient()],
        )]));

        let (_, events) = read_events(&app, "42").await;
        assert_eq!(events, vec![json!({"type": "Error", "detail": "check failed"})]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unresolved_watch_times_out() {
        let (app, channel) = app(ScriptedChecks::new(vec![("42", vec![])]));

        let started = tokio::time::Instant::now();
        let (_, events) = read_events(&app, "42").await;
        assert_eq!(events, vec![json!({"type": "TimedOut"})]);
        assert_eq!(started.elapsed(), config().watch_timeout);
        assert!(channel.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_subscription_supersedes_first() {
        let (app, _) = app(ScriptedChecks::new(vec![("42", vec![])]));

        let first = app.clone().oneshot(subscribe("42")).await.unwrap();
        let second = app.clone().oneshot(subscribe("42")).await.unwrap();

        let first_body = to_bytes(first.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            data_lines(&String::from_utf8(first_body.to_vec()).unwrap()),
            vec![json!({"type": "Superseded"})]
        );

        // The second stays live until its own watch ends
        let second_body = to_bytes(second.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            data_lines(&String::from_utf8(second_body.to_vec()).unwrap()),
            vec![json!({"type": "TimedOut"})]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_side_close_reaches_subscriber() {
        let (app, channel) = app(ScriptedChecks::new(vec![("42", vec![])]));

        let response = app.clone().oneshot(subscribe("42")).await.unwrap();
        assert!(channel.close(&SubscriberKey::parse("42").unwrap(), "maintenance"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            data_lines(&String::from_utf8(body.to_vec()).unwrap()),
            vec![json!({"type": "Closed", "detail": "maintenance"})]
        );
    }

    #[tokio::test]
    async fn test_bad_subscriber_key_is_bad_request() {
        let (app, channel) = app(ScriptedChecks::new(vec![]));

        let response = app.clone().oneshot(subscribe("a%20b")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(
            &to_bytes(response.into_body(), usize::MAX).await.unwrap(),
        )
        .unwrap();
        assert_eq!(body["error"], "InvalidSubscriberKey");

        let missing = Request::builder()
            .uri("/notifications/subscribe")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(missing).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(channel.is_empty());
    }
}
