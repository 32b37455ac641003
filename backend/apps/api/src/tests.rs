//! End-to-end gateway scenarios over the in-memory directory

#[cfg(test)]
mod gateway_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use platform::clock::ManualClock;
    use platform::crypto::SigningKey;
    use serde_json::{Value, json};
    use session::models::principal::Principal;
    use session::models::principal_id::PrincipalId;
    use session::models::role::Role;
    use session::{InMemoryPrincipalDirectory, SessionConfig, TokenIssuer};
    use tower::ServiceExt;

    use crate::gateway_router;
    use notify::{NotificationChannel, NotifyConfig};

    const ACCESS_TTL: Duration = Duration::from_secs(600);
    const REFRESH_TTL: Duration = Duration::from_secs(3600);

    struct Harness {
        app: Router,
        directory: InMemoryPrincipalDirectory,
        clock: Arc<ManualClock>,
    }

    fn harness() -> Harness {
        let directory = InMemoryPrincipalDirectory::new();
        directory
            .insert(
                Principal::new(PrincipalId::new(42), Role::User)
                    .with_name("u1")
                    .with_email("u1@example.com"),
                "u1",
                "open sesame",
            )
            .unwrap();

        let clock = Arc::new(ManualClock::starting_now());
        let config =
            SessionConfig::new(SigningKey::random()).with_ttls(ACCESS_TTL, REFRESH_TTL);
        let issuer = Arc::new(TokenIssuer::new(&config, clock.clone()));

        let notify = NotifyConfig {
            poll_interval: Duration::from_secs(1),
            watch_timeout: Duration::from_secs(60),
            retry_budget: 3,
        };

        Harness {
            app: gateway_router(directory.clone(), issuer, NotificationChannel::new(), notify),
            directory,
            clock,
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_then_refresh_after_expiry() {
        let h = harness();

        let (status, body) = send(
            &h.app,
            post_json("/login", json!({"identifier": "u1", "secret": "open sesame"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let pair: Value = serde_json::from_slice(&body).unwrap();
        let refresh = pair["refreshToken"].as_str().unwrap().to_string();

        h.clock
            .advance(chrono::Duration::seconds(REFRESH_TTL.as_secs() as i64));

        let (status, body) = send(
            &h.app,
            post_json("/token/refresh", json!({"refreshToken": refresh})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "ExpiredToken");
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_until_email_confirmed() {
        let h = harness();

        let response = h
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/notifications/subscribe?subscriberKey=42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Three pending polls, then the confirmation lands
        let directory = h.directory.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(3500)).await;
            directory.confirm_email(PrincipalId::new(42));
        });

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let events: Vec<Value> = text
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|data| serde_json::from_str(data.trim_start()).unwrap())
            .collect();

        assert_eq!(events, vec![json!({"type": "Confirmed"})]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_unknown_principal() {
        let h = harness();
        let (status, body) = send(
            &h.app,
            Request::builder()
                .uri("/notifications/subscribe?subscriberKey=7")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains(r#""detail":"not found""#));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let h = harness();
        let (status, body) = send(
            &h.app,
            Request::builder().uri("/nope").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "NotFound");
    }
}
