mod support;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use devflow::auth::AuthError;
use devflow::config::PlaygroundConfig;
use devflow::util::TokioScheduler;
use devflow::view::Step;
use devflow::walkthrough::{Confirmation, Walkthrough};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{config_for, RecordingRenderer, RecordingScheduler, Rendered};

async fn mount_device_code(server: &MockServer, interval: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/device/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "dc1",
            "user_code": "QTZL-MCBW",
            "verification_uri": format!("{}/activate", server.uri()),
            "verification_uri_complete": format!("{}/activate?user_code=QTZL-MCBW", server.uri()),
            "expires_in": 900,
            "interval": interval
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn walkthrough(server: &MockServer, renderer: Arc<RecordingRenderer>) -> Walkthrough {
    Walkthrough::new(config_for(server), renderer)
        .expect("valid config")
        .with_scheduler(Arc::new(RecordingScheduler::new()))
}

#[tokio::test]
async fn full_walkthrough_renders_every_step_in_order() {
    let server = MockServer::start().await;
    mount_device_code(&server, 5).await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"error": "authorization_pending"})),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok1",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "abc",
            "name": "Jane"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = Arc::new(RecordingRenderer::new());
    let done = walkthrough(&server, renderer.clone())
        .run(&CancellationToken::new())
        .await
        .expect("walkthrough completes");

    assert_eq!(done.authorization.device_code, "dc1");
    assert_eq!(done.tokens.access_token, "tok1");
    assert_eq!(
        serde_json::to_value(&done.user_info).unwrap(),
        json!({"sub": "abc", "name": "Jane"})
    );
    assert_eq!(
        renderer.events(),
        vec![
            Rendered::Step {
                step: Step::Configure,
                has_authorization: false,
                has_tokens: false,
                has_user_info: false,
            },
            Rendered::Step {
                step: Step::Authorize,
                has_authorization: false,
                has_tokens: false,
                has_user_info: false,
            },
            Rendered::Step {
                step: Step::Exchange,
                has_authorization: true,
                has_tokens: false,
                has_user_info: false,
            },
            Rendered::Intermediate(json!({"error": "authorization_pending"})),
            Rendered::Intermediate(json!({"access_token": "tok1", "token_type": "Bearer"})),
            Rendered::Step {
                step: Step::Complete,
                has_authorization: false,
                has_tokens: true,
                has_user_info: true,
            },
        ]
    );
}

#[tokio::test]
async fn denied_authorization_request_renders_error_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/device/code"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "access_denied",
            "error_description": "Unauthorized"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = Arc::new(RecordingRenderer::new());
    let result = walkthrough(&server, renderer.clone())
        .run(&CancellationToken::new())
        .await;

    assert!(matches!(result, Err(ref e) if e.provider_code() == Some("access_denied")));
    assert_eq!(renderer.steps(), vec![Step::Configure, Step::Authorize]);
    assert_eq!(
        renderer.errors(),
        vec![(
            Step::Authorize,
            "Provider error: access_denied (Unauthorized)".to_string()
        )]
    );
}

#[tokio::test]
async fn expired_device_code_renders_exchange_error() {
    let server = MockServer::start().await;
    mount_device_code(&server, 5).await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "expired_token"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let renderer = Arc::new(RecordingRenderer::new());
    let result = walkthrough(&server, renderer.clone())
        .run(&CancellationToken::new())
        .await;

    assert!(matches!(result, Err(ref e) if e.provider_code() == Some("expired_token")));
    assert_eq!(
        renderer.steps(),
        vec![Step::Configure, Step::Authorize, Step::Exchange]
    );
    assert_eq!(renderer.intermediates(), vec![json!({"error": "expired_token"})]);
    assert_eq!(renderer.errors().len(), 1);
    assert_eq!(renderer.errors()[0].0, Step::Exchange);
}

#[tokio::test]
async fn user_info_failure_renders_complete_error() {
    let server = MockServer::start().await;
    mount_device_code(&server, 5).await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = Arc::new(RecordingRenderer::new());
    let result = walkthrough(&server, renderer.clone())
        .run(&CancellationToken::new())
        .await;

    assert!(matches!(result, Err(AuthError::Http { status: 401 })));
    assert_eq!(
        renderer.errors(),
        vec![(
            Step::Complete,
            "Request failed with status 401".to_string()
        )]
    );
    assert!(!renderer.steps().contains(&Step::Complete));
}

#[tokio::test(start_paused = true)]
async fn deadline_stops_polling_that_never_resolves() {
    let server = MockServer::start().await;
    mount_device_code(&server, 5).await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"error": "authorization_pending"})),
        )
        .mount(&server)
        .await;

    let renderer = Arc::new(RecordingRenderer::new());
    let session = Walkthrough::new(config_for(&server), renderer.clone())
        .expect("valid config")
        .with_scheduler(Arc::new(TokioScheduler))
        .with_deadline(Duration::from_secs(30));
    let result = session.run(&CancellationToken::new()).await;

    assert!(matches!(result, Err(AuthError::Timeout(30_000))));
    assert_eq!(renderer.errors()[0].0, Step::Exchange);
}

#[tokio::test]
async fn cancellation_aborts_a_hung_authorization_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/device/code"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"error": "slow_down"}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let renderer = Arc::new(RecordingRenderer::new());
    let started = std::time::Instant::now();
    let result = walkthrough(&server, renderer.clone()).run(&cancel).await;

    assert!(matches!(result, Err(AuthError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(
        renderer.errors(),
        vec![(Step::Authorize, "Cancelled".to_string())]
    );
}

struct CountingConfirmation {
    renderer: Arc<RecordingRenderer>,
    steps_seen: Mutex<Vec<Vec<Step>>>,
}

#[async_trait]
impl Confirmation for CountingConfirmation {
    async fn confirm(&self, _cancel: &CancellationToken) -> Result<(), AuthError> {
        self.steps_seen
            .lock()
            .unwrap()
            .push(self.renderer.steps());
        Ok(())
    }
}

#[tokio::test]
async fn confirmation_runs_after_authorize_screen_and_before_device_code() {
    let server = MockServer::start().await;
    mount_device_code(&server, 5).await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sub": "abc"})))
        .mount(&server)
        .await;

    let renderer = Arc::new(RecordingRenderer::new());
    let confirmation = Arc::new(CountingConfirmation {
        renderer: renderer.clone(),
        steps_seen: Mutex::new(Vec::new()),
    });
    walkthrough(&server, renderer.clone())
        .with_confirmation(confirmation.clone())
        .run(&CancellationToken::new())
        .await
        .expect("walkthrough completes");

    assert_eq!(
        confirmation.steps_seen.lock().unwrap().clone(),
        vec![vec![Step::Configure, Step::Authorize]]
    );
}

#[test]
fn walkthrough_requires_client_id() {
    let config = PlaygroundConfig::builder()
        .tenant("example.auth0.com")
        .client_id(" ")
        .build();
    let result = Walkthrough::new(config, Arc::new(RecordingRenderer::new()));
    assert!(matches!(result, Err(AuthError::InvalidConfiguration(_))));
}

#[test]
fn sessions_get_distinct_ids() {
    let config = PlaygroundConfig::builder()
        .tenant("example.auth0.com")
        .client_id("client-1")
        .build();
    let a = Walkthrough::new(config.clone(), Arc::new(RecordingRenderer::new())).unwrap();
    let b = Walkthrough::new(config, Arc::new(RecordingRenderer::new())).unwrap();
    assert_ne!(a.id(), b.id());
}
