//! Shared helpers for driving the router in tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use contact_relay::{
    app,
    config::Config,
    mailer::{Mailer, MailerError, OutgoingEmail},
    state::AppState,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use std::sync::{Arc, Mutex};

pub const API_KEY: &str = "test-key";

/// Records every email it is asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub fail_with: Option<String>,
}

impl RecordingMailer {
    pub fn failing(message: &str) -> Self {
        Self {
            sent: Mutex::default(),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<Value, MailerError> {
        self.sent.lock().unwrap().push(email);

        match &self.fail_with {
            Some(message) => Err(MailerError::Rejected {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: message.clone(),
            }),
            None => Ok(json!({ "id": "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794" })),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
    pub templates: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        let templates = tempfile::tempdir().unwrap();
        let mailer = Arc::new(mailer);

        let config = Config {
            api_key: Some(API_KEY.to_string()),
            resend_api_key: Some("re_test".to_string()),
            template_dir: templates.path().to_string_lossy().into_owned(),
            ..Config::default()
        };

        let router = app(Arc::new(AppState::new(config, mailer.clone())));

        Self {
            router,
            mailer,
            templates,
        }
    }

    pub fn write_template(&self, name: &str, contents: &str) {
        std::fs::write(self.templates.path().join(format!("{name}.html")), contents).unwrap();
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        into_json(response).await
    }
}

pub fn post_json(uri: &str, api_key: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn into_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
