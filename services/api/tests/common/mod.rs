//! Shared helpers for driving the API router in-process.

#![allow(dead_code)]

use api_lib::{adapters::MemoryAdapter, config::Config, web, web::state::AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryAdapter>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryAdapter::new());
        let state = AppState::from_store(store.clone(), Arc::new(Config::default()));
        Self {
            router: web::router(Arc::new(state)),
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let raw = body.map(|b| b.to_string());
        self.raw_request(method, uri, cookie, raw).await
    }

    pub async fn raw_request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<String>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            set_cookie,
            body,
        }
    }

    /// Signs up a new user and returns `(cookie header value, user id)`.
    pub async fn signup(&self, email: &str) -> (String, String) {
        let response = self
            .request(
                Method::POST,
                "/auth/signup",
                None,
                Some(json!({"email": email, "password": "correct horse"})),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let set_cookie = response.set_cookie.expect("signup sets a cookie");
        let cookie = set_cookie.split(';').next().unwrap().to_string();
        let user_id = response.body["user_id"].as_str().unwrap().to_string();
        (cookie, user_id)
    }

    pub async fn create(&self, cookie: &str, body: Value) -> TestResponse {
        self.request(Method::POST, "/selections/", Some(cookie), Some(body))
            .await
    }
}

pub fn sample_selection() -> Value {
    json!({
        "pdf_name": "doc.pdf",
        "page_number": 3,
        "selected_text": "hello",
        "coordinates": {"x": 1, "y": 2}
    })
}
