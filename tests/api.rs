use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use vanguard_recon::app::{AppState, create_app};
use vanguard_recon::config::Config;
use vanguard_recon::core::error::SourceError;
use vanguard_recon::core::models::{HttpProbe, Scheme};
use vanguard_recon::core::passive::{PassiveAggregator, PassiveSource};
use vanguard_recon::core::pipeline::{Pipeline, PipelineSettings};
use vanguard_recon::core::registry::JobRegistry;
use vanguard_recon::core::scanner::{ActiveScanner, Prober, Resolver};

struct OneHostSource;

#[async_trait]
impl PassiveSource for OneHostSource {
    fn name(&self) -> &'static str {
        "one-host"
    }

    async fn fetch(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        Ok(vec![format!("a.{domain}"), format!("*.{domain}"), domain.to_string()])
    }
}

struct OneHostResolver;

#[async_trait]
impl Resolver for OneHostResolver {
    async fn resolve(&self, name: &str) -> Option<IpAddr> {
        (name == "a.example.com").then(|| "1.2.3.4".parse().unwrap())
    }
}

struct OneHostProber;

#[async_trait]
impl Prober for OneHostProber {
    async fn probe(&self, name: &str, scheme: Scheme) -> Option<HttpProbe> {
        (name == "a.example.com" && scheme == Scheme::Https).then(|| HttpProbe {
            status: 200,
            server: "nginx".to_string(),
            cdn_detected: false,
        })
    }
}

fn app() -> Router {
    let settings = PipelineSettings {
        bruteforce_floor: 50,
        bruteforce_require_http: false,
        enable_bruteforce: true,
        wordlist_path: PathBuf::from("/nonexistent/vanguard/wordlist.txt"),
    };
    let pipeline = Pipeline::new(
        JobRegistry::new(),
        PassiveAggregator::new(vec![Arc::new(OneHostSource)]),
        ActiveScanner::new(Arc::new(OneHostResolver), Arc::new(OneHostProber), 16),
        settings,
    );
    create_app(AppState::new(pipeline, Config::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn submit(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::post("/api/enumerate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn wait_until_completed(app: &Router, scan_id: &str) -> Value {
    for _ in 0..200 {
        let (status, job) = get_json(app, &format!("/api/scan/{scan_id}")).await;
        assert_eq!(status, StatusCode::OK);
        if job["status"] == "completed" || job["status"] == "failed" {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("scan {scan_id} did not finish");
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get_json(&app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn empty_domain_is_rejected() {
    let app = app();
    let (status, body) = submit(&app, json!({ "domain": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Domain is required");

    let (status, _) = submit(&app, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreadable_body_gets_the_error_shape() {
    let app = app();

    let missing = Request::post("/api/enumerate").body(Body::empty()).unwrap();
    let (status, body) = send(&app, missing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["status"], 400);
    assert!(body["error"]["message"].as_str().unwrap().starts_with("Invalid request body"));

    let garbled = Request::post("/api/enumerate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"domain\": "))
        .unwrap();
    let (status, body) = send(&app, garbled).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["status"], 400);
}

#[tokio::test]
async fn malformed_domain_is_rejected() {
    let (status, body) = submit(&app(), json!({ "domain": "not a domain" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);
}

#[tokio::test]
async fn unknown_scan_is_not_found() {
    let app = app();
    let (status, _) = get_json(&app, "/api/scan/nope_123").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&app, "/api/export/nope_123/json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_scan_flow_with_exports() {
    let app = app();
    let (status, accepted) = submit(&app, json!({ "domain": "https://Example.com/" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "processing");
    let scan_id = accepted["scan_id"].as_str().unwrap().to_string();
    assert!(scan_id.starts_with("example_com_"));

    let job = wait_until_completed(&app, &scan_id).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["progress"], 100);
    assert_eq!(job["domain"], "example.com");

    let results = job["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "a.example.com");
    assert_eq!(results[0]["ip"], "1.2.3.4");
    assert_eq!(results[0]["https_status"], 200);
    assert_eq!(results[0]["http_status"], Value::Null);
    assert_eq!(results[0]["cdn_detected"], "Disabled");

    let (status, export) = get_json(&app, &format!("/api/export/{scan_id}/json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(export["count"], 1);
    assert_eq!(export["subdomains"][0]["name"], "a.example.com");

    let request = Request::get(format!("/api/export/{scan_id}/txt")).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert_eq!(disposition, "attachment; filename=subdomains_example.com.txt");
    let text = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(text.to_vec()).unwrap();
    assert!(text.contains("a.example.com\n  IP: 1.2.3.4\n  HTTPS: 200\n  Server: nginx\n"));

    let (status, body) = get_json(&app, &format!("/api/export/{scan_id}/xml")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid format type");
}

#[tokio::test]
async fn export_before_completion_is_rejected() {
    let registry = JobRegistry::new();
    let id = registry.create("example.com").await;
    let pipeline = Pipeline::new(
        registry,
        PassiveAggregator::default(),
        ActiveScanner::new(Arc::new(OneHostResolver), Arc::new(OneHostProber), 1),
        PipelineSettings {
            bruteforce_floor: 0,
            bruteforce_require_http: false,
            enable_bruteforce: false,
            wordlist_path: PathBuf::new(),
        },
    );
    let app = create_app(AppState::new(pipeline, Config::default()));

    let (status, body) = get_json(&app, &format!("/api/export/{id}/json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Scan not completed yet");

    let (status, job) = get_json(&app, &format!("/api/scan/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["status"], "queued");
}
