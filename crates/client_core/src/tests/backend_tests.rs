use super::*;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::Query,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::{BiasLabel, SentimentLabel};
use tokio::{net::TcpListener, sync::Mutex};

async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api")
}

fn articles_body() -> Value {
    json!({
        "articles": [
            {
                "title": "Inflation cools",
                "original": "Prices rose less than expected.",
                "sentiment": "Positive",
                "bias": "Center",
                "source": "reuters.com",
                "url": "https://reuters.com/inflation"
            },
            {
                "title": "Markets wobble",
                "original": "Volatility returned.",
                "sentiment": "Negative",
                "bias": "Tilted",
                "source": "example.com",
                "url": "https://example.com/markets"
            }
        ]
    })
}

fn analysis_request() -> AnalysisRequest {
    AnalysisRequest::new("Inflation cools", "Prices rose less.", "https://reuters.com/inflation")
        .expect("valid")
}

#[tokio::test]
async fn search_sends_encoded_q_param_on_primary_route() {
    let seen = Arc::new(Mutex::new(Vec::<HashMap<String, String>>::new()));
    let recorder = seen.clone();
    let app = Router::new().route(
        "/api/",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().await.push(params);
                Json(articles_body())
            }
        }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let articles = backend.search("oil & gas").await.expect("search");

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].sentiment, SentimentLabel::Positive);
    assert_eq!(articles[1].bias, BiasLabel::Other("Tilted".to_string()));
    let seen = seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].get("q").map(String::as_str), Some("oil & gas"));
}

#[tokio::test]
async fn legacy_route_uses_news_path_and_query_param() {
    let app = Router::new().route(
        "/api/news/",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("query").map(String::as_str), Some("economy"));
            Json(articles_body())
        }),
    );
    let backend =
        HttpBackend::new(spawn_backend(app).await).with_search_route(SearchRoute::Legacy);

    let articles = backend.search("economy").await.expect("search");
    assert_eq!(articles.len(), 2);
}

#[tokio::test]
async fn search_failure_status_is_an_error() {
    let app = Router::new().route(
        "/api/",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorBody::new("News API failed")),
            )
        }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend.search("economy").await.expect_err("must fail");
    assert!(matches!(err, BackendError::Status(500)), "unexpected: {err:?}");
}

#[tokio::test]
async fn search_malformed_body_is_an_error() {
    let app = Router::new().route("/api/", get(|| async { "<html>oops</html>" }));
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend.search("economy").await.expect_err("must fail");
    assert!(matches!(err, BackendError::Malformed(_)), "unexpected: {err:?}");
}

#[tokio::test]
async fn search_transport_failure_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let backend = HttpBackend::new(format!("http://{addr}/api"));

    let err = backend.search("economy").await.expect_err("must fail");
    assert!(matches!(err, BackendError::Transport(_)), "unexpected: {err:?}");
}

#[tokio::test]
async fn analyze_posts_title_content_url() {
    let seen = Arc::new(Mutex::new(None::<AnalyzeRequest>));
    let recorder = seen.clone();
    let app = Router::new().route(
        "/api/analyze/",
        post(move |Json(body): Json<AnalyzeRequest>| {
            let recorder = recorder.clone();
            async move {
                *recorder.lock().await = Some(body);
                Json(AnalyzeResponse::from(AnalysisResult {
                    summary: "Prices rose less than forecast.".to_string(),
                    sentiment: SentimentLabel::Positive,
                    bias: BiasLabel::Center,
                }))
            }
        }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let result = backend.analyze(&analysis_request()).await.expect("analyze");

    assert_eq!(result.summary, "Prices rose less than forecast.");
    assert_eq!(result.bias, BiasLabel::Center);
    let body = seen.lock().await.clone().expect("request body");
    assert_eq!(body.title, "Inflation cools");
    assert_eq!(body.content, "Prices rose less.");
    assert_eq!(body.url, "https://reuters.com/inflation");
}

#[tokio::test]
async fn analyze_error_field_is_reported_even_with_ok_status() {
    let app = Router::new().route(
        "/api/analyze/",
        post(|| async { Json(json!({ "error": "summarizer unavailable" })) }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend.analyze(&analysis_request()).await.expect_err("must fail");
    match err {
        BackendError::Reported(message) => assert_eq!(message, "summarizer unavailable"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn analyze_error_field_wins_over_failure_status() {
    let app = Router::new().route(
        "/api/analyze/",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorBody::new("index out of range")),
            )
        }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend.analyze(&analysis_request()).await.expect_err("must fail");
    assert!(matches!(err, BackendError::Reported(_)), "unexpected: {err:?}");
}

#[tokio::test]
async fn analyze_failure_status_without_error_body() {
    let app = Router::new().route(
        "/api/analyze/",
        post(|| async { StatusCode::BAD_GATEWAY }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend.analyze(&analysis_request()).await.expect_err("must fail");
    assert!(matches!(err, BackendError::Status(502)), "unexpected: {err:?}");
}

#[tokio::test]
async fn analyze_incomplete_body_is_never_partially_applied() {
    let app = Router::new().route(
        "/api/analyze/",
        post(|| async { Json(json!({ "summary": "s", "sentiment": "Neutral" })) }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend.analyze(&analysis_request()).await.expect_err("must fail");
    assert!(matches!(err, BackendError::MissingField("bias")), "unexpected: {err:?}");
}

#[tokio::test]
async fn translate_posts_text_and_target_lang() {
    let seen = Arc::new(Mutex::new(None::<Value>));
    let recorder = seen.clone();
    let app = Router::new().route(
        "/api/translate/",
        post(move |Json(body): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                *recorder.lock().await = Some(body);
                Json(json!({ "translated_text": "Résumé..." }))
            }
        }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let text = backend
        .translate("Summary...", Language::Fr)
        .await
        .expect("translate");

    assert_eq!(text, "Résumé...");
    assert_eq!(
        seen.lock().await.clone(),
        Some(json!({ "text": "Summary...", "target_lang": "fr" }))
    );
}

#[tokio::test]
async fn translate_without_translated_text_is_an_error() {
    let app = Router::new().route("/api/translate/", post(|| async { Json(json!({})) }));
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend
        .translate("Summary", Language::De)
        .await
        .expect_err("must fail");
    assert!(matches!(err, BackendError::MissingField("translated_text")));
}

#[tokio::test]
async fn translate_rejected_request_is_an_error() {
    let app = Router::new().route(
        "/api/translate/",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing text or target language" })),
            )
        }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend
        .translate("Summary", Language::Es)
        .await
        .expect_err("must fail");
    assert!(matches!(err, BackendError::Status(400)));
}

#[tokio::test]
async fn health_probe_expects_ok_status() {
    let app = Router::new().route(
        "/api/healthz",
        get(|| async { Json(json!({ "status": "ok" })) }),
    );
    let base_url = spawn_backend(app).await;
    let settings = ClientSettings {
        api_base_url: format!("{base_url}/"),
        ..ClientSettings::default()
    };
    let backend = HttpBackend::from_settings(&settings).expect("client");

    assert_eq!(backend.base_url(), base_url);
    backend.health().await.expect("healthy");
}
