use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use start_window::timezone::Tz;
use start_window::{Config, Extension, WindowCalculator};
use start_window_server::{AppState, router};

async fn spawn_app(extension: Extension) -> SocketAddr {
    let state = Arc::new(AppState {
        extension,
        metrics: None,
    });
    // bind to ephemeral port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::serve(listener, router(state).into_make_service());
    tokio::spawn(async move {
        server.await.ok();
    });
    addr
}

fn extension(config: Config) -> Extension {
    Extension::with_calculator(config, WindowCalculator::with_fallback(Tz::UTC))
}

fn admin_edit(post: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "kind": "admin_edit",
        "screen": { "base": "post", "post_type": "tribe_events" },
        "post": post,
    })
}

#[tokio::test]
async fn health_and_style() {
    let addr = spawn_app(extension(Config::default())).await;
    let http = Client::new();

    let res = http.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "ok");

    let res = http
        .get(format!("http://{addr}/validation-style"))
        .send()
        .await
        .unwrap();
    let css = res.text().await.unwrap();
    assert!(css.contains(".tribe_ext_custom_datepicker_start_date_error"));

    let res = http.get(format!("http://{addr}/metrics")).send().await.unwrap();
    assert!(res.status().is_success());
}

#[tokio::test]
async fn render_new_event_for_editor() {
    let addr = spawn_app(extension(Config::default())).await;
    let res = Client::new()
        .post(format!("http://{addr}/render"))
        .json(&serde_json::json!({
            "context": admin_edit(serde_json::json!({})),
            "capabilities": ["edit_posts"],
            "now": "2024-03-10T12:00:00Z",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["handle"], "tribe-ext-custom-datepicker-start-date");
    assert_eq!(body["vars"]["min_date"], 1_710_028_800);
    assert_eq!(body["vars"]["max_date"], "");
    assert_eq!(
        body["vars"]["error_class"],
        "tribe_ext_custom_datepicker_start_date_error"
    );
    assert!(body["style"].as_str().unwrap().starts_with("<style"));
}

#[tokio::test]
async fn render_applies_configured_offsets_and_existing_start() {
    let config = Config {
        max_offset: "3w".into(),
        ..Config::default()
    };
    let addr = spawn_app(extension(config)).await;
    let res = Client::new()
        .post(format!("http://{addr}/render"))
        .json(&serde_json::json!({
            "context": {
                "kind": "community_form",
                "post": { "id": 12, "start_date": "2024-02-01" },
            },
            "now": "2024-03-10T12:00:00Z",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    // 2024-02-01 and 2024-03-31, both UTC midnight
    assert_eq!(body["vars"]["min_date"], 1_706_745_600);
    assert_eq!(body["vars"]["max_date"], 1_711_843_200);
}

#[tokio::test]
async fn administrators_get_no_script() {
    let addr = spawn_app(extension(Config::default())).await;
    let res = Client::new()
        .post(format!("http://{addr}/render"))
        .json(&serde_json::json!({
            "context": admin_edit(serde_json::json!({ "id": 3 })),
            "capabilities": ["manage_options"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn old_host_gets_admin_notice() {
    let addr = spawn_app(extension(Config::default())).await;
    let res = Client::new()
        .post(format!("http://{addr}/render"))
        .json(&serde_json::json!({
            "context": admin_edit(serde_json::json!({})),
            "host_version": "5.2",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let text = res.text().await.unwrap();
    assert!(text.contains("requires host runtime 5.3"));
}

#[tokio::test]
async fn malformed_render_request_is_rejected() {
    let addr = spawn_app(extension(Config::default())).await;
    let res = Client::new()
        .post(format!("http://{addr}/render"))
        .json(&serde_json::json!({ "context": { "kind": "elsewhere" } }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());
}

#[tokio::test]
async fn disabled_days_projection() {
    let addr = spawn_app(extension(Config::default())).await;
    let http = Client::new();

    let res = http
        .post(format!("http://{addr}/disabled-days"))
        .json(&serde_json::json!({
            "vars": { "min_date": 1_710_028_800, "max_date": "", "error_class": "e" },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "before": "2024-03-10" }));

    let res = http
        .post(format!("http://{addr}/disabled-days"))
        .json(&serde_json::json!({
            "prior": { "after": "2030-01-01" },
            "vars": { "min_date": 1_710_028_800, "max_date": 1_711_843_200, "error_class": "e" },
        }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "after": "2030-01-01" }));

    let res = http
        .post(format!("http://{addr}/disabled-days"))
        .json(&serde_json::json!({
            "vars": { "min_date": 1, "error_class": "e" },
            "viewer_time_zone": "Not/AZone",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn schema_endpoint_describes_payload() {
    let addr = spawn_app(extension(Config::default())).await;
    let body: serde_json::Value = Client::new()
        .get(format!("http://{addr}/schema/script-vars"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["properties"]["max_date"].is_object());
}
