use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use geoprospect_analysis::SessionSettings;
use geoprospect_api::{create_router, AppState};
use geoprospect_llm::{CallProfile, GatewayError, GatewayOutput, ModelGateway, PromptPayload};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Gateway answering every profile with a fixed, well-formed payload
struct CannedGateway;

#[async_trait]
impl ModelGateway for CannedGateway {
    async fn invoke(
        &self,
        profile: CallProfile,
        payload: &PromptPayload,
    ) -> Result<GatewayOutput, GatewayError> {
        let text = match profile {
            CallProfile::Fast => "Greenstone belt with shear-hosted gold.".to_string(),
            CallProfile::Default if payload.text.contains("List up to 8") => {
                "1. [Kalgoorlie Super Pit](https://example.com/kal)\n2. Kanowna Belle".to_string()
            }
            CallProfile::Default => json!({
                "title": "Eastern Goldfields target",
                "location": "Western Australia",
                "geologicalSummary": "Archean greenstone",
                "mineralPotential": ["Gold"],
                "nearbyProjects": ["Kalgoorlie Super Pit"],
                "recommendations": "Aircore drilling",
                "riskAssessment": "Native title process"
            })
            .to_string(),
            CallProfile::Structured => json!([
                {"depth": 0, "resistivity": 200.0, "magneticSusceptibility": 0.001},
                {"depth": 100, "resistivity": 80.0, "magneticSusceptibility": 0.003}
            ])
            .to_string(),
            CallProfile::Deep => "Orogenic gold model".to_string(),
        };
        Ok(GatewayOutput::text(text))
    }
}

fn app() -> Router {
    let settings = SessionSettings { stage_delay: Duration::ZERO, ..Default::default() };
    create_router(Arc::new(AppState::new(Arc::new(CannedGateway), settings)))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll the snapshot until the run leaves the running states
async fn wait_for_terminal(app: &Router) -> Value {
    for _ in 0..200 {
        let response = app.clone().oneshot(get("/api/v1/analysis")).await.unwrap();
        let snapshot = body_json(response).await;
        if snapshot["running"] == json!(false) && snapshot["status"] != json!("IDLE") {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("run did not finish");
}

#[tokio::test]
async fn test_health() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["service"], "geoprospect-api");
}

#[tokio::test]
async fn test_analysis_without_target_is_rejected() {
    let response = app()
        .oneshot(json_request("POST", "/api/v1/analysis", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No analysis target");
}

#[tokio::test]
async fn test_point_analysis_runs_to_completion() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/v1/target", json!({"lat": -30.75, "lng": 121.47})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/analysis",
            json!({"location_label": "Kalgoorlie", "mineral_focus": "gold"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let started = body_json(response).await;
    assert_eq!(started["run_id"], 1);
    assert_eq!(started["status"], "UPLOADING");

    let snapshot = wait_for_terminal(&app).await;
    assert_eq!(snapshot["status"], "COMPLETE");
    assert_eq!(snapshot["report"]["title"], "Eastern Goldfields target");
    assert_eq!(snapshot["report"]["targetMinerals"], "gold");
    assert_eq!(snapshot["chart"].as_array().map(Vec::len), Some(2));

    let response = app.clone().oneshot(get("/api/v1/analysis/chart.csv")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.starts_with("depth_m,"));
}

#[tokio::test]
async fn test_import_rejects_wrong_extension_and_keeps_boundary() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/boundary/import",
            json!({"file_name": "area.csv", "content": "lat,lng\n-30.7,121.4\n-30.7,121.6\n-30.9,121.5\n"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let imported = body_json(response).await;
    assert_eq!(imported["boundary"]["vertices"], 3);
    assert_eq!(imported["boundary"]["enforceable"], true);
    assert_eq!(imported["mapping"]["header"], "matched");
    assert!(imported["boundary"]["geojson"].is_object());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/boundary/import",
            json!({"file_name": "area.txt", "content": "lat,lng\n1,1\n"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Boundary import failed");

    // A failed import leaves the previous boundary in place
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/boundary/vertices", json!({"lat": -30.8, "lng": 121.3})))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["vertices"], 4);
}

#[tokio::test]
async fn test_invalid_coordinates_are_unprocessable() {
    let response = app()
        .oneshot(json_request(
            "PUT",
            "/api/v1/boundary",
            json!({"coordinates": [{"lat": 95.0, "lng": 10.0}]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_clear_boundary() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/boundary",
            json!({"coordinates": [
                {"lat": 1.0, "lng": 1.0}, {"lat": 1.0, "lng": 2.0}, {"lat": 2.0, "lng": 2.0}
            ]}),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["enforceable"], true);

    let response = app
        .clone()
        .oneshot(Request::builder().method("DELETE").uri("/api/v1/boundary").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(json_request("POST", "/api/v1/analysis", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
