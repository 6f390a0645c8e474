use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sssp_trace::web::{build_app, ServerConfig};
use tower::ServiceExt;

fn app() -> Router {
    build_app(ServerConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_session(app: &Router, body: Value) -> String {
    let (status, session) = send(app, "POST", "/api/sessions", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", session);
    session["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_and_catalogue() {
    let app = app();

    let (status, health) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");

    let (_, samples) = send(&app, "GET", "/api/samples", None).await;
    let names: Vec<_> = samples.as_array().unwrap().iter().map(|s| s["name"].clone()).collect();
    assert_eq!(names, vec![json!("simple"), json!("medium"), json!("sparse")]);
    assert_eq!(samples[0]["source"], "A");
    assert_eq!(samples[0]["graph"]["nodes"].as_array().unwrap().len(), 5);

    let (_, algorithms) = send(&app, "GET", "/api/algorithms", None).await;
    assert_eq!(algorithms[0]["id"], "classic");
    assert_eq!(algorithms[1]["id"], "pivot-reduced");
    assert_eq!(algorithms[0]["pseudocode"].as_array().unwrap().len(), 19);
    assert_eq!(algorithms[1]["pseudocode"].as_array().unwrap().len(), 21);
}

#[tokio::test]
async fn test_session_stepping() {
    let app = app();
    let (status, created) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(json!({ "sample": "simple", "algorithm": "classic" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["cursor"], 0);
    assert_eq!(created["source"], "A");
    assert_eq!(created["step"]["type"], "init");
    assert_eq!(created["step"]["distances"]["A"], json!(0.0));
    assert_eq!(created["step"]["distances"]["B"], Value::Null);
    assert_eq!(created["step"]["node_states"]["A"], "frontier");

    let id = created["id"].as_str().unwrap();

    let (_, forward) = send(&app, "POST", &format!("/api/sessions/{}/forward", id), None).await;
    assert_eq!(forward["cursor"], 1);
    assert_eq!(forward["step"]["type"], "extract-min");
    assert_eq!(forward["step"]["metadata"]["current_node"], "A");
    assert_eq!(forward["step"]["node_states"]["A"], "current");

    let (_, examine) = send(&app, "POST", &format!("/api/sessions/{}/forward", id), None).await;
    assert_eq!(examine["step"]["metadata"]["relaxing_edge"], "e1");
    assert_eq!(examine["step"]["edge_states"]["e1"], "relaxing");

    let (_, back) = send(&app, "POST", &format!("/api/sessions/{}/backward", id), None).await;
    assert_eq!(back["cursor"], 1);

    let (_, done) = send(&app, "POST", &format!("/api/sessions/{}/run", id), None).await;
    assert_eq!(done["complete"], true);
    assert_eq!(done["exhausted"], true);
    assert_eq!(done["step"]["type"], "done");
    assert_eq!(done["step"]["distances"]["E"], json!(11.0));
    assert_eq!(done["step"]["predecessors"]["E"], "D");
    assert_eq!(done["step"]["frontier"], json!([]));

    let (status, start) = send(&app, "POST", &format!("/api/sessions/{}/goto/0", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(start["step"]["type"], "init");

    let (status, err) = send(&app, "POST", &format!("/api/sessions/{}/goto/999", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "step_out_of_range");

    let (_, reset) = send(&app, "POST", &format!("/api/sessions/{}/reset", id), None).await;
    assert_eq!(reset["cursor"], 0);
    assert_eq!(reset["cached_steps"], 1);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = app();
    let id = create_session(&app, json!({ "algorithm": "bmssp" })).await;

    let (_, list) = send(&app, "GET", "/api/sessions", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["algorithm"], "pivot-reduced");

    let (status, session) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["id"], id.as_str());

    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, err) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "session_not_found");
}

#[tokio::test]
async fn test_custom_graph_session() {
    let app = app();
    let graph = json!({
        "nodes": [
            { "id": "s", "x": 0.0, "y": 0.0 },
            { "id": "t", "x": 1.0, "y": 0.0 }
        ],
        "edges": [{ "id": "st", "source": "s", "target": "t", "weight": 2.5 }],
        "directed": false
    });
    let id = create_session(&app, json!({ "graph": graph, "source": "t", "algorithm": "classic" })).await;

    let (_, done) = send(&app, "POST", &format!("/api/sessions/{}/run", id), None).await;
    assert_eq!(done["step"]["distances"]["s"], json!(2.5));
    assert_eq!(done["step"]["edge_states"]["st"], "shortest-path");
}

#[tokio::test]
async fn test_invalid_requests() {
    let app = app();

    let cases = [
        (json!({ "algorithm": "astar" }), "unknown_algorithm"),
        (json!({ "sample": "huge", "algorithm": "classic" }), "unknown_sample"),
        (json!({ "sample": "simple", "source": "Z", "algorithm": "classic" }), "unknown_source"),
        (
            json!({
                "graph": {
                    "nodes": [{ "id": "a", "x": 0.0, "y": 0.0 }, { "id": "b", "x": 0.0, "y": 0.0 }],
                    "edges": [{ "id": "ab", "source": "a", "target": "b", "weight": -1.0 }]
                },
                "algorithm": "classic"
            }),
            "invalid_graph",
        ),
    ];

    for (body, code) in cases {
        let (status, err) = send(&app, "POST", "/api/sessions", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], code);
    }

    let (_, list) = send(&app, "GET", "/api/sessions", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_expired_session_is_not_served() {
    let app = build_app(ServerConfig {
        session_timeout_minutes: 0,
        ..Default::default()
    });
    let id = create_session(&app, json!({ "algorithm": "classic" })).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    for (method, uri) in [
        ("POST", format!("/api/sessions/{}/forward", id)),
        ("GET", format!("/api/sessions/{}", id)),
        ("POST", format!("/api/sessions/{}/run", id)),
    ] {
        let (status, err) = send(&app, method, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(err["error"], "session_not_found");
    }
}

#[tokio::test]
async fn test_session_limit() {
    let app = build_app(ServerConfig {
        max_sessions: 1,
        ..Default::default()
    });
    create_session(&app, json!({ "algorithm": "classic" })).await;

    let (status, err) = send(&app, "POST", "/api/sessions", Some(json!({ "algorithm": "classic" }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(err["error"], "too_many_sessions");
}

#[tokio::test]
async fn test_compare_endpoint() {
    let app = app();
    let (status, report) = send(&app, "POST", "/api/compare", Some(json!({ "sample": "simple" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["agree"], true);
    assert_eq!(report["classic"]["distances"]["E"], json!(11.0));
    assert_eq!(report["pivot_reduced"]["distances"]["E"], json!(11.0));
    assert_eq!(report["pivot_reduced"]["pivots"], json!(["A", "B", "C"]));
    assert_eq!(report["pivot_reduced"]["step_count"], 10);
    assert!(report["classic"].get("pivots").is_none());

    let (_, sparse) = send(&app, "POST", "/api/compare", Some(json!({ "sample": "sparse" }))).await;
    assert_eq!(sparse["agree"], true);
}
