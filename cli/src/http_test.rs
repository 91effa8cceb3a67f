use super::*;

#[test]
fn endpoint_joins_without_double_slash() {
    assert_eq!(endpoint("http://localhost:3000/", "/api/jobs/a"), "http://localhost:3000/api/jobs/a");
    assert_eq!(endpoint("http://localhost:3000", "/api/jobs/a"), "http://localhost:3000/api/jobs/a");
}

#[test]
fn backend_builds_job_and_floorplan_urls() {
    let backend = HttpBackend::new(reqwest::Client::new(), "https://rooms.example");
    assert_eq!(backend.url(&job_status_path("j1")), "https://rooms.example/api/jobs/j1");
    assert_eq!(backend.url(&floorplan_path("j1")), "https://rooms.example/api/floorplan/j1");
}

#[test]
fn fetch_status_mapping() {
    assert!(fetch_status_error(StatusCode::OK, "j").is_none());
    assert!(matches!(
        fetch_status_error(StatusCode::NOT_FOUND, "j"),
        Some(FetchError::NotFound { job_id }) if job_id == "j"
    ));
    let err = fetch_status_error(StatusCode::BAD_GATEWAY, "j");
    assert!(matches!(err, Some(FetchError::Status { status: 502 })));
    assert!(err.is_some_and(|e| e.retryable()));
}

#[test]
fn save_status_mapping() {
    assert!(save_status_error(StatusCode::NO_CONTENT, "j").is_none());
    assert!(matches!(save_status_error(StatusCode::NOT_FOUND, "j"), Some(SaveError::NotFound { .. })));
    assert!(matches!(
        save_status_error(StatusCode::UNAUTHORIZED, "j"),
        Some(SaveError::Status { status: 401 })
    ));
}

#[tokio::test]
async fn save_without_job_is_rejected_before_sending() {
    let backend = HttpBackend::new(reqwest::Client::new(), "http://127.0.0.1:9");
    let result = backend.save_floorplan("", &FloorplanDocument::demo()).await;
    assert!(matches!(result, Err(SaveError::NoJob)));
}
