use std::{io::Write, sync::Arc};

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

use perfume_finder_api::{
    db::InMemorySessionStore,
    routes::{create_router, AppState},
    services::{CsvCatalog, RecommendationEngine},
};

const CATALOG: &str = "\
Name,Brand,Gender,Occasion,Personality / Mood,Scent Profile
Aventus,Creed,Men,Evening,Confident,\"Pineapple, Birch, Musk\"
Rose 31,Le Labo,Unisex,Wedding,Romantic,\"Floral, Woody\"
Libre,YSL,Women,Office,Fresh,\"Lavender, Orange Blossom\"
";

fn write_catalog() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();
    file
}

const SESSION_TTL_SECS: u64 = 3600;

fn create_test_server(catalog_path: &std::path::Path) -> TestServer {
    create_test_server_with_ttl(catalog_path, SESSION_TTL_SECS)
}

fn create_test_server_with_ttl(catalog_path: &std::path::Path, ttl_secs: u64) -> TestServer {
    let engine = RecommendationEngine::new(Arc::new(CsvCatalog::new(catalog_path)));
    let state = AppState::new(Arc::new(InMemorySessionStore::new(ttl_secs)), engine);
    TestServer::new(create_router(Arc::new(state))).unwrap()
}

async fn answer_all(server: &TestServer, session_id: &str, answers: &[(&str, &str)]) {
    for (question, answer) in answers {
        server
            .post(&format!("/api/v1/sessions/{}/questions/{}", session_id, question))
            .json(&json!({ "answer": answer }))
            .await
            .assert_status_ok();
    }
}

#[tokio::test]
async fn test_health_check() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());
    let response = server.get("/health").await;
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_start_session() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());

    let response = server.post("/api/v1/sessions").await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["next_question"], "age");
    assert_eq!(body["prompt"], "What is your age?");
    assert!(body["session_id"].as_str().is_some());
}

#[tokio::test]
async fn test_questionnaire_order() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());
    let session: Value = server.post("/api/v1/sessions").await.json();
    let session_id = session["session_id"].as_str().unwrap();

    let mut question = session["next_question"].as_str().unwrap().to_string();
    let mut asked = vec![question.clone()];
    loop {
        let response: Value = server
            .post(&format!("/api/v1/sessions/{}/questions/{}", session_id, question))
            .json(&json!({ "answer": "x" }))
            .await
            .json();
        match response["next_question"].as_str() {
            Some(next) => {
                question = next.to_string();
                asked.push(question.clone());
            }
            None => break,
        }
    }

    assert_eq!(
        asked,
        vec!["age", "gender", "type", "occasion", "mood", "scents", "personality"]
    );
}

#[tokio::test]
async fn test_get_question_shows_prompt_and_answer() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());
    let session: Value = server.post("/api/v1/sessions").await.json();
    let session_id = session["session_id"].as_str().unwrap();

    answer_all(&server, session_id, &[("scents", "citrus")]).await;

    let response = server
        .get(&format!("/api/v1/sessions/{}/questions/scents", session_id))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["prompt"], "What scents do you like? (e.g., citrus, floral, woody)");
    assert_eq!(body["answer"], "citrus");
}

#[tokio::test]
async fn test_unknown_question_is_not_found() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());
    let session: Value = server.post("/api/v1/sessions").await.json();
    let session_id = session["session_id"].as_str().unwrap();

    let response = server
        .get(&format!("/api/v1/sessions/{}/questions/shoe_size", session_id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());
    let response = server
        .get("/api/v1/sessions/00000000-0000-0000-0000-000000000000/result")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_designer_flow_result() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());
    let session: Value = server.post("/api/v1/sessions").await.json();
    let session_id = session["session_id"].as_str().unwrap();

    answer_all(
        &server,
        session_id,
        &[
            ("age", "29"),
            ("gender", "Women"),
            ("type", "Designer"),
            ("occasion", "wedding"),
            ("mood", "romantic"),
            ("scents", "floral. citrus"),
            ("personality", "warm"),
        ],
    )
    .await;

    let response = server
        .get(&format!("/api/v1/sessions/{}/result", session_id))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["recommendation"]["match"]["Name"], "Rose 31");
    assert_eq!(body["recommendation"]["match"]["Brand"], "Le Labo");
    assert_eq!(body["theme"], "pink");
    assert_eq!(body["answers"]["gender"], "Women");
}

#[tokio::test]
async fn test_customized_flow_result() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());
    let session: Value = server.post("/api/v1/sessions").await.json();
    let session_id = session["session_id"].as_str().unwrap();

    answer_all(
        &server,
        session_id,
        &[("gender", "men"), ("type", "customized"), ("mood", "calm")],
    )
    .await;

    let body: Value = server
        .get(&format!("/api/v1/sessions/{}/result", session_id))
        .await
        .json();
    assert_eq!(
        body["recommendation"]["Custom Perfume"],
        "Custom blend for a calm mood, infused with hints of your favorite scents."
    );
    assert_eq!(body["theme"], "blue");
}

#[tokio::test]
async fn test_end_session() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());
    let session: Value = server.post("/api/v1/sessions").await.json();
    let session_id = session["session_id"].as_str().unwrap();

    server
        .delete(&format!("/api/v1/sessions/{}", session_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/v1/sessions/{}/result", session_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_session_is_not_found() {
    let catalog = write_catalog();
    let server = create_test_server_with_ttl(catalog.path(), 1);
    let session: Value = server.post("/api/v1/sessions").await.json();
    let session_id = session["session_id"].as_str().unwrap();

    answer_all(&server, session_id, &[("gender", "women")]).await;
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    server
        .get(&format!("/api/v1/sessions/{}/result", session_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post(&format!("/api/v1/sessions/{}/questions/mood", session_id))
        .json(&json!({ "answer": "calm" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stateless_recommendation_ties_keep_catalog_order() {
    let catalog = write_catalog();
    let server = create_test_server(catalog.path());

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "type": "designer", "gender": "men" }))
        .await;
    response.assert_status_ok();

    // "men" also matches "Women", so all three rows tie on the base bonus.
    let body: Value = response.json();
    assert_eq!(body["match"]["Name"], "Aventus");
}

#[tokio::test]
async fn test_stateless_recommendation_gender_message() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"Name,Gender\nAventus,Men\n").unwrap();
    let server = create_test_server(file.path());

    let body: Value = server
        .post("/api/v1/recommendations")
        .json(&json!({ "type": "designer", "gender": "women" }))
        .await
        .json();
    assert_eq!(
        body,
        json!({ "message": "No perfumes match your gender preference." })
    );
}

#[tokio::test]
async fn test_missing_catalog_returns_error_shape() {
    let server = create_test_server(std::path::Path::new("/nonexistent/luxury_perfumes.csv"));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "type": "designer", "gender": "men" }))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "error": "Failed to load perfumes data." }));
}

#[tokio::test]
async fn test_missing_catalog_does_not_affect_customized() {
    let server = create_test_server(std::path::Path::new("/nonexistent/luxury_perfumes.csv"));

    let body: Value = server
        .post("/api/v1/recommendations")
        .json(&json!({ "type": "customized", "scents": "amber" }))
        .await
        .json();
    assert_eq!(
        body["Custom Perfume"],
        "Custom blend for a neutral mood, infused with hints of amber."
    );
}
