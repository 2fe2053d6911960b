mod common;

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use common::spawn_app;

#[tokio::test]
async fn describes_every_endpoint() {
    let base = spawn_app().await;
    let response = reqwest::get(format!("{base}/api")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let endpoints = body["endpoints"].as_object().unwrap();
    assert!(endpoints.contains_key("GET /api/topics"));
    assert!(endpoints.contains_key("GET /api/articles/:article_id/comments"));
    for (route, entry) in endpoints {
        assert!(entry["description"].is_string(), "{route}");
    }
    assert_eq!(
        endpoints["GET /api/topics"]["description"],
        "serves an array of all topics"
    );
}

#[tokio::test]
async fn lists_topics() {
    let base = spawn_app().await;
    let body: Value = reqwest::get(format!("{base}/api/topics"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let topics = body["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 3);
    assert!(topics
        .iter()
        .all(|t| t["slug"].is_string() && t["description"].is_string()));
}

#[tokio::test]
async fn creates_a_topic_once() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let post = || {
        client
            .post(format!("{base}/api/topics"))
            .json(&json!({ "slug": "dogs", "description": "Not cats" }))
            .send()
    };

    let response = post().await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["topic"], json!({ "slug": "dogs", "description": "Not cats" }));

    let response = post().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Topic 'dogs' already exists!");
}

#[tokio::test]
async fn lists_users() {
    let base = spawn_app().await;
    let body: Value = reqwest::get(format!("{base}/api/users"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 4);
    for user in users {
        assert!(user["username"].is_string());
        assert!(user["name"].is_string());
        assert!(user["avatar_url"].is_string());
    }
}

#[tokio::test]
async fn fetches_a_user() {
    let base = spawn_app().await;

    let body: Value = reqwest::get(format!("{base}/api/users/rogersop"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body["user"],
        json!({
            "username": "rogersop",
            "name": "paul",
            "avatar_url": "https://avatars2.githubusercontent.com/u/24394918?s=400&v=4"
        })
    );

    let response = reqwest::get(format!("{base}/api/users/Kev22")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "user with that username does not exist");
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let base = spawn_app().await;
    for path in ["/api/nonsense", "/api/topics/mitch/extra", "/"] {
        let response = reqwest::get(format!("{base}{path}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["msg"], "Invalid URL", "{path}");
    }
}

#[tokio::test]
async fn unsupported_methods_are_not_found() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let cases = [
        (Method::PUT, "/api/topics"),
        (Method::DELETE, "/api/users"),
        (Method::POST, "/api/users/rogersop"),
        (Method::PUT, "/api/articles/1"),
        (Method::GET, "/api/comments/1"),
    ];
    for (method, path) in cases {
        let response = client
            .request(method.clone(), format!("{base}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {path}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["msg"], "Invalid URL", "{method} {path}");
    }
}
