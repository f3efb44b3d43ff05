use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{records, table_path, TestApp};

async fn mount_content(app: &TestApp) {
    Mock::given(method("GET"))
        .and(path(table_path("Site Content")))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(json!([
            { "id": "rec1", "fields": { "Content Key": "discord_link", "Content Value": "https://discord.gg/wnyai" } },
            { "id": "rec2", "fields": { "Content Key": "hero_title", "Content Value": "Western New York AI" } },
            { "id": "rec3", "fields": { "Content Value": "orphaned value" } },
        ]))))
        .mount(&app.store)
        .await;
}

#[tokio::test]
async fn store_values_are_merged_over_defaults() {
    let app = TestApp::spawn().await;
    mount_content(&app).await;

    let response = app.get("/content").await;
    assert_eq!(200, response.status().as_u16());

    let content: serde_json::Value = response.json().await.unwrap();
    assert_eq!(content["discord_link"], "https://discord.gg/wnyai");
    assert_eq!(content["hero_title"], "Western New York AI");
    assert_eq!(content["github_link"], "https://github.com/example");
    assert_eq!(content.as_object().unwrap().len(), 7);
}

#[tokio::test]
async fn store_failure_serves_the_defaults() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path(table_path("Site Content")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.store)
        .await;

    let content: serde_json::Value = app.get("/content").await.json().await.unwrap();

    assert_eq!(content["discord_link"], "https://discord.gg/example");
    assert_eq!(content["terms_of_service"], "These are fallback terms of service.");
}

#[tokio::test]
async fn single_values_are_looked_up_by_key() {
    let app = TestApp::spawn().await;
    mount_content(&app).await;

    let response = app.get("/content/hero_title").await;
    assert_eq!(200, response.status().as_u16());
    assert_eq!(response.text().await.unwrap(), "Western New York AI");

    let response = app.get("/content/twitter_link").await;
    assert_eq!(response.text().await.unwrap(), "https://twitter.com/example");

    let response = app.get("/content/no_such_key").await;
    assert_eq!(404, response.status().as_u16());
}
