use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::helpers::{records, table_path, TestApp};

#[tokio::test]
async fn events_are_listed_earliest_first() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path(table_path("Events")))
        .and(query_param("sort[0][field]", "Date"))
        .and(query_param("sort[0][direction]", "asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(json!([
            {
                "id": "recLATE",
                "fields": {
                    "Title": "Summer Hack Night",
                    "Date": "2030-07-10T23:00:00.000Z",
                    "Location": "Buffalo, NY",
                    "Description": "Build things.",
                    "Registration Link": "https://example.com/register",
                    "Virtual Event": false,
                },
            },
            {
                "id": "recEARLY",
                "fields": { "Title": "Spring Meetup", "Date": "2030-03-05T18:30:00.000Z" },
            },
        ]))))
        .expect(1)
        .mount(&app.store)
        .await;

    let response = app.get("/events").await;
    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["fallback"], false);

    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["id"], "recEARLY");
    assert_eq!(events[0]["time"], "06:30 PM");
    assert_eq!(events[0]["location"], "TBD");
    assert_eq!(events[0]["description"], "No description available");
    assert!(events[0].get("registrationLink").is_none());

    assert_eq!(events[1]["id"], "recLATE");
    assert_eq!(events[1]["time"], "11:00 PM");
    assert_eq!(events[1]["registrationLink"], "https://example.com/register");
    assert_eq!(events[1]["virtualEvent"], false);
}

#[tokio::test]
async fn events_without_columns_take_defaults() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path(table_path("Events")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(records(json!([{ "id": "recBARE", "fields": {} }]))),
        )
        .mount(&app.store)
        .await;

    let body: serde_json::Value = app.get("/events").await.json().await.unwrap();

    let event = &body["events"][0];
    assert_eq!(event["title"], "Untitled Event");
    assert_eq!(event["time"], "12:00 PM");
    assert_eq!(event["location"], "TBD");
    assert!(event["date"].is_string());
}

#[tokio::test]
async fn featured_events_are_filtered_by_the_store() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path(table_path("Events")))
        .and(query_param("filterByFormula", "{Featured} = TRUE()"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(json!([
            { "id": "recFEATURED", "fields": { "Title": "Conference", "Date": "2030-09-01" } },
        ]))))
        .expect(1)
        .mount(&app.store)
        .await;

    let body: serde_json::Value = app.get("/events?featured=true").await.json().await.unwrap();

    assert_eq!(body["events"][0]["id"], "recFEATURED");
    assert_eq!(body["events"][0]["time"], "12:00 PM");
}

#[tokio::test]
async fn events_follow_pagination() {
    let app = TestApp::spawn().await;

    // mounted first so it wins over the unconditional first page
    Mock::given(method("GET"))
        .and(path(table_path("Events")))
        .and(query_param("offset", "itrNEXT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(json!([
            { "id": "recSECOND", "fields": { "Date": "2030-02-01" } },
        ]))))
        .expect(1)
        .mount(&app.store)
        .await;

    Mock::given(method("GET"))
        .and(path(table_path("Events")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{ "id": "recFIRST", "fields": { "Date": "2030-01-01" } }],
            "offset": "itrNEXT",
        })))
        .expect(1)
        .mount(&app.store)
        .await;

    let body: serde_json::Value = app.get("/events").await.json().await.unwrap();

    let ids: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["recFIRST", "recSECOND"]);
}

#[tokio::test]
async fn store_failure_serves_the_fallback_event() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path(table_path("Events")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.store)
        .await;

    let response = app.get("/events").await;
    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["fallback"], true);
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
    assert_eq!(body["events"][0]["title"], "Sample Event (Fallback)");
    assert_eq!(body["events"][0]["location"], "Buffalo, NY");
}

#[tokio::test]
async fn a_repeated_offset_ends_the_listing() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path(table_path("Events")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{ "id": "recLOOP", "fields": { "Date": "2030-01-01" } }],
            "offset": "itrSAME",
        })))
        .expect(2)
        .mount(&app.store)
        .await;

    let response = app.get("/events").await;
    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["fallback"], false);
    assert_eq!(body["events"].as_array().unwrap().len(), 2);
}
