use serde_json::json;
use wiremock::{
    matchers::{any, method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::helpers::{assert_status, created_columns, records, table_path, TestApp};

const SUBSCRIBERS: &str = "Subscribers";

fn created(fields: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(records(json!([{ "id": "recNEW", "fields": fields }])))
}

fn unknown_field() -> ResponseTemplate {
    ResponseTemplate::new(422).set_body_json(json!({
        "error": { "type": "UNKNOWN_FIELD_NAME", "message": "Unknown field name" }
    }))
}

async fn mount_no_duplicate(app: &TestApp) {
    Mock::given(method("GET"))
        .and(path(table_path(SUBSCRIBERS)))
        .and(query_param("filterByFormula", "{Email} = 'ursula_le_guin@gmail.com'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(json!([]))))
        .expect(1)
        .mount(&app.store)
        .await;
}

#[tokio::test]
async fn subscribe_returns_a_200_for_valid_form_data() {
    let app = TestApp::spawn().await;
    mount_no_duplicate(&app).await;

    Mock::given(method("POST"))
        .and(path(table_path(SUBSCRIBERS)))
        .respond_with(created(json!({ "Email": "ursula_le_guin@gmail.com" })))
        .expect(1)
        .mount(&app.store)
        .await;

    let response = app
        .post_form("/subscriptions", "name=le%20guin&email=ursula_le_guin%40gmail.com")
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(response.text().await.unwrap(), "Thank you for subscribing!");

    let created = app.created_records().await;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["Email"], "ursula_le_guin@gmail.com");
    assert_eq!(created[0]["Source"], "Website");
    assert_eq!(created[0]["Active"], true);
    assert!(created[0]["Signup Date"].is_string());
}

#[tokio::test]
async fn subscribe_uses_the_columns_of_an_existing_row() {
    let app = TestApp::spawn().await;
    mount_no_duplicate(&app).await;

    Mock::given(method("GET"))
        .and(path(table_path(SUBSCRIBERS)))
        .and(query_param("maxRecords", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(json!([{
            "id": "recOLD",
            "fields": {
                "Email Address": "someone@example.com",
                "Full Name": "Someone",
                "Joined Date": "2023-01-01T00:00:00.000Z",
                "Active?": true,
            },
        }]))))
        .mount(&app.store)
        .await;

    Mock::given(method("POST"))
        .and(path(table_path(SUBSCRIBERS)))
        .respond_with(created(json!({})))
        .expect(1)
        .mount(&app.store)
        .await;

    let response = app
        .post_form("/subscriptions", "name=Ursula%20Le%20Guin&email=ursula_le_guin%40gmail.com")
        .await;

    assert_status("the table has custom columns", 200, response).await;
    let created = app.created_records().await;
    assert_eq!(created[0]["Email Address"], "ursula_le_guin@gmail.com");
    assert_eq!(created[0]["Full Name"], "Ursula Le Guin");
    assert_eq!(created[0]["Active?"], true);
    assert!(created[0]["Joined Date"].is_string());
    assert!(created[0].get("Source").is_none());
}

async fn mount_sample_row(app: &TestApp, fields: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(table_path(SUBSCRIBERS)))
        .and(query_param("maxRecords", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(records(json!([{ "id": "recOLD", "fields": fields }]))),
        )
        .mount(&app.store)
        .await;
}

async fn attempted_layouts(app: &TestApp) -> Vec<Vec<String>> {
    app.store
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.method.to_string() == "POST")
        .map(created_columns)
        .collect()
}

#[tokio::test]
async fn subscribe_falls_back_when_the_detected_columns_are_rejected() {
    let app = TestApp::spawn().await;
    mount_no_duplicate(&app).await;
    mount_sample_row(
        &app,
        json!({ "Email Addr": "someone@example.com", "Weird Date": "2023-01-01" }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(table_path(SUBSCRIBERS)))
        .and(|request: &wiremock::Request| created_columns(request) == ["Email"])
        .respond_with(created(json!({})))
        .expect(1)
        .mount(&app.store)
        .await;

    Mock::given(method("POST"))
        .and(path(table_path(SUBSCRIBERS)))
        .respond_with(unknown_field())
        .expect(4)
        .mount(&app.store)
        .await;

    let response = app
        .post_form("/subscriptions", "email=ursula_le_guin%40gmail.com")
        .await;

    assert_status("the detected columns were rejected", 200, response).await;
    assert_eq!(
        attempted_layouts(&app).await,
        vec![
            vec!["Email Addr", "Weird Date"],
            vec!["Email", "Signup Date", "Source", "Active"],
            vec!["email", "signup date", "source", "active"],
            vec!["Email", "Date", "Source", "Active"],
            vec!["Email"],
        ]
    );
}

#[tokio::test]
async fn subscribe_does_not_retry_a_detected_layout_matching_a_fallback() {
    let app = TestApp::spawn().await;
    mount_no_duplicate(&app).await;
    mount_sample_row(
        &app,
        json!({
            "Email": "someone@example.com",
            "Signup Date": "2023-01-01T00:00:00.000Z",
            "Source": "Website",
            "Active": true,
        }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(table_path(SUBSCRIBERS)))
        .respond_with(unknown_field())
        .expect(5)
        .mount(&app.store)
        .await;

    let response = app
        .post_form("/subscriptions", "email=ursula_le_guin%40gmail.com")
        .await;

    assert_status("every layout was rejected", 502, response).await;
    let attempts = attempted_layouts(&app).await;
    assert_eq!(attempts[0], vec!["Email", "Signup Date", "Source", "Active"]);
    assert_eq!(
        attempts
            .iter()
            .filter(|columns| *columns == &vec!["Email", "Signup Date", "Source", "Active"])
            .count(),
        1
    );
}

#[tokio::test]
async fn subscribe_returns_a_409_for_an_existing_subscriber() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path(table_path(SUBSCRIBERS)))
        .and(query_param("filterByFormula", "{Email} = 'ursula_le_guin@gmail.com'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(json!([{
            "id": "recOLD",
            "fields": { "Email": "ursula_le_guin@gmail.com" },
        }]))))
        .mount(&app.store)
        .await;

    Mock::given(method("POST"))
        .respond_with(created(json!({})))
        .expect(0)
        .mount(&app.store)
        .await;

    let response = app
        .post_form("/subscriptions", "email=ursula_le_guin%40gmail.com")
        .await;

    assert_eq!(409, response.status().as_u16());
    assert_eq!(response.text().await.unwrap(), "You are already subscribed!");
}

#[tokio::test]
async fn subscribe_continues_when_the_duplicate_check_fails() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path(table_path(SUBSCRIBERS)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.store)
        .await;

    Mock::given(method("POST"))
        .and(path(table_path(SUBSCRIBERS)))
        .respond_with(created(json!({})))
        .expect(1)
        .mount(&app.store)
        .await;

    let response = app
        .post_form("/subscriptions", "email=ursula_le_guin%40gmail.com")
        .await;

    assert_status("the duplicate check failed", 200, response).await;
}

#[tokio::test]
async fn subscribe_tries_fallback_layouts_in_order() {
    let app = TestApp::spawn().await;
    mount_no_duplicate(&app).await;

    Mock::given(method("POST"))
        .and(path(table_path(SUBSCRIBERS)))
        .and(|request: &wiremock::Request| created_columns(request) == ["Email"])
        .respond_with(created(json!({})))
        .expect(1)
        .mount(&app.store)
        .await;

    Mock::given(method("POST"))
        .and(path(table_path(SUBSCRIBERS)))
        .respond_with(unknown_field())
        .expect(3)
        .mount(&app.store)
        .await;

    let response = app
        .post_form("/subscriptions", "email=ursula_le_guin%40gmail.com")
        .await;

    assert_status("only the bare email layout is accepted", 200, response).await;

    assert_eq!(
        attempted_layouts(&app).await,
        vec![
            vec!["Email", "Signup Date", "Source", "Active"],
            vec!["email", "signup date", "source", "active"],
            vec!["Email", "Date", "Source", "Active"],
            vec!["Email"],
        ]
    );
}

#[tokio::test]
async fn subscribe_returns_a_502_when_every_layout_is_rejected() {
    let app = TestApp::spawn().await;
    mount_no_duplicate(&app).await;

    Mock::given(method("POST"))
        .and(path(table_path(SUBSCRIBERS)))
        .respond_with(unknown_field())
        .expect(5)
        .mount(&app.store)
        .await;

    let response = app
        .post_form("/subscriptions", "email=ursula_le_guin%40gmail.com")
        .await;

    assert_eq!(502, response.status().as_u16());
    assert_eq!(
        response.text().await.unwrap(),
        "Unable to subscribe. Please try again or contact us directly."
    );
}

#[tokio::test]
async fn subscribe_returns_a_422_when_fields_are_missing_or_invalid() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.store)
        .await;

    let bodies = vec![
        ("the email is missing", "name=le%20guin"),
        ("the body is empty", ""),
        ("the email is empty", "name=Ursula&email="),
        ("the email is invalid", "name=Ursula&email=definitely-not-an-email"),
        ("the name has forbidden characters", "name=%3Cscript%3E&email=ursula_le_guin%40gmail.com"),
    ];

    for (problem, body) in bodies {
        let response = app.post_form("/subscriptions", body).await;
        assert_status(problem, 422, response).await;
    }
}
