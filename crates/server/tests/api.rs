use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::{ActiveValue, Database, EntityTrait};
use serde_json::{Value, json};
use tower::ServiceExt;

use ledger::{Ledger, users};
use migration::MigratorTrait;

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    users::Entity::insert(users::ActiveModel {
        username: ActiveValue::Set("staff".to_string()),
        password: ActiveValue::Set("hunter2".to_string()),
    })
    .exec(&db)
    .await
    .unwrap();

    let ledger = Ledger::builder().database(db.clone()).build();
    server::app(ledger, db)
}

fn auth_value() -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode("staff:hunter2");
    format!("Basic {encoded}")
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, auth_value())
        .header(header::CONTENT_TYPE, "application/json");
    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn rejects_missing_credentials() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejects_wrong_password() {
    let app = test_app().await;

    let encoded = base64::engine::general_purpose::STANDARD.encode("staff:wrong");
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/stats")
                .header(header::AUTHORIZATION, format!("Basic {encoded}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn records_a_payment_and_reflects_it_in_stats() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/interns",
            Some(json!({
                "full_name": "Asha Nair",
                "domain": "Web Development",
                "total_fee_minor": 4000
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let intern_id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/payments",
            Some(json!({
                "subject_kind": "intern",
                "subject_id": intern_id,
                "amount_minor": 2500,
                "method": "upi",
                "status": "completed",
                "kind": "internship_fee"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request("GET", "/stats", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = json_body(response).await;
    assert_eq!(stats["total_revenue_minor"], 2500);
    assert_eq!(stats["outstanding_minor"], 1500);

    let response = app
        .oneshot(request("GET", "/interns", None))
        .await
        .unwrap();
    let interns = json_body(response).await;
    assert_eq!(interns["interns"][0]["paid_fee_minor"], 2500);
    assert_eq!(interns["interns"][0]["fee_status"], "partial");
}

#[tokio::test]
async fn payment_list_carries_subject_names() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/projects",
            Some(json!({
                "title": "CRM revamp",
                "client": "Acme Infotech",
                "value_minor": 50000
            })),
        ))
        .await
        .unwrap();
    let project_id = json_body(response).await["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(request(
            "POST",
            "/payments",
            Some(json!({
                "subject_kind": "project",
                "subject_id": project_id,
                "amount_minor": 10000,
                "method": "bank_transfer",
                "status": "completed",
                "kind": "project_milestone"
            })),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(request("GET", "/payments?kind=project_milestone", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["payments"][0]["subject_name"], "CRM revamp");
    assert_eq!(body["payments"][0]["amount_minor"], 10000);
}

#[tokio::test]
async fn invalid_amount_returns_422_and_unknown_id_404() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/payments",
            Some(json!({
                "subject_kind": "unlinked",
                "amount_minor": -5,
                "method": "cash",
                "status": "completed",
                "kind": "internship_fee"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .oneshot(request(
            "DELETE",
            "/payments/00000000-0000-0000-0000-000000000000",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_updates_owned_fields_only() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/interns",
            Some(json!({
                "full_name": "Ravi Kumar",
                "domain": "Data Science",
                "total_fee_minor": 5000
            })),
        ))
        .await
        .unwrap();
    let intern_id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/interns/{intern_id}"),
            Some(json!({ "domain": "Machine Learning" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", "/interns", None))
        .await
        .unwrap();
    let interns = json_body(response).await;
    assert_eq!(interns["interns"][0]["domain"], "Machine Learning");
    assert_eq!(interns["interns"][0]["total_fee_minor"], 5000);
}

#[tokio::test]
async fn resync_reports_counts() {
    let app = test_app().await;

    app.clone()
        .oneshot(request(
            "POST",
            "/interns",
            Some(json!({
                "full_name": "Asha Nair",
                "domain": "Web Development",
                "total_fee_minor": 4000
            })),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(request("POST", "/resync", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["interns_synced"], 1);
    assert_eq!(body["projects_synced"], 0);
    assert_eq!(body["failures"], 0);
}

#[tokio::test]
async fn monthly_and_domain_queries_validate_bounds() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request("GET", "/stats/monthly?months=0", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(request("GET", "/stats/monthly?months=3", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["months"].as_array().unwrap().len(), 3);

    let response = app
        .oneshot(request("GET", "/stats/domains?top=0", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
