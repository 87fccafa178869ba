mod common;

use actix_web::{http::header, test};
use serde_json::{json, Value};
use serial_test::serial;

use common::{bearer_for, test_bearer, TestApp};
use trek_api::db::store::{BLOGS, USERS};

fn blog_body() -> Value {
    json!({
        "title": "Chadar in January",
        "summary": "Walking on the frozen Zanskar",
        "content": "Nine days on the ice.",
        "imageUrl": "https://img.example/chadar.jpg",
        "difficulty": "Difficult",
    })
}

#[actix_rt::test]
#[serial]
async fn test_create_and_fetch_blog() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header((header::AUTHORIZATION, test_bearer()))
        .set_json(&blog_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["authorName"], "Test Hiker");

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{}", created["id"].as_str().unwrap()))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["title"], "Chadar in January");
    assert_eq!(fetched["difficulty"], "Difficult");

    let req = test::TestRequest::get().uri("/api/blogs").to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[actix_rt::test]
#[serial]
async fn test_guest_blog_and_validation() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .set_json(&blog_body())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["authorId"], "anonymous");
    assert_eq!(created["authorName"], "Guest Explorer");

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .set_json(&json!({ "title": "No content" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(test_app.store.len(BLOGS).await, 1);
}

#[actix_rt::test]
#[serial]
async fn test_only_author_deletes_blog() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header((header::AUTHORIZATION, test_bearer()))
        .set_json(&blog_body())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/blogs/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((
            header::AUTHORIZATION,
            bearer_for("intruder", "x@example.com", None),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, test_bearer()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);
    assert_eq!(test_app.store.len(BLOGS).await, 0);
}

#[actix_rt::test]
#[serial]
async fn test_admin_deletes_any_blog() {
    let test_app = TestApp::new()
        .with_document(USERS, "moderator-1", bson::doc! { "role": "admin" })
        .await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header((header::AUTHORIZATION, test_bearer()))
        .set_json(&blog_body())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", created["id"].as_str().unwrap()))
        .insert_header((
            header::AUTHORIZATION,
            bearer_for("moderator-1", "mod@example.com", None),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);
    assert_eq!(test_app.store.len(BLOGS).await, 0);
}
