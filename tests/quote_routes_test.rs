use actix_web::{test, web, App};
use serde_json::Value;

use safari_quote_api::routes::quote::{self, DraftSessions};

fn draft_app(
    sessions: web::Data<DraftSessions>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(sessions).service(
        web::scope("/api/quotes/drafts")
            .route("", web::post().to(quote::create_draft))
            .route("/{id}", web::get().to(quote::get_draft))
            .route("/{id}", web::put().to(quote::update_draft))
            .route("/{id}/previous", web::post().to(quote::previous_step))
            .route("/{id}/goto/{step}", web::post().to(quote::goto_step))
            .route("/{id}/totals", web::get().to(quote::get_totals)),
    )
}

#[actix_rt::test]
async fn test_create_and_fetch_draft() {
    let sessions = web::Data::new(DraftSessions::new());
    let app = test::init_service(draft_app(sessions)).await;

    let req = test::TestRequest::post().uri("/api/quotes/drafts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["draft"]["step"], "client_trip");
    assert_eq!(body["draft"]["adults"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/quotes/drafts/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let draft: Value = test::read_body_json(resp).await;
    assert_eq!(draft["currency"], "USD");
    assert!(draft["offer_id"].is_null());
}

#[actix_rt::test]
async fn test_get_unknown_draft_is_404_and_bad_id_is_400() {
    let sessions = web::Data::new(DraftSessions::new());
    let app = test::init_service(draft_app(sessions)).await;

    let req = test::TestRequest::get()
        .uri("/api/quotes/drafts/00000000-0000-0000-0000-000000000000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get()
        .uri("/api/quotes/drafts/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_update_draft_and_totals() {
    let sessions = web::Data::new(DraftSessions::new());
    let app = test::init_service(draft_app(sessions)).await;

    let req = test::TestRequest::post().uri("/api/quotes/drafts").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = body["id"].as_str().unwrap().to_string();

    let mut draft = body["draft"].clone();
    draft["client_name"] = Value::from("Jane Doe");
    draft["parks"] = serde_json::json!([{
        "id": "p1",
        "park_id": { "$oid": bson::oid::ObjectId::new().to_hex() },
        "park_name": "Serengeti",
        "category": "National Park",
        "entry_type": "Non-Resident",
        "duration_days": 2,
        "pax": 4,
        "unit_price": 60.0,
        "currency": "USD",
        "price": 480.0
    }]);

    let req = test::TestRequest::put()
        .uri(&format!("/api/quotes/drafts/{}", id))
        .set_json(&draft)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get()
        .uri(&format!("/api/quotes/drafts/{}/totals", id))
        .to_request();
    let totals: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(totals["parks"], 480.0);
    assert_eq!(totals["grand_total"], 480.0);
    assert_eq!(totals["by_currency"]["USD"], 480.0);
}

#[actix_rt::test]
async fn test_finished_sessions_are_dropped_from_the_map() {
    // Submission removes the finished draft so the session map stays
    // bounded; a later lookup misses.
    let sessions = DraftSessions::new();
    let id = uuid::Uuid::new_v4();
    sessions.put(id, safari_quote_api::models::quote::QuoteDraft::new());

    assert!(sessions.get(&id).is_some());
    assert!(sessions.remove(&id).is_some());
    assert!(sessions.get(&id).is_none());
    assert!(sessions.remove(&id).is_none());
}

#[actix_rt::test]
async fn test_navigation_endpoints() {
    let sessions = web::Data::new(DraftSessions::new());
    let app = test::init_service(draft_app(sessions)).await;

    let req = test::TestRequest::post().uri("/api/quotes/drafts").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = body["id"].as_str().unwrap().to_string();

    // Jumping is always allowed, even with an empty draft.
    let req = test::TestRequest::post()
        .uri(&format!("/api/quotes/drafts/{}/goto/4", id))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["step"], "transport");

    let req = test::TestRequest::post()
        .uri(&format!("/api/quotes/drafts/{}/previous", id))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["step"], "equipment");

    // Out-of-range index.
    let req = test::TestRequest::post()
        .uri(&format!("/api/quotes/drafts/{}/goto/9", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Backing up from the first step stays on the first step.
    let req = test::TestRequest::post()
        .uri(&format!("/api/quotes/drafts/{}/goto/0", id))
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri(&format!("/api/quotes/drafts/{}/previous", id))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["step"], "client_trip");
}
