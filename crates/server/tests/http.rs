use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test;
use actix_web::test::TestRequest;
use actix_web::web;
use mealshare_auth::Volatile;
use mealshare_core::Config;
use mealshare_core::epoch;
use mealshare_server::routes;
use mealshare_service::Service;
use mealshare_store::Memory;
use serde_json::Value;
use serde_json::json;
use std::time::SystemTime;

type Data = web::Data<Service<Memory, Volatile>>;

fn service() -> Data {
    web::Data::new(Service::new(
        Memory::default(),
        Volatile::default(),
        &Config::default(),
    ))
}

fn register(kind: &str, name: &str) -> TestRequest {
    let mut body = json!({
        "username": name,
        "email": format!("{}@example.com", name),
        "password": "password123",
        "address": "1 Market St",
    });
    match kind {
        "restaurant" => {
            body["name"] = json!(format!("{} kitchen", name));
            body["contact_number"] = json!("555-0100");
        }
        _ => {
            body["full_name"] = json!(format!("{} smith", name));
            body["phone_number"] = json!("555-0199");
        }
    }
    TestRequest::post()
        .uri(&format!("/auth/register/{}", kind))
        .set_json(body)
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

fn token(account: &Value) -> String {
    account["ticket"]["token"].as_str().unwrap().to_string()
}

fn event(max_volunteers: i32) -> Value {
    let starts = epoch::seconds(&SystemTime::now()) + 24 * 3600;
    json!({
        "title": "soup night",
        "location": "community hall",
        "starts": starts,
        "ends": starts + 3 * 3600,
        "max_guests": 40,
        "max_volunteers": max_volunteers,
    })
}

macro_rules! app {
    ($data:expr) => {
        test::init_service(
            App::new()
                .app_data($data.clone())
                .configure(routes::<Memory, Volatile>),
        )
        .await
    };
}

#[actix_web::test]
async fn health_reports_ok() {
    let data = service();
    let app = app!(data);
    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn register_then_me() {
    let data = service();
    let app = app!(data);
    let resp = test::call_service(&app, register("restaurant", "olive").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let account: Value = test::read_body_json(resp).await;
    assert_eq!(account["identity"]["kind"], "restaurant");
    assert_eq!(account["profile"]["kind"], "restaurant");
    assert_eq!(account["profile"]["name"], "olive kitchen");
    assert!(account["identity"].get("hashword").is_none());

    let req = TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(&token(&account)))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["identity"]["username"], "olive");
    assert_eq!(me["profile"]["id"], account["profile"]["id"]);
}

#[actix_web::test]
async fn missing_or_forged_tokens_are_rejected() {
    let data = service();
    let app = app!(data);
    let req = TestRequest::get().uri("/auth/me").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    let req = TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer("not.a.jwt"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn registration_errors_map_to_statuses() {
    let data = service();
    let app = app!(data);
    test::call_service(&app, register("restaurant", "olive").to_request()).await;
    let resp = test::call_service(&app, register("volunteer", "olive").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = TestRequest::post()
        .uri("/auth/register/volunteer")
        .set_json(json!({
            "username": "vera",
            "email": "vera@example.com",
            "password": "short",
            "full_name": "Vera Smith",
            "phone_number": "",
            "address": "",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::post()
        .uri("/auth/register/volunteer")
        .insert_header(header::ContentType::json())
        .set_payload("{\"username\":")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cache_outage_reports_the_created_account() {
    let data = service();
    let app = app!(data);
    data.sessions().cache().sabotage();
    let resp = test::call_service(&app, register("volunteer", "vera").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["user"].is_string());
    data.sessions().cache().restore();
    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "vera@example.com", "password": "password123"}))
        .to_request();
    let account: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(account["identity"]["id"], body["user"]);
}

#[actix_web::test]
async fn login_refresh_logout() {
    let data = service();
    let app = app!(data);
    test::call_service(&app, register("volunteer", "vera").to_request()).await;
    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "vera@example.com", "password": "wrong-password"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "vera@example.com", "password": "password123"}))
        .to_request();
    let account: Value = test::call_and_read_body_json(&app, req).await;
    let old = token(&account);

    let req = TestRequest::post()
        .uri("/auth/refresh")
        .insert_header(bearer(&old))
        .to_request();
    let ticket: Value = test::call_and_read_body_json(&app, req).await;
    let new = ticket["token"].as_str().unwrap().to_string();

    let req = TestRequest::get().uri("/auth/me").insert_header(bearer(&old)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    for _ in 0..2 {
        let req = TestRequest::post()
            .uri("/auth/logout")
            .insert_header(bearer(&new))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
    let req = TestRequest::get().uri("/auth/me").insert_header(bearer(&new)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn ownership_and_roles_are_enforced() {
    let data = service();
    let app = app!(data);
    let olive: Value =
        test::call_and_read_body_json(&app, register("restaurant", "olive").to_request()).await;
    let basil: Value =
        test::call_and_read_body_json(&app, register("restaurant", "basil").to_request()).await;
    let vera: Value =
        test::call_and_read_body_json(&app, register("volunteer", "vera").to_request()).await;

    let req = TestRequest::post()
        .uri("/events")
        .insert_header(bearer(&token(&vera)))
        .set_json(event(2))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::post()
        .uri("/events")
        .insert_header(bearer(&token(&olive)))
        .set_json(event(2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = TestRequest::delete()
        .uri(&format!("/events/{}", id))
        .insert_header(bearer(&token(&basil)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::delete()
        .uri(&format!("/events/{}", uuid_like()))
        .insert_header(bearer(&token(&olive)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::delete()
        .uri("/events/not-a-uuid")
        .insert_header(bearer(&token(&olive)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::get()
        .uri("/volunteer/dashboard")
        .insert_header(bearer(&token(&olive)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::delete()
        .uri(&format!("/events/{}", id))
        .insert_header(bearer(&token(&olive)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn status_errors() {
    let data = service();
    let app = app!(data);
    let olive: Value =
        test::call_and_read_body_json(&app, register("restaurant", "olive").to_request()).await;
    let req = TestRequest::post()
        .uri("/events")
        .insert_header(bearer(&token(&olive)))
        .set_json(event(2))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/events/{}/status", created["id"].as_str().unwrap());

    let req = TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&token(&olive)))
        .set_json(json!({"status": "finished"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&token(&olive)))
        .set_json(json!({"status": "past"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let req = TestRequest::put()
        .uri(&format!("/events/{}/guests", created["id"].as_str().unwrap()))
        .insert_header(bearer(&token(&olive)))
        .set_json(json!({"count": 41}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn staffing_flow() {
    let data = service();
    let app = app!(data);
    let olive: Value =
        test::call_and_read_body_json(&app, register("restaurant", "olive").to_request()).await;
    let vera: Value =
        test::call_and_read_body_json(&app, register("volunteer", "vera").to_request()).await;
    let chef = bearer(&token(&olive));
    let hand = bearer(&token(&vera));

    let req = TestRequest::post()
        .uri("/events")
        .insert_header(chef.clone())
        .set_json(event(2))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let event = created["id"].as_str().unwrap().to_string();

    let req = TestRequest::get()
        .uri("/volunteer/opportunities")
        .insert_header(hand.clone())
        .to_request();
    let open: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(open[0]["event"], created["id"]);
    assert_eq!(open[0]["volunteers_needed"], 2);

    let req = TestRequest::post()
        .uri(&format!("/events/{}/apply", event))
        .insert_header(hand.clone())
        .set_json(json!({"role": "Serving"}))
        .to_request();
    let application: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(application["status"], "pending");

    let req = TestRequest::post()
        .uri(&format!("/events/{}/apply", event))
        .insert_header(hand.clone())
        .set_json(json!({"role": "Serving"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = TestRequest::get()
        .uri("/restaurant/applications")
        .insert_header(chef.clone())
        .to_request();
    let pending: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let req = TestRequest::post()
        .uri(&format!("/applications/{}/approve", application["id"].as_str().unwrap()))
        .insert_header(chef.clone())
        .to_request();
    let assignment: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(assignment["checked_in"], false);

    let req = TestRequest::post()
        .uri(&format!("/applications/{}/decline", application["id"].as_str().unwrap()))
        .insert_header(chef.clone())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let req = TestRequest::put()
        .uri(&format!("/events/{}/status", event))
        .insert_header(chef.clone())
        .set_json(json!({"status": "active"}))
        .to_request();
    let active: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(active["status"], "active");

    let req = TestRequest::post()
        .uri(&format!("/assignments/{}/checkin", assignment["id"].as_str().unwrap()))
        .insert_header(hand.clone())
        .to_request();
    let checked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(checked["checked_in"], true);

    let req = TestRequest::put()
        .uri(&format!("/events/{}/meals", event))
        .insert_header(chef.clone())
        .set_json(json!({"count": 50}))
        .to_request();
    let fed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fed["meals_served"], 50);

    let req = TestRequest::get()
        .uri(&format!("/events/{}/volunteers", event))
        .insert_header(chef.clone())
        .to_request();
    let crew: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(crew[0]["volunteer"]["full_name"], "vera smith");

    let req = TestRequest::post()
        .uri(&format!("/events/{}/complete", event))
        .insert_header(chef.clone())
        .to_request();
    let done: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(done["status"], "past");

    let req = TestRequest::get()
        .uri("/restaurant/stats")
        .insert_header(chef.clone())
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["total_events"], 1);
    assert_eq!(stats["meals_served"], 50);
    assert_eq!(stats["volunteer_count"], 1);

    let req = TestRequest::get()
        .uri("/restaurant/events?status=past")
        .insert_header(chef.clone())
        .to_request();
    let past: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(past.as_array().unwrap().len(), 1);

    let req = TestRequest::get()
        .uri("/volunteer/dashboard")
        .insert_header(hand.clone())
        .to_request();
    let dashboard: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(dashboard["volunteer"]["tasks_completed"], 1);
    assert_eq!(dashboard["volunteer"]["meals_served"], 50);
    assert_eq!(dashboard["volunteer"]["reputation_points"], 30);
    assert_eq!(dashboard["badges"][0]["name"], "First Timer");
    assert_eq!(dashboard["upcoming_tasks"].as_array().unwrap().len(), 0);
}

fn uuid_like() -> String {
    mealshare_core::ID::<()>::default().to_string()
}
