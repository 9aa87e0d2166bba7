//! HTTP boundary.
//!
//! Thin actix-web handlers over [`Service`]: extract the caller, check
//! ownership, call one workflow, and map its [`Error`] to a status code.
//!
//! ## Submodules
//!
//! - [`accounts`] — Registration, login, and session management
//! - [`events`] — Event lifecycle for restaurants, applying for volunteers
//! - [`staffing`] — Application review and check-in
//! - [`dashboards`] — Restaurant and volunteer read models
mod dto;
mod failure;
mod middleware;

pub mod accounts;
pub mod dashboards;
pub mod events;
pub mod staffing;

pub use dto::*;
pub use failure::*;
pub use middleware::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use mealshare_auth::Cache;
use mealshare_auth::Redis;
use mealshare_core::Config;
use mealshare_core::Error;
use mealshare_pg::Postgres;
use mealshare_service::Service;
use mealshare_store::Store;

async fn health<S, C>(service: web::Data<Service<S, C>>) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    match service
        .health()
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(()) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

/// Body, path, and query extraction failures are caller errors.
fn malformed<E>(e: E) -> actix_web::Error
where
    E: std::fmt::Display,
{
    Failure(Error::Invalid(e.to_string())).into()
}

/// Mount every route for a service over store `S` and cache `C`.
#[rustfmt::skip]
pub fn routes<S, C>(cfg: &mut web::ServiceConfig)
where
    S: Store + 'static,
    C: Cache + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(|e, _| malformed(e)))
        .app_data(web::PathConfig::default().error_handler(|e, _| malformed(e)))
        .app_data(web::QueryConfig::default().error_handler(|e, _| malformed(e)))
        .route("/health", web::get().to(health::<S, C>))
        .service(
            web::scope("/auth")
                .route("/register/restaurant", web::post().to(accounts::register_restaurant::<S, C>))
                .route("/register/volunteer", web::post().to(accounts::register_volunteer::<S, C>))
                .route("/login", web::post().to(accounts::login::<S, C>))
                .route("/refresh", web::post().to(accounts::refresh::<S, C>))
                .route("/logout", web::post().to(accounts::logout::<S, C>))
                .route("/me", web::get().to(accounts::me::<S, C>)),
        )
        .service(
            web::scope("/events")
                .route("", web::post().to(events::create::<S, C>))
                .route("/{id}", web::delete().to(events::delete::<S, C>))
                .route("/{id}/status", web::put().to(events::status::<S, C>))
                .route("/{id}/guests", web::put().to(events::guests::<S, C>))
                .route("/{id}/meals", web::put().to(events::meals::<S, C>))
                .route("/{id}/complete", web::post().to(events::complete::<S, C>))
                .route("/{id}/volunteers", web::get().to(events::volunteers::<S, C>))
                .route("/{id}/apply", web::post().to(events::apply::<S, C>)),
        )
        .service(
            web::scope("/restaurant")
                .route("", web::put().to(dashboards::update_restaurant::<S, C>))
                .route("/stats", web::get().to(dashboards::stats::<S, C>))
                .route("/events", web::get().to(dashboards::events::<S, C>))
                .route("/applications", web::get().to(staffing::pending::<S, C>)),
        )
        .service(
            web::scope("/applications")
                .route("/{id}/approve", web::post().to(staffing::approve::<S, C>))
                .route("/{id}/decline", web::post().to(staffing::decline::<S, C>)),
        )
        .service(
            web::scope("/assignments")
                .route("/{id}/checkin", web::post().to(staffing::check_in::<S, C>)),
        )
        .service(
            web::scope("/volunteer")
                .route("/dashboard", web::get().to(dashboards::dashboard::<S, C>))
                .route("/tasks", web::get().to(dashboards::tasks::<S, C>))
                .route("/opportunities", web::get().to(dashboards::opportunities::<S, C>))
                .route("/badges", web::get().to(dashboards::badges::<S, C>)),
        );
}

/// Connect the durable store and session cache, then serve until shutdown.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let store = mealshare_pg::connect(config).await?;
    store.migrate().await?;
    let cache = Redis::connect(&config.redis).await?;
    let service = web::Data::new(Service::new(store, cache, config));
    log::info!("starting mealshare on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(service.clone())
            .configure(routes::<Postgres, Redis>)
    })
    .workers(config.workers)
    .bind(&config.bind)?
    .run()
    .await?;
    Ok(())
}
