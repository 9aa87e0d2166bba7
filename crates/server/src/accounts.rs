use super::*;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::ResponseError;
use actix_web::web;

pub async fn register_restaurant<S, C>(
    service: web::Data<Service<S, C>>,
    req: web::Json<RegisterRestaurant>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let RegisterRestaurant { signup, details } = req.into_inner();
    created(service.register_restaurant(signup, details).await)
}

pub async fn register_volunteer<S, C>(
    service: web::Data<Service<S, C>>,
    req: web::Json<RegisterVolunteer>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let RegisterVolunteer { signup, details } = req.into_inner();
    created(service.register_volunteer(signup, details).await)
}

pub async fn login<S, C>(
    service: web::Data<Service<S, C>>,
    req: web::Json<LoginRequest>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    respond(service.login(&req.email, &req.password).await)
}

pub async fn refresh<S, C>(service: web::Data<Service<S, C>>, bearer: Bearer) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    respond(service.refresh(&bearer.0).await)
}

/// Succeeds for tokens that are already revoked or expired.
pub async fn logout<S, C>(service: web::Data<Service<S, C>>, bearer: Bearer) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    match service.logout(&bearer.0).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({"status": "logged_out"})),
        Err(e) => Failure(e).error_response(),
    }
}

pub async fn me<S, C>(auth: Auth<S, C>) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    HttpResponse::Ok().json(auth.principal())
}
