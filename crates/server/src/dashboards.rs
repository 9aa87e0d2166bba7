use super::*;
use actix_web::Responder;
use actix_web::web;
use mealshare_service::RestaurantDetails;

pub async fn stats<S, C>(service: web::Data<Service<S, C>>, auth: Auth<S, C>) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    respond(
        async {
            let restaurant = auth.restaurant()?;
            service.stats(restaurant.id).await
        }
        .await,
    )
}

/// Optionally filtered by `?status=`.
pub async fn events<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    filter: web::Query<EventFilter>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    respond(
        async {
            let restaurant = auth.restaurant()?;
            service.events(restaurant.id, filter.status()?).await
        }
        .await,
    )
}

pub async fn update_restaurant<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    req: web::Json<RestaurantDetails>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let details = req.into_inner();
    respond(
        async {
            let restaurant = auth.restaurant()?;
            service.update_restaurant(restaurant, details).await
        }
        .await,
    )
}

pub async fn dashboard<S, C>(service: web::Data<Service<S, C>>, auth: Auth<S, C>) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    respond(
        async {
            let volunteer = auth.volunteer()?;
            service.dashboard(volunteer.id).await
        }
        .await,
    )
}

pub async fn tasks<S, C>(service: web::Data<Service<S, C>>, auth: Auth<S, C>) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    respond(
        async {
            let volunteer = auth.volunteer()?;
            service.upcoming_tasks(volunteer.id).await
        }
        .await,
    )
}

pub async fn opportunities<S, C>(service: web::Data<Service<S, C>>, auth: Auth<S, C>) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    respond(
        async {
            let volunteer = auth.volunteer()?;
            service.opportunities(volunteer.id).await
        }
        .await,
    )
}

pub async fn badges<S, C>(service: web::Data<Service<S, C>>, auth: Auth<S, C>) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    respond(
        async {
            let volunteer = auth.volunteer()?;
            service.badges(volunteer.id).await
        }
        .await,
    )
}
