use super::*;
use actix_web::Responder;
use actix_web::web;
use mealshare_core::ID;
use mealshare_records::Application;
use mealshare_records::Assignment;

pub async fn pending<S, C>(service: web::Data<Service<S, C>>, auth: Auth<S, C>) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    respond(
        async {
            let restaurant = auth.restaurant()?;
            service.pending_applications(restaurant.id).await
        }
        .await,
    )
}

pub async fn approve<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    id: web::Path<ID<Application>>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let id = id.into_inner();
    respond(
        async {
            service.owned_application(auth.restaurant()?, id).await?;
            service.approve(id).await
        }
        .await,
    )
}

pub async fn decline<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    id: web::Path<ID<Application>>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let id = id.into_inner();
    respond(
        async {
            service.owned_application(auth.restaurant()?, id).await?;
            service.decline(id).await
        }
        .await,
    )
}

pub async fn check_in<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    id: web::Path<ID<Assignment>>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let id = id.into_inner();
    respond(
        async {
            let volunteer = auth.volunteer()?;
            service.check_in(volunteer.id, id).await
        }
        .await,
    )
}
