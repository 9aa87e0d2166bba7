use super::*;
use actix_web::Responder;
use actix_web::web;
use mealshare_core::ID;
use mealshare_records::Draft;
use mealshare_records::Event;

pub async fn create<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    req: web::Json<CreateEvent>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let draft: Draft = req.into_inner().into();
    created(
        async {
            let restaurant = auth.restaurant()?;
            service.create_event(restaurant.id, draft).await
        }
        .await,
    )
}

pub async fn delete<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    id: web::Path<ID<Event>>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let id = id.into_inner();
    respond(
        async {
            service.owned_event(auth.restaurant()?, id).await?;
            service.delete_event(id).await?;
            Ok::<_, Error>(serde_json::json!({"status": "deleted"}))
        }
        .await,
    )
}

pub async fn status<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    id: web::Path<ID<Event>>,
    req: web::Json<SetStatus>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let id = id.into_inner();
    respond(
        async {
            let status = req.status()?;
            service.owned_event(auth.restaurant()?, id).await?;
            service.update_status(id, status).await
        }
        .await,
    )
}

pub async fn guests<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    id: web::Path<ID<Event>>,
    req: web::Json<SetCount>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let id = id.into_inner();
    respond(
        async {
            service.owned_event(auth.restaurant()?, id).await?;
            service.update_guest_count(id, req.count).await
        }
        .await,
    )
}

pub async fn meals<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    id: web::Path<ID<Event>>,
    req: web::Json<SetCount>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let id = id.into_inner();
    respond(
        async {
            service.owned_event(auth.restaurant()?, id).await?;
            service.update_meals_served(id, req.count).await
        }
        .await,
    )
}

pub async fn complete<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    id: web::Path<ID<Event>>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let id = id.into_inner();
    respond(
        async {
            service.owned_event(auth.restaurant()?, id).await?;
            service.complete_event(id).await
        }
        .await,
    )
}

pub async fn volunteers<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    id: web::Path<ID<Event>>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let id = id.into_inner();
    respond(
        async {
            service.owned_event(auth.restaurant()?, id).await?;
            service.event_volunteers(id).await
        }
        .await,
    )
}

pub async fn apply<S, C>(
    service: web::Data<Service<S, C>>,
    auth: Auth<S, C>,
    id: web::Path<ID<Event>>,
    req: web::Json<ApplyRequest>,
) -> impl Responder
where
    S: Store + 'static,
    C: Cache + 'static,
{
    let id = id.into_inner();
    respond(
        async {
            let volunteer = auth.volunteer()?;
            service.apply(volunteer.id, id, &req.role).await
        }
        .await,
    )
}
