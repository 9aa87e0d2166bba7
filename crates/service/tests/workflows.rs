use mealshare_auth::Volatile;
use mealshare_core::Config;
use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_records::*;
use mealshare_service::*;
use mealshare_store::*;
use std::time::Duration;
use std::time::SystemTime;

type Harness = Service<Memory, Volatile>;

fn service() -> Harness {
    Service::new(Memory::default(), Volatile::default(), &Config::default())
}

fn signup(name: &str) -> Signup {
    Signup {
        username: name.to_string(),
        email: format!("{}@example.com", name),
        password: String::from("password123"),
    }
}

async fn restaurant(service: &Harness, name: &str) -> (Account, Restaurant) {
    let account = service
        .register_restaurant(
            signup(name),
            RestaurantDetails {
                name: format!("{} kitchen", name),
                address: String::from("1 Market St"),
                contact_number: String::from("555-0100"),
            },
        )
        .await
        .unwrap();
    match account.profile.clone() {
        Some(Profile::Restaurant(restaurant)) => (account, restaurant),
        other => panic!("expected restaurant profile, got {:?}", other),
    }
}

async fn volunteer(service: &Harness, name: &str) -> (Account, Volunteer) {
    let account = service
        .register_volunteer(
            signup(name),
            VolunteerDetails {
                full_name: format!("{} smith", name),
                phone_number: String::from("555-0199"),
                address: String::from("2 Elm St"),
            },
        )
        .await
        .unwrap();
    match account.profile.clone() {
        Some(Profile::Volunteer(volunteer)) => (account, volunteer),
        other => panic!("expected volunteer profile, got {:?}", other),
    }
}

fn draft(title: &str, hours_from_now: u64, max_volunteers: i32) -> Draft {
    let starts = SystemTime::now() + Duration::from_secs(hours_from_now * 3600);
    Draft {
        title: title.to_string(),
        description: String::from("surplus dinner"),
        location: String::from("community hall"),
        starts,
        ends: starts + Duration::from_secs(3 * 3600),
        max_guests: 50,
        max_volunteers,
    }
}

async fn restaurant_row(service: &Harness, id: ID<Restaurant>) -> Restaurant {
    service.store().restaurant(id).await.unwrap().unwrap()
}

async fn volunteer_row(service: &Harness, id: ID<Volunteer>) -> Volunteer {
    service.store().volunteer(id).await.unwrap().unwrap()
}

// ----------------------------------------------------------------------------
// accounts
// ----------------------------------------------------------------------------

#[tokio::test]
async fn registration_issues_a_working_session() {
    let service = service();
    let (account, restaurant) = restaurant(&service, "olive").await;
    let principal = service.whoami(&account.ticket.token).await.unwrap();
    assert_eq!(principal.identity.id, account.identity.id);
    assert_eq!(principal.identity.kind, Kind::Restaurant);
    assert_eq!(principal.restaurant().unwrap(), &restaurant);
    assert!(matches!(principal.volunteer(), Err(Error::Unauthorized)));
}

#[tokio::test]
async fn duplicate_email_leaves_one_account() {
    let service = service();
    let (first, _) = restaurant(&service, "olive").await;
    let clash = Signup {
        username: String::from("another"),
        ..signup("olive")
    };
    let result = service
        .register_volunteer(
            clash,
            VolunteerDetails {
                full_name: String::from("Another One"),
                phone_number: String::new(),
                address: String::new(),
            },
        )
        .await;
    assert!(matches!(result, Err(Error::Conflict(_))));
    let (stored, _) = service
        .store()
        .by_email("olive@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, first.identity.id);
    assert!(service.store().by_username("another").await.unwrap().is_none());
    assert!(service
        .store()
        .restaurant_of(first.identity.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn invalid_signups_write_nothing() {
    let service = service();
    let weak = Signup {
        password: String::from("short"),
        ..signup("olive")
    };
    let result = service
        .register_restaurant(
            weak,
            RestaurantDetails {
                name: String::from("Olive"),
                address: String::new(),
                contact_number: String::new(),
            },
        )
        .await;
    assert!(matches!(result, Err(Error::Invalid(_))));
    assert!(!service.store().exists("olive", "olive@example.com").await.unwrap());
}

#[tokio::test]
async fn cache_outage_after_commit_reports_session_unavailable() {
    let service = service();
    service.sessions().cache().sabotage();
    let result = service
        .register_restaurant(
            signup("olive"),
            RestaurantDetails {
                name: String::from("Olive"),
                address: String::new(),
                contact_number: String::new(),
            },
        )
        .await;
    let id = match result {
        Err(Error::SessionUnavailable(id)) => id,
        other => panic!("expected SessionUnavailable, got {:?}", other.map(|a| a.identity)),
    };
    service.sessions().cache().restore();
    assert!(service.store().identity(ID::from(id)).await.unwrap().is_some());
    let account = service.login("olive@example.com", "password123").await.unwrap();
    assert_eq!(account.identity.id.inner(), id);
}

#[tokio::test]
async fn login_checks_the_password() {
    let service = service();
    let (registered, _) = volunteer(&service, "vera").await;
    assert!(matches!(
        service.login("vera@example.com", "wrong-password").await,
        Err(Error::Unauthenticated)
    ));
    assert!(matches!(
        service.login("nobody@example.com", "password123").await,
        Err(Error::Unauthenticated)
    ));
    let account = service.login("vera@example.com", "password123").await.unwrap();
    assert!(matches!(account.profile, Some(Profile::Volunteer(_))));
    assert!(matches!(
        service.whoami(&registered.ticket.token).await,
        Err(Error::Unauthenticated)
    ));
    assert!(service.whoami(&account.ticket.token).await.is_ok());
}

#[tokio::test]
async fn refresh_and_logout() {
    let service = service();
    let (account, _) = volunteer(&service, "vera").await;
    let fresh = service.refresh(&account.ticket.token).await.unwrap();
    assert!(matches!(
        service.whoami(&account.ticket.token).await,
        Err(Error::Unauthenticated)
    ));
    service.logout(&fresh.token).await.unwrap();
    service.logout(&fresh.token).await.unwrap();
    assert!(matches!(
        service.whoami(&fresh.token).await,
        Err(Error::Unauthenticated)
    ));
}

#[tokio::test]
async fn restaurant_details_update_keeps_counters() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    let current = restaurant_row(&service, restaurant.id).await;
    let revised = service
        .update_restaurant(
            &current,
            RestaurantDetails {
                name: String::from("Olive & Fig"),
                address: String::from("3 Harbor Rd"),
                contact_number: String::from("555-0111"),
            },
        )
        .await
        .unwrap();
    let stored = restaurant_row(&service, restaurant.id).await;
    assert_eq!(stored, revised);
    assert_eq!(stored.name, "Olive & Fig");
    assert_eq!(stored.total_events, 1);
}

// ----------------------------------------------------------------------------
// event lifecycle
// ----------------------------------------------------------------------------

#[tokio::test]
async fn create_then_delete_restores_event_count() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let before = restaurant_row(&service, restaurant.id).await.total_events;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    assert_eq!(event.status, EventStatus::Upcoming);
    assert_eq!(restaurant_row(&service, restaurant.id).await.total_events, before + 1);
    service.delete_event(event.id).await.unwrap();
    assert_eq!(restaurant_row(&service, restaurant.id).await.total_events, before);
    assert!(service.store().event(event.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_removes_staffing_and_backs_out_meals() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    service.approve(application.id).await.unwrap();
    service.update_meals_served(event.id, 40).await.unwrap();
    service.delete_event(event.id).await.unwrap();
    let stored = restaurant_row(&service, restaurant.id).await;
    assert_eq!(stored.total_events, 0);
    assert_eq!(stored.meals_served, 0);
    assert!(service.store().assignments_of(vera.id).await.unwrap().is_empty());
    assert!(service.store().application(application.id).await.unwrap().is_none());
}

#[tokio::test]
async fn meals_move_by_the_difference() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    service.update_meals_served(event.id, 100).await.unwrap();
    assert_eq!(restaurant_row(&service, restaurant.id).await.meals_served, 100);
    let updated = service.update_meals_served(event.id, 120).await.unwrap();
    assert_eq!(updated.meals_served, 120);
    assert_eq!(restaurant_row(&service, restaurant.id).await.meals_served, 120);
    service.update_meals_served(event.id, 90).await.unwrap();
    assert_eq!(restaurant_row(&service, restaurant.id).await.meals_served, 90);
}

#[tokio::test]
async fn failed_meal_update_changes_nothing() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    service.update_meals_served(event.id, 100).await.unwrap();
    service.store().sabotage(Table::Restaurants);
    let result = service.update_meals_served(event.id, 120).await;
    assert!(result.unwrap_err().is_infrastructure());
    let stored = service.store().event(event.id).await.unwrap().unwrap();
    assert_eq!(stored.meals_served, 100);
    assert_eq!(restaurant_row(&service, restaurant.id).await.meals_served, 100);
}

#[tokio::test]
async fn failed_creation_leaves_no_event() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    service.store().sabotage(Table::Restaurants);
    let result = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await;
    assert!(result.unwrap_err().is_infrastructure());
    assert!(service.events(restaurant.id, None).await.unwrap().is_empty());
    assert_eq!(restaurant_row(&service, restaurant.id).await.total_events, 0);
}

#[tokio::test]
async fn status_moves_forward_only() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    assert!(matches!(
        service.update_status(event.id, EventStatus::Past).await,
        Err(Error::InvalidState(_))
    ));
    let active = service
        .update_status(event.id, EventStatus::Active)
        .await
        .unwrap();
    assert_eq!(active.status, EventStatus::Active);
    assert!(matches!(
        service.update_status(event.id, EventStatus::Upcoming).await,
        Err(Error::InvalidState(_))
    ));
    let past = service
        .update_status(event.id, EventStatus::Past)
        .await
        .unwrap();
    assert_eq!(past.status, EventStatus::Past);
    assert!(matches!(
        service.update_status(event.id, EventStatus::Canceled).await,
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        service.delete_event(event.id).await,
        Err(Error::InvalidState(_))
    ));
}

#[tokio::test]
async fn guest_count_respects_capacity() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    let seated = service.update_guest_count(event.id, 50).await.unwrap();
    assert_eq!(seated.current_guests, 50);
    assert!(matches!(
        service.update_guest_count(event.id, 51).await,
        Err(Error::CapacityExceeded(_))
    ));
    let stored = service.store().event(event.id).await.unwrap().unwrap();
    assert_eq!(stored.current_guests, 50);
}

#[tokio::test]
async fn unknown_events_are_not_found() {
    let service = service();
    assert!(matches!(
        service.update_meals_served(ID::default(), 1).await,
        Err(Error::NotFound("event"))
    ));
    assert!(matches!(
        service.delete_event(ID::default()).await,
        Err(Error::NotFound("event"))
    ));
}

// ----------------------------------------------------------------------------
// staffing
// ----------------------------------------------------------------------------

#[tokio::test]
async fn double_apply_conflicts() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    service.apply(vera.id, event.id, "Serving").await.unwrap();
    assert!(matches!(
        service.apply(vera.id, event.id, "Cleanup").await,
        Err(Error::Conflict(_))
    ));
}

#[tokio::test]
async fn approval_creates_one_assignment() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    assert_eq!(
        service.pending_applications(restaurant.id).await.unwrap(),
        vec![application.clone()]
    );
    let assignment = service.approve(application.id).await.unwrap();
    assert_eq!(assignment.volunteer, vera.id);
    assert_eq!(assignment.role, "Serving");
    let stored = service
        .store()
        .application(application.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ApplicationStatus::Approved);
    assert_eq!(service.store().crew_size(event.id).await.unwrap(), 1);
    assert!(matches!(
        service.decline(application.id).await,
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        service.approve(application.id).await,
        Err(Error::InvalidState(_))
    ));
    assert_eq!(service.store().crew_size(event.id).await.unwrap(), 1);
    assert!(service.pending_applications(restaurant.id).await.unwrap().is_empty());
    assert!(matches!(
        service.apply(vera.id, event.id, "Cleanup").await,
        Err(Error::Conflict(_))
    ));
}

#[tokio::test]
async fn decline_frees_the_volunteer_to_reapply() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    let declined = service.decline(application.id).await.unwrap();
    assert_eq!(declined.status, ApplicationStatus::Declined);
    assert_eq!(service.store().crew_size(event.id).await.unwrap(), 0);
    service.apply(vera.id, event.id, "Cleanup").await.unwrap();
}

#[tokio::test]
async fn declined_applications_cannot_be_approved() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 1))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    service.decline(application.id).await.unwrap();
    assert!(matches!(
        service.approve(application.id).await,
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        service.decline(application.id).await,
        Err(Error::InvalidState(_))
    ));
    assert_eq!(service.store().crew_size(event.id).await.unwrap(), 0);
    let stored = service
        .store()
        .application(application.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ApplicationStatus::Declined);
}

#[tokio::test]
async fn last_slot_goes_to_one_approval() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let (_, walt) = volunteer(&service, "walt").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 1))
        .await
        .unwrap();
    let first = service.apply(vera.id, event.id, "Serving").await.unwrap();
    let second = service.apply(walt.id, event.id, "Serving").await.unwrap();
    service.approve(first.id).await.unwrap();
    assert!(matches!(
        service.approve(second.id).await,
        Err(Error::CapacityExceeded(_))
    ));
    let stored = service.store().application(second.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ApplicationStatus::Pending);
    assert_eq!(service.store().crew_size(event.id).await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_approvals_respect_capacity() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let (_, walt) = volunteer(&service, "walt").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 1))
        .await
        .unwrap();
    let first = service.apply(vera.id, event.id, "Serving").await.unwrap();
    let second = service.apply(walt.id, event.id, "Serving").await.unwrap();
    let (a, b) = tokio::join!(service.approve(first.id), service.approve(second.id));
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert_eq!(service.store().crew_size(event.id).await.unwrap(), 1);
}

#[tokio::test]
async fn full_events_refuse_applications() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let (_, walt) = volunteer(&service, "walt").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 1))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    service.approve(application.id).await.unwrap();
    assert!(matches!(
        service.apply(walt.id, event.id, "Serving").await,
        Err(Error::CapacityExceeded(_))
    ));
}

#[tokio::test]
async fn only_upcoming_events_take_applications() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    service
        .update_status(event.id, EventStatus::Canceled)
        .await
        .unwrap();
    assert!(matches!(
        service.apply(vera.id, event.id, "Serving").await,
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        service.apply(vera.id, ID::default(), "Serving").await,
        Err(Error::NotFound("event"))
    ));
    assert!(matches!(
        service.apply(vera.id, event.id, "  ").await,
        Err(Error::Invalid(_))
    ));
}

#[tokio::test]
async fn check_in_rules() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let (_, walt) = volunteer(&service, "walt").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    let assignment = service.approve(application.id).await.unwrap();
    assert!(matches!(
        service.check_in(vera.id, assignment.id).await,
        Err(Error::InvalidState(_))
    ));
    service
        .update_status(event.id, EventStatus::Active)
        .await
        .unwrap();
    assert!(matches!(
        service.check_in(walt.id, assignment.id).await,
        Err(Error::Unauthorized)
    ));
    let checked = service.check_in(vera.id, assignment.id).await.unwrap();
    assert!(checked.checked_in);
    let crew = service.event_volunteers(event.id).await.unwrap();
    assert_eq!(crew.len(), 1);
    assert_eq!(crew[0].volunteer.id, vera.id);
    assert!(crew[0].assignment.checked_in);
}

#[tokio::test]
async fn completion_credits_checked_in_volunteers() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let (_, walt) = volunteer(&service, "walt").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    let a = service.apply(vera.id, event.id, "Serving").await.unwrap();
    let b = service.apply(walt.id, event.id, "Cleanup").await.unwrap();
    let present = service.approve(a.id).await.unwrap();
    service.approve(b.id).await.unwrap();
    service
        .update_status(event.id, EventStatus::Active)
        .await
        .unwrap();
    service.check_in(vera.id, present.id).await.unwrap();
    service.update_meals_served(event.id, 60).await.unwrap();
    let done = service.complete_event(event.id).await.unwrap();
    assert_eq!(done.status, EventStatus::Past);

    let credited = volunteer_row(&service, vera.id).await;
    assert_eq!(credited.tasks_completed, 1);
    assert_eq!(credited.hours_volunteered, 3);
    assert_eq!(credited.meals_served, 30);
    assert_eq!(credited.reputation_points, 30);
    let absent = volunteer_row(&service, walt.id).await;
    assert_eq!(absent.tasks_completed, 0);
    assert_eq!(absent.reputation_points, 0);

    let names = service
        .badges(vera.id)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect::<Vec<_>>();
    assert_eq!(names, ["First Timer", "Food Server"]);
    assert!(service.badges(walt.id).await.unwrap().is_empty());
    assert!(matches!(
        service.complete_event(event.id).await,
        Err(Error::InvalidState(_))
    ));
    assert_eq!(volunteer_row(&service, vera.id).await.tasks_completed, 1);
}

#[tokio::test]
async fn finished_events_freeze_their_counters() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 1))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    let assignment = service.approve(application.id).await.unwrap();
    service
        .update_status(event.id, EventStatus::Active)
        .await
        .unwrap();
    service.check_in(vera.id, assignment.id).await.unwrap();
    service.update_guest_count(event.id, 20).await.unwrap();
    service.update_meals_served(event.id, 60).await.unwrap();
    service.complete_event(event.id).await.unwrap();

    assert!(matches!(
        service.update_meals_served(event.id, 600).await,
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        service.update_guest_count(event.id, 30).await,
        Err(Error::InvalidState(_))
    ));
    let stored = service.store().event(event.id).await.unwrap().unwrap();
    assert_eq!(stored.meals_served, 60);
    assert_eq!(stored.current_guests, 20);
    assert_eq!(restaurant_row(&service, restaurant.id).await.meals_served, 60);
    assert_eq!(volunteer_row(&service, vera.id).await.meals_served, 60);

    let canceled = service
        .create_event(restaurant.id, draft("brunch", 48, 1))
        .await
        .unwrap();
    service
        .update_status(canceled.id, EventStatus::Canceled)
        .await
        .unwrap();
    assert!(matches!(
        service.update_meals_served(canceled.id, 10).await,
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        service.update_guest_count(canceled.id, 10).await,
        Err(Error::InvalidState(_))
    ));
    assert_eq!(restaurant_row(&service, restaurant.id).await.meals_served, 60);
}

#[tokio::test]
async fn failed_completion_credits_nobody() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    let assignment = service.approve(application.id).await.unwrap();
    service
        .update_status(event.id, EventStatus::Active)
        .await
        .unwrap();
    service.check_in(vera.id, assignment.id).await.unwrap();
    service.store().sabotage(Table::Volunteers);
    assert!(service.complete_event(event.id).await.unwrap_err().is_infrastructure());
    let stored = service.store().event(event.id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Active);
    assert_eq!(volunteer_row(&service, vera.id).await.tasks_completed, 0);
}

// ----------------------------------------------------------------------------
// read models
// ----------------------------------------------------------------------------

#[tokio::test]
async fn opportunities_skip_involved_and_full_events() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let (_, walt) = volunteer(&service, "walt").await;
    let later = service
        .create_event(restaurant.id, draft("later", 48, 3))
        .await
        .unwrap();
    let sooner = service
        .create_event(restaurant.id, draft("sooner", 24, 3))
        .await
        .unwrap();
    let full = service
        .create_event(restaurant.id, draft("full", 12, 1))
        .await
        .unwrap();
    let taken = service.apply(walt.id, full.id, "Serving").await.unwrap();
    service.approve(taken.id).await.unwrap();

    let open = service.opportunities(vera.id).await.unwrap();
    let events = open.iter().map(|o| o.event).collect::<Vec<_>>();
    assert_eq!(events, vec![sooner.id, later.id]);
    assert_eq!(open[0].volunteers_needed, 3);
    assert_eq!(open[0].restaurant, "olive kitchen");

    service.apply(vera.id, sooner.id, "Serving").await.unwrap();
    let open = service.opportunities(vera.id).await.unwrap();
    assert_eq!(open.iter().map(|o| o.event).collect::<Vec<_>>(), vec![later.id]);

    let tasks = service.upcoming_tasks(vera.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(!tasks[0].confirmed);
    let tasks = service.upcoming_tasks(walt.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].confirmed);
    assert_eq!(tasks[0].event, full.id);
}

#[tokio::test]
async fn declined_events_return_to_opportunities() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    assert!(service.opportunities(vera.id).await.unwrap().is_empty());
    service.decline(application.id).await.unwrap();
    let open = service.opportunities(vera.id).await.unwrap();
    assert_eq!(open.iter().map(|o| o.event).collect::<Vec<_>>(), vec![event.id]);
}

#[tokio::test]
async fn dashboard_and_stats() {
    let service = service();
    let (_, restaurant) = restaurant(&service, "olive").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let (_, walt) = volunteer(&service, "walt").await;
    let event = service
        .create_event(restaurant.id, draft("dinner", 24, 3))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    service.approve(application.id).await.unwrap();
    service.apply(walt.id, event.id, "Cleanup").await.unwrap();
    service.update_meals_served(event.id, 25).await.unwrap();

    let stats = service.stats(restaurant.id).await.unwrap();
    assert_eq!(stats.total_events, 1);
    assert_eq!(stats.meals_served, 25);
    assert_eq!(stats.upcoming_events, 1);
    assert_eq!(stats.volunteers_engaged, 1);
    assert_eq!(stats.volunteer_count, 1);
    assert_eq!(stats.pending_applications, 1);

    let dashboard = service.dashboard(vera.id).await.unwrap();
    assert_eq!(dashboard.volunteer.id, vera.id);
    assert_eq!(dashboard.upcoming_tasks.len(), 1);
    assert!(dashboard.opportunities.is_empty());
    assert!(dashboard.badges.is_empty());
    assert!(matches!(
        service.dashboard(ID::default()).await,
        Err(Error::NotFound("volunteer"))
    ));
}

#[tokio::test]
async fn ownership_checks() {
    let service = service();
    let (_, olive) = restaurant(&service, "olive").await;
    let (_, basil) = restaurant(&service, "basil").await;
    let (_, vera) = volunteer(&service, "vera").await;
    let event = service
        .create_event(olive.id, draft("dinner", 24, 2))
        .await
        .unwrap();
    let application = service.apply(vera.id, event.id, "Serving").await.unwrap();
    assert!(service.owned_event(&olive, event.id).await.is_ok());
    assert!(matches!(
        service.owned_event(&basil, event.id).await,
        Err(Error::Unauthorized)
    ));
    assert!(service.owned_application(&olive, application.id).await.is_ok());
    assert!(matches!(
        service.owned_application(&basil, application.id).await,
        Err(Error::Unauthorized)
    ));
}
