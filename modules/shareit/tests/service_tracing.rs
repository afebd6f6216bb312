//! Service-level tests on in-memory ports, run under a tracing subscriber so the
//! `#[instrument]` spans of every operation are exercised.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use tracing_test::traced_test;

use shareit::contract::model::{
    Booking, BookingState, BookingStatus, Comment, Item, ItemRequest, ItemSummary, NewBooking,
    NewItem, NewUser, User,
};
use shareit::domain::error::DomainError;
use shareit::domain::ports::FixedClock;
use shareit::domain::repo::{
    BookingDraft, BookingsRepository, CommentDraft, CommentsRepository, ItemsRepository,
    Repositories, RequestDraft, RequestsRepository, UsersRepository,
};
use shareit::domain::service::{Service, ServiceConfig};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

#[derive(Default)]
struct Store {
    users: Vec<User>,
    items: Vec<Item>,
    bookings: Vec<Booking>,
    /// Flip to make the next guarded decision lose.
    lose_next_decision: bool,
    /// Flip to make every bookings query fail.
    bookings_down: bool,
}

#[derive(Clone, Default)]
struct Mem(Arc<Mutex<Store>>);

#[async_trait]
impl UsersRepository for Mem {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.0.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.0.lock().users.iter().any(|u| u.email == email))
    }

    async fn insert(&self, u: NewUser) -> Result<User> {
        let mut s = self.0.lock();
        let user = User {
            id: s.users.len() as i64 + 1,
            name: u.name,
            email: u.email,
        };
        s.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, u: User) -> Result<()> {
        let mut s = self.0.lock();
        if let Some(slot) = s.users.iter_mut().find(|x| x.id == u.id) {
            *slot = u;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut s = self.0.lock();
        let before = s.users.len();
        s.users.retain(|u| u.id != id);
        Ok(s.users.len() < before)
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.0.lock().users.clone())
    }

    async fn is_referenced(&self, id: i64) -> Result<bool> {
        let s = self.0.lock();
        Ok(s.items.iter().any(|i| i.owner_id == id) || s.bookings.iter().any(|b| b.booker_id == id))
    }
}

#[async_trait]
impl ItemsRepository for Mem {
    async fn find_by_id(&self, id: i64) -> Result<Option<Item>> {
        Ok(self.0.lock().items.iter().find(|i| i.id == id).cloned())
    }

    async fn insert(&self, owner_id: i64, item: NewItem) -> Result<Item> {
        let mut s = self.0.lock();
        let item = Item {
            id: s.items.len() as i64 + 1,
            name: item.name,
            description: item.description,
            available: item.available,
            owner_id,
            request_id: item.request_id,
        };
        s.items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, item: Item) -> Result<()> {
        let mut s = self.0.lock();
        if let Some(slot) = s.items.iter_mut().find(|x| x.id == item.id) {
            *slot = item;
        }
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Item>> {
        Ok(self
            .0
            .lock()
            .items
            .iter()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn search_available(&self, text: &str) -> Result<Vec<Item>> {
        let needle = text.to_lowercase();
        Ok(self
            .0
            .lock()
            .items
            .iter()
            .filter(|i| i.available && i.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list_by_requests(&self, _request_ids: &[i64]) -> Result<Vec<Item>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl BookingsRepository for Mem {
    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>> {
        Ok(self.0.lock().bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_if_item_available(&self, draft: BookingDraft) -> Result<Option<Booking>> {
        let mut s = self.0.lock();
        let Some(item) = s.items.iter().find(|i| i.id == draft.item_id).cloned() else {
            return Ok(None);
        };
        if !item.available {
            return Ok(None);
        }
        let booking = Booking {
            id: s.bookings.len() as i64 + 1,
            start: draft.start,
            end: draft.end,
            item: ItemSummary {
                id: item.id,
                name: item.name,
            },
            booker_id: draft.booker_id,
            status: BookingStatus::Waiting,
        };
        s.bookings.push(booking.clone());
        Ok(Some(booking))
    }

    async fn decide(&self, id: i64, status: BookingStatus) -> Result<bool> {
        let mut s = self.0.lock();
        if s.lose_next_decision {
            // Someone else got there first and rejected it.
            s.lose_next_decision = false;
            if let Some(b) = s.bookings.iter_mut().find(|b| b.id == id) {
                b.status = BookingStatus::Rejected;
            }
            return Ok(false);
        }
        match s
            .bookings
            .iter_mut()
            .find(|b| b.id == id && b.status == BookingStatus::Waiting)
        {
            Some(b) => {
                b.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_booker(&self, booker_id: i64) -> Result<Vec<Booking>> {
        let s = self.0.lock();
        if s.bookings_down {
            return Err(anyhow!("connection reset"));
        }
        Ok(s.bookings
            .iter()
            .filter(|b| b.booker_id == booker_id)
            .cloned()
            .collect())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Booking>> {
        let s = self.0.lock();
        if s.bookings_down {
            return Err(anyhow!("connection reset"));
        }
        let owned: Vec<i64> = s
            .items
            .iter()
            .filter(|i| i.owner_id == owner_id)
            .map(|i| i.id)
            .collect();
        Ok(s.bookings
            .iter()
            .filter(|b| owned.contains(&b.item.id))
            .cloned()
            .collect())
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> Result<Vec<Booking>> {
        Ok(self
            .0
            .lock()
            .bookings
            .iter()
            .filter(|b| item_ids.contains(&b.item.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentsRepository for Mem {
    async fn insert(&self, draft: CommentDraft) -> Result<Comment> {
        let name = self
            .0
            .lock()
            .users
            .iter()
            .find(|u| u.id == draft.author_id)
            .map(|u| u.name.clone())
            .unwrap_or_default();
        Ok(Comment {
            id: 1,
            text: draft.text,
            item_id: draft.item_id,
            author_id: draft.author_id,
            author_name: name,
            created: draft.created,
        })
    }

    async fn list_by_items(&self, _item_ids: &[i64]) -> Result<Vec<Comment>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl RequestsRepository for Mem {
    async fn find_by_id(&self, _id: i64) -> Result<Option<ItemRequest>> {
        Ok(None)
    }

    async fn insert(&self, draft: RequestDraft) -> Result<ItemRequest> {
        Ok(ItemRequest {
            id: 1,
            description: draft.description,
            requestor_id: draft.requestor_id,
            created: draft.created,
            items: Vec::new(),
        })
    }

    async fn list_by_requestor(&self, _requestor_id: i64) -> Result<Vec<ItemRequest>> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<ItemRequest>> {
        Ok(Vec::new())
    }
}

struct Harness {
    mem: Mem,
    service: Service,
    owner: i64,
    booker: i64,
    item: i64,
}

async fn harness() -> Harness {
    let mem = Mem::default();
    let repos = Repositories {
        users: Arc::new(mem.clone()),
        items: Arc::new(mem.clone()),
        bookings: Arc::new(mem.clone()),
        comments: Arc::new(mem.clone()),
        requests: Arc::new(mem.clone()),
    };
    let clock = Arc::new(FixedClock::new(t0()));
    let service = Service::new(repos, clock, ServiceConfig::default());

    let owner = service
        .create_user(NewUser {
            name: "Olga".into(),
            email: "olga@example.com".into(),
        })
        .await
        .unwrap()
        .id;
    let booker = service
        .create_user(NewUser {
            name: "Boris".into(),
            email: "boris@example.com".into(),
        })
        .await
        .unwrap()
        .id;
    let item = service
        .create_item(
            owner,
            NewItem {
                name: "Kayak".into(),
                description: "Two seats".into(),
                available: true,
                request_id: None,
            },
        )
        .await
        .unwrap()
        .id;

    Harness {
        mem,
        service,
        owner,
        booker,
        item,
    }
}

fn tomorrow(item_id: i64) -> NewBooking {
    NewBooking {
        item_id,
        start: Some(t0() + Duration::days(1)),
        end: Some(t0() + Duration::days(2)),
    }
}

#[traced_test]
#[tokio::test]
async fn create_booking_emits_spans() {
    let h = harness().await;

    let booking = h
        .service
        .create_booking(h.booker, tomorrow(h.item))
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Waiting);
    assert_eq!(booking.item.name, "Kayak");
}

#[traced_test]
#[tokio::test]
async fn lost_decision_race_reports_the_winning_status() {
    let h = harness().await;
    let booking = h
        .service
        .create_booking(h.booker, tomorrow(h.item))
        .await
        .unwrap();

    h.mem.0.lock().lose_next_decision = true;
    let err = h
        .service
        .decide_booking(h.owner, booking.id, true)
        .await
        .unwrap_err();

    match err {
        DomainError::BookingAlreadyDecided { status, .. } => {
            assert_eq!(status, BookingStatus::Rejected)
        }
        other => panic!("expected BookingAlreadyDecided, got {other:?}"),
    }
}

#[traced_test]
#[tokio::test]
async fn item_switched_off_mid_request_is_unavailable() {
    let h = harness().await;

    // Availability is re-read by the store at insert time.
    h.mem.0.lock().items[0].available = false;
    let err = h
        .service
        .create_booking(h.booker, tomorrow(h.item))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::ItemUnavailable { .. }));
}

#[traced_test]
#[tokio::test]
async fn store_failures_surface_as_database_errors() {
    let h = harness().await;
    h.mem.0.lock().bookings_down = true;

    let err = h
        .service
        .list_booker_bookings(h.booker, BookingState::All)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Database { .. }));

    let err = h
        .service
        .list_owner_bookings(h.owner, BookingState::Current)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Database { .. }));
}

#[traced_test]
#[tokio::test]
async fn validation_runs_before_any_lookup() {
    let h = harness().await;

    // Neither the item nor the user exists, yet the window is reported first.
    let err = h
        .service
        .create_booking(
            404,
            NewBooking {
                item_id: 404,
                start: Some(t0() + Duration::days(2)),
                end: Some(t0() + Duration::days(1)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[traced_test]
#[tokio::test]
async fn user_validation_rejects_blank_names_and_bad_emails() {
    let h = harness().await;

    let err = h
        .service
        .create_user(NewUser {
            name: "  ".into(),
            email: "x@example.com".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let err = h
        .service
        .create_user(NewUser {
            name: "X".into(),
            email: "no-at-sign".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidEmail { .. }));

    let err = h
        .service
        .create_user(NewUser {
            name: "Olga again".into(),
            email: "olga@example.com".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::EmailAlreadyExists { .. }));
}

#[traced_test]
#[tokio::test]
async fn non_owner_cannot_update_item() {
    let h = harness().await;

    let err = h
        .service
        .update_item(h.booker, h.item, Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotItemOwner { .. }));
}
