//! SeaORM-backed repository implementations for the domain ports.
//!
//! Each repository is generic over `C: ConnectionTrait`, so it can be built
//! on a `DatabaseConnection` or any other connection handle the caller owns.

mod bookings;
mod comments;
mod items;
mod requests;
mod users;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use bookings::SeaOrmBookingsRepository;
pub use comments::SeaOrmCommentsRepository;
pub use items::SeaOrmItemsRepository;
pub use requests::SeaOrmRequestsRepository;
pub use users::SeaOrmUsersRepository;

use crate::domain::repo::Repositories;

/// Wire every port to the same connection pool.
pub fn repositories(conn: DatabaseConnection) -> Repositories {
    Repositories {
        users: Arc::new(SeaOrmUsersRepository::new(conn.clone())),
        items: Arc::new(SeaOrmItemsRepository::new(conn.clone())),
        bookings: Arc::new(SeaOrmBookingsRepository::new(conn.clone())),
        comments: Arc::new(SeaOrmCommentsRepository::new(conn.clone())),
        requests: Arc::new(SeaOrmRequestsRepository::new(conn)),
    }
}
