//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod booking_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod rating_repo;
pub mod service_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use message_repo::MessageRepo;
pub use notification_repo::NotificationRepo;
pub use rating_repo::RatingRepo;
pub use service_repo::ServiceRepo;
pub use user_repo::UserRepo;
