//! HTTP handler functions, grouped by resource.

pub mod auth;
pub mod bookings;
pub mod messages;
pub mod notifications;
pub mod ratings;
pub mod services;
