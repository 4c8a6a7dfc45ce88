//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts where one is needed

pub mod booking;
pub mod message;
pub mod notification;
pub mod rating;
pub mod service;
pub mod user;
