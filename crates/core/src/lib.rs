//! Domain logic shared by every Servly crate.
//!
//! Contains the id/timestamp aliases, the [`CoreError`](error::CoreError)
//! taxonomy, role name constants, and the booking lifecycle state machine.

pub mod booking;
pub mod error;
pub mod roles;
pub mod types;
