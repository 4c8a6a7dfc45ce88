//! User role name constants.
//!
//! Roles are stored as plain text in the `users.role` column; these
//! constants are the only legal values.

/// A user who requests bookings for services.
pub const ROLE_CUSTOMER: &str = "customer";

/// A user who owns services and fulfils bookings.
pub const ROLE_PROVIDER: &str = "provider";
