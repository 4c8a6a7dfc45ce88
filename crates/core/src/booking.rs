//! Booking lifecycle state machine.
//!
//! A booking starts in [`BookingStatus::Pending`] and moves through the
//! graph below. The legal moves are kept in one table,
//! [`LEGAL_TRANSITIONS`], so the whole move set is auditable and testable
//! in one place rather than scattered across handlers.
//!
//! ```text
//! pending  --provider--> accepted --provider--> completed
//! pending  --provider--> declined
//! pending  --customer--> cancelled
//! ```
//!
//! `declined`, `cancelled`, and `completed` are terminal.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fixed window a provider has to respond to a new booking, in hours.
///
/// `response_due_at` is set to creation time plus this window. It is
/// informational only; nothing transitions a booking when it passes.
pub const RESPONSE_WINDOW_HOURS: i64 = 24;

/// Status of a booking, stored as lowercase text in `bookings.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// The database/wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Declined => "declined",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Parse a stored status value.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "accepted" => Ok(BookingStatus::Accepted),
            "declined" => Ok(BookingStatus::Declined),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(CoreError::Internal(format!(
                "Unknown booking status in store: {other}"
            ))),
        }
    }

    /// Whether no further transition is permitted out of this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Declined | BookingStatus::Cancelled | BookingStatus::Completed
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of a booking the acting user is on.
///
/// Roles are fixed per booking at creation: the customer is the user who
/// created it, the provider is the owner of the referenced service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Customer,
    Provider,
}

/// The complete set of legal `(current, actor, target)` moves.
///
/// Everything not listed here is rejected, including re-issuing an
/// already-applied transition (its source status no longer matches).
pub const LEGAL_TRANSITIONS: &[(BookingStatus, ActorRole, BookingStatus)] = &[
    (BookingStatus::Pending, ActorRole::Provider, BookingStatus::Accepted),
    (BookingStatus::Pending, ActorRole::Provider, BookingStatus::Declined),
    (BookingStatus::Accepted, ActorRole::Provider, BookingStatus::Completed),
    (BookingStatus::Pending, ActorRole::Customer, BookingStatus::Cancelled),
];

/// Validate a status transition against [`LEGAL_TRANSITIONS`].
///
/// Returns `CoreError::InvalidTransition` for any move outside the table.
pub fn check_transition(
    current: BookingStatus,
    actor: ActorRole,
    target: BookingStatus,
) -> Result<(), CoreError> {
    let legal = LEGAL_TRANSITIONS
        .iter()
        .any(|&(from, role, to)| from == current && role == actor && to == target);

    if legal {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            from: current.as_str().to_string(),
            to: target.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Accepted,
        BookingStatus::Declined,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    #[test]
    fn provider_moves_from_pending() {
        assert!(check_transition(
            BookingStatus::Pending,
            ActorRole::Provider,
            BookingStatus::Accepted
        )
        .is_ok());
        assert!(check_transition(
            BookingStatus::Pending,
            ActorRole::Provider,
            BookingStatus::Declined
        )
        .is_ok());
    }

    #[test]
    fn provider_completes_accepted_only() {
        assert!(check_transition(
            BookingStatus::Accepted,
            ActorRole::Provider,
            BookingStatus::Completed
        )
        .is_ok());

        // Completion straight from pending must be impossible.
        assert!(check_transition(
            BookingStatus::Pending,
            ActorRole::Provider,
            BookingStatus::Completed
        )
        .is_err());
    }

    #[test]
    fn customer_may_only_cancel_pending() {
        assert!(check_transition(
            BookingStatus::Pending,
            ActorRole::Customer,
            BookingStatus::Cancelled
        )
        .is_ok());

        for from in [
            BookingStatus::Accepted,
            BookingStatus::Declined,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert!(
                check_transition(from, ActorRole::Customer, BookingStatus::Cancelled).is_err(),
                "cancel from {from} should be rejected"
            );
        }
    }

    #[test]
    fn customer_cannot_use_provider_moves() {
        assert!(check_transition(
            BookingStatus::Pending,
            ActorRole::Customer,
            BookingStatus::Accepted
        )
        .is_err());
        assert!(check_transition(
            BookingStatus::Pending,
            ActorRole::Customer,
            BookingStatus::Declined
        )
        .is_err());
        assert!(check_transition(
            BookingStatus::Accepted,
            ActorRole::Customer,
            BookingStatus::Completed
        )
        .is_err());
    }

    #[test]
    fn no_moves_out_of_terminal_states() {
        for from in ALL_STATUSES.iter().filter(|s| s.is_terminal()) {
            for to in ALL_STATUSES {
                for role in [ActorRole::Customer, ActorRole::Provider] {
                    assert!(
                        check_transition(*from, role, to).is_err(),
                        "{from} -> {to} should be rejected"
                    );
                }
            }
        }
    }

    #[test]
    fn repeated_transition_is_rejected() {
        // First accept succeeds; re-issuing it from the new status fails
        // because `accepted -> accepted` is not in the table.
        assert!(check_transition(
            BookingStatus::Pending,
            ActorRole::Provider,
            BookingStatus::Accepted
        )
        .is_ok());
        assert!(check_transition(
            BookingStatus::Accepted,
            ActorRole::Provider,
            BookingStatus::Accepted
        )
        .is_err());
    }

    #[test]
    fn terminal_flags() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Accepted.is_terminal());
        assert!(BookingStatus::Declined.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in ALL_STATUSES {
            let parsed = BookingStatus::parse(status.as_str()).expect("should parse");
            assert_eq!(parsed, status);
        }
        assert!(BookingStatus::parse("archived").is_err());
    }

    #[test]
    fn invalid_transition_error_names_both_states() {
        let err = check_transition(
            BookingStatus::Declined,
            ActorRole::Provider,
            BookingStatus::Accepted,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid booking transition: declined -> accepted"
        );
    }
}
