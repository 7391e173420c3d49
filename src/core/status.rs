//! Service order status enumeration
//!
//! The lifecycle is a flat five-state machine: every state may move to every
//! other state (and to itself). There is no transition table to maintain;
//! the only transition side effect, completion stamping, lives with the
//! order model.

use crate::core::error::StatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a service order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    InProgress,
    AwaitingParts,
    Completed,
    Cancelled,
}

/// Every status, in the order the intake form offers them
pub const ALL_STATUSES: [OrderStatus; 5] = [
    OrderStatus::Open,
    OrderStatus::InProgress,
    OrderStatus::AwaitingParts,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
];

impl OrderStatus {
    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Open => "Open",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::AwaitingParts => "Awaiting Parts",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse a status from its label or its snake_case token
    ///
    /// Matching is case-insensitive. Anything outside the closed set is an
    /// error; there is no catch-all status.
    pub fn parse(text: &str) -> Result<Self, StatusError> {
        match text.to_lowercase().as_str() {
            "open" => Ok(OrderStatus::Open),
            "in progress" | "in_progress" => Ok(OrderStatus::InProgress),
            "awaiting parts" | "awaiting_parts" => Ok(OrderStatus::AwaitingParts),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(StatusError::InvalidStatus {
                value: text.to_string(),
            }),
        }
    }

    /// Whether an order in this status still counts as open work
    ///
    /// Open, in-progress and awaiting-parts orders block customer deletion
    /// and feed the dashboard's open counters.
    pub fn is_open(&self) -> bool {
        !matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_labels_and_tokens() {
        assert_eq!(OrderStatus::parse("Open").unwrap(), OrderStatus::Open);
        assert_eq!(
            OrderStatus::parse("In Progress").unwrap(),
            OrderStatus::InProgress
        );
        assert_eq!(
            OrderStatus::parse("awaiting_parts").unwrap(),
            OrderStatus::AwaitingParts
        );
        assert_eq!(
            OrderStatus::parse("COMPLETED").unwrap(),
            OrderStatus::Completed
        );
        assert_eq!(
            OrderStatus::parse("cancelled").unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn test_parse_rejects_anything_else() {
        for bad in ["", "Fixed", "open ", "done", "in-progress"] {
            let err = OrderStatus::parse(bad).unwrap_err();
            match err {
                StatusError::InvalidStatus { value } => assert_eq!(value, bad),
            }
        }
    }

    #[test]
    fn test_is_open_excludes_terminal_states() {
        assert!(OrderStatus::Open.is_open());
        assert!(OrderStatus::InProgress.is_open());
        assert!(OrderStatus::AwaitingParts.is_open());
        assert!(!OrderStatus::Completed.is_open());
        assert!(!OrderStatus::Cancelled.is_open());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&OrderStatus::AwaitingParts).unwrap();
        assert_eq!(json, "\"awaiting_parts\"");

        let back: OrderStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(back, OrderStatus::InProgress);
    }

    #[test]
    fn test_all_statuses_covers_the_enum() {
        assert_eq!(ALL_STATUSES.len(), 5);
        for status in ALL_STATUSES {
            // label and parse agree for every member
            assert_eq!(OrderStatus::parse(status.label()).unwrap(), status);
        }
    }
}
