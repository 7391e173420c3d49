//! Order identifiers and their allocation
//!
//! Service orders carry human-facing ids like `OS-001`. The numeric part
//! grows monotonically for the lifetime of the store: deleting an order
//! never frees its number, so an id printed on a paper slip keeps pointing
//! at the same order forever.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

/// Human-facing service order identifier (`OS-001`, `OS-002`, ...)
///
/// Wraps the sequence number and renders it zero-padded to three digits.
/// Numbers past 999 render with their natural width (`OS-1000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(u32);

impl OrderId {
    /// Build an id directly from its sequence number
    pub fn from_sequence(seq: u32) -> Self {
        Self(seq)
    }

    /// The numeric part of the id
    pub fn sequence(&self) -> u32 {
        self.0
    }

    /// Parse an id from its text form, returning `None` when the text
    /// is not of the shape `OS-<digits>`
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix("OS-")?;
        if digits.is_empty() {
            return None;
        }
        digits.parse::<u32>().ok().map(Self)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OS-{:03}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("'{}' is not a valid order id", s))
    }
}

impl TryFrom<String> for OrderId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderId> for String {
    fn from(id: OrderId) -> Self {
        id.to_string()
    }
}

/// Monotonic allocator for [`OrderId`]s
///
/// Hands out ids starting at `OS-001`. [`OrderSequence::observe`] seeds the
/// counter past ids loaded from elsewhere so freshly allocated ids never
/// collide with existing ones.
#[derive(Debug, Default)]
pub struct OrderSequence {
    last: AtomicU32,
}

impl OrderSequence {
    /// Create a sequence that starts at `OS-001`
    pub fn new() -> Self {
        Self {
            last: AtomicU32::new(0),
        }
    }

    /// Allocate the next id
    pub fn next_id(&self) -> OrderId {
        OrderId(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Advance the counter so it never re-issues `id` or anything below it
    pub fn observe(&self, id: OrderId) {
        self.last.fetch_max(id.0, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_zero_pads_to_three_digits() {
        assert_eq!(OrderId::from_sequence(1).to_string(), "OS-001");
        assert_eq!(OrderId::from_sequence(42).to_string(), "OS-042");
        assert_eq!(OrderId::from_sequence(999).to_string(), "OS-999");
        assert_eq!(OrderId::from_sequence(1234).to_string(), "OS-1234");
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = OrderId::from_sequence(7);
        let parsed = OrderId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);

        // Unpadded digits parse too
        assert_eq!(OrderId::parse("OS-7"), Some(OrderId::from_sequence(7)));
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        assert_eq!(OrderId::parse(""), None);
        assert_eq!(OrderId::parse("OS-"), None);
        assert_eq!(OrderId::parse("OS-abc"), None);
        assert_eq!(OrderId::parse("007"), None);
        assert_eq!(OrderId::parse("os-007"), None);
    }

    #[test]
    fn test_serde_uses_text_form() {
        let id = OrderId::from_sequence(3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"OS-003\"");

        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let seq = OrderSequence::new();
        assert_eq!(seq.next_id().to_string(), "OS-001");
        assert_eq!(seq.next_id().to_string(), "OS-002");
        assert_eq!(seq.next_id().to_string(), "OS-003");
    }

    #[test]
    fn test_observe_seeds_past_existing_ids() {
        let seq = OrderSequence::new();
        seq.observe(OrderId::from_sequence(41));
        assert_eq!(seq.next_id().to_string(), "OS-042");

        // Observing a lower id never rolls the counter back
        seq.observe(OrderId::from_sequence(5));
        assert_eq!(seq.next_id().to_string(), "OS-043");
    }
}
