//! Service order entity and its lifecycle rules
//!
//! The order is the workbench record: what came in, what is wrong with it,
//! what was quoted, what it cost, and where it sits in the five-state
//! lifecycle. Budget and cost stay as the text the clerk typed; the numeric
//! reading happens in [`profit`](ServiceOrder::profit) and
//! [`revenue`](ServiceOrder::revenue).

use crate::core::error::{FieldValidationError, OficinaResult, ValidationError};
use crate::core::field::{amount_or_zero, parse_amount};
use crate::core::ids::OrderId;
use crate::core::search::Searchable;
use crate::core::status::OrderStatus;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which comparison bucket an order's numbers land in
///
/// The label is assigned at intake and never derived from the calendar;
/// "current" stays current until someone rebuckets the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekBucket {
    Current,
    Previous,
}

impl fmt::Display for WeekBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekBucket::Current => write!(f, "Current"),
            WeekBucket::Previous => write!(f, "Previous"),
        }
    }
}

impl Default for WeekBucket {
    fn default() -> Self {
        WeekBucket::Current
    }
}

/// A service order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    /// Human-facing id ("OS-001")
    pub id: OrderId,
    /// Owning customer
    pub customer_id: Uuid,
    /// Customer name as it was at intake; kept even if the customer record
    /// is later deleted
    pub customer_name: String,
    /// What the customer asked for
    pub service: String,
    /// The reported defect
    pub defect: String,
    /// Quoted budget, as entered
    pub budget: String,
    /// Parts/labor cost, as entered (often empty at intake)
    pub cost: String,
    /// What the cost covers
    pub cost_description: String,
    /// Lifecycle state
    pub status: OrderStatus,
    /// When the order was taken in
    pub opened_at: DateTime<Utc>,
    /// Stamped on entry into Completed; never cleared afterwards
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Weekly comparison bucket
    pub week: WeekBucket,
}

/// Outcome of a status change request
///
/// `changed` is false when the requested status was already the current one;
/// callers use it to skip notifications for no-op requests.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub order: ServiceOrder,
    /// The status the order was in before the request
    pub previous: OrderStatus,
    pub changed: bool,
}

impl ServiceOrder {
    /// Build an order from a validated draft
    pub fn from_draft(
        draft: OrderDraft,
        id: OrderId,
        customer_name: impl Into<String>,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id: draft.customer_id,
            customer_name: customer_name.into(),
            service: draft.service,
            defect: draft.defect,
            budget: draft.budget,
            cost: draft.cost,
            cost_description: draft.cost_description,
            status: OrderStatus::Open,
            opened_at,
            completed_at: None,
            notes: draft.notes,
            week: draft.week,
        }
    }

    /// Move the order to `new_status`, stamping the completion date on
    /// entry into Completed
    ///
    /// Every state may move to every other state. The stamp is written only
    /// when the order was not already Completed, and it is never cleared:
    /// cancelling or reopening a completed order keeps the old date. An
    /// order that is reopened and completed again gets a fresh stamp.
    pub fn apply_status(mut self, new_status: OrderStatus, now: DateTime<Utc>) -> StatusChange {
        let previous = self.status;
        let changed = previous != new_status;
        if new_status == OrderStatus::Completed && previous != OrderStatus::Completed {
            self.completed_at = Some(now);
        }
        self.status = new_status;
        StatusChange {
            order: self,
            previous,
            changed,
        }
    }

    /// Whether the order still counts as open work
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Budget minus cost, read leniently and rounded to 2 decimal places
    ///
    /// Unparseable text counts as zero, so an order with no cost yet shows
    /// its full budget as profit. The result can be negative when the cost
    /// ran past the quote.
    pub fn profit(&self) -> Decimal {
        (amount_or_zero(&self.budget) - amount_or_zero(&self.cost))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// The money side of the order: its budget, read leniently
    pub fn revenue(&self) -> Decimal {
        amount_or_zero(&self.budget)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl Searchable for ServiceOrder {
    fn indexed_fields() -> &'static [&'static str] {
        &["id", "customer_name", "service"]
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "customer_name" => Some(self.customer_name.clone()),
            "service" => Some(self.service.clone()),
            _ => None,
        }
    }
}

/// Intake form input, validated before a [`ServiceOrder`] exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_id: Uuid,
    pub service: String,
    pub defect: String,
    /// Quoted budget; empty means "not quoted yet"
    pub budget: String,
    /// Cost; empty means "not known yet"
    pub cost: String,
    pub cost_description: String,
    pub notes: Option<String>,
    pub week: WeekBucket,
}

impl OrderDraft {
    pub fn new(customer_id: Uuid, service: impl Into<String>, defect: impl Into<String>) -> Self {
        Self {
            customer_id,
            service: service.into(),
            defect: defect.into(),
            budget: String::new(),
            cost: String::new(),
            cost_description: String::new(),
            notes: None,
            week: WeekBucket::Current,
        }
    }

    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = budget.into();
        self
    }

    pub fn with_cost(
        mut self,
        cost: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.cost = cost.into();
        self.cost_description = description.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_week(mut self, week: WeekBucket) -> Self {
        self.week = week;
        self
    }

    /// Validate the draft
    ///
    /// Service and defect are required. Budget and cost may be empty, but
    /// once filled they must be non-negative decimals; that strictness lives
    /// on the entry path only, reads stay lenient.
    pub fn validate(&self) -> OficinaResult<()> {
        let mut errors = Vec::new();

        if self.service.trim().is_empty() {
            errors.push(FieldValidationError {
                field: "service".to_string(),
                message: "required".to_string(),
            });
        }

        if self.defect.trim().is_empty() {
            errors.push(FieldValidationError {
                field: "defect".to_string(),
                message: "required".to_string(),
            });
        }

        if !errors.is_empty() {
            return Err(ValidationError::FieldErrors(errors).into());
        }

        if !self.budget.trim().is_empty() {
            parse_amount("budget", &self.budget)?;
        }
        if !self.cost.trim().is_empty() {
            parse_amount("cost", &self.cost)?;
        }

        Ok(())
    }
}
