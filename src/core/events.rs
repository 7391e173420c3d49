//! Internal event system for change notifications
//!
//! The EventBus decouples mutations (intake, status changes, customer
//! registration) from whatever wants to react to them (a notification
//! mailer, an activity feed, a test). It uses `tokio::sync::broadcast`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let event_bus = EventBus::new(1024);
//!
//! // Subscribe to events
//! let mut rx = event_bus.subscribe();
//!
//! // Publish an event (non-blocking, fire-and-forget)
//! event_bus.publish(WorkshopEvent::Order(OrderEvent::Created {
//!     order_id: OrderId::from_sequence(1),
//!     customer_id: Uuid::new_v4(),
//!     service: "Screen replacement".to_string(),
//! }));
//!
//! // Receive events
//! if let Ok(envelope) = rx.recv().await {
//!     println!("Received: {:?}", envelope.event);
//! }
//! ```

use crate::core::ids::OrderId;
use crate::core::status::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

/// Events related to service order mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrderEvent {
    /// An order was taken in
    Created {
        order_id: OrderId,
        customer_id: Uuid,
        service: String,
    },
    /// An order actually moved to a different status
    StatusChanged {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
        /// Set when this change stamped the completion date
        completed_at: Option<DateTime<Utc>>,
    },
    /// An order was deleted
    Deleted { order_id: OrderId },
}

/// Events related to customer mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CustomerEvent {
    /// A customer was registered
    Registered { customer_id: Uuid, name: String },
    /// A customer's contact data was updated
    Updated { customer_id: Uuid },
    /// A customer was deleted
    Deleted { customer_id: Uuid },
}

/// Top-level event that wraps order and customer events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkshopEvent {
    /// A service order event
    Order(OrderEvent),
    /// A customer event
    Customer(CustomerEvent),
}

impl WorkshopEvent {
    /// Get the event kind name
    pub fn event_kind(&self) -> &str {
        match self {
            WorkshopEvent::Order(_) => "order",
            WorkshopEvent::Customer(_) => "customer",
        }
    }

    /// Get the order id this event relates to (if applicable)
    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            WorkshopEvent::Order(e) => match e {
                OrderEvent::Created { order_id, .. }
                | OrderEvent::StatusChanged { order_id, .. }
                | OrderEvent::Deleted { order_id } => Some(*order_id),
            },
            WorkshopEvent::Customer(_) => None,
        }
    }

    /// Get the action name (created, status_changed, registered, ...)
    pub fn action(&self) -> &str {
        match self {
            WorkshopEvent::Order(e) => match e {
                OrderEvent::Created { .. } => "created",
                OrderEvent::StatusChanged { .. } => "status_changed",
                OrderEvent::Deleted { .. } => "deleted",
            },
            WorkshopEvent::Customer(e) => match e {
                CustomerEvent::Registered { .. } => "registered",
                CustomerEvent::Updated { .. } => "updated",
                CustomerEvent::Deleted { .. } => "deleted",
            },
        }
    }
}

/// Envelope wrapping a workshop event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: WorkshopEvent,
}

impl EventEnvelope {
    /// Create a new event envelope
    pub fn new(event: WorkshopEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Uses `tokio::sync::broadcast` which allows multiple receivers and is
/// designed for exactly this kind of pub/sub pattern.
///
/// The bus is cheap to clone (Arc internally) and can be shared across threads.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// This is non-blocking and will never fail. If there are no subscribers,
    /// the event is simply dropped. If subscribers are lagging, they will
    /// receive a `Lagged` error on their next recv().
    ///
    /// Returns the number of receivers that will receive the event.
    pub fn publish(&self, event: WorkshopEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() returns Err only if there are no receivers, which is fine
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events
    ///
    /// Returns a receiver that will get all future events published to the bus.
    /// Events published before this call are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Subscribe as a `Stream`, for consumers that iterate instead of recv()
    pub fn stream(&self) -> BroadcastStream<EventEnvelope> {
        BroadcastStream::new(self.sender.subscribe())
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
