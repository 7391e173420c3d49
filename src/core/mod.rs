//! Core module containing the fundamental traits and types

pub mod clock;
pub mod error;
pub mod events;
pub mod field;
pub mod ids;
pub mod search;
pub mod status;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{
    AmountError, AuthError, ConfigError, EntityError, FieldValidationError, OficinaError,
    OficinaResult, RenderError, StatusError, ValidationError,
};
pub use events::{CustomerEvent, EventBus, EventEnvelope, OrderEvent, WorkshopEvent};
pub use field::{FieldFormat, amount_or_zero, parse_amount};
pub use ids::{OrderId, OrderSequence};
pub use search::Searchable;
pub use status::{ALL_STATUSES, OrderStatus};
