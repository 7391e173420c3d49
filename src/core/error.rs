//! Typed error handling for the oficina core
//!
//! This module provides a typed error hierarchy so callers (the view layer)
//! can handle failures specifically instead of matching on strings.
//!
//! # Error Categories
//!
//! - [`StatusError`]: status strings outside the closed enumeration
//! - [`AmountError`]: budget/cost text that fails strict decimal parsing
//! - [`AuthError`]: session gate failures (missing/invalid credentials,
//!   verifier timeout, serialized login, stale capability)
//! - [`EntityError`]: customer/order lookups and the deletion policy
//! - [`ValidationError`]: draft field validation
//! - [`ConfigError`]: configuration parsing and IO
//! - [`RenderError`]: printable-document rendering
//!
//! Every error is a recoverable value. Nothing in the core is fatal: the
//! caller re-prompts with corrected input and tries again.
//!
//! # Example
//!
//! ```rust,ignore
//! use oficina::prelude::*;
//!
//! match workshop.change_order_status(&session, &id, "Fixed") {
//!     Ok(outcome) => println!("changed: {}", outcome.changed),
//!     Err(OficinaError::Status(StatusError::InvalidStatus { value })) => {
//!         eprintln!("'{}' is not a known status", value);
//!     }
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use crate::core::ids::OrderId;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for the oficina core
///
/// Each variant wraps a more specific error type for that category.
#[derive(Debug)]
pub enum OficinaError {
    /// Status change requests outside the enumeration
    Status(StatusError),

    /// Budget/cost amount parsing
    Amount(AmountError),

    /// Session gate failures
    Auth(AuthError),

    /// Customer/order operations
    Entity(EntityError),

    /// Draft field validation
    Validation(ValidationError),

    /// Configuration errors
    Config(ConfigError),

    /// Document rendering errors
    Render(RenderError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for OficinaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OficinaError::Status(e) => write!(f, "{}", e),
            OficinaError::Amount(e) => write!(f, "{}", e),
            OficinaError::Auth(e) => write!(f, "{}", e),
            OficinaError::Entity(e) => write!(f, "{}", e),
            OficinaError::Validation(e) => write!(f, "{}", e),
            OficinaError::Config(e) => write!(f, "{}", e),
            OficinaError::Render(e) => write!(f, "{}", e),
            OficinaError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for OficinaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OficinaError::Status(e) => Some(e),
            OficinaError::Amount(e) => Some(e),
            OficinaError::Auth(e) => Some(e),
            OficinaError::Entity(e) => Some(e),
            OficinaError::Validation(e) => Some(e),
            OficinaError::Config(e) => Some(e),
            OficinaError::Render(e) => Some(e),
            OficinaError::Internal(_) => None,
        }
    }
}

impl OficinaError {
    /// Get the stable error code for this error
    ///
    /// Codes are what the view layer keys its messages on; they never change
    /// even when the display text does.
    pub fn error_code(&self) -> &'static str {
        match self {
            OficinaError::Status(e) => e.error_code(),
            OficinaError::Amount(_) => "MALFORMED_AMOUNT",
            OficinaError::Auth(e) => e.error_code(),
            OficinaError::Entity(e) => e.error_code(),
            OficinaError::Validation(_) => "VALIDATION_ERROR",
            OficinaError::Config(_) => "CONFIG_ERROR",
            OficinaError::Render(_) => "RENDER_ERROR",
            OficinaError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get additional structured details for the error, when they exist
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            OficinaError::Entity(EntityError::CustomerNotFound { id }) => {
                Some(serde_json::json!({ "customer_id": id.to_string() }))
            }
            OficinaError::Entity(EntityError::OrderNotFound { id }) => {
                Some(serde_json::json!({ "order_id": id.to_string() }))
            }
            OficinaError::Entity(EntityError::UnknownCustomer { id }) => {
                Some(serde_json::json!({ "customer_id": id.to_string() }))
            }
            OficinaError::Entity(EntityError::CustomerHasOpenOrders { id, open }) => {
                Some(serde_json::json!({
                    "customer_id": id.to_string(),
                    "open_orders": open
                }))
            }
            OficinaError::Amount(AmountError::Malformed { field, value }) => {
                Some(serde_json::json!({ "field": field, "value": value }))
            }
            OficinaError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Status Errors
// =============================================================================

/// Errors related to the status state machine
#[derive(Debug)]
pub enum StatusError {
    /// The requested status is outside the closed enumeration
    InvalidStatus { value: String },
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusError::InvalidStatus { value } => {
                write!(f, "'{}' is not a valid order status", value)
            }
        }
    }
}

impl std::error::Error for StatusError {}

impl StatusError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StatusError::InvalidStatus { .. } => "INVALID_STATUS",
        }
    }
}

impl From<StatusError> for OficinaError {
    fn from(err: StatusError) -> Self {
        OficinaError::Status(err)
    }
}

// =============================================================================
// Amount Errors
// =============================================================================

/// Errors related to budget/cost amount parsing
///
/// Fires on the mutation path only: `profit`/`revenue` use the lenient
/// zero-coercing parse and never fail.
#[derive(Debug)]
pub enum AmountError {
    /// The field does not parse as a non-negative decimal
    Malformed { field: String, value: String },
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Malformed { field, value } => {
                write!(
                    f,
                    "'{}' is not a non-negative decimal amount for field '{}'",
                    value, field
                )
            }
        }
    }
}

impl std::error::Error for AmountError {}

impl From<AmountError> for OficinaError {
    fn from(err: AmountError) -> Self {
        OficinaError::Amount(err)
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors reported by the session gate
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Email or password was empty
    MissingCredentials,

    /// The credential verifier rejected the pair
    InvalidCredentials,

    /// The credential verifier did not answer within the configured bound
    Timeout { waited_ms: u64 },

    /// Another login attempt is already in flight
    LoginInProgress,

    /// The supplied session capability is not the gate's current session
    SessionExpired,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => {
                write!(f, "Email and password are both required")
            }
            AuthError::InvalidCredentials => {
                write!(f, "Email or password is incorrect")
            }
            AuthError::Timeout { waited_ms } => {
                write!(f, "Credential check timed out after {}ms", waited_ms)
            }
            AuthError::LoginInProgress => {
                write!(f, "A login attempt is already in progress")
            }
            AuthError::SessionExpired => {
                write!(f, "The session is no longer valid; log in again")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "MISSING_CREDENTIALS",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Timeout { .. } => "CREDENTIAL_CHECK_TIMEOUT",
            AuthError::LoginInProgress => "LOGIN_IN_PROGRESS",
            AuthError::SessionExpired => "SESSION_EXPIRED",
        }
    }
}

impl From<AuthError> for OficinaError {
    fn from(err: AuthError) -> Self {
        OficinaError::Auth(err)
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to customer and order operations
#[derive(Debug)]
pub enum EntityError {
    /// Customer was not found
    CustomerNotFound { id: Uuid },

    /// Order was not found
    OrderNotFound { id: OrderId },

    /// An order intake referenced a customer that is not registered
    UnknownCustomer { id: Uuid },

    /// Deletion refused: the customer still has open orders
    CustomerHasOpenOrders { id: Uuid, open: usize },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::CustomerNotFound { id } => {
                write!(f, "customer with id '{}' not found", id)
            }
            EntityError::OrderNotFound { id } => {
                write!(f, "service order '{}' not found", id)
            }
            EntityError::UnknownCustomer { id } => {
                write!(f, "cannot open an order for unknown customer '{}'", id)
            }
            EntityError::CustomerHasOpenOrders { id, open } => {
                write!(
                    f,
                    "customer '{}' still has {} open order(s) and cannot be deleted",
                    id, open
                )
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::CustomerNotFound { .. } => "CUSTOMER_NOT_FOUND",
            EntityError::OrderNotFound { .. } => "ORDER_NOT_FOUND",
            EntityError::UnknownCustomer { .. } => "UNKNOWN_CUSTOMER",
            EntityError::CustomerHasOpenOrders { .. } => "CUSTOMER_HAS_OPEN_ORDERS",
        }
    }
}

impl From<EntityError> for OficinaError {
    fn from(err: EntityError) -> Self {
        OficinaError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to draft (form input) validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for OficinaError {
    fn from(err: ValidationError) -> Self {
        OficinaError::Validation(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for OficinaError {
    fn from(err: ConfigError) -> Self {
        OficinaError::Config(err)
    }
}

// =============================================================================
// Render Errors
// =============================================================================

/// Errors related to printable-document rendering
#[derive(Debug)]
pub enum RenderError {
    /// Template compilation or rendering failed
    TemplateError { message: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TemplateError { message } => {
                write!(f, "Failed to render order document: {}", message)
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<RenderError> for OficinaError {
    fn from(err: RenderError) -> Self {
        OficinaError::Render(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for OficinaError {
    fn from(err: serde_yaml::Error) -> Self {
        OficinaError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for OficinaError {
    fn from(err: std::io::Error) -> Self {
        OficinaError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<tera::Error> for OficinaError {
    fn from(err: tera::Error) -> Self {
        OficinaError::Render(RenderError::TemplateError {
            message: err.to_string(),
        })
    }
}

/// Convert from anyhow::Error at the store lock seam
impl From<anyhow::Error> for OficinaError {
    fn from(err: anyhow::Error) -> Self {
        OficinaError::Internal(err.to_string())
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for oficina operations
pub type OficinaResult<T> = Result<T, OficinaError>;

// =============================================================================
// Tests
// =============================================================================
