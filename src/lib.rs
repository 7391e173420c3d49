//! # Oficina
//!
//! The dashboard core of a small repair workshop: customer registry,
//! service order book, profit and revenue figures, and a printable order
//! document, all behind a credential-gated session.
//!
//! ## Features
//!
//! - **Customer registry**: register, update and delete customers; deletion
//!   is refused while open orders exist
//! - **Service orders**: `OS-001`-style ids, a flat five-state lifecycle,
//!   completion-date stamping on entry into Completed
//! - **Money as entered**: budget and cost stay text; strict validation on
//!   entry, lenient reading for profit and revenue
//! - **Dashboard metrics**: headline counters, monthly revenue, and a
//!   current-vs-previous week comparison
//! - **Quick search**: case-insensitive substring filter over customers
//!   and orders
//! - **Session gate**: one live session at a time, established through an
//!   async credential check with a timeout
//! - **Event bus**: broadcast notifications for mutations, filtered by the
//!   configured notification toggles
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oficina::prelude::*;
//!
//! let workshop = Workshop::new(AppConfig::default_config())?;
//! let session = workshop.login("admin@roboticasustentavel.com", "admin123").await?;
//!
//! let maria = workshop.register_customer(
//!     &session,
//!     CustomerDraft::new(
//!         "Maria Santos",
//!         "(11) 99999-1111",
//!         "maria@email.com",
//!         "Rua das Flores, 123",
//!     ),
//! )?;
//!
//! let order = workshop.open_order(
//!     &session,
//!     OrderDraft::new(maria.id, "Notebook repair", "Does not power on")
//!         .with_budget("280.00"),
//! )?;
//!
//! workshop.change_order_status(&session, &order.id, "Completed")?;
//! println!("{}", workshop.print_order(&session, &order.id)?);
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod metrics;
pub mod render;
pub mod session;
pub mod storage;
pub mod workshop;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        clock::{Clock, FixedClock, SystemClock},
        error::{
            AmountError, AuthError, EntityError, OficinaError, OficinaResult, StatusError,
            ValidationError,
        },
        events::{CustomerEvent, EventBus, EventEnvelope, OrderEvent, WorkshopEvent},
        field::{FieldFormat, amount_or_zero, parse_amount},
        ids::{OrderId, OrderSequence},
        search::Searchable,
        status::{ALL_STATUSES, OrderStatus},
    };

    // === Entities ===
    pub use crate::entities::{
        customer::{Customer, CustomerDraft},
        order::{OrderDraft, ServiceOrder, StatusChange, WeekBucket},
    };

    // === Metrics ===
    pub use crate::metrics::{DashboardStats, Totals, WeeklyComparison};

    // === Storage ===
    pub use crate::storage::{CustomerStore, OrderStore};

    // === Session ===
    pub use crate::session::{
        CredentialVerifier, Session, SessionGate, StaticCredentialVerifier, UserIdentity,
    };

    // === Config ===
    pub use crate::config::{AppConfig, NotificationSettings, SessionConfig, SmtpConfig};

    // === Documents ===
    pub use crate::render::OrderDocumentRenderer;

    // === Workshop ===
    pub use crate::workshop::{Workshop, WorkshopBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
