//! Money metrics over the order book
//!
//! Everything here is a pure pass over order snapshots: no store access, no
//! clock reads except the `now` the caller hands in. Summation is
//! commutative, so results never depend on the order the snapshots arrive
//! in, and a recomputation from the same snapshots gives the same answer.

use crate::core::status::OrderStatus;
use crate::entities::order::{ServiceOrder, WeekBucket};
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Summed money figures for a set of orders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Summed budgets
    pub revenue: Decimal,
    /// Summed budget-minus-cost
    pub profit: Decimal,
}

/// Sum revenue and profit over the orders the predicate keeps
pub fn aggregate<'a, I, P>(orders: I, mut include: P) -> Totals
where
    I: IntoIterator<Item = &'a ServiceOrder>,
    P: FnMut(&ServiceOrder) -> bool,
{
    let mut totals = Totals::default();
    for order in orders {
        if include(order) {
            totals.revenue += order.revenue();
            totals.profit += order.profit();
        }
    }
    totals
}

/// Current-vs-previous week figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeeklyComparison {
    pub current: Totals,
    pub previous: Totals,
}

/// Split the order book along the static week label and total each side
///
/// The label is the one assigned at intake; there is no calendar-week
/// arithmetic here.
pub fn weekly_comparison(orders: &[ServiceOrder]) -> WeeklyComparison {
    WeeklyComparison {
        current: aggregate(orders, |o| o.week == WeekBucket::Current),
        previous: aggregate(orders, |o| o.week == WeekBucket::Previous),
    }
}

/// The four headline numbers on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Orders waiting to be picked up by a technician
    pub open: usize,
    /// Orders on a bench right now
    pub in_progress: usize,
    /// Orders whose completion date is `now`'s calendar day
    pub completed_today: usize,
    /// Summed revenue of orders opened in `now`'s calendar month
    pub monthly_revenue: Decimal,
}

/// Compute the dashboard cards from order snapshots
pub fn dashboard_stats(orders: &[ServiceOrder], now: DateTime<Utc>) -> DashboardStats {
    let today = now.date_naive();

    let open = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Open)
        .count();
    let in_progress = orders
        .iter()
        .filter(|o| o.status == OrderStatus::InProgress)
        .count();
    let completed_today = orders
        .iter()
        .filter(|o| o.completed_at.map(|t| t.date_naive()) == Some(today))
        .count();
    let monthly_revenue = aggregate(orders, |o| {
        o.opened_at.year() == now.year() && o.opened_at.month() == now.month()
    })
    .revenue;

    DashboardStats {
        open,
        in_progress,
        completed_today,
        monthly_revenue,
    }
}
