//! Printable service order documents
//!
//! Renders the one-page HTML slip that gets printed and handed to the
//! customer at the counter. Templates go through Tera with autoescaping on,
//! so whatever a clerk typed into a name or defect field comes out inert.

use crate::core::error::OficinaResult;
use crate::entities::order::ServiceOrder;
use chrono::{DateTime, Utc};
use tera::{Context, Tera};

const ORDER_TEMPLATE_NAME: &str = "order_document.html";

const ORDER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{ order_id }} - {{ business_name }}</title>
  <style>
    body { font-family: sans-serif; margin: 2em; color: #222; }
    h1 { font-size: 1.4em; border-bottom: 2px solid #222; padding-bottom: 0.3em; }
    table { border-collapse: collapse; width: 100%; margin-top: 1em; }
    td { padding: 0.4em 0.6em; border-bottom: 1px solid #ddd; vertical-align: top; }
    td.label { width: 11em; font-weight: bold; }
    .footer { margin-top: 2em; font-size: 0.8em; color: #666; }
  </style>
</head>
<body>
  <h1>{{ business_name }} &mdash; Service Order {{ order_id }}</h1>
  <table>
    <tr><td class="label">Customer</td><td>{{ customer_name }}</td></tr>
    <tr><td class="label">Service</td><td>{{ service }}</td></tr>
    <tr><td class="label">Reported defect</td><td>{{ defect }}</td></tr>
    <tr><td class="label">Budget</td><td>{{ budget }}</td></tr>
    <tr><td class="label">Cost</td><td>{{ cost }}</td></tr>
    {% if cost_description %}<tr><td class="label">Cost covers</td><td>{{ cost_description }}</td></tr>{% endif %}
    <tr><td class="label">Estimated profit</td><td>{{ profit }}</td></tr>
    <tr><td class="label">Status</td><td>{{ status }}</td></tr>
    <tr><td class="label">Opened</td><td>{{ opened_at }}</td></tr>
    {% if completed_at %}<tr><td class="label">Completed</td><td>{{ completed_at }}</td></tr>{% endif %}
    {% if notes %}<tr><td class="label">Notes</td><td>{{ notes }}</td></tr>{% endif %}
  </table>
  <p class="footer">Printed {{ printed_at }}</p>
</body>
</html>
"#;

/// Renders service orders into printable HTML
pub struct OrderDocumentRenderer {
    tera: Tera,
    business_name: String,
}

impl OrderDocumentRenderer {
    /// Build a renderer stamping documents with `business_name`
    pub fn new(business_name: impl Into<String>) -> OficinaResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(ORDER_TEMPLATE_NAME, ORDER_TEMPLATE)?;
        Ok(Self {
            tera,
            business_name: business_name.into(),
        })
    }

    /// Render one order as a printable HTML document
    pub fn render(&self, order: &ServiceOrder, printed_at: DateTime<Utc>) -> OficinaResult<String> {
        let mut ctx = Context::new();
        ctx.insert("business_name", &self.business_name);
        ctx.insert("order_id", &order.id.to_string());
        ctx.insert("customer_name", &order.customer_name);
        ctx.insert("service", &order.service);
        ctx.insert("defect", &order.defect);
        ctx.insert("budget", &display_amount(&order.budget));
        ctx.insert("cost", &display_amount(&order.cost));
        ctx.insert("cost_description", &order.cost_description);
        ctx.insert("profit", &order.profit().to_string());
        ctx.insert("status", order.status.label());
        ctx.insert("opened_at", &format_instant(order.opened_at));
        ctx.insert("completed_at", &order.completed_at.map(format_instant));
        ctx.insert("notes", &order.notes);
        ctx.insert("printed_at", &format_instant(printed_at));

        Ok(self.tera.render(ORDER_TEMPLATE_NAME, &ctx)?)
    }
}

fn display_amount(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "-".to_string()
    } else {
        trimmed.to_string()
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::OrderId;
    use crate::core::status::OrderStatus;
    use crate::entities::order::OrderDraft;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn sample_order() -> ServiceOrder {
        let draft = OrderDraft::new(Uuid::new_v4(), "Screen replacement", "Cracked screen")
            .with_budget("280.00")
            .with_cost("180.00", "Replacement panel")
            .with_notes("Handle with care");
        ServiceOrder::from_draft(
            draft,
            OrderId::from_sequence(7),
            "Maria Santos",
            Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_document_carries_the_order() {
        let renderer = OrderDocumentRenderer::new("Robótica Sustentável").unwrap();
        let printed_at = Utc.with_ymd_and_hms(2024, 5, 12, 15, 30, 0).unwrap();

        let html = renderer.render(&sample_order(), printed_at).unwrap();

        assert!(html.contains("Robótica Sustentável"));
        assert!(html.contains("OS-007"));
        assert!(html.contains("Maria Santos"));
        assert!(html.contains("Screen replacement"));
        assert!(html.contains("280.00"));
        assert!(html.contains("100.00")); // profit
        assert!(html.contains("Open"));
        assert!(html.contains("2024-05-12 15:30"));
        assert!(html.contains("Handle with care"));
        // Not completed yet, so no completion row
        assert!(!html.contains("Completed</td>"));
    }

    #[test]
    fn test_completed_order_shows_its_date() {
        let renderer = OrderDocumentRenderer::new("Robótica Sustentável").unwrap();
        let completed_at = Utc.with_ymd_and_hms(2024, 5, 11, 17, 45, 0).unwrap();
        let order = sample_order()
            .apply_status(OrderStatus::Completed, completed_at)
            .order;

        let html = renderer.render(&order, Utc::now()).unwrap();
        assert!(html.contains("2024-05-11 17:45"));
        assert!(html.contains(OrderStatus::Completed.label()));
    }

    #[test]
    fn test_empty_amounts_render_as_dashes() {
        let renderer = OrderDocumentRenderer::new("Robótica Sustentável").unwrap();
        let draft = OrderDraft::new(Uuid::new_v4(), "Diagnostics", "Unknown fault");
        let order = ServiceOrder::from_draft(
            draft,
            OrderId::from_sequence(1),
            "João Silva",
            Utc::now(),
        );

        let html = renderer.render(&order, Utc::now()).unwrap();
        assert!(html.contains("<td>-</td>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let renderer = OrderDocumentRenderer::new("Bench & Board").unwrap();
        let mut order = sample_order();
        order.defect = "<script>alert(1)</script>".to_string();

        let html = renderer.render(&order, Utc::now()).unwrap();
        assert!(html.contains("Bench &amp; Board"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
