//! Workshop Walkthrough
//!
//! This demo drives the dashboard core the way a counter session does:
//! - log in with the demo credentials
//! - register customers and open service orders
//! - move an order through the bench to completion
//! - read the dashboard cards and the weekly comparison
//! - print the finished order as an HTML document
//!
//! Mutations are also mirrored on the event bus, so the demo subscribes
//! first and drains the feed at the end.

use oficina::prelude::*;
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;

#[tokio::main]
async fn main() -> OficinaResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let workshop = Arc::new(Workshop::new(AppConfig::default_config())?);
    let mut feed = workshop.subscribe();

    println!("🔧 {} service order dashboard\n", workshop.config().business_name);

    // Log in with the demo account
    let session = workshop
        .login("admin@roboticasustentavel.com", "admin123")
        .await?;
    println!("🔑 Session established for {}\n", session.user.name);

    // Register the day's customers
    let maria = workshop.register_customer(
        &session,
        CustomerDraft::new(
            "Maria Santos",
            "(11) 99999-1111",
            "maria.santos@email.com",
            "Rua das Flores, 123",
        ),
    )?;
    let joao = workshop.register_customer(
        &session,
        CustomerDraft::new(
            "João Silva",
            "(11) 98888-2222",
            "joao.silva@email.com",
            "Av. Paulista, 1000",
        ),
    )?;
    println!("👤 Registered {} and {}", maria.name, joao.name);

    // Take in the devices
    let notebook = workshop.open_order(
        &session,
        OrderDraft::new(maria.id, "Notebook repair", "Does not power on")
            .with_budget("280.00")
            .with_cost("180.00", "New power board")
            .with_notes("Customer needs it back before Friday"),
    )?;
    let phone = workshop.open_order(
        &session,
        OrderDraft::new(joao.id, "Phone screen replacement", "Cracked screen")
            .with_budget("150.00"),
    )?;
    println!(
        "📋 Opened {} ({}) and {} ({})",
        notebook.id, notebook.service, phone.id, phone.service
    );

    // Work the notebook through the bench
    workshop.change_order_status(&session, &notebook.id, "In Progress")?;
    workshop.change_order_status(&session, &notebook.id, "Awaiting Parts")?;
    let outcome = workshop.change_order_status(&session, &notebook.id, "Completed")?;
    println!(
        "✅ {} completed at {} (profit: {})",
        outcome.order.id,
        outcome
            .order
            .completed_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        outcome.order.profit()
    );

    // Quick search works across customers and orders
    let hits = workshop.search_orders(&session, "maria")?;
    println!("🔍 Search 'maria' matches {} order(s)", hits.len());

    // Dashboard cards
    let stats = workshop.dashboard(&session)?;
    println!(
        "\n📊 Dashboard: {} open, {} in progress, {} completed today, R$ {} this month",
        stats.open, stats.in_progress, stats.completed_today, stats.monthly_revenue
    );
    let weekly = workshop.weekly_summary(&session)?;
    println!(
        "📈 This week: revenue R$ {} / profit R$ {}",
        weekly.current.revenue, weekly.current.profit
    );

    // Printable order document
    let html = workshop.print_order(&session, &notebook.id)?;
    println!("\n🖨️  Rendered order document ({} bytes of HTML)", html.len());

    // Drain the event feed
    println!("\n📣 Events published during this session:");
    loop {
        match feed.try_recv() {
            Ok(envelope) => println!(
                "   [{}] {} {}",
                envelope.timestamp.format("%H:%M:%S"),
                envelope.event.event_kind(),
                envelope.event.action()
            ),
            Err(TryRecvError::Empty) => break,
            Err(_) => break,
        }
    }

    workshop.logout(&session)?;
    println!("\n👋 Session closed");

    Ok(())
}
