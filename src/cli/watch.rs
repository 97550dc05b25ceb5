use super::ui;
use crate::client::PriceClient;
use crate::poller::{PricePollingStore, PriceUpdate};
use anyhow::Result;
use console::Term;
use std::sync::Arc;
use std::time::Duration;

/// Subscribes to the polling store and re-renders the price table on every
/// push until Ctrl-C.
pub async fn run(client: Arc<PriceClient>, interval: Duration) -> Result<()> {
    let store = PricePollingStore::new(client);
    let (subscription, mut updates) = store.subscribe_channel(interval);

    let term = Term::stdout();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = updates.recv() => {
                let Some(update) = update else { break };
                render(&term, &update)?;
            }
        }
    }

    subscription.unsubscribe();
    Ok(())
}

fn render(term: &Term, update: &PriceUpdate) -> Result<()> {
    term.clear_screen()?;

    if update.loading {
        println!("{}", ui::style_text("Loading prices...", ui::StyleType::Subtle));
        return Ok(());
    }

    println!("{}", ui::style_text("Oracle prices", ui::StyleType::Title));
    println!("{}", ui::render_price_table(&update.prices));

    if let Some(error) = &update.error {
        println!(
            "{}",
            ui::style_text(
                &format!("Last refresh failed: {error} (showing last known prices)"),
                ui::StyleType::Error,
            )
        );
    }

    println!(
        "{}",
        ui::style_text(
            &format!(
                "Updated {}  -  Ctrl-C to exit",
                chrono::Local::now().format("%H:%M:%S")
            ),
            ui::StyleType::Subtle,
        )
    );
    Ok(())
}
