use super::ui;
use crate::client::PriceClient;
use anyhow::{Context, Result};
use chrono::DateTime;

pub async fn run(
    client: &PriceClient,
    from: &str,
    to: &str,
    asset_id: Option<&str>,
) -> Result<()> {
    DateTime::parse_from_rfc3339(from)
        .with_context(|| format!("Invalid --from timestamp: {from}"))?;
    DateTime::parse_from_rfc3339(to).with_context(|| format!("Invalid --to timestamp: {to}"))?;

    let pb = ui::new_spinner("Exporting audit prices...");
    let payload = client.get_audit_prices(from, to, asset_id).await;
    pb.finish_and_clear();

    // Unlike the polled views, audit failures surface directly: this is an
    // explicit one-shot action and the user can simply retry it.
    let payload = payload.context("Audit export failed; please retry")?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
