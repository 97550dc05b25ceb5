use super::ui;
use crate::client::PriceClient;
use anyhow::{Context, Result};

pub async fn run(client: &PriceClient) -> Result<()> {
    let pb = ui::new_spinner("Fetching prices...");
    let prices = client.get_all_token_prices().await;
    pb.finish_and_clear();

    let prices = prices.context("Failed to fetch the price list")?;
    println!("{}", ui::render_price_table(&prices));
    Ok(())
}
