use super::ui;
use crate::client::PriceClient;
use anyhow::{Context, Result};
use comfy_table::Cell;

pub async fn run(client: &PriceClient) -> Result<()> {
    let pb = ui::new_spinner("Fetching asset catalog...");
    let assets = client.get_assets().await;
    pb.finish_and_clear();

    let assets = assets.context("Failed to fetch the asset catalog")?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Asset ID"),
        ui::header_cell("Pair"),
        ui::header_cell("Address"),
    ]);

    for asset in assets {
        let address = asset.address.as_deref().map_or_else(ui::na_cell, Cell::new);
        table.add_row(vec![
            Cell::new(&asset.asset_id),
            Cell::new(&asset.asset),
            address,
        ]);
    }

    println!("{table}");
    Ok(())
}
