use super::ui;
use crate::client::PriceClient;
use crate::tokens;
use anyhow::Result;

pub async fn run(client: &PriceClient, from: &str, to: &str) -> Result<()> {
    let pb = ui::new_spinner("Resolving pair price...");
    let ratio = client.get_price_for_pair(from, to).await;
    pb.finish_and_clear();

    match ratio {
        Some(ratio) => {
            println!("1 {from} = {} {to}", tokens::format_price(ratio));
        }
        None => {
            println!(
                "{}",
                ui::style_text(
                    &format!("No price available for {from}/{to} (unknown symbol or unresolved quote)"),
                    ui::StyleType::Error,
                )
            );
        }
    }
    Ok(())
}
