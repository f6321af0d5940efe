//! Demo: Volume-Weighted Quotes
//!
//! Showcases: Order book depth, VWAP with rust_decimal, depth widening
//!
//! Run: cargo run --bin price_by_volume

use colored::*;
use rust_decimal_macros::dec;
use walutomat_demos::{client_from_env, init_tracing};
use walutomat_trader::{Trader, TraderError};
use walutomat_types::CurrencyPair;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  VOLUME-WEIGHTED QUOTES".cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let trader = Trader::new(client_from_env(false)?);
    let pair = CurrencyPair::EURPLN;

    let book = trader.client().get_best_offers(pair).await?;
    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
        println!(
            "  {} {}  {} {}  {} {}",
            "Best Bid:".yellow(),
            bid.price,
            "Best Ask:".yellow(),
            ask.price,
            "Spread:".green(),
            ask.price - bid.price
        );
        println!();
    }

    println!(
        "  {:>10}  {:>14}  {:>14}",
        "VOLUME".dimmed(),
        "BID VWAP".dimmed(),
        "ASK VWAP".dimmed()
    );

    for volume in [dec!(100), dec!(1000), dec!(10000), dec!(100000)] {
        match trader.best_price_by_volume(pair, volume, 10).await {
            Ok((bid, ask)) => println!(
                "  {:>10}  {:>14.4}  {:>14.4}",
                volume,
                bid,
                ask
            ),
            Err(TraderError::RetryExhausted { last_missing, .. }) => println!(
                "  {:>10}  {:>14}  {}",
                volume,
                "INSUFFICIENT".red(),
                format!("missing {}", last_missing).dimmed()
            ),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
