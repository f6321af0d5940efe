//! Demo: Dry-Run Order
//!
//! Showcases: Order validation without placement (no submitId is sent)
//!
//! Run: cargo run --bin dry_run_order

use colored::*;
use walutomat_demos::{client_from_env, init_tracing};
use walutomat_rest::ApiError;
use walutomat_trader::{IssuedOrder, Trader, TraderError};
use walutomat_types::{Currency, CurrencyPair};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  DRY-RUN SELL ALL EUR".cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let trader = Trader::new(client_from_env(true)?);
    let pair = CurrencyPair::EURPLN;

    let book = trader.client().get_best_offers(pair).await?;
    let Some(ask) = book.best_ask() else {
        println!("{} No asks on {}", "✗".red(), pair);
        return Ok(());
    };

    match trader.sell_all_available(pair, Currency::Eur, ask.price).await {
        Ok(IssuedOrder::DryRun(result)) => {
            println!("{} Exchange accepted the order at {}", "✓".green(), ask.price);
            for (key, value) in &result.details {
                println!("  {:>20}: {}", key.dimmed(), value);
            }
        }
        Ok(IssuedOrder::Placed(order)) => println!("{} Unexpectedly placed {}", "!".red(), order),
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            if let Some(api) = api_error(&e) {
                println!("{}", api.render());
            }
        }
    }

    Ok(())
}

fn api_error(error: &TraderError) -> Option<&ApiError> {
    match error {
        TraderError::Rest(rest) => rest.api_error(),
        _ => None,
    }
}
