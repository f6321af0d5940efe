//! Demo: Wallet Balances
//!
//! Showcases: RSA-signed requests, decimal balances
//!
//! Run: cargo run --bin balances

use colored::*;
use walutomat_demos::{client_from_env, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  WALLET BALANCES".cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let client = client_from_env(false)?;
    let balances = client.get_account_balances().await?;

    println!(
        "  {:>8}  {:>14}  {:>14}  {:>14}",
        "CURRENCY".white().bold(),
        "TOTAL".white().bold(),
        "AVAILABLE".white().bold(),
        "RESERVED".white().bold()
    );
    println!("  {}", "─".repeat(56));

    for balance in balances.iter() {
        let available = if balance.available.is_zero() {
            format!("{:>14}", balance.available).dimmed()
        } else {
            format!("{:>14}", balance.available).green()
        };
        println!(
            "  {:>8}  {:>14}  {}  {:>14}",
            balance.currency.as_str().yellow(),
            balance.total,
            available,
            balance.reserved
        );
        if !balance.is_consistent() {
            println!("  {} total != available + reserved", "!".red());
        }
    }

    Ok(())
}
