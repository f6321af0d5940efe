//! Demo: Account History
//!
//! Showcases: Lazily paginated streams over the history endpoint
//!
//! Run: cargo run --bin account_history

use colored::*;
use futures::TryStreamExt;
use walutomat_demos::{client_from_env, init_tracing};
use walutomat_rest::HistoryQuery;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  ACCOUNT HISTORY (last 50)".cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let client = client_from_env(false)?;
    let history = client.account_history(HistoryQuery::new().item_limit(20));
    futures::pin_mut!(history);

    let mut shown = 0;
    while let Some(item) = history.try_next().await? {
        let amount = if item.is_credit() {
            format!("{:>14}", item.operation_amount).green()
        } else {
            format!("{:>14}", item.operation_amount).red()
        };
        println!(
            "  {:>10}  {}  {}  {}  {}",
            item.history_item_id,
            item.ts.format("%Y-%m-%d %H:%M:%S"),
            amount,
            item.currency.as_str().yellow(),
            item.operation_type.dimmed()
        );

        shown += 1;
        if shown == 50 {
            break;
        }
    }

    Ok(())
}
