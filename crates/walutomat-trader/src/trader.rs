//! Trading facade over the REST client

use crate::error::{TraderError, TraderResult};
use crate::estimator::{price_by_volume, EstimateError, MissingVolume};
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use walutomat_rest::{
    HttpTransport, OrderSubmitted, ReqwestTransport, RestError, SubmitOrderRequest,
    WalutomatRestClient,
};
use walutomat_types::{AccountBalances, Currency, CurrencyPair, Order, Side};

/// Order book fetches made by [`Trader::best_price_by_volume`]
pub const MAX_BOOK_ATTEMPTS: u32 = 3;

/// Grow a page size by 20%, rounding up
fn widen(item_limit: u32) -> u32 {
    item_limit.saturating_mul(6).div_ceil(5)
}

/// Outcome of [`Trader::issue_order`]
#[derive(Debug, Clone, PartialEq)]
pub enum IssuedOrder {
    /// Order was placed; state as fetched right after submission
    Placed(Order),
    /// Client runs in dry-run mode; nothing was placed
    DryRun(OrderSubmitted),
}

impl IssuedOrder {
    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::Placed(order) => Some(order),
            Self::DryRun(_) => None,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun(_))
    }
}

/// Polling settings for [`Trader::wait_until_filled`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Delay between order lookups
    pub poll_interval: Duration,
    /// Give up after this long; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            timeout: None,
        }
    }
}

impl WaitOptions {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Triggers a [`CancellationSignal`]
#[derive(Debug)]
pub struct CancellationHandle {
    tx: watch::Sender<bool>,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Cooperative cancellation flag for long waits
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// Create a connected handle and signal
    pub fn channel() -> (CancellationHandle, CancellationSignal) {
        let (tx, rx) = watch::channel(false);
        (CancellationHandle { tx }, CancellationSignal { rx })
    }

    /// A signal that never fires
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancelled; pends forever if the handle was dropped first
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// High-level trading operations
///
/// # Example
///
/// ```no_run
/// use rust_decimal_macros::dec;
/// use walutomat_rest::{Credentials, WalutomatRestClient};
/// use walutomat_trader::{CancellationSignal, Trader, WaitOptions};
/// use walutomat_types::{Currency, CurrencyPair};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let trader = Trader::new(WalutomatRestClient::new(Credentials::from_env()?));
///
///     let (bid, ask) = trader.best_price_by_volume(CurrencyPair::EURPLN, dec!(1000), 10).await?;
///     println!("EURPLN for 1000 EUR: bid {} ask {}", bid, ask);
///
///     let issued = trader
///         .sell_all_available(CurrencyPair::EURPLN, Currency::Eur, ask)
///         .await?;
///     if let Some(order) = issued.order() {
///         let filled = trader
///             .wait_until_filled(&order.order_id, WaitOptions::default(), CancellationSignal::never())
///             .await?;
///         println!("{}", filled);
///     }
///     Ok(())
/// }
/// ```
pub struct Trader<T: HttpTransport = ReqwestTransport> {
    client: WalutomatRestClient<T>,
}

impl<T: HttpTransport> Trader<T> {
    pub fn new(client: WalutomatRestClient<T>) -> Self {
        Self { client }
    }

    /// Underlying REST client
    pub fn client(&self) -> &WalutomatRestClient<T> {
        &self.client
    }

    pub async fn get_account_balances(&self) -> TraderResult<AccountBalances> {
        Ok(self.client.get_account_balances().await?)
    }

    /// First order the exchange reports for `order_id`
    pub async fn get_order_by_id(&self, order_id: &str) -> TraderResult<Order> {
        self.client
            .get_order(order_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TraderError::OrderNotFound(order_id.to_string()))
    }

    /// Submit an order under a fresh submit id and fetch its state
    #[instrument(skip(self), fields(pair = %pair, side = %side))]
    pub async fn issue_order(
        &self,
        side: Side,
        pair: CurrencyPair,
        volume: Decimal,
        volume_currency: Currency,
        limit_price: Decimal,
    ) -> TraderResult<IssuedOrder> {
        let submit_id = Uuid::new_v4().to_string();
        let request = SubmitOrderRequest::new(pair, side, volume, volume_currency, limit_price)
            .with_submit_id(submit_id);

        let submitted = self.client.submit_order(&request).await?;
        if self.client.is_dry_run() {
            return Ok(IssuedOrder::DryRun(submitted));
        }

        let order_id = submitted.order_id.ok_or_else(|| {
            RestError::Protocol("order submission returned no orderId".to_string())
        })?;

        Ok(IssuedOrder::Placed(self.get_order_by_id(&order_id).await?))
    }

    /// Sell the whole available balance of `currency`
    ///
    /// `limit_price` is quoted as COUNTER per one BASE of `pair`, whichever
    /// side of the pair `currency` is.
    #[instrument(skip(self), fields(pair = %pair, currency = %currency))]
    pub async fn sell_all_available(
        &self,
        pair: CurrencyPair,
        currency: Currency,
        limit_price: Decimal,
    ) -> TraderResult<IssuedOrder> {
        check_pair(pair, currency)?;

        let volume = self.client.get_account_balances().await?.available(currency);
        info!(%volume, "Selling available balance");

        self.issue_order(Side::Sell, pair, volume, currency, limit_price)
            .await
    }

    /// Spend the whole available COUNTER balance of `pair` buying `currency`
    ///
    /// The volume is `available(counter) / limit_price`, unrounded.
    #[instrument(skip(self), fields(pair = %pair, currency = %currency))]
    pub async fn buy_all_available(
        &self,
        pair: CurrencyPair,
        currency: Currency,
        limit_price: Decimal,
    ) -> TraderResult<IssuedOrder> {
        check_pair(pair, currency)?;
        if limit_price <= Decimal::ZERO {
            return Err(TraderError::InvalidParameter(format!(
                "limit price must be positive, got {}",
                limit_price
            )));
        }

        let available = self.client.get_account_balances().await?.available(pair.counter);
        let volume = available.checked_div(limit_price).ok_or_else(|| {
            TraderError::InvalidParameter(format!("{} / {} overflows", available, limit_price))
        })?;
        info!(%available, %volume, "Buying with available balance");

        self.issue_order(Side::Buy, pair, volume, currency, limit_price)
            .await
    }

    /// Cancel an active order
    pub async fn cancel(&self, order_id: &str) -> TraderResult<()> {
        Ok(self.client.cancel_order(order_id).await?)
    }

    /// Volume-weighted `(bid, ask)` prices for trading `volume`
    ///
    /// When the fetched depth cannot cover `volume`, the page size grows by
    /// 20% and the book is fetched again, up to [`MAX_BOOK_ATTEMPTS`] times.
    #[instrument(skip(self), fields(pair = %pair))]
    pub async fn best_price_by_volume(
        &self,
        pair: CurrencyPair,
        volume: Decimal,
        item_limit: u32,
    ) -> TraderResult<(Decimal, Decimal)> {
        let mut item_limit = item_limit;
        let mut last_missing = None;

        for attempt in 1..=MAX_BOOK_ATTEMPTS {
            let book = self
                .client
                .get_best_offers_detailed(pair, item_limit)
                .await?;

            let estimate = price_by_volume(&book.bids, volume)
                .and_then(|bid| Ok((bid, price_by_volume(&book.asks, volume)?)));

            match estimate {
                Ok(prices) => {
                    debug!(attempt, bid = %prices.0, ask = %prices.1, "Estimated prices");
                    return Ok(prices);
                }
                Err(EstimateError::InsufficientVolume(missing)) => {
                    warn!(
                        attempt,
                        item_limit,
                        missing = missing.as_f64(),
                        "Order book too shallow, widening"
                    );
                    last_missing = Some(missing);
                    item_limit = widen(item_limit);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TraderError::RetryExhausted {
            attempts: MAX_BOOK_ATTEMPTS,
            last_missing: last_missing.unwrap_or(MissingVolume(volume)),
        })
    }

    /// Poll an order until no further fills can happen
    ///
    /// Returns the final order, which is either fully executed or closed
    /// with partial completion.
    #[instrument(skip(self, options, cancel))]
    pub async fn wait_until_filled(
        &self,
        order_id: &str,
        options: WaitOptions,
        mut cancel: CancellationSignal,
    ) -> TraderResult<Order> {
        let poll = self.poll_until_terminal(order_id, options.poll_interval);
        let bounded = async {
            match options.timeout {
                Some(limit) => tokio::time::timeout(limit, poll)
                    .await
                    .unwrap_or(Err(TraderError::Timeout(limit))),
                None => poll.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Wait cancelled");
                Err(TraderError::Cancelled)
            }
            result = bounded => result,
        }
    }

    async fn poll_until_terminal(&self, order_id: &str, poll_interval: Duration) -> TraderResult<Order> {
        loop {
            let order = self.get_order_by_id(order_id).await?;
            if order.is_terminal() {
                info!(completion = %order.completion, status = %order.status, "Order finished");
                return Ok(order);
            }
            debug!(completion = %order.completion, "Order still active");
            tokio::time::sleep(poll_interval).await;
        }
    }
}

impl<T: HttpTransport> std::fmt::Debug for Trader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trader").field("client", &self.client).finish()
    }
}

fn check_pair(pair: CurrencyPair, currency: Currency) -> TraderResult<()> {
    if pair.contains(currency) {
        Ok(())
    } else {
        Err(TraderError::InvalidParameter(format!(
            "{} is not part of {}",
            currency, pair
        )))
    }
}
