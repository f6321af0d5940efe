//! Market data endpoints for the P2P exchange

use crate::client::WalutomatRestClient;
use crate::error::RestResult;
use crate::transport::HttpTransport;
use crate::types::{BEST_OFFERS, BEST_OFFERS_DETAILED};
use reqwest::Method;
use tracing::{debug, instrument};
use walutomat_types::{CurrencyPair, OrderBook};

/// Market data endpoints
pub struct MarketEndpoints<'a, T: HttpTransport> {
    client: &'a WalutomatRestClient<T>,
}

impl<'a, T: HttpTransport> MarketEndpoints<'a, T> {
    pub fn new(client: &'a WalutomatRestClient<T>) -> Self {
        Self { client }
    }

    /// Get the best bid and ask
    #[instrument(skip(self), fields(pair = %pair))]
    pub async fn get_best_offers(&self, pair: CurrencyPair) -> RestResult<OrderBook> {
        let params = [("currencyPair", pair.to_string())];
        self.client
            .execute_as(Method::GET, BEST_OFFERS, &params, None)
            .await
    }

    /// Get up to `item_limit` offers per side
    ///
    /// The returned book is sorted best first regardless of the order the
    /// exchange sent.
    #[instrument(skip(self), fields(pair = %pair))]
    pub async fn get_best_offers_detailed(
        &self,
        pair: CurrencyPair,
        item_limit: u32,
    ) -> RestResult<OrderBook> {
        let params = [
            ("currencyPair", pair.to_string()),
            ("itemLimit", item_limit.to_string()),
        ];
        let mut book: OrderBook = self
            .client
            .execute_as(Method::GET, BEST_OFFERS_DETAILED, &params, None)
            .await?;
        book.sort();

        debug!(bids = book.bids.len(), asks = book.asks.len(), "Fetched order book");

        Ok(book)
    }
}
