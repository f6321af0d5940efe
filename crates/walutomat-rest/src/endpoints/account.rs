//! Account endpoints: balances and operation history

use crate::client::WalutomatRestClient;
use crate::error::RestResult;
use crate::transport::HttpTransport;
use crate::types::{HistoryQuery, ACCOUNT_BALANCES, ACCOUNT_HISTORY};
use futures::Stream;
use reqwest::Method;
use tracing::instrument;
use walutomat_types::{AccountBalances, HistoryItem};

use super::paginate;

/// Account endpoints
pub struct AccountEndpoints<'a, T: HttpTransport> {
    client: &'a WalutomatRestClient<T>,
}

impl<'a, T: HttpTransport> AccountEndpoints<'a, T> {
    pub fn new(client: &'a WalutomatRestClient<T>) -> Self {
        Self { client }
    }

    /// Get balances of all wallets
    #[instrument(skip(self))]
    pub async fn get_balances(&self) -> RestResult<AccountBalances> {
        self.client
            .execute_as(Method::GET, ACCOUNT_BALANCES, &[], None)
            .await
    }

    /// Stream history items matching `query`
    ///
    /// Pages are requested as the stream is polled; each follow-up page
    /// continues from the last `historyItemId` seen.
    pub fn history(&self, query: HistoryQuery) -> impl Stream<Item = RestResult<HistoryItem>> + 'a {
        paginate(
            self.client,
            ACCOUNT_HISTORY,
            query.to_params(),
            query.item_limit,
            |last: &HistoryItem| ("continueFrom", last.history_item_id.to_string()),
        )
    }
}
