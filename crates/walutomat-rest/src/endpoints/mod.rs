//! API endpoint implementations

pub mod account;
pub mod market;
pub mod orders;

pub use account::AccountEndpoints;
pub use market::MarketEndpoints;
pub use orders::OrderEndpoints;

use crate::client::WalutomatRestClient;
use crate::error::{RestError, RestResult};
use crate::transport::HttpTransport;
use futures::{stream, Stream, TryStreamExt};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Lazily walk a cursor-paginated listing, one request per page
///
/// A page shorter than `item_limit` is the last one. Otherwise `cursor`
/// turns the last item into the parameter that selects the next page.
pub(crate) fn paginate<'a, T, I>(
    client: &'a WalutomatRestClient<T>,
    path: &'static str,
    params: Vec<(&'static str, String)>,
    item_limit: u32,
    cursor: fn(&I) -> (&'static str, String),
) -> impl Stream<Item = RestResult<I>> + 'a
where
    T: HttpTransport,
    I: DeserializeOwned + 'a,
{
    stream::try_unfold(Some(params), move |state| async move {
        let Some(mut params) = state else {
            return Ok(None);
        };
        if item_limit == 0 {
            return Err(RestError::InvalidParameter(
                "itemLimit must be positive".to_string(),
            ));
        }

        let page: Vec<I> = client.execute_as(Method::GET, path, &params, None).await?;

        let next = match page.last() {
            Some(last) if page.len() >= item_limit as usize => {
                let (key, value) = cursor(last);
                params.retain(|(k, _)| *k != key);
                params.push((key, value));
                Some(params)
            }
            _ => None,
        };

        debug!(path, items = page.len(), more = next.is_some(), "Fetched page");

        Ok(Some((stream::iter(page.into_iter().map(Ok::<I, RestError>)), next)))
    })
    .try_flatten()
}
