//! Accumulating list operations across truncated pages

use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::http_client::{QueryParams, Request, Transport};

/// One decoded page: its items, and the cursor of the next page if truncated.
pub(crate) struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<QueryParams>,
}

/// A list response document that may be one page of a longer listing.
pub(crate) trait Paged: DeserializeOwned {
    type Item;

    fn into_page(self) -> Result<Page<Self::Item>>;
}

/// Turn the continuation fields of a response into the next page's cursor.
///
/// Fields left unset by the server are omitted. A truncated response with no
/// continuation field at all cannot be continued and is a decode failure.
pub(crate) fn next_cursor(
    is_truncated: bool,
    fields: impl IntoIterator<Item = (&'static str, Option<String>)>,
    listing: &str,
) -> Result<Option<QueryParams>> {
    if !is_truncated {
        return Ok(None);
    }
    let cursor: QueryParams = fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();
    if cursor.is_empty() {
        return Err(ClientError::Decode {
            detail: format!("truncated {listing} page carries no continuation marker"),
            raw: String::new(),
        });
    }
    Ok(Some(cursor))
}

impl Transport {
    /// Fetch every page of a listing, in server order.
    ///
    /// Any failing page fails the whole listing; nothing gathered before it is returned.
    pub(crate) async fn list_all<P: Paged>(&self, request: Request<'_>) -> Result<Vec<P::Item>> {
        let mut items = Vec::new();
        let mut pages = 0usize;
        let mut next = request.clone();

        loop {
            let page = self.execute::<(), P>(next).await?.into_page()?;
            pages += 1;
            items.extend(page.items);

            match page.next {
                Some(cursor) => {
                    log::debug!("[route53] page {pages} truncated, continuing at {cursor:?}");
                    next = request.clone().with_cursor(cursor);
                }
                None => break,
            }
        }

        log::debug!("[route53] listed {} items over {pages} page(s)", items.len());
        Ok(items)
    }
}
