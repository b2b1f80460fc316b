use anyhow::{Result, anyhow};
use url::Url;

use crate::signing::Signature;

/// Everything needed to address one order on the tracking API
#[derive(Debug, Clone)]
pub struct TrackingQuery {
    pub order_id: String,
    pub retailer_moniker: String,
    pub signature: Signature,
}

/// Raw tracking API response, body untouched
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl TrackingQuery {
    /// `{base}/orders/{order_id}/tracking?retailer_moniker=..&order_token=..&epoch=..&epoch_token=..`
    ///
    /// The order id is pushed as a single escaped path segment, so it can never
    /// add segments or start the query string.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();

        url.path_segments_mut()
            .map_err(|_| anyhow!("{} cannot be used as a base URL", base))?
            .pop_if_empty()
            .extend(["orders", self.order_id.as_str(), "tracking"]);

        url.query_pairs_mut()
            .clear()
            .append_pair("retailer_moniker", &self.retailer_moniker)
            .append_pair("order_token", &self.signature.order_token)
            .append_pair("epoch", &self.signature.epoch.to_string())
            .append_pair("epoch_token", &self.signature.epoch_token);

        Ok(url)
    }
}
